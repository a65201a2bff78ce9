//! Error type shared by every provider and the record manager.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DnsError>;

/// Which half of a delete-then-create update failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    Delete,
    Create,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStage::Delete => write!(f, "delete"),
            UpdateStage::Create => write!(f, "create"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DnsError {
    /// Network failure, or a response status outside 2xx.
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to decode provider response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Zone is ambiguous: {0}")]
    AmbiguousZone(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// Delete-then-create update did not complete. When `stage` is
    /// `Create`, the original record is already gone.
    #[error("Update of record {record_id} failed during {stage}: {source}")]
    PartialUpdate {
        record_id: String,
        stage: UpdateStage,
        #[source]
        source: Box<DnsError>,
    },

    #[error("{provider} does not support {operation}")]
    UnsupportedOperation {
        provider: &'static str,
        operation: &'static str,
    },

    #[error("Record has no identifier")]
    MissingRecordId,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Unknown DNS provider: {0}")]
    UnknownProvider(String),
}

impl DnsError {
    /// HTTP status of the failing response, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            DnsError::Transport { status, .. } => *status,
            DnsError::PartialUpdate { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            DnsError::Cancelled => true,
            DnsError::PartialUpdate { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_displays_message_only() {
        let e = DnsError::Transport {
            status: Some(404),
            message: "Not Found (404)".to_string(),
        };
        assert_eq!(e.to_string(), "Not Found (404)");
        assert_eq!(e.status(), Some(404));
    }

    #[test]
    fn partial_update_looks_through_to_source() {
        let e = DnsError::PartialUpdate {
            record_id: "rec_1".to_string(),
            stage: UpdateStage::Create,
            source: Box::new(DnsError::Cancelled),
        };
        assert!(e.is_cancelled());
        assert_eq!(
            e.to_string(),
            "Update of record rec_1 failed during create: Operation cancelled"
        );
    }
}
