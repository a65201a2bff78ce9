use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{DnsError, Result};

/// Provider-agnostic DNS record.
///
/// An empty `id` marks a record that has not been created yet. A zero `ttl`
/// asks the provider (or zone) to pick its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecord {
    pub id: String,
    pub record_type: String,
    pub name: String,
    pub value: String,
    pub ttl: Duration,
}

impl DnsRecord {
    pub fn new(record_type: &str, name: &str, value: &str, ttl: Duration) -> Self {
        Self {
            id: String::new(),
            record_type: record_type.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            ttl,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch every record in the zone, translated into [`DnsRecord`]s.
    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>>;

    /// Create a record and return it as the provider stored it.
    async fn create_record(&self, zone: &str, record: &DnsRecord) -> Result<DnsRecord>;

    /// Replace an existing record in place, keeping its identifier.
    async fn update_record(&self, _zone: &str, _record: &DnsRecord) -> Result<DnsRecord> {
        Err(DnsError::UnsupportedOperation {
            provider: self.provider_name(),
            operation: "in-place update",
        })
    }

    /// Delete a record by its identifier.
    async fn delete_record(&self, zone: &str, record: &DnsRecord) -> Result<()>;

    /// Whether [`DnsProvider::update_record`] is available.
    fn supports_in_place_update(&self) -> bool;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Whole seconds, saturating at `u32::MAX`.
pub(crate) fn ttl_seconds(ttl: Duration) -> u32 {
    u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX)
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(DnsError::Decode)
}
