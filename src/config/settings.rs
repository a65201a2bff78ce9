use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DnsError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Hetzner,
    Vercel,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Hetzner => write!(f, "hetzner"),
            ProviderKind::Vercel => write!(f, "vercel"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = DnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hetzner" => Ok(ProviderKind::Hetzner),
            "vercel" => Ok(ProviderKind::Vercel),
            _ => Err(DnsError::UnknownProvider(s.to_string())),
        }
    }
}

/// Connection options shared by every provider.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Overrides the provider's public API base URL.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_kind() {
        assert_eq!("hetzner".parse::<ProviderKind>().unwrap(), ProviderKind::Hetzner);
        assert_eq!(" Vercel ".parse::<ProviderKind>().unwrap(), ProviderKind::Vercel);

        let err = "godaddy".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, DnsError::UnknownProvider(name) if name == "godaddy"));
    }

    #[test]
    fn test_provider_kind_serde() {
        let kind: ProviderKind = serde_json::from_str("\"vercel\"").unwrap();
        assert_eq!(kind, ProviderKind::Vercel);
        assert_eq!(serde_json::to_string(&ProviderKind::Hetzner).unwrap(), "\"hetzner\"");
        assert_eq!(ProviderKind::Hetzner.to_string(), "hetzner");
    }

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert!(options.base_url.is_none());
        assert_eq!(options.timeout, Duration::from_secs(30));
    }
}
