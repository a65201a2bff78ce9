mod hetzner;
mod manager;
mod name;
mod provider;
mod vercel;

pub use hetzner::{HetznerProvider, ZoneInfo};
pub use manager::RecordManager;
pub use name::{normalize_record_name, unfqdn};
pub use provider::{DnsProvider, DnsRecord};
pub use vercel::{VercelProvider, MIN_TTL_SECONDS};

use std::sync::Arc;

use crate::config::{ClientOptions, ProviderKind};
use crate::error::Result;

pub fn create_provider(
    kind: ProviderKind,
    token: &str,
    options: &ClientOptions,
) -> Result<Arc<dyn DnsProvider>> {
    match kind {
        ProviderKind::Hetzner => Ok(Arc::new(HetznerProvider::new(token, options)?)),
        ProviderKind::Vercel => Ok(Arc::new(VercelProvider::new(token, options)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider() {
        let options = ClientOptions::default();

        let provider = create_provider(ProviderKind::Hetzner, "token", &options).unwrap();
        assert_eq!(provider.provider_name(), "hetzner");
        assert!(provider.supports_in_place_update());

        let provider = create_provider(ProviderKind::Vercel, "token", &options).unwrap();
        assert_eq!(provider.provider_name(), "vercel");
        assert!(!provider.supports_in_place_update());
    }
}
