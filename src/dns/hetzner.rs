//! Hetzner DNS provider
//!
//! Records live under a zone identifier, so every operation that needs one
//! looks the zone up by name first. Records may omit their TTL, in which case
//! the zone default applies.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::name::{normalize_record_name, unfqdn};
use super::provider::{decode, ttl_seconds, DnsProvider, DnsRecord};
use crate::config::ClientOptions;
use crate::error::{DnsError, Result};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

const HETZNER_API_BASE: &str = "https://dns.hetzner.com/api/v1";
const AUTH_HEADER: &str = "Auth-API-Token";

pub struct HetznerProvider {
    transport: Arc<dyn Transport>,
    token: String,
    base_url: String,
}

/// Identifier and default TTL of a Hetzner zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    pub id: String,
    pub default_ttl: u32,
}

#[derive(Debug, Deserialize)]
struct ZonesResponse {
    zones: Vec<HetznerZone>,
}

#[derive(Debug, Deserialize)]
struct HetznerZone {
    id: String,
    #[serde(default)]
    ttl: u32,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Vec<HetznerRecord>,
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    record: HetznerRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct HetznerRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    zone_id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    value: String,
    #[serde(default)]
    ttl: Option<u32>,
}

impl HetznerProvider {
    pub fn new(token: &str, options: &ClientOptions) -> Result<Self> {
        let transport = ReqwestTransport::new(options.timeout)?;
        let base_url = options.base_url.as_deref().unwrap_or(HETZNER_API_BASE);

        Ok(Self::with_transport(token, base_url, Arc::new(transport)))
    }

    pub fn with_transport(token: &str, base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .header(AUTH_HEADER, self.token.as_str())
    }

    /// Look up the single zone called `zone`.
    pub async fn resolve_zone(&self, zone: &str) -> Result<ZoneInfo> {
        let zone = unfqdn(zone);
        let path = format!("/zones?name={}", urlencoding::encode(zone));

        let body = self.transport.execute(self.request(Method::GET, &path)).await?;
        let response: ZonesResponse = decode(&body)?;

        let mut zones = response.zones.into_iter();
        match (zones.next(), zones.next()) {
            (Some(found), None) => {
                debug!("Resolved zone {} to {}", zone, found.id);
                Ok(ZoneInfo {
                    id: found.id,
                    default_ttl: found.ttl,
                })
            }
            (None, _) => Err(DnsError::ZoneNotFound(zone.to_string())),
            (Some(_), Some(_)) => Err(DnsError::AmbiguousZone(zone.to_string())),
        }
    }

    async fn write_record(
        &self,
        method: Method,
        path: &str,
        zone_info: &ZoneInfo,
        payload: &HetznerRecord,
    ) -> Result<DnsRecord> {
        let request = self.request(method, path).json(payload)?;
        let body = self.transport.execute(request).await?;
        let response: RecordResponse = decode(&body)?;

        Ok(from_wire(response.record, zone_info))
    }
}

fn to_wire(record: &DnsRecord, zone: &str, zone_info: &ZoneInfo) -> HetznerRecord {
    HetznerRecord {
        id: String::new(),
        zone_id: zone_info.id.clone(),
        record_type: record.record_type.clone(),
        name: normalize_record_name(&record.name, zone),
        value: record.value.clone(),
        // Sent even when zero; the zone default only applies on the way in.
        ttl: Some(ttl_seconds(record.ttl)),
    }
}

fn from_wire(record: HetznerRecord, zone_info: &ZoneInfo) -> DnsRecord {
    let ttl = record.ttl.unwrap_or(zone_info.default_ttl);

    DnsRecord {
        id: record.id,
        record_type: record.record_type,
        name: record.name,
        value: record.value,
        ttl: Duration::from_secs(u64::from(ttl)),
    }
}

#[async_trait]
impl DnsProvider for HetznerProvider {
    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let zone_info = self.resolve_zone(zone).await?;
        let path = format!("/records?zone_id={}", urlencoding::encode(&zone_info.id));

        let body = self.transport.execute(self.request(Method::GET, &path)).await?;
        let response: RecordsResponse = decode(&body)?;

        Ok(response
            .records
            .into_iter()
            .map(|r| from_wire(r, &zone_info))
            .collect())
    }

    async fn create_record(&self, zone: &str, record: &DnsRecord) -> Result<DnsRecord> {
        let zone_info = self.resolve_zone(zone).await?;
        let payload = to_wire(record, zone, &zone_info);

        let created = self
            .write_record(Method::POST, "/records", &zone_info, &payload)
            .await?;
        info!("Created {} record {} ({})", created.record_type, created.name, created.id);
        Ok(created)
    }

    async fn update_record(&self, zone: &str, record: &DnsRecord) -> Result<DnsRecord> {
        if record.is_new() {
            return Err(DnsError::MissingRecordId);
        }

        let zone_info = self.resolve_zone(zone).await?;
        let payload = to_wire(record, zone, &zone_info);
        let path = format!("/records/{}", urlencoding::encode(&record.id));

        let updated = self
            .write_record(Method::PUT, &path, &zone_info, &payload)
            .await?;
        info!("Updated {} record {} ({})", updated.record_type, updated.name, updated.id);
        Ok(updated)
    }

    async fn delete_record(&self, _zone: &str, record: &DnsRecord) -> Result<()> {
        let path = format!("/records/{}", urlencoding::encode(&record.id));
        self.transport
            .execute(self.request(Method::DELETE, &path))
            .await?;

        info!("Deleted record {}", record.id);
        Ok(())
    }

    fn supports_in_place_update(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "hetzner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::FakeTransport;
    use serde_json::json;

    fn zone_info() -> ZoneInfo {
        ZoneInfo {
            id: "zone-1".to_string(),
            default_ttl: 86400,
        }
    }

    #[test]
    fn test_outbound_normalizes_name_and_keeps_zero_ttl() {
        let record = DnsRecord::new(
            "TXT",
            "_acme-challenge.example.com.",
            "token",
            Duration::ZERO,
        );
        let wire = to_wire(&record, "example.com.", &zone_info());

        assert_eq!(wire.name, "_acme-challenge");
        assert_eq!(wire.zone_id, "zone-1");
        assert_eq!(wire.ttl, Some(0));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            json,
            json!({
                "zone_id": "zone-1",
                "type": "TXT",
                "name": "_acme-challenge",
                "value": "token",
                "ttl": 0
            })
        );
    }

    #[test]
    fn test_inbound_ttl_defaults_to_zone() {
        let wire: HetznerRecord = serde_json::from_value(json!({
            "id": "r1", "zone_id": "zone-1", "type": "A", "name": "www", "value": "192.0.2.1"
        }))
        .unwrap();
        assert_eq!(from_wire(wire, &zone_info()).ttl, Duration::from_secs(86400));

        let wire: HetznerRecord = serde_json::from_value(json!({
            "id": "r1", "type": "A", "name": "www", "value": "192.0.2.1", "ttl": null
        }))
        .unwrap();
        assert_eq!(from_wire(wire, &zone_info()).ttl, Duration::from_secs(86400));

        let wire: HetznerRecord = serde_json::from_value(json!({
            "id": "r1", "type": "A", "name": "www", "value": "192.0.2.1", "ttl": 3600
        }))
        .unwrap();
        let record = from_wire(wire, &zone_info());
        assert_eq!(record.ttl, Duration::from_secs(3600));
        assert_eq!(record.id, "r1");
        assert_eq!(record.name, "www");
    }

    #[tokio::test]
    async fn test_ambiguous_zone_stops_early() {
        let transport = Arc::new(FakeTransport::new().reply_json(json!({
            "zones": [{"id": "a", "ttl": 60}, {"id": "b", "ttl": 60}]
        })));
        let provider = HetznerProvider::with_transport("t", "http://hetzner.test", transport.clone());

        let record = DnsRecord::new("A", "www", "192.0.2.1", Duration::ZERO);
        let err = provider.create_record("example.com", &record).await.unwrap_err();

        assert!(matches!(err, DnsError::AmbiguousZone(zone) if zone == "example.com"));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_zone_is_reported() {
        let transport = Arc::new(FakeTransport::new().reply_json(json!({"zones": []})));
        let provider = HetznerProvider::with_transport("t", "http://hetzner.test", transport.clone());

        let err = provider.list_records("example.com.").await.unwrap_err();

        assert!(matches!(err, DnsError::ZoneNotFound(zone) if zone == "example.com"));
        assert_eq!(
            transport.calls(),
            vec![(
                "GET".to_string(),
                "http://hetzner.test/zones?name=example.com".to_string()
            )]
        );
    }
}
