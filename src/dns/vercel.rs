//! Vercel DNS provider
//!
//! Records are addressed by domain name directly. Vercel has no endpoint to
//! modify a record, so updates go through delete-then-create in the record
//! manager.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::name::{normalize_record_name, unfqdn};
use super::provider::{decode, ttl_seconds, DnsProvider, DnsRecord};
use crate::config::ClientOptions;
use crate::error::Result;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

const VERCEL_API_BASE: &str = "https://api.vercel.com/v2";

/// Vercel rejects anything lower.
pub const MIN_TTL_SECONDS: u32 = 60;

pub struct VercelProvider {
    transport: Arc<dyn Transport>,
    token: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct VercelRecordRequest {
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    value: String,
    ttl: u32,
}

#[derive(Debug, Deserialize)]
struct VercelRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    value: String,
    #[serde(default)]
    ttl: u32,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Vec<VercelRecord>,
}

#[derive(Debug, Deserialize)]
struct CreateRecordResponse {
    uid: String,
}

impl VercelProvider {
    pub fn new(token: &str, options: &ClientOptions) -> Result<Self> {
        let transport = ReqwestTransport::new(options.timeout)?;
        let base_url = options.base_url.as_deref().unwrap_or(VERCEL_API_BASE);

        Ok(Self::with_transport(token, base_url, Arc::new(transport)))
    }

    pub fn with_transport(token: &str, base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn records_path(zone: &str) -> String {
        format!("/domains/{}/records", urlencoding::encode(unfqdn(zone)))
    }

    fn request(&self, method: Method, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
    }
}

fn to_wire(record: &DnsRecord, zone: &str) -> VercelRecordRequest {
    VercelRecordRequest {
        record_type: record.record_type.clone(),
        name: normalize_record_name(&record.name, zone),
        value: record.value.clone(),
        ttl: ttl_seconds(record.ttl).max(MIN_TTL_SECONDS),
    }
}

fn from_wire(record: VercelRecord) -> DnsRecord {
    DnsRecord {
        id: record.id,
        record_type: record.record_type,
        name: record.name,
        value: record.value,
        ttl: Duration::from_secs(u64::from(record.ttl)),
    }
}

/// The create response only carries the new identifier; everything else is
/// what was sent.
fn from_created(uid: String, sent: VercelRecordRequest) -> DnsRecord {
    DnsRecord {
        id: uid,
        record_type: sent.record_type,
        name: sent.name,
        value: sent.value,
        ttl: Duration::from_secs(u64::from(sent.ttl)),
    }
}

#[async_trait]
impl DnsProvider for VercelProvider {
    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let request = self.request(Method::GET, &Self::records_path(zone));
        let body = self.transport.execute(request).await?;
        let response: RecordsResponse = decode(&body)?;

        Ok(response.records.into_iter().map(from_wire).collect())
    }

    async fn create_record(&self, zone: &str, record: &DnsRecord) -> Result<DnsRecord> {
        let payload = to_wire(record, zone);
        let request = self
            .request(Method::POST, &Self::records_path(zone))
            .json(&payload)?;

        let body = self.transport.execute(request).await?;
        let response: CreateRecordResponse = decode(&body)?;

        let created = from_created(response.uid, payload);
        info!("Created {} record {} ({})", created.record_type, created.name, created.id);
        Ok(created)
    }

    async fn delete_record(&self, zone: &str, record: &DnsRecord) -> Result<()> {
        let path = format!(
            "{}/{}",
            Self::records_path(zone),
            urlencoding::encode(&record.id)
        );
        self.transport
            .execute(self.request(Method::DELETE, &path))
            .await?;

        info!("Deleted record {}", record.id);
        Ok(())
    }

    fn supports_in_place_update(&self) -> bool {
        false
    }

    fn provider_name(&self) -> &'static str {
        "vercel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DnsError;

    #[test]
    fn test_outbound_ttl_floor() {
        for (input, expected) in [(0, 60), (10, 60), (59, 60), (60, 60), (300, 300)] {
            let record = DnsRecord::new("TXT", "x", "v", Duration::from_secs(input));
            assert_eq!(to_wire(&record, "example.com").ttl, expected, "ttl={input}");
        }
    }

    #[test]
    fn test_outbound_normalizes_name() {
        let record = DnsRecord::new("CNAME", "www.example.com.", "cname.vercel-dns.com", Duration::ZERO);
        let json = serde_json::to_value(to_wire(&record, "example.com")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "CNAME",
                "name": "www",
                "value": "cname.vercel-dns.com",
                "ttl": 60
            })
        );
    }

    #[test]
    fn test_created_record_takes_uid() {
        let record = DnsRecord::new("TXT", "_acme-challenge.example.com", "abc", Duration::from_secs(10))
            .with_id("rec_old");
        let created = from_created("rec_new".to_string(), to_wire(&record, "example.com"));

        assert_eq!(created.id, "rec_new");
        assert_eq!(created.name, "_acme-challenge");
        assert_eq!(created.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_create_response_without_uid_is_decode_error() {
        let err = decode::<CreateRecordResponse>(br#"{"id": "rec_1"}"#).unwrap_err();
        assert!(matches!(err, DnsError::Decode(_)));
    }
}
