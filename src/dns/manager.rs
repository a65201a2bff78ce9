use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::provider::{DnsProvider, DnsRecord};
use crate::error::{DnsError, Result, UpdateStage};

/// Record operations over any [`DnsProvider`], including the create-or-update
/// decision.
///
/// Holds no state besides the provider, so one manager can serve concurrent
/// callers. Every operation races the given token and fails with
/// [`DnsError::Cancelled`] once it fires; the in-flight request is dropped.
#[derive(Clone)]
pub struct RecordManager {
    provider: Arc<dyn DnsProvider>,
}

impl RecordManager {
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub async fn list_records(
        &self,
        zone: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<DnsRecord>> {
        cancellable(cancel, self.provider.list_records(zone)).await
    }

    /// Create the record when it has no id, otherwise update it.
    ///
    /// Providers without an in-place update get delete-then-create, and the
    /// returned record carries the new identifier. That path is not atomic:
    /// if the create fails, the old record stays deleted.
    pub async fn upsert(
        &self,
        zone: &str,
        record: &DnsRecord,
        cancel: &CancellationToken,
    ) -> Result<DnsRecord> {
        if record.is_new() {
            debug!("[{}] Creating {} {}", self.provider_name(), record.record_type, record.name);
            return cancellable(cancel, self.provider.create_record(zone, record)).await;
        }

        if self.provider.supports_in_place_update() {
            debug!("[{}] Updating {} in place", self.provider_name(), record.id);
            return cancellable(cancel, self.provider.update_record(zone, record)).await;
        }

        self.replace(zone, record, cancel).await
    }

    pub async fn delete(
        &self,
        zone: &str,
        record: &DnsRecord,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if record.is_new() {
            return Err(DnsError::MissingRecordId);
        }

        cancellable(cancel, self.provider.delete_record(zone, record)).await
    }

    async fn replace(
        &self,
        zone: &str,
        record: &DnsRecord,
        cancel: &CancellationToken,
    ) -> Result<DnsRecord> {
        debug!("[{}] Replacing {} via delete and create", self.provider_name(), record.id);

        cancellable(cancel, self.provider.delete_record(zone, record))
            .await
            .map_err(|e| partial_update(record, UpdateStage::Delete, e))?;

        let fresh = DnsRecord {
            id: String::new(),
            ..record.clone()
        };

        cancellable(cancel, self.provider.create_record(zone, &fresh))
            .await
            .map_err(|e| {
                warn!(
                    "[{}] Record {} was deleted but its replacement was not created: {}",
                    self.provider_name(),
                    record.id,
                    e
                );
                partial_update(record, UpdateStage::Create, e)
            })
    }
}

fn partial_update(record: &DnsRecord, stage: UpdateStage, source: DnsError) -> DnsError {
    DnsError::PartialUpdate {
        record_id: record.id.clone(),
        stage,
        source: Box::new(source),
    }
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DnsError::Cancelled),
        result = operation => result,
    }
}
