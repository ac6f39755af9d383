use async_trait::async_trait;
use chrono::{DateTime, Utc};
use namesmith_domain::{CandidateDomain, DomainError, DomainRecord, DomainStatus};

/// Persistence contract for domain records.
///
/// Concurrent writers for the same name reconcile last-writer-wins on
/// `updated_at`; `last_checked` never moves backwards.
#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn get(&self, fqdn: &str) -> Result<Option<DomainRecord>, DomainError>;

    /// Create or update a record from a fresh check, advancing
    /// `last_checked` and filling `suggestion_id` only when not yet set.
    async fn upsert_status(
        &self,
        candidate: &CandidateDomain,
        status: DomainStatus,
        suggestion_id: Option<i64>,
    ) -> Result<DomainRecord, DomainError>;

    /// Records never checked or not checked since `older_than`,
    /// oldest first, bounded by `limit`. Feeds the recheck sweep.
    async fn find_stale(
        &self,
        older_than: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<DomainRecord>, DomainError>;

    /// Write back a recheck outcome for an existing record.
    async fn mark_checked(&self, fqdn: &str, status: DomainStatus) -> Result<(), DomainError>;
}
