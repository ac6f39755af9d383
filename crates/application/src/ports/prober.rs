use async_trait::async_trait;
use namesmith_domain::CheckStatus;

/// Single-domain availability probe.
///
/// Probes never fail the job: transport trouble collapses into
/// `NonConclusive` and un-encodable names into `Invalid`.
#[async_trait]
pub trait DomainProber: Send + Sync {
    async fn check(&self, fqdn: &str) -> CheckStatus;
}
