//! Job payload shapes and the functions that execute them.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use namesmith_application::ports::{DomainProber, DomainRepository};
use namesmith_domain::{CheckResult, CheckStatus};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct CheckDomainArgs {
    pub domain: String,
    #[serde(default)]
    pub enqueued_at: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RecheckBatchArgs {
    pub domains: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecheckOutcome {
    pub domain: String,
    pub status: CheckStatus,
}

/// Probe one domain and report timing alongside the verdict.
pub async fn handle_check_domain(
    prober: &dyn DomainProber,
    worker_id: &str,
    args: CheckDomainArgs,
) -> CheckResult {
    let started = Instant::now();
    let queue_wait_ms = args
        .enqueued_at
        .map(|enqueued_at| {
            let now = Utc::now().timestamp_millis() as f64 / 1000.0;
            ((now - enqueued_at).max(0.0) * 1000.0) as u64
        })
        .unwrap_or(0);

    let status = prober.check(&args.domain).await;

    let result = CheckResult {
        fqdn: args.domain,
        status,
        worker_id: worker_id.to_string(),
        processing_ms: started.elapsed().as_millis() as u64,
        queue_wait_ms,
    };
    info!(
        fqdn = %result.fqdn,
        status = result.status.as_str(),
        processing_ms = result.processing_ms,
        queue_wait_ms = result.queue_wait_ms,
        "Domain check completed"
    );
    result
}

/// Re-probe a batch of stale records and write the outcomes back.
///
/// The sweep bounds its own probe parallelism; it occupies a single job
/// slot in the worker regardless of batch size.
pub async fn handle_recheck_batch(
    prober: &dyn DomainProber,
    domains_repo: &dyn DomainRepository,
    max_concurrent: usize,
    args: RecheckBatchArgs,
) -> Vec<RecheckOutcome> {
    info!(batch = args.domains.len(), "Starting recheck sweep batch");

    let checks = args
        .domains
        .into_iter()
        .map(|fqdn| async move {
            let status = prober.check(&fqdn).await;
            (fqdn, status)
        });
    let results: Vec<_> = stream::iter(checks)
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut outcomes = Vec::with_capacity(results.len());
    for (fqdn, status) in results {
        if let Err(e) = domains_repo
            .mark_checked(&fqdn, status.into_domain_status())
            .await
        {
            warn!(fqdn = %fqdn, error = %e, "Failed to write recheck result");
        }
        outcomes.push(RecheckOutcome {
            domain: fqdn,
            status,
        });
    }
    outcomes
}

/// `hostname:pid`, the identity attached to every result this process emits.
pub fn worker_id() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown-host".to_string());
    format!("{host}:{}", std::process::id())
}
