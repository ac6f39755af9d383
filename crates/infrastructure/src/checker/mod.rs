//! Single-domain availability probing: DNS first, WHOIS as the slower
//! disambiguator, each phase under its own deadline.

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use namesmith_application::ports::DomainProber;
use namesmith_domain::CheckStatus;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Phrases registries print for names with no registration. Ordered so the
/// common cheap matches come first.
const FREE_INDICATORS: [&str; 9] = [
    "no match",
    "not found",
    "no entries found",
    "domain you requested is not known",
    "status: available",
    "available for purchase",
    "status: free",
    "the queried object does not exist",
    "no data found",
];

const REGISTERED_INDICATORS: [&str; 8] = [
    "domain name:",
    "registrar:",
    "domain status:",
    "creation date:",
    "expiry date:",
    "nameserver:",
    "name server:",
    "redacted for privacy",
];

/// DNS-then-WHOIS prober.
///
/// A resolving name is registered, full stop. A name that fails to resolve
/// goes to WHOIS, whose output decides free vs registered; anything the
/// deadline or the registry leaves ambiguous is non-conclusive.
pub struct DnsWhoisProber {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsWhoisProber {
    pub fn new(timeout_secs: f64) -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "No usable system resolver config, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self {
            resolver,
            timeout: Duration::from_secs_f64(timeout_secs),
        }
    }

    async fn dns_phase(&self, fqdn: &str) -> Option<CheckStatus> {
        match tokio::time::timeout(self.timeout, self.resolver.ipv4_lookup(fqdn)).await {
            Ok(Ok(_)) => Some(CheckStatus::Registered),
            Ok(Err(e)) => match e.kind() {
                // No answer is exactly what we hope for; WHOIS decides.
                ResolveErrorKind::NoRecordsFound { .. } => None,
                _ => {
                    debug!(fqdn = %fqdn, error = %e, "DNS lookup errored, deferring to WHOIS");
                    None
                }
            },
            Err(_) => Some(CheckStatus::NonConclusive),
        }
    }

    /// Run `whois` with a deadline, returning whatever stdout was captured
    /// (lowercased) even when the deadline kills the process.
    async fn whois_output(&self, fqdn: &str) -> Option<String> {
        let mut child = match Command::new("whois")
            .arg(fqdn)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(fqdn = %fqdn, error = %e, "Failed to spawn whois");
                return None;
            }
        };

        let mut stdout = child.stdout.take()?;
        let mut output = Vec::new();
        let mut chunk = [0u8; 4096];
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        let mut timed_out = false;
        loop {
            tokio::select! {
                read = stdout.read(&mut chunk) => match read {
                    Ok(0) | Err(_) => break,
                    Ok(n) => output.extend_from_slice(&chunk[..n]),
                },
                _ = &mut deadline => {
                    timed_out = true;
                    break;
                }
            }
        }

        if timed_out {
            debug!(fqdn = %fqdn, captured = output.len(), "WHOIS timed out, scanning partial output");
            let _ = child.start_kill();
        }
        let _ = child.wait().await;

        Some(String::from_utf8_lossy(&output).to_lowercase())
    }
}

#[async_trait]
impl DomainProber for DnsWhoisProber {
    async fn check(&self, fqdn: &str) -> CheckStatus {
        // The validator screens upstream; this guard is for direct callers.
        if idna::domain_to_ascii_strict(fqdn).is_err() {
            return CheckStatus::Invalid;
        }

        if let Some(status) = self.dns_phase(fqdn).await {
            return status;
        }

        let Some(output) = self.whois_output(fqdn).await else {
            return CheckStatus::NonConclusive;
        };

        if contains_any(&output, &FREE_INDICATORS) {
            return CheckStatus::Free;
        }
        if contains_any(&output, &REGISTERED_INDICATORS) {
            return CheckStatus::Registered;
        }

        CheckStatus::NonConclusive
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
