use super::{parse_bool, parse_var, ConfigError};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Per-phase deadline for the DNS and WHOIS probes, in seconds.
    pub dns_timeout_secs: f64,
    pub max_concurrent_checks: usize,
    pub idle_threshold_secs: u64,
    pub recheck_interval_days: u32,
    pub recheck_batch_size: u32,
    pub enable_idle_recheck: bool,
    pub recheck_poll_interval_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            dns_timeout_secs: 3.0,
            max_concurrent_checks: 10,
            idle_threshold_secs: 60,
            recheck_interval_days: 7,
            recheck_batch_size: 50,
            enable_idle_recheck: true,
            recheck_poll_interval_secs: 30,
        }
    }
}

impl WorkerConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            dns_timeout_secs: parse_var(&lookup, "DOMAIN_CHECKER_DNS_TIMEOUT", 3.0)?,
            max_concurrent_checks: parse_var(&lookup, "WORKER_MAX_CONCURRENT_CHECKS", 10)?,
            idle_threshold_secs: parse_var(&lookup, "WORKER_IDLE_THRESHOLD_SECONDS", 60)?,
            recheck_interval_days: parse_var(&lookup, "WORKER_RECHECK_INTERVAL_DAYS", 7)?,
            recheck_batch_size: parse_var(&lookup, "WORKER_RECHECK_BATCH_SIZE", 50)?,
            enable_idle_recheck: parse_bool(&lookup, "WORKER_ENABLE_IDLE_RECHECK", true)?,
            recheck_poll_interval_secs: parse_var(&lookup, "WORKER_RECHECK_POLL_INTERVAL", 30)?,
        })
    }
}
