use serde::{Deserialize, Serialize};

/// Status reported by a check worker for a single probe.
///
/// This is the worker-side taxonomy. API consumers never see it directly;
/// it is collapsed to [`DomainStatus`] at the orchestrator boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Free,
    Registered,
    NonConclusive,
    Invalid,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Free => "free",
            CheckStatus::Registered => "registered",
            CheckStatus::NonConclusive => "non_conclusive",
            CheckStatus::Invalid => "invalid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(CheckStatus::Free),
            "registered" => Some(CheckStatus::Registered),
            "non_conclusive" => Some(CheckStatus::NonConclusive),
            "invalid" => Some(CheckStatus::Invalid),
            _ => None,
        }
    }

    /// Collapse to the three-valued API taxonomy.
    pub fn into_domain_status(self) -> DomainStatus {
        match self {
            CheckStatus::Free => DomainStatus::Available,
            CheckStatus::Registered => DomainStatus::Registered,
            CheckStatus::NonConclusive | CheckStatus::Invalid => DomainStatus::Unknown,
        }
    }
}

/// Status stored on domain records and returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Available,
    Registered,
    Unknown,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStatus::Available => "available",
            DomainStatus::Registered => "registered",
            DomainStatus::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(DomainStatus::Available),
            "registered" => Some(DomainStatus::Registered),
            "unknown" => Some(DomainStatus::Unknown),
            _ => None,
        }
    }
}

/// Result payload produced by a worker for one `check_domain` job.
///
/// Field names match the wire contract of the job result records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(rename = "domain")]
    pub fqdn: String,
    pub status: CheckStatus,
    pub worker_id: String,
    #[serde(rename = "processing_time_ms")]
    pub processing_ms: u64,
    #[serde(rename = "queue_wait_time_ms")]
    pub queue_wait_ms: u64,
}
