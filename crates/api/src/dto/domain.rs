use chrono::{DateTime, Utc};
use namesmith_domain::{DomainRecord, DomainStatus};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DomainRecordResponse {
    pub domain: String,
    pub registrable_part: String,
    pub tld: String,
    pub status: DomainStatus,
    pub last_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainRecordResponse {
    pub fn from_record(record: DomainRecord) -> Self {
        Self {
            domain: record.fqdn,
            registrable_part: record.registrable_part,
            tld: record.public_suffix,
            status: record.status,
            last_checked: record.last_checked,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
