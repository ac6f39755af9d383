#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use namesmith_application::ports::{DomainProber, DomainRepository};
use namesmith_domain::{CandidateDomain, CheckStatus, DomainError, DomainRecord, DomainStatus};
use std::collections::HashMap;
use std::sync::Mutex;

/// Prober answering from a fixed table; unknown names are non-conclusive.
pub struct StaticProber {
    statuses: Mutex<HashMap<String, CheckStatus>>,
}

impl StaticProber {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn set(&self, fqdn: &str, status: CheckStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(fqdn.to_string(), status);
    }
}

#[async_trait]
impl DomainProber for StaticProber {
    async fn check(&self, fqdn: &str) -> CheckStatus {
        self.statuses
            .lock()
            .unwrap()
            .get(fqdn)
            .copied()
            .unwrap_or(CheckStatus::NonConclusive)
    }
}

#[derive(Default)]
pub struct MockDomainRepository {
    records: Mutex<HashMap<String, DomainRecord>>,
}

impl MockDomainRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, fqdn: &str, status: DomainStatus, last_checked: Option<DateTime<Utc>>) {
        let candidate = CandidateDomain::parse(fqdn).unwrap();
        let now = Utc::now();
        self.records.lock().unwrap().insert(
            fqdn.to_string(),
            DomainRecord {
                fqdn: candidate.fqdn,
                registrable_part: candidate.registrable_part,
                public_suffix: candidate.public_suffix,
                status,
                last_checked,
                created_at: now,
                updated_at: now,
                suggestion_id: None,
            },
        );
    }

    pub fn record(&self, fqdn: &str) -> Option<DomainRecord> {
        self.records.lock().unwrap().get(fqdn).cloned()
    }
}

#[async_trait]
impl DomainRepository for MockDomainRepository {
    async fn get(&self, fqdn: &str) -> Result<Option<DomainRecord>, DomainError> {
        Ok(self.records.lock().unwrap().get(fqdn).cloned())
    }

    async fn upsert_status(
        &self,
        candidate: &CandidateDomain,
        status: DomainStatus,
        suggestion_id: Option<i64>,
    ) -> Result<DomainRecord, DomainError> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry(candidate.fqdn.clone())
            .and_modify(|r| {
                r.status = status;
                r.last_checked = Some(now);
                r.updated_at = now;
            })
            .or_insert_with(|| DomainRecord {
                fqdn: candidate.fqdn.clone(),
                registrable_part: candidate.registrable_part.clone(),
                public_suffix: candidate.public_suffix.clone(),
                status,
                last_checked: Some(now),
                created_at: now,
                updated_at: now,
                suggestion_id,
            });
        Ok(record.clone())
    }

    async fn find_stale(
        &self,
        older_than: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<DomainRecord>, DomainError> {
        let records = self.records.lock().unwrap();
        let mut stale: Vec<DomainRecord> = records
            .values()
            .filter(|r| match r.last_checked {
                None => true,
                Some(checked) => checked < older_than,
            })
            .cloned()
            .collect();
        stale.sort_by_key(|r| r.last_checked);
        stale.truncate(limit as usize);
        Ok(stale)
    }

    async fn mark_checked(&self, fqdn: &str, status: DomainStatus) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(fqdn) {
            let now = Utc::now();
            record.status = status;
            record.last_checked = Some(now);
            record.updated_at = now;
        }
        Ok(())
    }
}
