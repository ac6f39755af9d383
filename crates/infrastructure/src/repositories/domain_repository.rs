use super::{format_ts, parse_ts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use namesmith_application::ports::DomainRepository;
use namesmith_domain::{CandidateDomain, DomainError, DomainRecord, DomainStatus};
use sqlx::SqlitePool;
use tracing::{error, instrument};

type DomainRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    Option<i64>,
);

pub struct SqliteDomainRepository {
    pool: SqlitePool,
}

impl SqliteDomainRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: DomainRow) -> DomainRecord {
        let (
            fqdn,
            registrable_part,
            public_suffix,
            status,
            last_checked,
            created_at,
            updated_at,
            suggestion_id,
        ) = row;
        DomainRecord {
            fqdn,
            registrable_part,
            public_suffix,
            status: DomainStatus::from_str(&status).unwrap_or(DomainStatus::Unknown),
            last_checked: last_checked.as_deref().and_then(parse_ts),
            created_at: parse_ts(&created_at).unwrap_or_else(Utc::now),
            updated_at: parse_ts(&updated_at).unwrap_or_else(Utc::now),
            suggestion_id,
        }
    }
}

const SELECT_COLUMNS: &str = "fqdn, registrable_part, public_suffix, status, last_checked, created_at, updated_at, suggestion_id";

#[async_trait]
impl DomainRepository for SqliteDomainRepository {
    #[instrument(skip(self))]
    async fn get(&self, fqdn: &str) -> Result<Option<DomainRecord>, DomainError> {
        let row = sqlx::query_as::<_, DomainRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM domains WHERE fqdn = ?"
        ))
        .bind(fqdn)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query domain");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Self::row_to_record))
    }

    #[instrument(skip(self, candidate), fields(fqdn = %candidate.fqdn))]
    async fn upsert_status(
        &self,
        candidate: &CandidateDomain,
        status: DomainStatus,
        suggestion_id: Option<i64>,
    ) -> Result<DomainRecord, DomainError> {
        let now = format_ts(Utc::now());

        // `created_at` stays put, `last_checked` only advances, and the
        // first suggestion to touch a domain keeps the back-reference.
        sqlx::query(
            "INSERT INTO domains (fqdn, registrable_part, public_suffix, status, last_checked, created_at, updated_at, suggestion_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(fqdn) DO UPDATE SET
                 status = excluded.status,
                 last_checked = MAX(COALESCE(domains.last_checked, ''), excluded.last_checked),
                 updated_at = excluded.updated_at,
                 suggestion_id = COALESCE(domains.suggestion_id, excluded.suggestion_id)",
        )
        .bind(&candidate.fqdn)
        .bind(&candidate.registrable_part)
        .bind(&candidate.public_suffix)
        .bind(status.as_str())
        .bind(&now)
        .bind(&now)
        .bind(&now)
        .bind(suggestion_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to upsert domain");
            DomainError::DatabaseError(e.to_string())
        })?;

        self.get(&candidate.fqdn).await?.ok_or_else(|| {
            DomainError::DatabaseError("Failed to fetch upserted domain".to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_stale(
        &self,
        older_than: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<DomainRecord>, DomainError> {
        let rows = sqlx::query_as::<_, DomainRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM domains
             WHERE last_checked IS NULL OR last_checked < ?
             ORDER BY last_checked IS NOT NULL, last_checked ASC
             LIMIT ?"
        ))
        .bind(format_ts(older_than))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query stale domains");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Self::row_to_record).collect())
    }

    #[instrument(skip(self))]
    async fn mark_checked(&self, fqdn: &str, status: DomainStatus) -> Result<(), DomainError> {
        let now = format_ts(Utc::now());
        sqlx::query(
            "UPDATE domains SET status = ?, last_checked = ?, updated_at = ? WHERE fqdn = ?",
        )
        .bind(status.as_str())
        .bind(&now)
        .bind(&now)
        .bind(fqdn)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to mark domain checked");
            DomainError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }
}
