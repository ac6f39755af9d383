mod domain_repository;
mod suggestion_repository;
mod telemetry_repository;

pub use domain_repository::SqliteDomainRepository;
pub use suggestion_repository::SqliteSuggestionRepository;
pub use telemetry_repository::SqliteWorkerTelemetryRepository;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamps are stored as fixed-width RFC 3339 so string comparison in
/// SQL matches chronological order.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
