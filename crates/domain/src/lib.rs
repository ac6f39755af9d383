//! Namesmith Domain Layer
pub mod candidate;
pub mod check;
pub mod config;
pub mod errors;
pub mod prompt;
pub mod record;

pub use candidate::CandidateDomain;
pub use check::{CheckResult, CheckStatus, DomainStatus};
pub use config::Config;
pub use errors::DomainError;
pub use prompt::{PromptType, SimilarContext, UserPreferences};
pub use record::{DomainRecord, QueueSnapshot, Suggestion, SuggestionMetrics, WorkerMetrics};
