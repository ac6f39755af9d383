pub mod dispatch_checks;
pub mod get_domain;
pub mod suggest_domains;

pub use dispatch_checks::{DispatchChecksUseCase, DispatchOutcome};
pub use get_domain::GetDomainUseCase;
pub use suggest_domains::{SuggestDomainsUseCase, SuggestRequest};
