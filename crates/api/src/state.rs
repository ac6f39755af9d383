use namesmith_application::use_cases::{GetDomainUseCase, SuggestDomainsUseCase};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub suggest: Arc<SuggestDomainsUseCase>,
    pub get_domain: Arc<GetDomainUseCase>,
}
