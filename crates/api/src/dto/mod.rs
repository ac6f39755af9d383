mod domain;
mod suggestion;

pub use domain::DomainRecordResponse;
pub use suggestion::{
    DomainSuggestionResponse, SuggestDomainsRequest, SuggestResponse, SuggestStreamQuery,
};
