//! Namesmith HTTP API
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod streaming;

pub use routes::create_api_routes;
pub use state::AppState;
