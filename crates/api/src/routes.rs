use crate::handlers;
use crate::state::AppState;
use axum::Router;

/// All API routes under one router with state.
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .merge(handlers::health::routes())
        .merge(handlers::suggestions::routes())
        .merge(handlers::domains::routes())
        .with_state(state)
}
