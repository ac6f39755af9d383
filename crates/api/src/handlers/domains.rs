use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::{dto::DomainRecordResponse, errors::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/domains/{fqdn}", get(get_domain_status))
}

async fn get_domain_status(
    State(state): State<AppState>,
    Path(fqdn): Path<String>,
) -> Result<Json<DomainRecordResponse>, ApiError> {
    let record = state.get_domain.execute(&fqdn).await?;
    Ok(Json(DomainRecordResponse::from_record(record)))
}
