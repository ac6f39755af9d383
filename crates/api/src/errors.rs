use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use namesmith_domain::DomainError;
use serde_json::json;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code() {
            "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            "timeout" => StatusCode::GATEWAY_TIMEOUT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "no_domains_found" | "domain_not_found" => StatusCode::NOT_FOUND,
            "invalid_input" => StatusCode::BAD_REQUEST,
            "auth_required" => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "error": true,
            "code": self.0.code(),
            "message": self.0.user_message(),
            "details": self.0.to_string(),
            "retry_allowed": self.0.retry_allowed(),
        });

        (status, Json(body)).into_response()
    }
}
