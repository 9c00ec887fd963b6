use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ecom_core::DomainError;
use ecom_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Storage(e) => {
            tracing::error!(error = %e, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let (status, code) = match &err {
        DomainError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "invalid_payload"),
        DomainError::InvalidIdentifier(_) => (StatusCode::BAD_REQUEST, "invalid_identifier"),
        DomainError::NoIdentifiersProvided => (StatusCode::BAD_REQUEST, "no_identifiers"),
        DomainError::ProductNotFound(_) => (StatusCode::BAD_REQUEST, "product_not_found"),
        DomainError::InsufficientStock { .. } => (StatusCode::CONFLICT, "insufficient_stock"),
        DomainError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
    };
    json_error(status, code, err.to_string())
}

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_payload", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
