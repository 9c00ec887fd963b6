use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use ecom_orders::CheckoutPayload;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::UserContext;

/// `POST /cart/checkout` → `{ "order_id": .., "total_price": .. }`.
pub async fn checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<CheckoutPayload>, JsonRejection>,
) -> axum::response::Response {
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.checkout.checkout(user.user_id(), &payload).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
