//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store backends and the catalog/checkout services over them
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from process configuration (used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(&config.store).await?;
    Ok(build_router(services, &config.jwt_secret))
}

/// Build the router over already-constructed services.
pub fn build_router(services: AppServices, jwt_secret: &str) -> Router {
    let jwt = Arc::new(ecom_auth::Hs256JwtValidator::new(jwt_secret.as_bytes().to_vec()));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid bearer token. `route_layer` keeps the
    // check off the fallback so unknown paths stay 404.
    let protected = routes::protected_router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id_middleware))
                .layer(Extension(Arc::new(services))),
        )
}
