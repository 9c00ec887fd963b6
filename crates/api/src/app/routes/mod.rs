use axum::{
    Router,
    routing::{get, post},
};

pub mod cart;
pub mod orders;
pub mod products;
pub mod system;

/// Router for endpoints anyone may call.
pub fn public_router() -> Router {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/:ids", get(products::lookup_products))
        .route("/product/:id", get(products::get_product))
}

/// Router for endpoints that need an authenticated user.
pub fn protected_router() -> Router {
    Router::new()
        .route("/product/create", post(products::create_product))
        .route(
            "/product/:id",
            axum::routing::put(products::update_product).delete(products::delete_product),
        )
        .route("/cart/checkout", post(cart::checkout))
        .route("/orders/:id", get(orders::get_order))
}
