use chrono::{Duration as ChronoDuration, Utc};
use ecom_api::app::{AppServices, build_router};
use ecom_auth::JwtClaims;
use ecom_core::UserId;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over in-memory stores, bound to an ephemeral port.
        let app = build_router(AppServices::in_memory(), JWT_SECRET);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_product(&self, token: &str, name: &str, price: i64, quantity: i64) -> i64 {
        let res = self
            .client
            .post(self.url("/product/create"))
            .bearer_auth(token)
            .json(&json!({ "name": name, "price": price, "quantity": quantity }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }

    async fn checkout(&self, token: &str, items: Value) -> reqwest::Response {
        self.client
            .post(self.url("/cart/checkout"))
            .bearer_auth(token)
            .json(&json!({ "items": items }))
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(user_id: i64) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: UserId::new(user_id).unwrap(),
        issued_at: now - ChronoDuration::seconds(1),
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public_and_tagged_with_a_request_id() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = srv
        .client
        .get(srv.url("/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/cart/checkout"))
        .json(&json!({ "items": [{ "product_id": 1, "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/product/create"))
        .bearer_auth("not-a-token")
        .json(&json!({ "name": "Mug", "price": 1, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unmatched_requests_are_not_turned_into_auth_failures() {
    let srv = TestServer::spawn().await;

    let (status, _) = srv.get_json("/products/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = srv.get_json("/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Known path, wrong method.
    let res = srv
        .client
        .get(srv.url("/product/create"))
        .bearer_auth(mint_jwt(1))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = srv.get_json("/products/%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no_identifiers");
}

#[tokio::test]
async fn checkout_prices_cart_and_persists_order() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);

    let mug = srv.create_product(&token, "Mug", 1000, 10).await;
    let lamp = srv.create_product(&token, "Lamp", 2500, 10).await;

    let res = srv
        .checkout(
            &token,
            json!([
                { "product_id": mug, "quantity": 2 },
                { "product_id": lamp, "quantity": 1 }
            ]),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let receipt: Value = res.json().await.unwrap();
    assert_eq!(receipt["total_price"], 4500);
    let order_id = receipt["order_id"].as_i64().unwrap();

    let res = srv
        .client
        .get(srv.url(&format!("/orders/{order_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: Value = res.json().await.unwrap();
    assert_eq!(order["total_price"], 4500);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["unit_price"], 1000);

    // Stock was taken.
    let (_, product) = srv.get_json(&format!("/product/{mug}")).await;
    assert_eq!(product["quantity"], 8);

    // Another user cannot see the order.
    let res = srv
        .client
        .get(srv.url(&format!("/orders/{order_id}")))
        .bearer_auth(mint_jwt(2))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_failures_map_to_client_errors() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    let mug = srv.create_product(&token, "Mug", 1000, 1).await;

    let res = srv.checkout(&token, json!([])).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_payload");

    let res = srv
        .checkout(&token, json!([{ "product_id": mug, "quantity": 0 }]))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .checkout(&token, json!([{ "product_id": "mug", "quantity": 1 }]))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .checkout(&token, json!([{ "product_id": 9999, "quantity": 1 }]))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "product_not_found");

    let res = srv
        .checkout(&token, json!([{ "product_id": mug, "quantity": 2 }]))
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    // Nothing was consumed by the failed attempts.
    let (_, product) = srv.get_json(&format!("/product/{mug}")).await;
    assert_eq!(product["quantity"], 1);
}

#[tokio::test]
async fn bulk_lookup_keeps_resolved_order() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    for name in ["one", "two", "three"] {
        srv.create_product(&token, name, 100, 1).await;
    }

    let (status, body) = srv.get_json("/products/3,1,3,2,42").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["three", "one", "two"]);

    let (status, body) = srv.get_json("/products/1,2,x,4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_identifier");

    let (status, body) = srv.get_json("/products/,%20,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no_identifiers");
}

#[tokio::test]
async fn product_update_and_delete() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    let id = srv.create_product(&token, "Mug", 1000, 3).await;

    let res = srv
        .client
        .put(srv.url(&format!("/product/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "id": id + 1, "name": "Mug", "price": 1, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .put(srv.url(&format!("/product/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "id": id, "name": "Big Mug", "price": 1200, "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Big Mug");
    assert_eq!(updated["id"], id);

    let res = srv
        .client
        .delete(srv.url(&format!("/product/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, _) = srv.get_json(&format!("/product/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = srv.get_json("/product/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = srv.get_json("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
