//! Shared fixtures for the API integration tests
//!
//! Every [`TestApp`] owns a fresh in-memory database with the migrations
//! applied and three users:
//!
//! - `olive` / `olive-pass` with the `owner` role
//! - `carlo` / `carlo-pass` with the `chef` role
//! - `guest` / `guest-pass` with no role

#![allow(dead_code)]

use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use pizza_server::api::{create_router, AppState};
use pizza_server::auth::users::{hash_password_with, insert_user};
use pizza_server::config::Config;
use pizza_server::db::in_memory_pool;

pub const HOST: &str = "testserver";

pub const OWNER: (&str, &str) = ("olive", "olive-pass");
pub const CHEF: (&str, &str) = ("carlo", "carlo-pass");
pub const GUEST: (&str, &str) = ("guest", "guest-pass");

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Value::Null` when the body is empty
    pub body: Value,
}

impl TestResponse {
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// `Authorization` header value for HTTP Basic
pub fn basic((username, password): (&str, &str)) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

/// Absolute URL as the API renders it for requests to [`HOST`]
pub fn url(path: &str) -> String {
    format!("http://{}{}", HOST, path)
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let pool = in_memory_pool().await.unwrap();
        Self::with_pool(pool, config).await
    }

    /// Seed the users into an already migrated pool
    pub async fn with_pool(pool: SqlitePool, config: Config) -> Self {
        // Cheap Argon2 settings keep the tests fast; verification reads
        // the parameters back from the stored hash.
        let argon2 = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(8, 1, 1, None).unwrap(),
        );
        for ((username, password), roles) in [
            (OWNER, vec!["owner".to_string()]),
            (CHEF, vec!["chef".to_string()]),
            (GUEST, vec![]),
        ] {
            let hash = hash_password_with(&argon2, password).unwrap();
            insert_user(&pool, username, &hash, &roles).await.unwrap();
        }

        let state = AppState::new(pool.clone(), &config);
        let router = create_router(state, &config);

        Self { router, pool }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a request with an optional JSON body and optional credentials
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        credentials: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, HOST);

        if let Some(credentials) = credentials {
            builder = builder.header(header::AUTHORIZATION, basic(credentials));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, credentials: (&str, &str), body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(credentials), Some(body)).await
    }

    pub async fn put(&self, uri: &str, credentials: (&str, &str), body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(credentials), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, credentials: (&str, &str)) -> TestResponse {
        self.request(Method::DELETE, uri, Some(credentials), None).await
    }

    /// Create a topping as the owner and return its path
    pub async fn create_topping(&self, name: &str) -> String {
        let response = self
            .post("/toppings/", OWNER, serde_json::json!({ "topping": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        path_of(&response.body)
    }

    /// Create a pizza as the chef and return its path
    pub async fn create_pizza(&self, name: &str, toppings: &[&str]) -> String {
        let response = self
            .post(
                "/pizzas/",
                CHEF,
                serde_json::json!({ "pizza": name, "toppings": toppings }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        path_of(&response.body)
    }
}

/// Path part of a representation's `url`
pub fn path_of(body: &Value) -> String {
    let url = body["url"].as_str().unwrap();
    url.trim_start_matches(&format!("http://{}", HOST)).to_string()
}
