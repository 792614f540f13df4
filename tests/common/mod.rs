#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bandstand::{auth::TokenKeys, build_app, store::MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "router-test-secret";

/// In-process client driving the router with `oneshot`
pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let tokens = TokenKeys::new(TEST_SECRET, 3600).expect("token keys");
        Self {
            router: build_app(Arc::new(MemoryStore::new()), Arc::new(tokens)),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request(Method::GET, path, None, Some(token)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body), None).await
    }

    pub async fn post_auth(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::POST, path, Some(body), Some(token)).await
    }

    pub async fn patch_auth(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::PATCH, path, Some(body), Some(token)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, path, None, Some(token)).await
    }

    /// Register `username` and return a bearer token for it
    pub async fn sign_up_and_login(&self, username: &str) -> String {
        let created = self
            .post(
                "/auth/signUp",
                json!({
                    "username": username,
                    "email": format!("{username}@test.com"),
                    "password": "password",
                    "fullName": "full Name",
                }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);

        let login = self
            .post(
                "/auth/login",
                json!({ "username": username, "password": "password" }),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);
        login.body["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }
}
