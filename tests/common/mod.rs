#![allow(dead_code)]

use accounts_api::{
    app::build_app,
    state::AppState,
    users::{repo_types::User, services::hash_password},
};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_USERNAME: &str = "test";
pub const TEST_PASSWORD: &str = "123";
pub const TEST_TOKEN: &str = "test";

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::fake();
        let router = build_app(state.clone());
        Self { state, router }
    }

    /// Username `test`, password `123`, name `test`, already logged in with token `test`.
    pub async fn create_test_user(&self) {
        self.state
            .users
            .create(User {
                username: TEST_USERNAME.into(),
                name: "test".into(),
                password: hash_password(TEST_PASSWORD).expect("hash test password"),
                token: Some(TEST_TOKEN.into()),
            })
            .await
            .expect("create test user");
    }

    pub async fn get_test_user(&self) -> User {
        self.state
            .users
            .find_by_username(TEST_USERNAME)
            .await
            .expect("query test user")
            .expect("test user exists")
    }

    pub async fn remove_test_user(&self) {
        self.state
            .users
            .delete(TEST_USERNAME)
            .await
            .expect("delete test user");
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");
        self.send_raw(request).await
    }

    /// Sends a request exactly as built, with no default headers.
    pub async fn send_raw(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }
}
