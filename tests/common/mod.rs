#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use roomkeep::{app, db, AppState, Config};
use serde_json::Value;
use tower::ServiceExt;

pub async fn test_app() -> Router {
    // one connection, since every in-memory connection is its own database
    let db_pool = db::connect("sqlite::memory:", 1).await.expect("db");
    app(AppState { db_pool }, &Config::default()).expect("app")
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_owned)
}

pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    app.clone().oneshot(request).await.expect("response")
}

/// A signed-up user and the session cookie that authenticates them.
pub struct User {
    pub id: String,
    pub username: String,
    pub cookie: String,
}

impl User {
    pub async fn sign_up(app: &Router, username: &str) -> User {
        let response = call(
            app,
            "POST",
            "/signup",
            None,
            Some(serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "correct horse battery staple",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = session_cookie(&response).expect("session cookie");
        let body = read_json(response).await;
        User {
            id: body["userID"].as_str().expect("userID").to_owned(),
            username: username.to_owned(),
            cookie,
        }
    }

    pub async fn send(&self, app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = call(app, method, uri, Some(&self.cookie), body).await;
        let status = response.status();
        (status, read_json(response).await)
    }
}
