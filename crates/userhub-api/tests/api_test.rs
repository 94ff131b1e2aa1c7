//! HTTP-level tests for the user and session endpoints.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use userhub_api::{AppState, build_app};
use userhub_core::config::AppConfig;

/// Test application wrapping an in-memory router.
struct TestApp {
    router: Router,
}

/// Response from a test request.
#[derive(Debug)]
struct TestResponse {
    status: StatusCode,
    token_header: Option<String>,
    session_cookie: Option<String>,
    body: Value,
}

/// What a logged-in client sends back.
#[derive(Debug, Clone)]
struct Client {
    cookie: String,
    token: String,
}

impl TestApp {
    fn new() -> Self {
        Self {
            router: build_app(AppState::in_memory(AppConfig::default())),
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let token_header = response
            .headers()
            .get("token")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let session_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|c| c.starts_with("session="))
            .and_then(|c| c.split(';').next())
            .map(String::from);

        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            token_header,
            session_cookie,
            body,
        }
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        client: Option<&Client>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(client) = client {
            req = req
                .header(header::COOKIE, &client.cookie)
                .header(header::AUTHORIZATION, format!("Bearer {}", client.token));
        }

        let body = body.map(|b| b.to_string()).unwrap_or_default();
        self.send(req.body(Body::from(body)).expect("Failed to build request"))
            .await
    }

    async fn create_user(&self, username: &str, permissions: &[&str]) {
        let response = self
            .request(
                "POST",
                "/api/user",
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "secret1",
                    "permissions": permissions,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    }

    async fn login(&self, username: &str) -> Client {
        let request = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password=secret1")))
            .expect("Failed to build request");

        let response = self.send(request).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        Client {
            cookie: response.session_cookie.expect("No session cookie"),
            token: response.token_header.expect("No token header"),
        }
    }
}

#[tokio::test]
async fn test_create_login_and_list() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;

    let alice = app.login("alice").await;
    let response = app.request("GET", "/api/users", None, Some(&alice)).await;

    assert_eq!(response.status, StatusCode::OK);
    let users = response.body["users"].as_array().expect("users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[0]["permissions"], json!(["read"]));
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_json_login_returns_token_in_body_and_header() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(json!({"username": "alice", "password": "secret1"})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "User authenticated");
    assert_eq!(
        response.body["token"].as_str(),
        response.token_header.as_deref()
    );
    assert!(response.session_cookie.is_some());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;

    let wrong = app
        .request(
            "POST",
            "/api/login",
            Some(json!({"username": "alice", "password": "wrong"})),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/login",
            Some(json!({"username": "mallory", "password": "secret1"})),
            None,
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
    assert!(wrong.token_header.is_none());
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;
    let alice = app.login("alice").await;

    let response = app
        .request("POST", "/api/token/refresh", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let new_token = response.body["token"].as_str().expect("token").to_string();
    assert_ne!(new_token, alice.token);

    let stale = app.request("GET", "/api/users", None, Some(&alice)).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let rotated = Client {
        token: new_token,
        ..alice
    };
    let fresh = app.request("GET", "/api/users", None, Some(&rotated)).await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_without_permission_is_forbidden() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;
    app.create_user("bob", &[]).await;
    let alice = app.login("alice").await;

    let response = app
        .request("DELETE", "/api/user/bob", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");

    let still_there = app.request("GET", "/api/user/bob", None, Some(&alice)).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["user"]["username"], "bob");
}

#[tokio::test]
async fn test_delete_with_permission() {
    let app = TestApp::new();
    app.create_user("admin", &["read", "delete"]).await;
    app.create_user("bob", &[]).await;
    let admin = app.login("admin").await;

    let response = app
        .request("DELETE", "/api/user/bob", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "bob");

    let gone = app.request("GET", "/api/user/bob", None, Some(&admin)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_then_refresh_reports_logged_out() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;
    let alice = app.login("alice").await;

    let logout = app.request("POST", "/api/logout", None, Some(&alice)).await;
    assert_eq!(logout.status, StatusCode::CREATED);
    assert_eq!(logout.body, json!({"logout": true}));

    let refresh = app
        .request("POST", "/api/token/refresh", None, Some(&alice))
        .await;
    assert_eq!(refresh.status, StatusCode::CREATED);
    assert_eq!(refresh.body, json!({"logout": true}));

    let again = app.request("POST", "/api/logout", None, Some(&alice)).await;
    assert_eq!(again.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;

    let response = app.request("GET", "/api/users", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_create_user_validation_and_conflict() {
    let app = TestApp::new();
    app.create_user("alice", &["read"]).await;

    let duplicate = app
        .request(
            "POST",
            "/api/user",
            Some(json!({"username": "alice", "email": "x@example.com", "password": "pw"})),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let missing = app
        .request(
            "POST",
            "/api/user",
            Some(json!({"username": "carol", "email": "c@example.com"})),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
