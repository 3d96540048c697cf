//! End-to-end HTTP flows over the auth router with in-memory adapters.

use auth::application::{AdminAccount, BootstrapAdminUseCase};
use auth::infra::memory::{InMemoryAuthStore, InMemoryEmailNotifier, InMemorySessionStore};
use auth::presentation::AuthAppState;
use auth::{AuthConfig, auth_router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

type State = AuthAppState<InMemoryAuthStore, InMemorySessionStore, InMemoryEmailNotifier>;

struct TestApp {
    router: Router,
    state: State,
}

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    location: Option<String>,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let state = AuthAppState::new(
            InMemoryAuthStore::new(),
            InMemorySessionStore::new(),
            InMemoryEmailNotifier::new(),
            AuthConfig::development().unwrap(),
        );
        let router = Router::new().nest("/api", auth_router(state.clone()));
        Self { router, state }
    }

    async fn bootstrap_admin(&self) {
        BootstrapAdminUseCase::new(self.state.store.clone(), self.state.config.clone())
            .execute(AdminAccount {
                username: "admin".into(),
                email: "admin@x.com".into(),
                password: "adminpassword".into(),
            })
            .await
            .unwrap()
            .unwrap();
    }

    async fn send(&self, method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let header_str = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .map(|v| v.to_str().unwrap().to_string())
        };
        let cookie = header_str(header::SET_COOKIE)
            .map(|c| c.split(';').next().unwrap().to_string());
        let location = header_str(header::LOCATION);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Reply {
            status,
            cookie,
            location,
            body,
        }
    }

    async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> Reply {
        self.send("POST", uri, cookie, Some(body)).await
    }

    async fn login(&self, username: &str, password: &str) -> Reply {
        self.post(
            "/api/auth/login",
            None,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Reply {
        self.post(
            "/api/auth/registration",
            None,
            json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }
}

#[tokio::test]
async fn register_block_unblock_scenario() {
    let app = TestApp::new();

    let alice = app.register("alice", "a@x.com", "longenough1").await;
    assert_eq!(alice.status, StatusCode::CREATED);
    assert_eq!(alice.body["role"], "ROLE_USER");
    assert_eq!(alice.body["isBlocked"], false);
    assert!(alice.body.get("password").is_none());
    let alice_id = alice.body["id"].as_i64().unwrap();

    let wrong = app.login("alice", "wrong").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["code"], "INCORRECT_USERNAME_OR_PASSWORD");

    app.bootstrap_admin().await;
    let admin = app.login("admin", "adminpassword").await;
    assert_eq!(admin.status, StatusCode::OK);
    assert_eq!(admin.body["role"], "ROLE_ADMIN");
    let admin_cookie = admin.cookie.unwrap();

    let blocked = app
        .post(&format!("/api/auth/block-user/{alice_id}"), Some(&admin_cookie), json!({}))
        .await;
    assert_eq!(blocked.status, StatusCode::OK);
    assert_eq!(blocked.body["message"], "User blocked");

    let refused = app.login("alice", "longenough1").await;
    assert_eq!(refused.status, StatusCode::UNAUTHORIZED);
    assert_eq!(refused.body["code"], "USER_IS_BLOCKED");

    let unblocked = app
        .post(&format!("/api/auth/unblock-user/{alice_id}"), Some(&admin_cookie), json!({}))
        .await;
    assert_eq!(unblocked.status, StatusCode::OK);

    let back = app.login("alice", "longenough1").await;
    assert_eq!(back.status, StatusCode::OK);
    assert_eq!(back.body["id"].as_i64(), Some(alice_id));
    assert!(back.cookie.is_some());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("alice", "a@x.com", "longenough1").await;

    let again = app.register("alice", "b@x.com", "longenough1").await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["code"], "ALREADY_EXISTS");

    let short = app.register("bob", "b@x.com", "short").await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn registration_rejects_malformed_fields() {
    let app = TestApp::new();

    let bad_email = app.register("alice", "not-an-address", "longenough1").await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["code"], "INVALID_INPUT");

    let bad_name = app.register("ali ce", "a@x.com", "longenough1").await;
    assert_eq!(bad_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_name.body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn unreadable_bodies_are_invalid_input() {
    let app = TestApp::new();

    let missing_field = app
        .post("/api/auth/registration", None, json!({ "username": "alice" }))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["code"], "INVALID_INPUT");
    assert_eq!(missing_field.body["status"], 400);

    let wrong_type = app
        .post("/api/auth/login", None, json!({ "username": 42, "password": "x" }))
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["code"], "INVALID_INPUT");

    for (content_type, body) in [
        (Some("application/json"), "{not json"),
        (Some("text/plain"), r#"{"username":"alice","password":"longenough1"}"#),
        (None, r#"{"username":"alice","password":"longenough1"}"#),
    ] {
        let mut builder = Request::builder().method("POST").uri("/api/auth/login");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{content_type:?}");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem["code"], "INVALID_INPUT", "{content_type:?}");
    }
}

#[tokio::test]
async fn session_lifecycle_through_cookie() {
    let app = TestApp::new();
    app.register("alice", "a@x.com", "longenough1").await;

    let anonymous_me = app.send("GET", "/api/auth/me", None, None).await;
    assert_eq!(anonymous_me.status, StatusCode::UNAUTHORIZED);

    let cookie = app.login("alice", "longenough1").await.cookie.unwrap();
    assert!(cookie.starts_with("session="));

    let me = app.send("GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "alice");
    assert_eq!(me.body["email"], "a@x.com");

    // Anonymous-only routes turn away a logged-in caller.
    let login_again = app
        .post(
            "/api/auth/login",
            Some(&cookie),
            json!({ "username": "alice", "password": "longenough1" }),
        )
        .await;
    assert_eq!(login_again.status, StatusCode::FORBIDDEN);

    // Only admins may block.
    let not_admin = app
        .post("/api/auth/block-user/1", Some(&cookie), json!({}))
        .await;
    assert_eq!(not_admin.status, StatusCode::FORBIDDEN);

    let logout = app.post("/api/auth/logout", Some(&cookie), json!({})).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.cookie.as_deref(), Some("session="));

    let after = app.send("GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_and_reset() {
    let app = TestApp::new();
    app.register("alice", "a@x.com", "longenough1").await;
    let cookie = app.login("alice", "longenough1").await.cookie.unwrap();

    let wrong_old = app
        .post(
            "/api/auth/change-password",
            Some(&cookie),
            json!({ "oldPassword": "nope-nope", "newPassword": "changed123" }),
        )
        .await;
    assert_eq!(wrong_old.status, StatusCode::UNAUTHORIZED);

    let changed = app
        .post(
            "/api/auth/change-password",
            Some(&cookie),
            json!({ "oldPassword": "longenough1", "newPassword": "changed123" }),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    let known = app
        .post("/api/auth/recover-password", None, json!({ "email": "a@x.com" }))
        .await;
    let unknown = app
        .post("/api/auth/recover-password", None, json!({ "email": "nobody@x.com" }))
        .await;
    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(known.body, unknown.body);

    let sent = app.state.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    let token: String = sent[0]
        .html_body
        .split("reset-password?token=")
        .nth(1)
        .unwrap()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    let reset = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "token": token, "newPassword": "resetpass1" }),
        )
        .await;
    assert_eq!(reset.status, StatusCode::OK);

    let reused = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "token": token, "newPassword": "resetpass2" }),
        )
        .await;
    assert_eq!(reused.status, StatusCode::BAD_REQUEST);
    assert_eq!(reused.body["code"], "INVALID_TOKEN");

    assert_eq!(app.login("alice", "changed123").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login("alice", "resetpass1").await.status, StatusCode::OK);
}

#[tokio::test]
async fn redirect_only_follows_app_scheme() {
    let app = TestApp::new();

    let ok = app
        .send(
            "GET",
            "/api/redirect?redirect-to=cloud-saves%3A%2F%2Freset-password%3Ftoken%3Dabc",
            None,
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::FOUND);
    assert_eq!(
        ok.location.as_deref(),
        Some("cloud-saves://reset-password?token=abc")
    );

    let foreign = app
        .send(
            "GET",
            "/api/redirect?redirect-to=https%3A%2F%2Fevil.example",
            None,
            None,
        )
        .await;
    assert_eq!(foreign.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_cannot_block_self_over_http() {
    let app = TestApp::new();
    app.bootstrap_admin().await;
    let admin = app.login("admin", "adminpassword").await;
    let admin_id = admin.body["id"].as_i64().unwrap();

    let reply = app
        .post(
            &format!("/api/auth/block-user/{admin_id}"),
            admin.cookie.as_deref(),
            json!({}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "CANNOT_BLOCK_YOURSELF");
}
