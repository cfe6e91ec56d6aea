use std::net::TcpListener;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{rt, test, web, App, HttpServer};
use keystone::auth::{AuthMiddleware, AuthResponse, CredentialStore, SessionGuard, AUTH_COOKIE};
use keystone::config::TokenTransport;
use keystone::error;
use keystone::models::{Admin, AdminInput};
use keystone::routes::{self, health};
use keystone::store::MemoryStore;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const PASSWORD: &str = "correct-horse";

struct Harness {
    store: MemoryStore,
    credentials: web::Data<CredentialStore>,
    guard: web::Data<SessionGuard>,
    transport: web::Data<TokenTransport>,
}

impl Harness {
    async fn new(transport: TokenTransport) -> Self {
        let store = MemoryStore::new();
        let credentials = CredentialStore::new(Arc::new(store.clone()), 4);
        let guard = SessionGuard::new(Arc::new(store.clone()), chrono::Duration::minutes(60));
        Self {
            store,
            credentials: web::Data::new(credentials),
            guard: web::Data::new(guard),
            transport: web::Data::new(transport),
        }
    }

    async fn seed_admin(&self, login: &str) -> Admin {
        self.credentials
            .create(&AdminInput {
                login: login.to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .expect("failed to seed administrator")
    }
}

// Same layout as the server binary, minus the PgPool-backed content routes.
macro_rules! init_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.credentials.clone())
                .app_data($harness.guard.clone())
                .app_data($harness.transport.clone())
                .app_data(error::json_config())
                .app_data(error::path_config())
                .wrap(Logger::default())
                .service(health::health)
                .service(
                    web::scope("/api")
                        .wrap(AuthMiddleware)
                        .configure(routes::auth_config),
                ),
        )
        .await
    };
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_rt::test]
async fn test_login_me_logout_flow() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let admin = harness.seed_admin("superadmin").await;
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": "superadmin", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.response().cookies().next().is_none(),
        "bearer mode must not set a cookie"
    );
    let auth: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(auth.admin_id, admin.id);
    assert_eq!(auth.login, "superadmin");
    assert_eq!(auth.expires_in, 3600);
    assert_eq!(auth.token.len(), 32);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&auth.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["id"], admin.id);
    assert_eq!(me["login"], "superadmin");
    assert!(me.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header(bearer(&auth.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&auth.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(harness.store.session_count().await, 0);
}

#[actix_rt::test]
async fn test_failed_logins_share_one_message() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    harness.seed_admin("superadmin").await;
    let app = init_app!(harness);

    let mut bodies = Vec::new();
    for (login, password) in [("superadmin", "wrong-password"), ("nobody", PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "login": login, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["error"], "Invalid login or password");
    assert_eq!(harness.store.session_count().await, 0);
}

#[actix_rt::test]
async fn test_empty_login_is_rejected_before_lookup() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": "", "password": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_unreadable_bodies_get_json_errors() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    harness.seed_admin("superadmin").await;
    let app = init_app!(harness);

    let truncated = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"login": "superadmin""#)
        .to_request();
    let missing_field = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": "superadmin" }))
        .to_request();

    for req in [truncated, missing_field] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "bad_request");
        assert!(body["error"].as_str().unwrap_or_default().starts_with("Invalid JSON body"));
    }
    assert_eq!(harness.store.session_count().await, 0);
}

#[actix_rt::test]
async fn test_non_numeric_id_is_bad_request() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let admin = harness.seed_admin("superadmin").await;
    let token = harness.guard.issue(&admin).await.expect("issue failed");
    let app = init_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/admins/abc")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "bad_request");
}

#[actix_rt::test]
async fn test_missing_and_unknown_tokens() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let app = init_app!(harness);

    let req = test::TestRequest::get().uri("/api/admins").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/admins")
        .insert_header(bearer("0123456789abcdef0123456789abcdef"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "forbidden");

    // A non-bearer scheme counts as no credential at all.
    let req = test::TestRequest::get()
        .uri("/api/admins")
        .insert_header((header::AUTHORIZATION, "Basic c3VwZXI6YWRtaW4="))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_idle_session_is_rejected() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let admin = harness.seed_admin("superadmin").await;
    let token = harness.guard.issue(&admin).await.expect("issue failed");
    let stale = chrono::Utc::now() - chrono::Duration::minutes(61);
    assert!(harness.store.set_last_active(&token, stale).await);
    let app = init_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(harness.store.session(&token).await.is_none());
}

#[actix_rt::test]
async fn test_cookie_mode_sets_and_clears_cookie() {
    let harness = Harness::new(TokenTransport::Cookie).await;
    harness.seed_admin("superadmin").await;
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": "superadmin", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == AUTH_COOKIE)
        .expect("login should set the session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    let token = cookie.value().to_string();
    let auth: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(auth.token, token);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new(AUTH_COOKIE, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(Cookie::new(AUTH_COOKIE, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == AUTH_COOKIE)
        .expect("logout should clear the session cookie");
    assert_eq!(removal.value(), "");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new(AUTH_COOKIE, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_admin_management() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let root = harness.seed_admin("superadmin").await;
    let token = harness.guard.issue(&root).await.expect("issue failed");
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/admins")
        .insert_header(bearer(&token))
        .set_json(json!({ "login": "deacon", "password": "s3cret-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let deacon: Value = test::read_body_json(resp).await;
    assert_eq!(deacon["login"], "deacon");
    assert!(deacon.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/admins")
        .insert_header(bearer(&token))
        .set_json(json!({ "login": "deacon", "password": "another-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/admins")
        .insert_header(bearer(&token))
        .set_json(json!({ "login": "short", "password": "12345" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/api/admins")
        .insert_header(bearer(&token))
        .to_request();
    let admins: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(admins.len(), 2);

    let deacon_id = deacon["id"].as_i64().expect("id should be a number");
    let req = test::TestRequest::put()
        .uri(&format!("/api/admins/{}", deacon_id))
        .insert_header(bearer(&token))
        .set_json(json!({ "password": "renewed-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": "deacon", "password": "renewed-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/admins/9999")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_deleting_admin_ends_its_sessions() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let root = harness.seed_admin("superadmin").await;
    let deacon = harness.seed_admin("deacon").await;
    let root_token = harness.guard.issue(&root).await.expect("issue failed");
    let deacon_token = harness.guard.issue(&deacon).await.expect("issue failed");
    let app = init_app!(harness);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admins/{}", deacon.id))
        .insert_header(bearer(&root_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&deacon_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&root_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_health_needs_no_session() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    let app = init_app!(harness);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Starts the auth routes on a real socket and returns the base URL and a stop handle.
fn spawn_server(harness: &Harness) -> (String, actix_web::dev::ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().expect("no local address").port();

    let credentials = harness.credentials.clone();
    let guard = harness.guard.clone();
    let transport = harness.transport.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(credentials.clone())
            .app_data(guard.clone())
            .app_data(transport.clone())
            .app_data(error::json_config())
            .app_data(error::path_config())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::auth_config),
            )
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    (format!("http://127.0.0.1:{}", port), handle)
}

#[actix_rt::test]
async fn test_login_over_real_server() {
    let harness = Harness::new(TokenTransport::Bearer).await;
    harness.seed_admin("superadmin").await;
    let (base, handle) = spawn_server(&harness);
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/auth/me", base))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    let auth: AuthResponse = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({ "login": "superadmin", "password": PASSWORD }))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid login response");

    let resp = client
        .get(format!("{}/api/auth/me", base))
        .bearer_auth(&auth.token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    handle.stop(false).await;
}

#[actix_rt::test]
async fn test_browser_cookie_session_over_real_server() {
    let harness = Harness::new(TokenTransport::Cookie).await;
    harness.seed_admin("superadmin").await;
    let (base, handle) = spawn_server(&harness);
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("failed to build client");

    let resp = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({ "login": "superadmin", "password": PASSWORD }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    // No Authorization header: the stored auth_token cookie carries the session.
    let me: Value = client
        .get(format!("{}/api/auth/me", base))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid me response");
    assert_eq!(me["login"], "superadmin");

    let resp = client
        .post(format!("{}/api/auth/logout", base))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(harness.store.session_count().await, 0);

    // The removal cookie emptied the jar, so the next request has no credential.
    let resp = client
        .get(format!("{}/api/auth/me", base))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    handle.stop(false).await;
}
