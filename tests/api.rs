mod common;

use actix_web::{test, web, App};
use chrono::Duration;
use contact_portal_server::config::StaticFilesConfig;
use contact_portal_server::{configure_api, messages, static_files, AppState, Role, Session};
use serde_json::{json, Value};

use common::{offline_state, session_cookie};

async fn login_as(state: &AppState, username: &str, role: Role) -> actix_web::cookie::Cookie<'static> {
    let session = Session::new(42, username, role, Duration::hours(24));
    let cookie = state.cookies.build(&session.token);
    state.sessions.put(session).await;
    cookie
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_api),
        )
        .await
    };
}

#[actix_web::test]
async fn test_check_auth_logged_out() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::get()
        .uri("/api/check_auth")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "isLoggedIn": false }));
}

#[actix_web::test]
async fn test_session_lifecycle() {
    let state = offline_state();
    let app = app!(state);
    let cookie = login_as(&state, "alice", Role::User).await;

    let resp = test::TestRequest::get()
        .uri("/api/check_auth")
        .cookie(cookie.clone())
        .send_request(&app)
        .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "isLoggedIn": true, "username": "alice" }));

    let resp = test::TestRequest::get()
        .uri("/api/logout")
        .cookie(cookie.clone())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let removal = session_cookie(&resp, state.cookies.name()).expect("removal cookie");
    assert_eq!(removal.value(), "");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true }));

    // The old cookie no longer maps to a session.
    let resp = test::TestRequest::get()
        .uri("/api/check_auth")
        .cookie(cookie)
        .send_request(&app)
        .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["isLoggedIn"], false);
}

#[actix_web::test]
async fn test_logout_without_session() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::get()
        .uri("/api/logout")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn test_forged_cookie_is_ignored() {
    let state = offline_state();
    let app = app!(state);
    let session = Session::new(1, "admin", Role::Admin, Duration::hours(24));
    state.sessions.put(session.clone()).await;

    // Right token, missing signature.
    let resp = test::TestRequest::get()
        .uri("/api/admin/data")
        .cookie(actix_web::cookie::Cookie::new(
            state.cookies.name().to_string(),
            session.token.clone(),
        ))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_contact_requires_login() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "subject": "Hi",
            "message": "Hello there"
        }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], messages::LOGIN_REQUIRED);
}

#[actix_web::test]
async fn test_contact_requires_login_even_without_body() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::post()
        .uri("/api/contact")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_contact_validation() {
    let state = offline_state();
    let app = app!(state);
    let cookie = login_as(&state, "alice", Role::User).await;

    let resp = test::TestRequest::post()
        .uri("/api/contact")
        .cookie(cookie)
        .set_json(json!({ "name": "Alice", "email": "", "subject": "Hi", "message": "Hello" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "message": messages::FIELDS_REQUIRED }));
}

#[actix_web::test]
async fn test_admin_data_requires_login() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::get()
        .uri("/api/admin/data?page_users=1&page_msgs=1")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_admin_data_forbidden_for_regular_user() {
    let state = offline_state();
    let app = app!(state);
    let cookie = login_as(&state, "bob", Role::User).await;

    let resp = test::TestRequest::get()
        .uri("/api/admin/data")
        .cookie(cookie)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 403);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "message": messages::FORBIDDEN }));
}

#[actix_web::test]
async fn test_admin_data_bad_query_keeps_auth_status() {
    let state = offline_state();
    let app = app!(state);
    let uri = "/api/admin/data?page_users=1&page_users=2";

    let resp = test::TestRequest::get().uri(uri).send_request(&app).await;
    assert_eq!(resp.status(), 401);

    let cookie = login_as(&state, "bob", Role::User).await;
    let resp = test::TestRequest::get()
        .uri(uri)
        .cookie(cookie)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 403);

    // An admin gets past the query and on to the (unreachable) database.
    let cookie = login_as(&state, "admin", Role::Admin).await;
    let resp = test::TestRequest::get()
        .uri(uri)
        .cookie(cookie)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "message": messages::SYSTEM_ERROR }));
}

#[actix_web::test]
async fn test_register_validation() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({ "username": "alice", "email": "", "password": "pw", "confirm-password": "pw" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    assert!(session_cookie(&resp, state.cookies.name()).is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "message": messages::FIELDS_REQUIRED }));

    let resp = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "secret1",
            "confirm-password": "secret2"
        }))
        .send_request(&app)
        .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], messages::PASSWORD_MISMATCH);
}

#[actix_web::test]
async fn test_login_validation() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "username": "alice" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "message": messages::CREDENTIALS_REQUIRED }));
}

#[actix_web::test]
async fn test_malformed_body_is_a_validation_failure() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::post()
        .uri("/api/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], messages::INVALID_REQUEST);
}

#[actix_web::test]
async fn test_database_outage_is_reported_generically() {
    let state = offline_state();
    let app = app!(state);

    let resp = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "username": "alice", "password": "secret" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "message": messages::SYSTEM_ERROR }));
}

#[actix_web::test]
async fn test_static_files_are_the_fallback() {
    let dir = std::env::temp_dir().join(format!(
        "contact-portal-static-{}",
        contact_portal_server::session::generate_token()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>portal</h1>").unwrap();

    let state = offline_state();
    let config = StaticFilesConfig {
        dir: dir.to_string_lossy().into_owned(),
        index: "index.html".into(),
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_api)
            .service(static_files(&config)),
    )
    .await;

    let resp = test::TestRequest::get().uri("/").send_request(&app).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"<h1>portal</h1>");

    // API routes still win over the static mount.
    let resp = test::TestRequest::get()
        .uri("/api/check_auth")
        .send_request(&app)
        .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["isLoggedIn"], false);

    let resp = test::TestRequest::get().uri("/missing.css").send_request(&app).await;
    assert_eq!(resp.status(), 404);

    std::fs::remove_dir_all(&dir).ok();
}
