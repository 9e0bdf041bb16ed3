use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::service::Registration;
use crate::error::AppError;
use crate::messages;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirm-password", alias = "confirm_password")]
    pub confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

pub async fn register(
    http: HttpRequest,
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let previous = state.cookies.token_from_request(&http);
    let req = req.into_inner();
    info!("Received registration request for username: {}", req.username);

    let registration = Registration {
        username: req.username,
        email: req.email,
        password: req.password,
        confirm_password: req.confirm_password,
    };

    match state.auth_service.register(registration).await {
        Ok(session) => {
            info!("Registration successful for username: {}", session.username);
            state.auth_service.logout(previous.as_deref()).await;
            Ok(HttpResponse::Ok()
                .cookie(state.cookies.build(&session.token))
                .json(AuthResponse {
                    success: true,
                    message: messages::REGISTER_SUCCESS.to_string(),
                    username: Some(session.username),
                }))
        }
        Err(e) => {
            warn!("Registration failed: {}", e);
            Err(e)
        }
    }
}

pub async fn login(
    http: HttpRequest,
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let previous = state.cookies.token_from_request(&http);
    info!("Received login request for: {}", req.username);

    match state.auth_service.login(&req.username, &req.password).await {
        Ok(session) => {
            info!("Login successful for username: {}", session.username);
            state.auth_service.logout(previous.as_deref()).await;
            Ok(HttpResponse::Ok()
                .cookie(state.cookies.build(&session.token))
                .json(AuthResponse {
                    success: true,
                    message: messages::LOGIN_SUCCESS.to_string(),
                    username: Some(session.username),
                }))
        }
        Err(e) => {
            warn!("Login failed for {}: {}", req.username, e);
            Err(e)
        }
    }
}

pub async fn check_auth(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let token = state.cookies.token_from_request(&req);
    let session = state.auth_service.check_auth(token.as_deref()).await;

    HttpResponse::Ok().json(AuthStatus {
        is_logged_in: session.is_some(),
        username: session.map(|s| s.username),
    })
}

pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let token = state.cookies.token_from_request(&req);
    state.auth_service.logout(token.as_deref()).await;

    HttpResponse::Ok()
        .cookie(state.cookies.removal())
        .json(serde_json::json!({ "success": true }))
}
