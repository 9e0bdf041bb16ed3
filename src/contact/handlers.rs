use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::contact::ContactForm;
use crate::error::AppError;
use crate::messages;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

pub async fn submit(
    http: HttpRequest,
    req: Option<web::Json<ContactRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = state.cookies.token_from_request(&http);
    let session = state.auth_service.require_session(token.as_deref()).await?;
    info!("Received contact message from user: {}", session.username);

    // The login check comes first, so a bad body only matters once authenticated.
    let req = req
        .ok_or_else(|| AppError::ValidationError(messages::INVALID_REQUEST.into()))?
        .into_inner();
    let form = ContactForm {
        name: req.name,
        email: req.email,
        subject: req.subject,
        message: req.message,
    };

    if let Err(e) = state.contact_service.submit(&session, &form).await {
        warn!("Contact submission from {} failed: {}", session.username, e);
        return Err(e);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": messages::CONTACT_SUCCESS,
    })))
}
