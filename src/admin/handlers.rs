use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::admin::pagination::PageRequest;
use crate::error::AppError;
use crate::AppState;

/// Raw query values; anything unparsable falls back to page 1, including a
/// query string that does not deserialize at all (e.g. a repeated key).
#[derive(Debug, Default, Deserialize)]
pub struct AdminDataQuery {
    pub page_users: Option<String>,
    pub page_msgs: Option<String>,
}

pub async fn admin_data(
    http: HttpRequest,
    query: Option<web::Query<AdminDataQuery>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = state.cookies.token_from_request(&http);
    let session = state.auth_service.require_session(token.as_deref()).await?;

    let query = query.map(web::Query::into_inner).unwrap_or_default();
    let users_page = PageRequest::from_param(query.page_users.as_deref());
    let messages_page = PageRequest::from_param(query.page_msgs.as_deref());

    let dashboard = match state
        .admin_service
        .dashboard(&session, users_page, messages_page)
        .await
    {
        Ok(dashboard) => dashboard,
        Err(e) => {
            warn!("Admin data request by {} failed: {}", session.username, e);
            return Err(e);
        }
    };

    info!(
        "Admin data served to {} (users page {}, messages page {})",
        session.username,
        users_page.page(),
        messages_page.page()
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "users": dashboard.users,
        "messages": dashboard.messages,
    })))
}
