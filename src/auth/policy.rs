use crate::db::Role;
use crate::error::AppError;
use crate::session::Session;

/// The role a newly registered account receives.
pub fn role_for_new_user(username: &str, admin_username: &str) -> Role {
    if username == admin_username {
        Role::Admin
    } else {
        Role::User
    }
}

/// Single gate for the admin dashboard.
pub fn authorize_admin(session: &Session) -> Result<(), AppError> {
    match session.role {
        Role::Admin => Ok(()),
        Role::User => Err(AppError::AuthorizationError),
    }
}
