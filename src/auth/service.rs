use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use crate::auth::password::{decoy_hash, hash_password, verify_password};
use crate::auth::policy::role_for_new_user;
use crate::db::{DbOperations, NewUser, Role};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::messages;
use crate::session::{Session, SessionStore};
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct AuthService {
    db: DbOperations,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
    admin_username: String,
}

impl AuthService {
    pub fn new(
        db: DbOperations,
        sessions: Arc<dyn SessionStore>,
        session_ttl: Duration,
        admin_username: String,
    ) -> Self {
        Self {
            db,
            sessions,
            session_ttl,
            admin_username,
        }
    }

    /// Creates the account and logs it in.
    pub async fn register(&self, registration: Registration) -> Result<Session> {
        let username = registration.username.trim();
        let email = registration.email.trim();

        if username.is_empty()
            || email.is_empty()
            || registration.password.trim().is_empty()
            || registration.confirm_password.trim().is_empty()
        {
            return Err(AppError::ValidationError(messages::FIELDS_REQUIRED.into()));
        }
        if registration.password != registration.confirm_password {
            return Err(AppError::ValidationError(messages::PASSWORD_MISMATCH.into()));
        }

        if self.db.user_exists(username, email).await? {
            return Err(AppError::ConflictError);
        }

        let password = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))??;

        let role = role_for_new_user(username, &self.admin_username);
        let user_id = self
            .db
            .insert_user(&NewUser {
                username,
                email,
                password_hash: &password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                AppError::DatabaseError(DatabaseError::Duplicate) => AppError::ConflictError,
                other => other,
            })?;

        info!("Registered user {} (id {}, role {})", username, user_id, role.as_str());
        Ok(self.start_session(user_id, username, role).await)
    }

    /// Accepts either the username or the email as identifier. Unknown users
    /// and wrong passwords produce the same error.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.trim().is_empty() {
            return Err(AppError::ValidationError(messages::CREDENTIALS_REQUIRED.into()));
        }

        let user = self.db.find_user_for_login(identifier).await?;
        let stored_hash = user
            .as_ref()
            .map(|u| u.password.clone())
            .unwrap_or_else(|| decoy_hash().to_string());

        let candidate = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        match user {
            Some(user) if verified => {
                info!("User {} logged in", user.username);
                Ok(self.start_session(user.id, &user.username, user.role()).await)
            }
            _ => Err(AuthError::InvalidCredentials.into()),
        }
    }

    /// Current session for the token, if any. No side effects beyond
    /// evicting an expired entry.
    pub async fn check_auth(&self, token: Option<&str>) -> Option<Session> {
        match token {
            Some(token) => self.sessions.get(token).await,
            None => None,
        }
    }

    /// Like [`check_auth`](Self::check_auth) but fails with `LoginRequired`.
    pub async fn require_session(&self, token: Option<&str>) -> Result<Session> {
        self.check_auth(token)
            .await
            .ok_or_else(|| AuthError::LoginRequired.into())
    }

    pub async fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            self.sessions.delete(token).await;
        }
    }

    async fn start_session(&self, user_id: i64, username: &str, role: Role) -> Session {
        let session = Session::new(user_id, username, role, self.session_ttl);
        self.sessions.put(session.clone()).await;
        session
    }
}
