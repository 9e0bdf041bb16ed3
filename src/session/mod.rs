//! Session module
//!
//! Server-side sessions keyed by an opaque token. The token travels to the
//! browser inside a signed, HTTP-only cookie (see [`cookie`]); the record
//! itself lives behind the [`SessionStore`] trait so the backing storage can
//! change without touching the handlers.

pub mod cookie;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::db::Role;

pub use cookie::SessionCookies;
pub use memory::InMemorySessionStore;

const TOKEN_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: i64, username: impl Into<String>, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: generate_token(),
            user_id,
            username: username.into(),
            role,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Storage for live sessions. Implementations must be safe to share across
/// concurrently running requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session if it exists and has not expired.
    async fn get(&self, token: &str) -> Option<Session>;

    async fn put(&self, session: Session);

    /// Removing an unknown token is not an error.
    async fn delete(&self, token: &str);

    /// Drops every expired session, returning how many were removed.
    async fn purge_expired(&self) -> usize;
}

/// 64 random alphanumeric characters.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
