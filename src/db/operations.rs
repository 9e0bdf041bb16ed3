use std::sync::Arc;

use sqlx::PgPool;

use crate::db::models::{MessageWithAuthor, NewMessage, NewUser, User, UserSummary};
use crate::Result;

/// Parameterized queries over the shared connection pool.
///
/// Callers queue on the pool when every connection is checked out.
#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    /// True when either the username or the email is already taken.
    pub async fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    /// Inserts a user and returns its id. A unique violation surfaces as
    /// `DatabaseError::Duplicate`.
    pub async fn insert_user(&self, user: &NewUser<'_>) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(self.pool())
        .await?;

        Ok(id)
    }

    /// Looks a user up by username or email. When the identifier is one
    /// user's username and another user's email, the username match wins.
    pub async fn find_user_for_login(&self, identifier: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, role, created_at
            FROM users
            WHERE username = $1 OR email = $1
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    pub async fn insert_message(&self, message: &NewMessage<'_>) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO messages (user_id, name, email, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(message.user_id)
        .bind(message.name)
        .bind(message.email)
        .bind(message.subject)
        .bind(message.message)
        .fetch_one(self.pool())
        .await?;

        Ok(id)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(total)
    }

    /// Newest first. Never selects the password column.
    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    pub async fn count_messages(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(self.pool())
            .await?;
        Ok(total)
    }

    pub async fn list_messages(&self, limit: i64, offset: i64) -> Result<Vec<MessageWithAuthor>> {
        let messages = sqlx::query_as::<_, MessageWithAuthor>(
            r#"
            SELECT m.id, m.user_id, m.name, m.email, m.subject, m.message, m.created_at,
                   u.username
            FROM messages m
            LEFT JOIN users u ON m.user_id = u.id
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok(messages)
    }

    pub async fn get_pool_status(&self) -> DbPoolStatus {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        DbPoolStatus {
            total_connections: size,
            idle_connections: idle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbPoolStatus {
    pub total_connections: u32,
    pub idle_connections: u32,
}
