//! Database and table bootstrap.
//!
//! Every statement here is idempotent, so bootstrap runs on each process start.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::DatabaseError;

/// SQLSTATE raised when a concurrent bootstrap created the database first.
const DUPLICATE_DATABASE: &str = "42P04";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(50) NOT NULL UNIQUE,
        email VARCHAR(100) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        role VARCHAR(16) NOT NULL DEFAULT 'user',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "ALTER TABLE users ADD COLUMN IF NOT EXISTS role VARCHAR(16) NOT NULL DEFAULT 'user'",
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL,
        subject VARCHAR(200) NOT NULL,
        message TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_users_created_at ON users (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages (created_at DESC)",
];

pub fn connect_options(config: &DatabaseConfig, database: &str) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(database)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// Connect to an existing database, create the pool and make sure the tables exist.
/// Creates the database itself first when it is missing.
pub async fn bootstrap(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    ensure_database(config).await?;

    let pool = pool_options(config)
        .connect_with(connect_options(config, &config.name))
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    ensure_schema(&pool).await?;
    info!(
        "Database {} ready ({} max connections)",
        config.name, config.max_connections
    );

    Ok(pool)
}

pub async fn ensure_database(config: &DatabaseConfig) -> Result<(), DatabaseError> {
    if !is_plain_identifier(&config.name) {
        return Err(DatabaseError::BootstrapError(format!(
            "refusing to create database with name {:?}",
            config.name
        )));
    }

    let mut conn = PgConnection::connect_with(&connect_options(config, &config.maintenance_db))
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&config.name)
        .fetch_optional(&mut conn)
        .await
        .map_err(|e| DatabaseError::BootstrapError(e.to_string()))?
        .is_some();

    if !exists {
        // Identifiers cannot be bound as parameters; the name was validated above.
        let statement = format!(
            "CREATE DATABASE \"{}\" ENCODING 'UTF8' TEMPLATE template0",
            config.name
        );
        match conn.execute(statement.as_str()).await {
            Ok(_) => info!("Created database {}", config.name),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(DUPLICATE_DATABASE) => {}
            Err(e) => return Err(DatabaseError::BootstrapError(e.to_string())),
        }
    }

    conn.close().await.ok();
    Ok(())
}

pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(*statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::BootstrapError(e.to_string()))?;
    }
    Ok(())
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
