pub mod admin;
pub mod auth;
pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod messages;
pub mod session;

use std::sync::Arc;

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{web, HttpRequest};
use chrono::Duration;
use sqlx::PgPool;
use tracing::warn;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use admin::AdminService;
pub use auth::AuthService;
pub use contact::ContactService;
pub use db::{DbOperations, Role};
pub use session::{InMemorySessionStore, Session, SessionCookies, SessionStore};

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
    pub sessions: Arc<dyn SessionStore>,
    pub cookies: Arc<SessionCookies>,
    pub auth_service: Arc<AuthService>,
    pub contact_service: ContactService,
    pub admin_service: AdminService,
}

impl AppState {
    /// Creates the database and tables if needed. Fails when the database
    /// is unreachable, so a broken deployment never starts serving.
    pub async fn new(config: Settings) -> Result<Self> {
        let pool = db::schema::bootstrap(&config.database).await?;
        Self::with_pool(config, pool, Arc::new(InMemorySessionStore::new()))
    }

    pub fn with_pool(
        config: Settings,
        pool: PgPool,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let ttl = Duration::hours(config.auth.session_ttl_hours);
        let db = DbOperations::new(Arc::new(pool));
        let cookies = SessionCookies::new(
            &config.auth.session_secret,
            config.auth.cookie_name.clone(),
            ttl,
        )?;
        let auth_service = AuthService::new(
            db.clone(),
            sessions.clone(),
            ttl,
            config.auth.admin_username.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            contact_service: ContactService::new(db.clone()),
            admin_service: AdminService::new(db.clone()),
            db,
            sessions,
            cookies: Arc::new(cookies),
            auth_service: Arc::new(auth_service),
        })
    }

    pub async fn shutdown(&self) {
        self.db.pool().close().await;
    }
}

/// Registers the JSON API under `/api`. Static files must be mounted after this.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .route("/register", web::post().to(auth::handlers::register))
                .route("/login", web::post().to(auth::handlers::login))
                .route("/check_auth", web::get().to(auth::handlers::check_auth))
                .route("/logout", web::get().to(auth::handlers::logout))
                .route("/contact", web::post().to(contact::handlers::submit))
                .route("/admin/data", web::get().to(admin::handlers::admin_data)),
        );
}

/// Serves the front-end from disk for every path the API does not claim.
pub fn static_files(config: &config::StaticFilesConfig) -> actix_files::Files {
    actix_files::Files::new("/", &config.dir).index_file(config.index.clone())
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    AppError::ValidationError(messages::INVALID_REQUEST.into()).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected query string: {}", err);
    AppError::ValidationError(messages::INVALID_REQUEST.into()).into()
}
