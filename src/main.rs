use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use contact_portal_server::config::CorsConfig;
use contact_portal_server::{configure_api, static_files, AppError, AppState, Settings};
use dotenv::dotenv;
use std::net::TcpListener;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

fn cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    // Session cookies only cross origins when credentials are allowed.
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec!["Content-Type"])
        .supports_credentials()
        .max_age(config.max_age as usize)
}

#[actix_web::main]
async fn main() -> contact_portal_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully ({})", config.environment);

    // The database must be reachable before anything is served.
    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(e) => {
            error!("Database bootstrap failed: {}", e);
            return Err(e);
        }
    };
    let pool_status = state.db.get_pool_status().await;
    info!(
        "Database pool ready ({} open, {} idle)",
        pool_status.total_connections, pool_status.idle_connections
    );
    let state = web::Data::new(state);

    // Expired sessions are also dropped lazily on read; this bounds memory.
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(SESSION_PURGE_INTERVAL).await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                info!("Purged {} expired sessions", purged);
            }
        }
    });

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;
    info!("Listening on http://{}:{}", config.server.host, config.server.port);

    let workers = config.server.workers as usize;
    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&config.cors))
            .app_data(server_state.clone())
            .configure(configure_api)
            .service(static_files(&config.static_files))
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    state.shutdown().await;
    info!("Server stopped");
    Ok(())
}
