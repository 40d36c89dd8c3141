use axum::{routing::get, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use sessiond_api::handlers::{admin, health, session};
use sessiond_api::state::AppState;
use sessiond_core::services::SessionService;
use sessiond_infrastructure::{create_pool, PgPolicyRepository};
use sessiond_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    sessiond_shared::telemetry::init_telemetry();

    info!("Session server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to Database (timeout policy source)
    info!("Connecting to database at {}...", config.database.url);
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    info!("Database connection established.");

    // Build the session service and start the policy refresh timer
    let policy_repo = Arc::new(PgPolicyRepository::new(pool));
    let sessions = Arc::new(SessionService::new(
        policy_repo,
        config.session.default_timeout_hours,
        config.session.refresh_interval_hours,
        config.session.policy_max_age_hours,
    ));
    sessions.start_auto_refresh();

    // Create App State
    let state = AppState {
        sessions: sessions.clone(),
        config: config.clone(),
    };

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Session routes (identity forwarded by the auth gateway)
        .route("/api/v1/session/touch", post(session::touch))
        .route("/api/v1/session/check", get(session::check))
        .route("/api/v1/session/logout", post(session::logout))
        // Admin routes
        .route("/api/v1/admin/sessions", get(admin::list_sessions))
        .route("/api/v1/admin/sessions/cleanup", post(admin::cleanup_sessions))
        .route("/api/v1/admin/sessions/logout", post(admin::logout_user))
        .route("/api/v1/admin/session-config", get(admin::get_session_config))
        .route(
            "/api/v1/admin/session-config/refresh",
            post(admin::refresh_session_config),
        )
        // Add State
        .with_state(state)
        // Add CORS
        .layer(
            CorsLayer::new()
                .allow_origin("http://localhost:5173".parse::<axum::http::HeaderValue>().unwrap())
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::AUTHORIZATION]),
        );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server; stop the refresh timer and drop sessions on shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let sessions_for_shutdown = sessions.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            sessions_for_shutdown.shutdown();
        })
        .await?;

    Ok(())
}
