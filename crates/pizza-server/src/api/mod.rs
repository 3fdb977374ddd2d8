pub mod extract;
pub mod response;

use crate::config::Config;
use crate::db;
use crate::error::ApiError;
use crate::features;
use crate::middleware;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use std::{net::SocketAddr, time::Duration};
use tokio::signal;

use extract::BaseUrl;
use response::ResourceOptions;

const HOMEPAGE_ALLOW: &str = "GET, HEAD, OPTIONS";

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Overrides the request host when building absolute URLs
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db,
            public_url: config.server.public_url.clone(),
        }
    }
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let db = db::create_pool(&config.database).await?;
    db::run_migrations(&db).await?;

    let state = AppState::new(db, &config);
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shut down gracefully");

    Ok(())
}

pub fn create_router(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .route("/", resource(get(homepage), "Homepage", HOMEPAGE_ALLOW))
        .route("/health", get(health))
        .merge(features::router())
        .fallback(not_found)
        .with_state(state);

    let with_cors = api.clone().layer(middleware::cors_layer(&config.cors));

    api.layer(axum::middleware::from_fn_with_state(
        with_cors,
        middleware::cors_unless_plain_options,
    ))
    .layer(middleware::tracing_layer())
}

/// Finish a resource's method router
///
/// Adds the `OPTIONS` metadata answer and turns every method the resource
/// does not handle into a 405 naming that method.
pub fn resource(
    router: MethodRouter<AppState>,
    name: &'static str,
    allow: &'static str,
) -> MethodRouter<AppState> {
    let options = ResourceOptions { name, allow };
    router
        .options(move || async move { options })
        .fallback(move |method: Method| async move {
            ApiError::MethodNotAllowed {
                method,
                allow: allow.to_string(),
            }
        })
}

async fn homepage(base: BaseUrl) -> impl IntoResponse {
    Json(json!({
        "Topping List": base.join("/toppings/"),
        "Pizza List": base.join("/pizzas/"),
    }))
}

async fn health(State(state): State<AppState>) -> Response {
    match db::health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected"
                })),
            )
                .into_response()
        },
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    tracing::info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
