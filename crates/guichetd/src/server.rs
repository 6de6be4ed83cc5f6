//! HTTP server for guichetd.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use guichet_common::{GuichetConfig, NotificationLog, SessionRegistry, TicketStore};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;

/// Application state shared across handlers. One lock per store; handlers
/// that need more than one take them in a fixed order (sessions, tickets,
/// notifications).
pub struct AppState {
    pub config: GuichetConfig,
    pub sessions: Arc<RwLock<SessionRegistry>>,
    pub tickets: Arc<RwLock<TicketStore>>,
    pub notifications: Arc<RwLock<NotificationLog>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: GuichetConfig, tickets: TicketStore) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(SessionRegistry::new())),
            tickets: Arc::new(RwLock::new(tickets)),
            notifications: Arc::new(RwLock::new(NotificationLog::new())),
            start_time: Instant::now(),
        }
    }
}

/// Assemble the full route tree around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    // The dashboard is served from another origin, so CORS stays open.
    Router::new()
        .merge(routes::chat_routes())
        .merge(routes::ticket_routes())
        .merge(routes::stats_routes())
        .merge(routes::notification_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server until the process is stopped.
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
