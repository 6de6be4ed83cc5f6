//! API routes for guichetd.
//!
//! The write path is `POST /api/chat`; everything else is the read surface
//! the operations dashboard polls, plus the two acknowledge/status updates.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use guichet_common::{
    aggregate, dialogue, DayActivity, GuichetError, LocationCount, Notification, Reply, Ticket,
    TicketStatus,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::server::AppState;

type AppStateArc = Arc<AppState>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(e: GuichetError) -> ApiError {
    let status = match &e {
        GuichetError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GuichetError::NotFound { .. } => StatusCode::NOT_FOUND,
        GuichetError::Persistence(_) | GuichetError::Serde(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorBody { error: e.to_string() }))
}

// ============================================================================
// Chat Routes
// ============================================================================

fn default_user_id() -> String {
    // The original web client did not always send a user id.
    "web_user".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Absent message is treated as empty text, not as an error.
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/api/chat", post(chat))
}

async fn chat(
    State(state): State<AppStateArc>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Reply>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let mut tickets = state.tickets.write().await;
    let mut notifications = state.notifications.write().await;

    dialogue::handle(
        &mut sessions,
        &mut tickets,
        &mut notifications,
        &req.user_id,
        &req.message,
    )
    .map(Json)
    .map_err(|e| {
        error!("chat handling failed for {}: {}", req.user_id, e);
        api_error(e)
    })
}

// ============================================================================
// Ticket Routes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub ticket: Ticket,
}

pub fn ticket_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/tickets", get(list_tickets))
        .route("/api/tickets/:id/status", put(update_ticket_status))
}

async fn list_tickets(State(state): State<AppStateArc>) -> Json<Vec<Ticket>> {
    let tickets = state.tickets.read().await;
    Json(tickets.list().to_vec())
}

async fn update_ticket_status(
    State(state): State<AppStateArc>,
    Path(id): Path<u64>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let status: TicketStatus = req.status.parse().map_err(api_error)?;

    let mut tickets = state.tickets.write().await;
    let found = tickets.update_status(id, status).map_err(|e| {
        error!("status update for ticket #{} failed: {}", id, e);
        api_error(e)
    })?;
    if !found {
        return Err(api_error(GuichetError::NotFound { what: "ticket", id }));
    }

    let ticket = tickets
        .get(id)
        .cloned()
        .ok_or_else(|| api_error(GuichetError::NotFound { what: "ticket", id }))?;
    Ok(Json(StatusUpdateResponse { success: true, ticket }))
}

// ============================================================================
// Stats Routes
// ============================================================================

/// Field names the dashboard binds to.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_tickets: usize,
    pub tickets_nouveaux: usize,
    pub tickets_en_cours: usize,
    pub tickets_resolus: usize,
    pub urgent_tickets: usize,
    pub types: BTreeMap<String, usize>,
    pub localisations_top: Vec<LocationCount>,
    pub activite_7_jours: Vec<DayActivity>,
    pub message: &'static str,
}

pub fn stats_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/dashboard/stats", get(get_stats))
}

async fn get_stats(State(state): State<AppStateArc>) -> Json<DashboardStats> {
    let tickets = state.tickets.read().await;
    let stats = aggregate(tickets.list(), state.config.top_locations);

    Json(DashboardStats {
        total_tickets: stats.total,
        tickets_nouveaux: stats.nouveaux,
        tickets_en_cours: stats.en_cours,
        tickets_resolus: stats.resolus,
        urgent_tickets: stats.urgents,
        types: stats.by_type,
        localisations_top: stats.top_locations,
        activite_7_jours: stats.last_7_days,
        message: "Système opérationnel",
    })
}

// ============================================================================
// Notification Routes
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

pub fn notification_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/:id/read", put(mark_notification_read))
}

async fn list_notifications(State(state): State<AppStateArc>) -> Json<NotificationsResponse> {
    let log = state.notifications.read().await;
    Json(NotificationsResponse {
        notifications: log.recent(10),
        unread_count: log.unread_count(),
    })
}

async fn mark_notification_read(
    State(state): State<AppStateArc>,
    Path(id): Path<u64>,
) -> Result<Json<AckResponse>, ApiError> {
    let mut log = state.notifications.write().await;
    if !log.mark_read(id) {
        return Err(api_error(GuichetError::NotFound {
            what: "notification",
            id,
        }));
    }
    Ok(Json(AckResponse { success: true }))
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub tickets_total: usize,
    pub sessions_active: usize,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    // Same acquisition order as the chat handler: sessions, then tickets.
    let sessions = state.sessions.read().await;
    let tickets = state.tickets.read().await;

    Json(HealthResponse {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        tickets_total: tickets.list().len(),
        sessions_active: sessions.len(),
    })
}
