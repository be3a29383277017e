//! # HTTP Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//!
//! ## Endpoints
//!
//! - `GET /health`: liveness and number of open sessions
//! - `POST /chat`: one conversation turn; starts a session when no id is given
//! - `GET /sessions/{id}`: current stage and remembered emotion of a session
//! - `DELETE /sessions/{id}`: discard a session
//!
//! A session is discarded as soon as the engine ends the conversation (empty
//! reply), when it is deleted, or once it has been idle for longer than
//! `server.session_ttl_secs`; later turns with that id get a 404.
//!
use super::state::{AppState, SessionEntry};
use crate::core::error::BunnyError;
use crate::engine::ConversationState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub reply: String,
    /// True when the reply is the empty end-of-conversation sentinel.
    pub ended: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub state: ConversationState,
    pub emotion: Option<String>,
    pub started_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for BunnyError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            BunnyError::SessionNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            BunnyError::Config(_) | BunnyError::Tables(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
            }
            BunnyError::ChatIo { .. } | BunnyError::Server(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, BunnyError> {
    let sessions = state.lock_live_sessions()?.len();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        sessions,
    }))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, BunnyError> {
    // Idle sessions are dropped before the lookup, so an expired id is a 404.
    let mut sessions = state.lock_live_sessions()?;

    let session_id = match request.session_id {
        Some(id) => id,
        None => {
            // No id: this message opens a new conversation.
            let id = Uuid::new_v4();
            sessions.insert(id, SessionEntry::new());
            info!("Started session {}", id);
            id
        }
    };
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| BunnyError::SessionNotFound {
            id: session_id.to_string(),
        })?;
    entry.touch(Utc::now());

    let reply = state.engine.respond(&mut entry.session, &request.message);
    debug!(
        "Session {} now in state {}",
        session_id,
        entry.session.state()
    );

    // The empty reply is the engine's end-of-conversation signal.
    let ended = reply.is_empty();
    if ended {
        sessions.remove(&session_id);
        info!("Session {} ended by the conversation", session_id);
    }

    Ok(Json(ChatResponse {
        session_id,
        reply,
        ended,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, BunnyError> {
    let sessions = state.lock_live_sessions()?;
    let entry = sessions
        .get(&session_id)
        .ok_or_else(|| BunnyError::SessionNotFound {
            id: session_id.to_string(),
        })?;
    Ok(Json(SessionSnapshot {
        session_id,
        state: entry.session.state(),
        emotion: entry.session.emotion().map(str::to_string),
        started_at: entry.started_at,
        last_seen: entry.last_seen,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, BunnyError> {
    match state.lock_live_sessions()?.remove(&session_id) {
        Some(_) => {
            info!("Session {} deleted", session_id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(BunnyError::SessionNotFound {
            id: session_id.to_string(),
        }),
    }
}
