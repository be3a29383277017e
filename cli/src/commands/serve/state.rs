//! # Shared Server State
//!
//! File: cli/src/commands/serve/state.rs
//!
//! The engine is shared read-only between requests. Sessions live in a map
//! behind a mutex; the lock is only held while one `respond` call runs.
//!
//! Clients are not required to end their conversations, so every session
//! records when it was last used and sessions idle for longer than the
//! configured TTL are evicted. Eviction happens on each request and from a
//! periodic background task started by `server_logic::run_server`.
//!
use crate::core::error::BunnyError;
use crate::engine::{ResponseEngine, Session};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// A conversation held by the server.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session: Session,
    pub started_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SessionEntry {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session: Session::new(),
            started_at: now,
            last_seen: now,
        }
    }

    /// Marks the session as used at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    /// True when the session has not been used for longer than `ttl`.
    pub fn is_idle(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        // A clock step backwards gives a negative delta; treat it as fresh.
        match (now - self.last_seen).to_std() {
            Ok(idle) => idle > ttl,
            Err(_) => false,
        }
    }
}

impl Default for SessionEntry {
    fn default() -> Self {
        Self::new()
    }
}

pub type SessionMap = HashMap<Uuid, SessionEntry>;

/// Removes every session idle for longer than `ttl`, returning how many were
/// dropped.
pub fn evict_idle(sessions: &mut SessionMap, ttl: Duration, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|id, entry| {
        let keep = !entry.is_idle(ttl, now);
        if !keep {
            debug!("Evicting idle session {} (last seen {})", id, entry.last_seen);
        }
        keep
    });
    before - sessions.len()
}

/// Application state passed to handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ResponseEngine>,
    pub sessions: Arc<Mutex<SessionMap>>,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(engine: ResponseEngine, session_ttl: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            session_ttl,
        }
    }

    pub fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionMap>, BunnyError> {
        self.sessions
            .lock()
            .map_err(|_| BunnyError::Server("Session store lock poisoned".to_string()))
    }

    /// Locks the session map with idle sessions already evicted.
    pub fn lock_live_sessions(&self) -> Result<MutexGuard<'_, SessionMap>, BunnyError> {
        let mut sessions = self.lock_sessions()?;
        evict_idle(&mut sessions, self.session_ttl, Utc::now());
        Ok(sessions)
    }

    /// Evicts idle sessions as of `now`.
    pub fn evict_idle_sessions(&self, now: DateTime<Utc>) -> Result<usize, BunnyError> {
        let mut sessions = self.lock_sessions()?;
        Ok(evict_idle(&mut sessions, self.session_ttl, now))
    }
}
