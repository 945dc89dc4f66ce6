//! Per-session state: last prediction, last feature row and last error.
//!
//! Each browser session gets its own entry. Nothing here is shared between
//! sessions except the map that holds them.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::{FeatureRecord, PredictionResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::prediction::PredictionOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub id: Uuid,
    pub last_prediction: Option<PredictionResult>,
    pub last_features: Option<FeatureRecord>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            last_prediction: None,
            last_features: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Session map shared across handlers
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    fn is_expired(&self, state: &SessionState, now: DateTime<Utc>) -> bool {
        now - state.updated_at > self.ttl
    }

    fn poisoned() -> AppError {
        AppError::Internal("session store lock poisoned".to_string())
    }

    /// Open a new session, purging idle ones first
    pub fn create(&self) -> AppResult<SessionState> {
        let now = Utc::now();
        let purged = self.purge_expired(now)?;
        if purged > 0 {
            tracing::debug!("Purged {} idle sessions", purged);
        }
        let state = SessionState::new(now);
        self.sessions
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(state.id, state.clone());
        tracing::info!("Created session {}", state.id);
        Ok(state)
    }

    /// Idle sessions past the TTL read as not found until they are purged
    pub fn get(&self, id: Uuid) -> AppResult<SessionState> {
        let sessions = self.sessions.read().map_err(|_| Self::poisoned())?;
        match sessions.get(&id) {
            Some(state) if !self.is_expired(state, Utc::now()) => Ok(state.clone()),
            _ => Err(AppError::SessionNotFound(id)),
        }
    }

    fn update<F>(&self, id: Uuid, apply: F) -> AppResult<SessionState>
    where
        F: FnOnce(&mut SessionState),
    {
        let now = Utc::now();
        let mut sessions = self.sessions.write().map_err(|_| Self::poisoned())?;
        let expired = match sessions.get(&id) {
            Some(state) => self.is_expired(state, now),
            None => return Err(AppError::SessionNotFound(id)),
        };
        if expired {
            sessions.remove(&id);
            tracing::debug!("Session {} expired", id);
            return Err(AppError::SessionNotFound(id));
        }
        let state = sessions.get_mut(&id).ok_or(AppError::SessionNotFound(id))?;
        apply(state);
        state.updated_at = now;
        Ok(state.clone())
    }

    /// Replace the shown prediction and clear any previous error
    pub fn record_success(
        &self,
        id: Uuid,
        outcome: &PredictionOutcome,
    ) -> AppResult<SessionState> {
        self.update(id, |state| {
            state.last_prediction = Some(outcome.result.clone());
            state.last_features = Some(outcome.features.clone());
            state.last_error = None;
        })
    }

    /// Remember the error; the previous prediction stays visible
    pub fn record_failure(&self, id: Uuid, message: String) -> AppResult<SessionState> {
        self.update(id, |state| {
            state.last_error = Some(message);
        })
    }

    pub fn remove(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::SessionNotFound(id))
    }

    /// Drop sessions idle for longer than the TTL. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let mut sessions = self.sessions.write().map_err(|_| Self::poisoned())?;
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        Ok(before - sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
