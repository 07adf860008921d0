//! Server-side session store.
//!
//! Injected into the router as an explicit dependency; `login` and `logout`
//! are the only mutators. Until `restore` has run, every lookup reports
//! [`SessionState::Pending`] and the snapshot file is left untouched; the
//! first write after restore carries both stored and new sessions.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use pawdesk_auth::{Session, SessionId, SessionState};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("session snapshot is not valid json: {0}")]
    Snapshot(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    // Tokens signed out before restore finished; never resurrected from the snapshot.
    ended_while_pending: Mutex<HashSet<String>>,
    restored: AtomicBool,
    snapshot: Option<PathBuf>,
}

impl SessionStore {
    /// Store without persistence; ready immediately.
    pub fn in_memory() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ended_while_pending: Mutex::new(HashSet::new()),
            restored: AtomicBool::new(true),
            snapshot: None,
        }
    }

    /// Store backed by a snapshot file; pending until [`SessionStore::restore`] runs.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ended_while_pending: Mutex::new(HashSet::new()),
            restored: AtomicBool::new(false),
            snapshot: Some(path.into()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.restored.load(Ordering::SeqCst)
    }

    /// Load stored sessions from the snapshot, then mark the store ready.
    ///
    /// The store becomes ready even when loading fails; sessions signed in
    /// meanwhile are kept. After a successful load the merged set is written
    /// back. A snapshot that failed to load is not overwritten here.
    /// Returns the number of sessions restored.
    pub async fn restore(&self) -> Result<usize, SessionStoreError> {
        let result = self.load_snapshot().await;
        self.restored.store(true, Ordering::SeqCst);
        self.ended_while_pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        if result.is_ok() {
            self.persist().await;
        }
        result
    }

    async fn load_snapshot(&self) -> Result<usize, SessionStoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(0);
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let stored: Vec<Session> = serde_json::from_slice(&bytes)?;

        let ended = self.ended_while_pending.lock().unwrap_or_else(PoisonError::into_inner);
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let mut restored = 0;
        for session in stored {
            if !sessions.contains_key(&session.token) && !ended.contains(&session.token) {
                sessions.insert(session.token.clone(), session);
                restored += 1;
            }
        }
        Ok(restored)
    }

    /// Session state for a bearer token (or its absence).
    pub fn state_for(&self, token: Option<&str>) -> SessionState {
        if !self.is_ready() {
            return SessionState::Pending;
        }
        let Some(token) = token else {
            return SessionState::Anonymous;
        };
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(token) {
            Some(session) => SessionState::Authenticated(session.clone()),
            None => SessionState::Anonymous,
        }
    }

    /// Record a new sign-in; a previous session under the same token is replaced.
    pub async fn login(&self, session: Session) {
        tracing::info!(session_id = %session.id, email = %session.identity.email, "session established");
        {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            sessions.insert(session.token.clone(), session);
        }
        if self.is_ready() {
            self.persist().await;
        }
    }

    /// Drop the session for `token`. Unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> Option<SessionId> {
        let removed = {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            sessions.remove(token)
        };
        if !self.is_ready() {
            self.ended_while_pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(token.to_string());
        }
        let id = removed.map(|session| session.id)?;
        tracing::info!(session_id = %id, "session ended");
        if self.is_ready() {
            self.persist().await;
        }
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn persist(&self) {
        let Some(path) = &self.snapshot else {
            return;
        };
        let body = {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            let mut all: Vec<&Session> = sessions.values().collect();
            all.sort_by_key(|s| s.established_at);
            serde_json::to_vec_pretty(&all)
        };
        let result = match body {
            Ok(body) => tokio::fs::write(path, body).await.map_err(SessionStoreError::from),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), "failed to write session snapshot: {e}");
        }
    }
}
