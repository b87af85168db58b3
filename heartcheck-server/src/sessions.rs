//! Session registry - one `SessionContext` per login
//!
//! Sessions are keyed by a random id carried in the JWT and expire with
//! it. Logging out or expiry removes the entry, which invalidates every
//! token bound to it and drops the session history.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use heartcheck_core::SessionContext;

pub type SharedSession = Arc<Mutex<SessionContext>>;

struct SessionEntry {
    session: SharedSession,
    expires_at: DateTime<Utc>,
}

/// A freshly opened session
#[derive(Debug, Clone, Copy)]
pub struct OpenedSession {
    pub id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Sessions live for `ttl` after login
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Start a session for `username`
    pub fn open(&self, username: &str) -> OpenedSession {
        self.open_at(username, Utc::now())
    }

    /// Start a session at `now`; expired sessions are evicted first
    pub fn open_at(&self, username: &str, now: DateTime<Utc>) -> OpenedSession {
        let opened = OpenedSession {
            id: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write();
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(
            opened.id,
            SessionEntry {
                session: Arc::new(Mutex::new(SessionContext::new(username))),
                expires_at: opened.expires_at,
            },
        );

        tracing::debug!("Session {} opened for {} until {}", opened.id, username, opened.expires_at);
        opened
    }

    pub fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.get_at(id, Utc::now())
    }

    /// Live session by id; an expired one is removed and not returned
    pub fn get_at(&self, id: Uuid, now: DateTime<Utc>) -> Option<SharedSession> {
        let found = self
            .sessions
            .read()
            .get(&id)
            .map(|entry| (entry.session.clone(), entry.expires_at));

        match found {
            Some((session, expires_at)) if expires_at > now => Some(session),
            Some(_) => {
                self.close(id);
                None
            }
            None => None,
        }
    }

    /// End a session; its history is dropped with it
    pub fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Session {} closed", id);
        }
        removed
    }

    /// Drop every expired session, returning how many were removed
    pub fn prune_expired(&self) -> usize {
        self.prune_expired_at(Utc::now())
    }

    pub fn prune_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }
}
