//! The session manager: tracks every open connection's session.
//!
//! `SessionManager` is NOT thread-safe by itself; it is a plain `HashMap`.
//! It is owned by the [`Dispatcher`](crate::Dispatcher), which the server
//! keeps behind a single lock.

use std::collections::HashMap;

use codebreaker_protocol::RoomCode;
use codebreaker_transport::ConnectionId;

use crate::{Session, SessionError};

/// Manages all open sessions, keyed by connection.
///
/// ```text
/// create() ──→ [anonymous] ──set_name──→ [named] ──create/join──→ [seated]
///     │                                                               │
///     └───────────────────────── remove() on close ◄──────────────────┘
/// ```
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionManager {
    /// Creates a new, empty session manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for a newly accepted connection.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if `conn` already has one.
    pub fn create(&mut self, conn: ConnectionId) -> Result<&Session, SessionError> {
        if self.sessions.contains_key(&conn) {
            return Err(SessionError::AlreadyConnected(conn));
        }
        tracing::debug!(%conn, "session created");
        Ok(self.sessions.entry(conn).or_insert_with(|| Session::new(conn)))
    }

    /// Closes the session for `conn`, returning it.
    pub fn remove(&mut self, conn: ConnectionId) -> Option<Session> {
        let removed = self.sessions.remove(&conn);
        if removed.is_some() {
            tracing::debug!(%conn, "session removed");
        }
        removed
    }

    pub fn get(&self, conn: ConnectionId) -> Option<&Session> {
        self.sessions.get(&conn)
    }

    /// Looks up a session for mutation.
    ///
    /// # Errors
    /// Returns [`SessionError::UnknownConnection`] if there is none.
    pub fn get_mut(&mut self, conn: ConnectionId) -> Result<&mut Session, SessionError> {
        self.sessions
            .get_mut(&conn)
            .ok_or(SessionError::UnknownConnection(conn))
    }

    /// Clears `conn`'s seat if it is still bound to `code`.
    pub fn unbind(&mut self, conn: ConnectionId, code: RoomCode) {
        if let Some(session) = self.sessions.get_mut(&conn) {
            if session.binding.is_some_and(|b| b.code == code) {
                session.binding = None;
            }
        }
    }

    /// Returns the number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
