//! Session types: the server's record of one connection.
//!
//! A session tracks:
//! - WHICH connection it belongs to (`ConnectionId`)
//! - WHAT the player calls themselves (declared display name)
//! - WHERE they sit (room code and seat), once they create or join a room
//!
//! It lives exactly as long as the connection: created on connect,
//! dropped on close.

use codebreaker_protocol::{RoomCode, SeatIndex};
use codebreaker_transport::ConnectionId;

/// The seat a connection occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub code: RoomCode,
    pub seat: SeatIndex,
}

/// One connection's session.
#[derive(Debug, Clone)]
pub struct Session {
    pub connection: ConnectionId,

    /// The last name sent with `set_name`, if any.
    pub name: Option<String>,

    /// Set by a successful `create_room` / `join_room`, cleared when the
    /// room is torn down.
    pub binding: Option<Binding>,
}

impl Session {
    pub(crate) fn new(connection: ConnectionId) -> Self {
        Self {
            connection,
            name: None,
            binding: None,
        }
    }

    /// The declared name, treating a blank name as undeclared.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}
