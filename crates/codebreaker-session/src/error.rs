//! Error types for the session layer.

use codebreaker_protocol::{ErrorKind, RoomCode};
use codebreaker_room::RoomError;
use codebreaker_transport::ConnectionId;

/// Why the dispatcher rejected an event.
///
/// Every variant except the bookkeeping ones maps to a wire
/// [`ErrorKind`], so the server can report it to the client when
/// configured to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session exists for this connection.
    #[error("no session for {0}")]
    UnknownConnection(ConnectionId),

    /// The connection already has a session.
    #[error("{0} already has a session")]
    AlreadyConnected(ConnectionId),

    /// `create_room` / `join_room` before `set_name`.
    #[error("a display name must be declared first")]
    NameRequired,

    /// The connection already occupies a seat.
    #[error("already seated in room {0}")]
    AlreadyInRoom(RoomCode),

    /// The event needs a seat and the connection has none.
    #[error("not seated in any room")]
    NotInRoom,

    /// The requested code is not even a well-formed room code.
    #[error("no room with code {0:?}")]
    UnknownRoomCode(String),

    /// The secret is not exactly four digits.
    #[error("invalid secret {0:?}")]
    InvalidSecretFormat(String),

    /// The guess is not exactly four digits.
    #[error("invalid guess {0:?}")]
    InvalidGuessFormat(String),

    /// A room rule rejected the event.
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl SessionError {
    /// The wire-level kind, or `None` for internal bookkeeping errors that
    /// a client cannot cause.
    pub fn kind(&self) -> Option<ErrorKind> {
        let kind = match self {
            Self::UnknownConnection(_) | Self::AlreadyConnected(_) => return None,
            Self::NameRequired => ErrorKind::NameRequired,
            Self::AlreadyInRoom(_) => ErrorKind::AlreadyInRoom,
            Self::NotInRoom => ErrorKind::NotInRoom,
            Self::UnknownRoomCode(_) => ErrorKind::RoomNotFound,
            Self::InvalidSecretFormat(_) => ErrorKind::InvalidSecretFormat,
            Self::InvalidGuessFormat(_) => ErrorKind::InvalidGuessFormat,
            Self::Room(e) => e.kind(),
        };
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_error_converts_with_question_mark() {
        fn fails() -> Result<(), SessionError> {
            Err(RoomError::CapacityExhausted)?
        }
        let err = fails().unwrap_err();
        assert_eq!(err, SessionError::Room(RoomError::CapacityExhausted));
        assert_eq!(err.kind(), Some(ErrorKind::CapacityExhausted));
    }

    #[test]
    fn test_bookkeeping_errors_have_no_wire_kind() {
        let conn = ConnectionId::new(1);
        assert_eq!(SessionError::UnknownConnection(conn).kind(), None);
        assert_eq!(SessionError::AlreadyConnected(conn).kind(), None);
    }

    #[test]
    fn test_malformed_room_code_reports_room_not_found() {
        let err = SessionError::UnknownRoomCode("abcd".into());
        assert_eq!(err.kind(), Some(ErrorKind::RoomNotFound));
    }
}
