//! Error types for the room layer.

use codebreaker_protocol::{ErrorKind, RoomCode, SeatIndex};

use crate::Phase;

/// Errors that can occur during room and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No active room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// Both seats are taken (or the room is past the joining phase).
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The guessing seat is not the seat on turn.
    #[error("seat {0} guessed out of turn")]
    WrongTurn(SeatIndex),

    /// The seat is not occupied in this room.
    #[error("seat {0} is empty")]
    SeatEmpty(SeatIndex),

    /// The seat already committed a secret.
    #[error("seat {0} already set its secret")]
    SecretAlreadySet(SeatIndex),

    /// A guess arrived while the room was not in the guessing phase.
    #[error("no game in progress (phase {0})")]
    GameNotInProgress(Phase),

    /// All room codes are in use.
    #[error("all {} room codes are in use", RoomCode::CAPACITY)]
    CapacityExhausted,
}

impl RoomError {
    /// The wire-level kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::RoomNotFound,
            Self::RoomFull(_) => ErrorKind::RoomFull,
            Self::WrongTurn(_) => ErrorKind::WrongTurn,
            Self::SeatEmpty(_) => ErrorKind::NotInRoom,
            Self::SecretAlreadySet(_) => ErrorKind::SecretAlreadySet,
            Self::GameNotInProgress(_) => ErrorKind::GameNotInProgress,
            Self::CapacityExhausted => ErrorKind::CapacityExhausted,
        }
    }
}
