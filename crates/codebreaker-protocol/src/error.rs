//! Error types for the protocol layer.
//!
//! [`ProtocolError`] is what the codec returns. [`ErrorKind`] is different:
//! it is a *wire value*, the machine-readable reason carried by an
//! `error` event when the server is configured to report rejected input.
//! Every error in the higher layers maps onto exactly one kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: not JSON, unknown `type`, missing fields.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but is not a valid protocol message.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl ProtocolError {
    /// Every protocol failure on inbound data is a malformed envelope.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedEnvelope
    }
}

/// Why an inbound event was rejected.
///
/// Serialized in `snake_case`, e.g. `"room_full"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The message could not be decoded into a known event.
    MalformedEnvelope,
    /// No active room has the requested code.
    RoomNotFound,
    /// The room already has two occupants.
    RoomFull,
    /// A guess arrived from the seat that is not on turn.
    WrongTurn,
    /// The event needs a room but the connection is not seated in one.
    NotInRoom,
    /// The seat already committed its secret.
    SecretAlreadySet,
    /// The secret is not exactly four digits.
    InvalidSecretFormat,
    /// The guess is not exactly four digits.
    InvalidGuessFormat,
    /// Every room code is in use.
    CapacityExhausted,
    /// The event needs a declared display name first.
    NameRequired,
    /// The connection is already seated in a room.
    AlreadyInRoom,
    /// The room is not in the guessing phase.
    GameNotInProgress,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MalformedEnvelope => "malformed_envelope",
            Self::RoomNotFound => "room_not_found",
            Self::RoomFull => "room_full",
            Self::WrongTurn => "wrong_turn",
            Self::NotInRoom => "not_in_room",
            Self::SecretAlreadySet => "secret_already_set",
            Self::InvalidSecretFormat => "invalid_secret_format",
            Self::InvalidGuessFormat => "invalid_guess_format",
            Self::CapacityExhausted => "capacity_exhausted",
            Self::NameRequired => "name_required",
            Self::AlreadyInRoom => "already_in_room",
            Self::GameNotInProgress => "game_not_in_progress",
        };
        f.write_str(s)
    }
}
