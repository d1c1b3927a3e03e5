//! Inbound and outbound events.
//!
//! Every message on the wire is a single JSON object whose `type` field
//! names the event, with the event's fields beside it:
//!
//! ```json
//! { "type": "join_room", "roomCode": "4821" }
//! ```
//!
//! Field names are fixed by existing browser clients, which is why several
//! fields carry explicit `rename`s.

use serde::{Deserialize, Serialize};

use crate::{Digits, ErrorKind, GuessResult, RoomCode, SeatIndex};

/// Client → server.
///
/// Secrets and guesses arrive as raw strings. Validation into [`Digits`]
/// happens in the dispatcher so a bad value is reported as a bad secret or
/// guess, not as an undecodable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Declare (or re-declare) a display name.
    SetName { name: String },

    /// Open a new room; the caller takes seat 0.
    CreateRoom,

    /// Take seat 1 in the room with this code.
    JoinRoom {
        #[serde(rename = "roomCode")]
        room_code: String,
    },

    /// Commit the hidden four-digit code.
    SetSecret { secret: String },

    /// Guess the opponent's code.
    Guess { guess: String },
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent to the creator only.
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_code: RoomCode },

    /// Sent to both seats once the second player joins.
    GameStart,

    /// Sent to each seat individually whenever the turn is (re)assigned.
    /// `player` is the active seat, kept for older clients.
    #[serde(rename_all = "camelCase")]
    Turn {
        your_turn: bool,
        active_name: String,
        player: SeatIndex,
    },

    /// Sent to the guesser only, with their full history so far.
    #[serde(rename_all = "camelCase")]
    Feedback {
        guess: Digits,
        digits_count: u8,
        positions_count: u8,
        history: Vec<GuessResult>,
    },

    /// Sent to both seats when a guess matches exactly.
    #[serde(rename_all = "camelCase")]
    GameOver {
        winner_seat: SeatIndex,
        winner_name: String,
    },

    /// Sent to the remaining occupant when the other one disconnects.
    OpponentLeft { name: String },

    /// Sent to the caller when an event is rejected and reporting is on.
    Error { kind: ErrorKind },
}

impl ServerEvent {
    /// The `type` tag this event carries on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "room_created",
            Self::GameStart => "game_start",
            Self::Turn { .. } => "turn",
            Self::Feedback { .. } => "feedback",
            Self::GameOver { .. } => "game_over",
            Self::OpponentLeft { .. } => "opponent_left",
            Self::Error { .. } => "error",
        }
    }
}
