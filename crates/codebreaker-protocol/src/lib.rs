//! Wire protocol for the codebreaker server.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Values** ([`RoomCode`], [`SeatIndex`], [`Digits`], [`GuessResult`]) —
//!   small validated types that appear inside events.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — one JSON object per
//!   WebSocket message, tagged by its `type` field.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to and from bytes.
//! - **Errors** ([`ProtocolError`], [`ErrorKind`]) — codec failures, and the
//!   error kinds the server can report back to a client.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (ClientEvent) → Session dispatcher → Room
//! ```
//!
//! The protocol layer knows nothing about connections or rooms; it only
//! knows the shape of the messages.

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::{ErrorKind, ProtocolError};
pub use events::{ClientEvent, ServerEvent};
pub use types::{Digits, GuessResult, RoomCode, SeatIndex, CODE_LEN};
