//! Room lifecycle and game rules for the codebreaker server.
//!
//! A room pairs two connections. Each seat commits a four-digit secret,
//! then the seats take turns guessing the other's secret until one guess
//! matches exactly.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates rooms under fresh codes, joins, removes
//! - [`Room`] — two seats plus the turn state machine
//! - [`Phase`] — lifecycle state machine
//! - [`score`] — the feedback function
//! - [`CodeSource`] — where new room codes come from
//!
//! Everything here is synchronous and single-owner. The server serializes
//! access by keeping the registry behind one lock, so each operation runs
//! to completion before the next begins.

mod code_source;
mod config;
mod error;
mod phase;
mod registry;
mod room;
mod scoring;

pub use code_source::{CodeSource, RandomCodes};
pub use config::RegistryConfig;
pub use error::RoomError;
pub use phase::Phase;
pub use registry::RoomRegistry;
pub use room::{GuessOutcome, Room, Seat, SecretOutcome};
pub use scoring::{score, Feedback};
