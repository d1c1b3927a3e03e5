//! # Codebreaker
//!
//! A two-player code-breaking game server over WebSockets.
//!
//! Each player commits a hidden four-digit secret, then the two take turns
//! guessing each other's code. Every guess is answered with how many of its
//! digits occur in the secret and how many sit in the right place; the
//! first exact guess wins.
//!
//! The server is layered the same way top to bottom:
//!
//! ```text
//! codebreaker            ← this crate: accept loop, per-connection tasks
//! codebreaker-session    ← sessions, dispatch, disconnects
//! codebreaker-room       ← rooms, turns, scoring, code allocation
//! codebreaker-protocol   ← wire events and codec
//! codebreaker-transport  ← WebSocket connections
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codebreaker::prelude::*;
//!
//! # async fn run() -> Result<(), CodebreakerError> {
//! let server = CodebreakerServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod outbox;
mod server;

pub use error::CodebreakerError;
pub use server::{
    CodebreakerServer, CodebreakerServerBuilder, DEFAULT_HANDSHAKE_TIMEOUT, ErrorPolicy,
    ServerConfig,
};

pub mod prelude {
    pub use crate::{
        CodebreakerError, CodebreakerServer, CodebreakerServerBuilder, ErrorPolicy,
        ServerConfig,
    };
    pub use codebreaker_protocol::{
        ClientEvent, Digits, ErrorKind, GuessResult, RoomCode, SeatIndex, ServerEvent,
    };
    pub use codebreaker_room::{CodeSource, RegistryConfig, RoomRegistry};
}
