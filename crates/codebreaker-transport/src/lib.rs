//! Transport layer for the codebreaker server.
//!
//! Provides the [`Transport`] and [`Connection`] traits, which hide the
//! network protocol from the rest of the server. The server only ever sees
//! "a connection that yields whole messages and accepts whole messages";
//! framing, pings and close handshakes stay down here.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{PendingWebSocket, WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a connection.
///
/// Every accepted connection gets a fresh id for its whole lifetime. The
/// session layer keys its per-connection records by this value, and room
/// seats remember it to address their occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
///
/// Accepting only takes the raw stream off the listener. The protocol
/// handshake runs later, off the accept path, in [`Incoming::upgrade`].
pub trait Transport: Send + Sync + 'static {
    /// The not-yet-upgraded connection produced by this transport.
    type Incoming: Incoming;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming stream.
    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error>;
}

/// An accepted stream whose handshake has not run yet.
pub trait Incoming: Send + 'static {
    /// The connection this becomes once upgraded.
    type Connection: Connection;
    /// The error type for the handshake.
    type Error: std::error::Error + Send + Sync;

    /// Runs the handshake. Callers bound this with a timeout.
    async fn upgrade(self) -> Result<Self::Connection, Self::Error>;

    /// The id the upgraded connection will carry.
    fn id(&self) -> ConnectionId;
}

/// A single connection that carries one message per frame.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one message to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
