//! Unified error type for the codebreaker server.

use codebreaker_protocol::ProtocolError;
use codebreaker_session::SessionError;
use codebreaker_transport::TransportError;

/// Top-level error that wraps the layer errors.
///
/// Room errors reach this level wrapped in [`SessionError::Room`], since
/// the dispatcher is the only caller of the room layer.
#[derive(Debug, thiserror::Error)]
pub enum CodebreakerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (bookkeeping or a rejected event).
    #[error(transparent)]
    Session(#[from] SessionError),
}
