//! Per-connection handler: session setup, event routing and delivery.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   0. Finish the WebSocket upgrade, bounded by the handshake timeout
//!   1. Open a session and an outbox under the server lock
//!   2. Loop: decode inbound frames and dispatch them, while writing
//!      whatever lands in this connection's outbox
//!   3. On exit, the drop guard runs the disconnect path

use std::sync::Arc;

use codebreaker_protocol::{ClientEvent, Codec, ServerEvent};
use codebreaker_transport::{
    Connection, ConnectionId, Incoming, PendingWebSocket, TransportError, WebSocketConnection,
};
use tokio::time::Instant;

use crate::server::ServerState;
use crate::CodebreakerError;

/// Drop guard that tears down a connection's session when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics or returns
/// early with an error. Since `Drop` is synchronous, we spawn a
/// fire-and-forget task for the async lock.
struct ConnectionGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut hub = state.hub.lock().await;
            hub.outboxes.unregister(conn_id);
            let notices = hub.dispatcher.disconnect(conn_id);
            hub.outboxes.deliver(notices);
            let sessions = hub.dispatcher.sessions().len();
            tracing::debug!(%conn_id, sessions, "connection cleaned up");
        });
    }
}

/// What one read from the connection produced.
enum Inbound {
    Frame(Vec<u8>),
    Closed,
    Failed(TransportError),
    Idle,
}

/// Reads the next frame, giving up at `deadline` if there is one.
async fn next_inbound(conn: &WebSocketConnection, deadline: Option<Instant>) -> Inbound {
    let result = match deadline {
        Some(at) => match tokio::time::timeout_at(at, conn.recv()).await {
            Ok(result) => result,
            Err(_) => return Inbound::Idle,
        },
        None => conn.recv().await,
    };
    match result {
        Ok(Some(data)) => Inbound::Frame(data),
        Ok(None) => Inbound::Closed,
        Err(e) => Inbound::Failed(e),
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    incoming: PendingWebSocket,
    state: Arc<ServerState>,
) -> Result<(), CodebreakerError> {
    let conn_id = incoming.id();
    let addr = incoming.peer_addr();
    let limit = state.config.handshake_timeout;
    let conn = match tokio::time::timeout(limit, incoming.upgrade()).await {
        Ok(upgraded) => upgraded?,
        Err(_) => {
            tracing::debug!(%conn_id, %addr, ?limit, "handshake timed out");
            return Err(TransportError::HandshakeTimedOut(limit).into());
        }
    };
    tracing::debug!(%conn_id, "handling new connection");

    // Session and outbox are opened together; if the session cannot be
    // created no guard is needed.
    let mut outbox = {
        let mut hub = state.hub.lock().await;
        hub.dispatcher.connect(conn_id)?;
        hub.outboxes.register(conn_id)
    };
    let _guard = ConnectionGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    let idle = state.config.idle_timeout;
    let mut deadline = idle.map(|d| Instant::now() + d);

    loop {
        tokio::select! {
            inbound = next_inbound(&conn, deadline) => {
                let data = match inbound {
                    Inbound::Frame(data) => data,
                    Inbound::Closed => {
                        tracing::info!(%conn_id, "connection closed cleanly");
                        break;
                    }
                    Inbound::Failed(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                    Inbound::Idle => {
                        tracing::info!(%conn_id, "connection idle, closing");
                        let _ = conn.close().await;
                        break;
                    }
                };
                deadline = idle.map(|d| Instant::now() + d);
                handle_frame(&state, conn_id, &data).await;
            }
            Some(event) = outbox.recv() => {
                send_event(&conn, &state, &event).await?;
            }
        }
    }

    // _guard drops here → disconnect fires.
    Ok(())
}

/// Decodes one frame and runs it through the dispatcher.
async fn handle_frame(state: &ServerState, conn_id: ConnectionId, data: &[u8]) {
    let policy = state.config.error_policy;

    let event: ClientEvent = match state.codec.decode(data) {
        Ok(event) => event,
        Err(e) => {
            let kind = e.kind();
            tracing::debug!(%conn_id, %kind, error = %e, "failed to decode event");
            if policy.reports(kind) {
                let hub = state.hub.lock().await;
                hub.outboxes.send(conn_id, ServerEvent::Error { kind });
            }
            return;
        }
    };

    let mut hub = state.hub.lock().await;
    match hub.dispatcher.handle(conn_id, event) {
        Ok(outbound) => hub.outboxes.deliver(outbound),
        Err(e) => hub.reject(conn_id, &e, policy),
    }
}

/// Encodes and writes one outbound event.
async fn send_event(
    conn: &WebSocketConnection,
    state: &ServerState,
    event: &ServerEvent,
) -> Result<(), CodebreakerError> {
    let bytes = state.codec.encode(event)?;
    conn.send(&bytes).await?;
    tracing::trace!(conn_id = %conn.id(), event = event.type_name(), "event sent");
    Ok(())
}
