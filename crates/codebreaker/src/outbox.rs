//! Per-connection outboxes.
//!
//! The dispatcher addresses events by [`ConnectionId`]; the outbox table
//! turns that address into the channel read by the connection's own task.
//! Enqueueing never blocks, so it is done while the server lock is held and
//! each connection sees its events in dispatch order.

use std::collections::HashMap;

use codebreaker_protocol::ServerEvent;
use codebreaker_session::Outbound;
use codebreaker_transport::ConnectionId;
use tokio::sync::mpsc;

/// Routes outbound events to connection tasks.
#[derive(Debug, Default)]
pub(crate) struct Outboxes {
    senders: HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
}

impl Outboxes {
    /// Opens an outbox for `conn` and returns its receiving end.
    pub(crate) fn register(
        &mut self,
        conn: ConnectionId,
    ) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(conn, tx);
        rx
    }

    pub(crate) fn unregister(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);
    }

    /// Enqueues one event. Events for closed connections are dropped.
    pub(crate) fn send(&self, to: ConnectionId, event: ServerEvent) {
        let Some(tx) = self.senders.get(&to) else {
            tracing::debug!(%to, event = event.type_name(), "no outbox, event dropped");
            return;
        };
        if tx.send(event).is_err() {
            tracing::debug!(%to, "outbox closed, event dropped");
        }
    }

    /// Enqueues every event in order.
    pub(crate) fn deliver(&self, events: Vec<Outbound>) {
        for Outbound { to, event } in events {
            self.send(to, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    #[tokio::test]
    async fn test_deliver_preserves_order_per_connection() {
        let mut outboxes = Outboxes::default();
        let mut rx1 = outboxes.register(conn(1));
        let mut rx2 = outboxes.register(conn(2));

        outboxes.deliver(vec![
            Outbound::new(conn(1), ServerEvent::GameStart),
            Outbound::new(conn(2), ServerEvent::GameStart),
            Outbound::new(conn(1), ServerEvent::OpponentLeft { name: "Bob".into() }),
        ]);

        assert_eq!(rx1.recv().await, Some(ServerEvent::GameStart));
        assert_eq!(
            rx1.recv().await,
            Some(ServerEvent::OpponentLeft { name: "Bob".into() })
        );
        assert_eq!(rx2.recv().await, Some(ServerEvent::GameStart));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_unregistered_connection_is_dropped() {
        let mut outboxes = Outboxes::default();
        let mut rx = outboxes.register(conn(1));
        outboxes.unregister(conn(1));

        outboxes.send(conn(1), ServerEvent::GameStart);
        // The sender is gone, so the channel reports closed.
        assert_eq!(rx.recv().await, None);
    }
}
