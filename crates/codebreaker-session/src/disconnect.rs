//! Disconnect handling.
//!
//! A closed connection takes its room with it. The remaining player, if
//! any, is unseated and told who left. They keep their session and name,
//! so they can create or join another room on the same connection.

use codebreaker_protocol::ServerEvent;
use codebreaker_transport::ConnectionId;

use crate::{Binding, Dispatcher, Outbound};

impl Dispatcher {
    /// Closes `conn`'s session and tears down the room it sat in.
    ///
    /// Returns at most one event: `opponent_left` for the other occupant.
    /// Calling this for an unknown or unseated connection only drops the
    /// session, so it is safe to call more than once.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        let Some(session) = self.sessions.remove(conn) else {
            return Vec::new();
        };
        let Some(Binding { code, seat }) = session.binding else {
            tracing::debug!(%conn, "unseated connection closed");
            return Vec::new();
        };
        let Some(room) = self.rooms.remove_room(code) else {
            return Vec::new();
        };

        let leaver = room.name_of(seat).to_owned();
        tracing::info!(%code, %conn, %seat, phase = %room.phase(), "room closed by disconnect");

        let Some(other) = room.seat(seat.opponent()) else {
            return Vec::new();
        };
        let other = other.connection();
        self.sessions.unbind(other, code);

        vec![Outbound::new(other, ServerEvent::OpponentLeft { name: leaver })]
    }
}
