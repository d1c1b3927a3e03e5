//! The session dispatcher: routes one inbound event to the room layer.
//!
//! Each handler checks its preconditions first and returns a
//! [`SessionError`] naming the one that failed, before anything is
//! mutated. Whether that error is dropped silently or reported back is the
//! server's decision, not ours.

use codebreaker_protocol::{ClientEvent, Digits, RoomCode, SeatIndex, ServerEvent};
use codebreaker_room::{Phase, Room, RoomError, RoomRegistry, SecretOutcome};
use codebreaker_transport::ConnectionId;

use crate::{Binding, SessionError, SessionManager};

/// An event addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(to: ConnectionId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}

/// Owns all sessions and rooms, and applies events to them.
///
/// Every method runs to completion synchronously. Callers that share a
/// dispatcher between tasks must hold one lock across each call, which is
/// exactly what the server does.
pub struct Dispatcher {
    pub(crate) sessions: SessionManager,
    pub(crate) rooms: RoomRegistry,
}

impl Dispatcher {
    /// Creates a dispatcher with no sessions, using `rooms` as registry.
    pub fn new(rooms: RoomRegistry) -> Self {
        Self {
            sessions: SessionManager::new(),
            rooms,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Opens a session for a newly accepted connection.
    pub fn connect(&mut self, conn: ConnectionId) -> Result<(), SessionError> {
        self.sessions.create(conn).map(|_| ())
    }

    /// Applies one inbound event from `conn`.
    ///
    /// On success, returns the events to deliver, in order. On failure,
    /// nothing has changed.
    pub fn handle(
        &mut self,
        conn: ConnectionId,
        event: ClientEvent,
    ) -> Result<Vec<Outbound>, SessionError> {
        match event {
            ClientEvent::SetName { name } => self.set_name(conn, name),
            ClientEvent::CreateRoom => self.create_room(conn),
            ClientEvent::JoinRoom { room_code } => self.join_room(conn, &room_code),
            ClientEvent::SetSecret { secret } => self.set_secret(conn, secret),
            ClientEvent::Guess { guess } => self.guess(conn, guess),
        }
    }

    /// Records a display name. If the connection is already seated and the
    /// name is not blank, the seat's name follows, so later `turn` and
    /// `game_over` events use it.
    pub fn set_name(
        &mut self,
        conn: ConnectionId,
        name: String,
    ) -> Result<Vec<Outbound>, SessionError> {
        let session = self.sessions.get_mut(conn)?;
        if let Some(Binding { code, seat }) = session.binding {
            if !name.trim().is_empty() {
                if let Some(room) = self.rooms.get_room_mut(code) {
                    room.rename(seat, name.clone())?;
                }
            }
        }
        tracing::debug!(%conn, %name, "name declared");
        session.name = Some(name);
        Ok(Vec::new())
    }

    /// Opens a room with the caller in seat 0.
    pub fn create_room(&mut self, conn: ConnectionId) -> Result<Vec<Outbound>, SessionError> {
        let session = self.sessions.get_mut(conn)?;
        let name = unseated_name(session.declared_name(), session.binding)?;

        let code = self.rooms.create_room(conn, name)?;
        session.binding = Some(Binding {
            code,
            seat: SeatIndex::Creator,
        });

        Ok(vec![Outbound::new(conn, ServerEvent::RoomCreated { room_code: code })])
    }

    /// Seats the caller in seat 1 of the room with `raw_code`, then tells
    /// both seats the game is on.
    pub fn join_room(
        &mut self,
        conn: ConnectionId,
        raw_code: &str,
    ) -> Result<Vec<Outbound>, SessionError> {
        let session = self.sessions.get_mut(conn)?;
        let name = unseated_name(session.declared_name(), session.binding)?;
        let code = RoomCode::parse(raw_code)
            .ok_or_else(|| SessionError::UnknownRoomCode(raw_code.to_owned()))?;

        let seat = self.rooms.join_room(code, conn, name)?;
        session.binding = Some(Binding { code, seat });

        let room = self.rooms.get_room(code).ok_or(RoomError::NotFound(code))?;
        Ok(broadcast(room, &ServerEvent::GameStart))
    }

    /// Commits the caller's secret. When it is the second one, both seats
    /// get their first `turn` event.
    pub fn set_secret(
        &mut self,
        conn: ConnectionId,
        raw: String,
    ) -> Result<Vec<Outbound>, SessionError> {
        let secret = Digits::parse(&raw).ok_or(SessionError::InvalidSecretFormat(raw))?;
        let Binding { code, seat } = self.binding_of(conn)?;
        let room = self
            .rooms
            .get_room_mut(code)
            .ok_or(RoomError::NotFound(code))?;

        match room.commit_secret(seat, secret)? {
            SecretOutcome::Waiting => Ok(Vec::new()),
            SecretOutcome::Started { .. } => Ok(turn_notices(room)),
        }
    }

    /// Scores the caller's guess. The guesser gets `feedback`; then either
    /// both seats get `game_over`, or both get the next `turn`.
    pub fn guess(
        &mut self,
        conn: ConnectionId,
        raw: String,
    ) -> Result<Vec<Outbound>, SessionError> {
        let guess = Digits::parse(&raw).ok_or(SessionError::InvalidGuessFormat(raw))?;
        let Binding { code, seat } = self.binding_of(conn)?;
        let room = self
            .rooms
            .get_room_mut(code)
            .ok_or(RoomError::NotFound(code))?;

        let outcome = room.guess(seat, guess)?;
        tracing::debug!(
            %code,
            %seat,
            digits = outcome.result.digits_count,
            positions = outcome.result.positions_count,
            "guess scored"
        );

        let mut out = vec![Outbound::new(
            conn,
            ServerEvent::Feedback {
                guess: outcome.result.guess,
                digits_count: outcome.result.digits_count,
                positions_count: outcome.result.positions_count,
                history: outcome.history,
            },
        )];

        match outcome.phase {
            Phase::Finished { winner } => {
                let game_over = ServerEvent::GameOver {
                    winner_seat: winner,
                    winner_name: room.name_of(winner).to_owned(),
                };
                out.extend(broadcast(room, &game_over));
            }
            _ => out.extend(turn_notices(room)),
        }
        Ok(out)
    }

    fn binding_of(&self, conn: ConnectionId) -> Result<Binding, SessionError> {
        self.sessions
            .get(conn)
            .ok_or(SessionError::UnknownConnection(conn))?
            .binding
            .ok_or(SessionError::NotInRoom)
    }
}

/// The name to seat a player under, if they may take a seat at all.
fn unseated_name(
    name: Option<&str>,
    binding: Option<Binding>,
) -> Result<String, SessionError> {
    let name = name.ok_or(SessionError::NameRequired)?;
    if let Some(b) = binding {
        return Err(SessionError::AlreadyInRoom(b.code));
    }
    Ok(name.to_owned())
}

/// The same event for every occupant.
pub(crate) fn broadcast(room: &Room, event: &ServerEvent) -> Vec<Outbound> {
    room.occupants()
        .map(|(_, seat)| Outbound::new(seat.connection(), event.clone()))
        .collect()
}

/// One `turn` event per occupant, each with its own `yourTurn`.
fn turn_notices(room: &Room) -> Vec<Outbound> {
    let Some(turn) = room.phase().turn() else {
        return Vec::new();
    };
    let active_name = room.name_of(turn);
    room.occupants()
        .map(|(idx, seat)| {
            Outbound::new(
                seat.connection(),
                ServerEvent::Turn {
                    your_turn: idx == turn,
                    active_name: active_name.to_owned(),
                    player: turn,
                },
            )
        })
        .collect()
}
