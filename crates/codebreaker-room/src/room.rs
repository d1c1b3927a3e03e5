//! A single two-seat room.
//!
//! The room owns both seats, their secrets and guess histories, and the
//! [`Phase`]. Every rule about *when* something is allowed lives here; the
//! dispatcher above only translates connections into seats and results
//! into outbound events.

use codebreaker_protocol::{Digits, GuessResult, RoomCode, SeatIndex};
use codebreaker_transport::ConnectionId;

use crate::{score, Phase, RoomError};

/// One occupied seat.
#[derive(Debug, Clone)]
pub struct Seat {
    connection: ConnectionId,
    name: String,
    /// Write-once.
    secret: Option<Digits>,
    /// Append-only, in guess order.
    history: Vec<GuessResult>,
}

impl Seat {
    fn new(connection: ConnectionId, name: String) -> Self {
        Self {
            connection,
            name,
            secret: None,
            history: Vec::new(),
        }
    }

    /// The connection that occupies this seat.
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// The occupant's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this seat has committed its secret.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// This seat's scored guesses, oldest first.
    pub fn history(&self) -> &[GuessResult] {
        &self.history
    }
}

/// What committing a secret led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretOutcome {
    /// The other secret is still missing.
    Waiting,
    /// Both secrets are in; guessing starts with `turn`.
    Started { turn: SeatIndex },
}

/// The result of a scored guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    /// The entry just appended to the guesser's history.
    pub result: GuessResult,
    /// The guesser's full history, including `result`.
    pub history: Vec<GuessResult>,
    /// The phase after the guess: the next turn, or finished.
    pub phase: Phase,
}

/// A paired game session identified by a short code.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    seats: [Option<Seat>; 2],
    phase: Phase,
}

impl Room {
    /// Opens a room with `owner` in seat 0.
    pub fn new(code: RoomCode, owner: ConnectionId, name: String) -> Self {
        Self {
            code,
            seats: [Some(Seat::new(owner, name)), None],
            phase: Phase::WaitingForOpponent,
        }
    }

    pub fn code(&self) -> RoomCode {
        self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The occupant of `seat`, if any.
    pub fn seat(&self, seat: SeatIndex) -> Option<&Seat> {
        self.seats[seat.index()].as_ref()
    }

    /// Occupied seats in index order.
    pub fn occupants(&self) -> impl Iterator<Item = (SeatIndex, &Seat)> {
        SeatIndex::BOTH
            .into_iter()
            .filter_map(|idx| self.seat(idx).map(|seat| (idx, seat)))
    }

    /// Which seat `conn` occupies, if any.
    pub fn seat_of(&self, conn: ConnectionId) -> Option<SeatIndex> {
        self.occupants()
            .find(|(_, seat)| seat.connection == conn)
            .map(|(idx, _)| idx)
    }

    /// The display name in `seat`, or `""` if the seat is empty.
    pub fn name_of(&self, seat: SeatIndex) -> &str {
        self.seat(seat).map(Seat::name).unwrap_or_default()
    }

    /// Returns `true` once both seats are occupied.
    pub fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    /// Seats `conn` as the joiner.
    ///
    /// # Errors
    /// [`RoomError::RoomFull`] if seat 1 is already taken. The existing
    /// seats are left untouched.
    pub fn join(
        &mut self,
        conn: ConnectionId,
        name: String,
    ) -> Result<SeatIndex, RoomError> {
        if !self.phase.is_joinable() || self.is_full() {
            return Err(RoomError::RoomFull(self.code));
        }

        let seat = SeatIndex::Joiner;
        self.seats[seat.index()] = Some(Seat::new(conn, name));
        self.transition(Phase::AwaitingSecrets);
        tracing::info!(code = %self.code, %conn, "player joined room");
        Ok(seat)
    }

    /// Updates the display name shown for `seat`.
    pub fn rename(&mut self, seat: SeatIndex, name: String) -> Result<(), RoomError> {
        let occupant = self.seats[seat.index()]
            .as_mut()
            .ok_or(RoomError::SeatEmpty(seat))?;
        occupant.name = name;
        Ok(())
    }

    /// Commits `secret` for `seat`.
    ///
    /// Allowed from `WaitingForOpponent` on, so the creator can commit
    /// before anyone joins. When this is the second secret, the room moves
    /// to `InProgress` with seat 0 on turn.
    ///
    /// # Errors
    /// - [`RoomError::SecretAlreadySet`] once play has started, or if the
    ///   seat already committed
    /// - [`RoomError::SeatEmpty`] if nobody sits in `seat`
    pub fn commit_secret(
        &mut self,
        seat: SeatIndex,
        secret: Digits,
    ) -> Result<SecretOutcome, RoomError> {
        if !self.phase.accepts_secrets() {
            return Err(RoomError::SecretAlreadySet(seat));
        }
        let occupant = self.seats[seat.index()]
            .as_mut()
            .ok_or(RoomError::SeatEmpty(seat))?;
        if occupant.secret.is_some() {
            return Err(RoomError::SecretAlreadySet(seat));
        }
        occupant.secret = Some(secret);
        tracing::debug!(code = %self.code, %seat, "secret committed");

        let both_set = self
            .seats
            .iter()
            .all(|s| s.as_ref().is_some_and(Seat::has_secret));
        if !both_set {
            return Ok(SecretOutcome::Waiting);
        }

        let turn = SeatIndex::Creator;
        self.transition(Phase::InProgress { turn });
        tracing::info!(code = %self.code, "game started");
        Ok(SecretOutcome::Started { turn })
    }

    /// Scores `guess` from `seat` against the opponent's secret.
    ///
    /// On an exact match the room finishes with `seat` as winner and the
    /// turn stays put; otherwise the turn passes to the opponent.
    ///
    /// # Errors
    /// - [`RoomError::GameNotInProgress`] outside `InProgress`
    /// - [`RoomError::WrongTurn`] if `seat` is not on turn
    ///
    /// A rejected guess changes nothing.
    pub fn guess(
        &mut self,
        seat: SeatIndex,
        guess: Digits,
    ) -> Result<GuessOutcome, RoomError> {
        let Phase::InProgress { turn } = self.phase else {
            return Err(RoomError::GameNotInProgress(self.phase));
        };
        if seat != turn {
            return Err(RoomError::WrongTurn(seat));
        }

        let target = self
            .seat(seat.opponent())
            .and_then(|s| s.secret)
            .ok_or(RoomError::GameNotInProgress(self.phase))?;
        let feedback = score(&target, &guess);
        let result = GuessResult {
            guess,
            digits_count: feedback.digits_count,
            positions_count: feedback.positions_count,
        };

        let guesser = self.seats[seat.index()]
            .as_mut()
            .ok_or(RoomError::SeatEmpty(seat))?;
        guesser.history.push(result);
        let history = guesser.history.clone();

        if feedback.is_win() {
            self.transition(Phase::Finished { winner: seat });
            tracing::info!(
                code = %self.code,
                %seat,
                guesses = history.len(),
                "game finished"
            );
        } else {
            self.transition(Phase::InProgress {
                turn: seat.opponent(),
            });
        }

        Ok(GuessOutcome {
            result,
            history,
            phase: self.phase,
        })
    }

    fn transition(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal transition {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
    }
}
