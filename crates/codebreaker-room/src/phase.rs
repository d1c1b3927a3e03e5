//! The room lifecycle state machine.

use std::fmt;

use codebreaker_protocol::SeatIndex;

/// The lifecycle phase of a room.
///
/// Transitions are strictly ordered, no skipping:
///
/// ```text
/// WaitingForOpponent ──join──→ AwaitingSecrets ──2nd secret──→ InProgress{turn: 0}
///                                                                   │   ↑
///                                                        non-winning │   │ guess
///                                                                   ↓   │
///                                                              InProgress{turn: 1}
///                                                                   │
///                                                     exact match   ↓
///                                                          Finished{winner}
/// ```
///
/// - **WaitingForOpponent**: only the creator is seated. The creator may
///   already commit a secret.
/// - **AwaitingSecrets**: both seats occupied, at least one secret missing.
/// - **InProgress**: both secrets committed; `turn` is the seat allowed to
///   guess next. Seat 0 always moves first.
/// - **Finished**: `winner` guessed the opponent's secret. The room stays
///   here until one of the occupants disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForOpponent,
    AwaitingSecrets,
    InProgress { turn: SeatIndex },
    Finished { winner: SeatIndex },
}

impl Phase {
    /// Returns `true` if a second player may still join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForOpponent)
    }

    /// Returns `true` if secrets may still be committed.
    pub fn accepts_secrets(&self) -> bool {
        matches!(self, Self::WaitingForOpponent | Self::AwaitingSecrets)
    }

    /// The seat on turn, if guessing has started and not ended.
    pub fn turn(&self) -> Option<SeatIndex> {
        match self {
            Self::InProgress { turn } => Some(*turn),
            _ => None,
        }
    }

    /// The winning seat, once the game is over.
    pub fn winner(&self) -> Option<SeatIndex> {
        match self {
            Self::Finished { winner } => Some(*winner),
            _ => None,
        }
    }

    /// Returns `true` if moving from `self` to `target` is a legal edge.
    ///
    /// Besides stepping forward one phase, `InProgress` may flip its turn
    /// to the other seat, and may only finish with the seat on turn as
    /// winner.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::WaitingForOpponent, Self::AwaitingSecrets) => true,
            (Self::AwaitingSecrets, Self::InProgress { turn }) => {
                turn == SeatIndex::Creator
            }
            (Self::InProgress { turn }, Self::InProgress { turn: next }) => {
                next == turn.opponent()
            }
            (Self::InProgress { turn }, Self::Finished { winner }) => {
                winner == turn
            }
            _ => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForOpponent => write!(f, "WaitingForOpponent"),
            Self::AwaitingSecrets => write!(f, "AwaitingSecrets"),
            Self::InProgress { turn } => write!(f, "InProgress(turn={turn})"),
            Self::Finished { winner } => write!(f, "Finished(winner={winner})"),
        }
    }
}
