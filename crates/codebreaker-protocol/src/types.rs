//! Value types that appear inside wire events.
//!
//! Each of these is a newtype (or small enum) with a validating
//! constructor, so the rest of the server can hold a `Digits` and know it
//! is exactly four ASCII digits, or hold a `RoomCode` and know it is in
//! range. The serde representation is the plain JSON value clients expect
//! (a string for codes and digits, an integer for seats).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Number of characters in a room code, a secret and a guess.
pub const CODE_LEN: usize = 4;

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// The short numeric code that identifies an active room.
///
/// Codes are drawn from `1000..=9999`, so the decimal form is always
/// exactly four digits. On the wire it travels as a string: `"4821"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct RoomCode(u16);

impl RoomCode {
    /// Smallest code that can be issued.
    pub const MIN: u16 = 1000;
    /// Largest code that can be issued.
    pub const MAX: u16 = 9999;
    /// How many distinct codes exist.
    pub const CAPACITY: usize = (Self::MAX - Self::MIN + 1) as usize;

    /// Wraps `value` if it is inside the issuable range.
    pub fn new(value: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Maps any `offset` onto the issuable range, wrapping at
    /// [`CAPACITY`](Self::CAPACITY). `from_offset(0)` is `1000`.
    pub fn from_offset(offset: u16) -> Self {
        Self(Self::MIN + offset % Self::CAPACITY as u16)
    }

    /// Parses the four-character decimal form. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != CODE_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().and_then(Self::new)
    }

    /// Returns the numeric value.
    pub fn value(self) -> u16 {
        self.0
    }

    /// Iterates over every issuable code in ascending order.
    pub fn all() -> impl Iterator<Item = RoomCode> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| {
            ProtocolError::InvalidMessage(format!("invalid room code {s:?}"))
        })
    }
}

// ---------------------------------------------------------------------------
// SeatIndex
// ---------------------------------------------------------------------------

/// One of the two fixed positions in a room.
///
/// The creator always sits in seat 0 and moves first; the joiner sits in
/// seat 1. Serialized as the integer `0` or `1`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum SeatIndex {
    /// Seat 0, bound by `create_room`.
    Creator,
    /// Seat 1, bound by `join_room`.
    Joiner,
}

impl SeatIndex {
    /// Both seats, in index order.
    pub const BOTH: [SeatIndex; 2] = [SeatIndex::Creator, SeatIndex::Joiner];

    /// Returns 0 for the creator and 1 for the joiner.
    pub fn index(self) -> usize {
        match self {
            Self::Creator => 0,
            Self::Joiner => 1,
        }
    }

    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Self::Creator => Self::Joiner,
            Self::Joiner => Self::Creator,
        }
    }
}

impl fmt::Display for SeatIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl From<SeatIndex> for u8 {
    fn from(seat: SeatIndex) -> Self {
        match seat {
            SeatIndex::Creator => 0,
            SeatIndex::Joiner => 1,
        }
    }
}

impl TryFrom<u8> for SeatIndex {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Creator),
            1 => Ok(Self::Joiner),
            other => Err(ProtocolError::InvalidMessage(format!(
                "seat index must be 0 or 1, got {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Digits
// ---------------------------------------------------------------------------

/// Exactly four ASCII digit characters: a secret or a guess.
///
/// Leading zeros and repeated digits are allowed (`"0070"` is fine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Digits([u8; CODE_LEN]);

impl Digits {
    /// Accepts `s` only if it is four characters, each in `'0'..='9'`.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes: [u8; CODE_LEN] = s.as_bytes().try_into().ok()?;
        bytes.iter().all(u8::is_ascii_digit).then_some(Self(bytes))
    }

    /// The raw ASCII bytes.
    pub fn as_bytes(&self) -> &[u8; CODE_LEN] {
        &self.0
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl From<Digits> for String {
    fn from(digits: Digits) -> Self {
        digits.to_string()
    }
}

impl TryFrom<String> for Digits {
    type Error = ProtocolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| {
            ProtocolError::InvalidMessage(format!("expected four digits, got {s:?}"))
        })
    }
}

// ---------------------------------------------------------------------------
// GuessResult
// ---------------------------------------------------------------------------

/// One scored guess, as it appears in a seat's history.
///
/// ```json
/// { "guess": "1234", "digitsCount": 2, "positionsCount": 1 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResult {
    pub guess: Digits,
    pub digits_count: u8,
    pub positions_count: u8,
}
