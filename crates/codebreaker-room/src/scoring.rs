//! Guess scoring.

use codebreaker_protocol::{Digits, CODE_LEN};

/// Feedback for one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    /// Guess positions whose digit appears anywhere in the secret.
    pub digits_count: u8,
    /// Guess positions whose digit matches the secret at the same index.
    pub positions_count: u8,
}

impl Feedback {
    /// Only an exact match wins.
    pub fn is_win(&self) -> bool {
        usize::from(self.positions_count) == CODE_LEN
    }
}

/// Scores `guess` against `secret`.
///
/// `digits_count` is a presence count, not the usual bulls-and-cows
/// multiset intersection: each guess position counts if its digit occurs
/// anywhere in the secret, so a repeated guess digit is counted once per
/// repetition. Clients depend on this exact rule.
///
/// ```
/// use codebreaker_protocol::Digits;
/// use codebreaker_room::score;
///
/// let secret = Digits::parse("1123").unwrap();
/// let guess = Digits::parse("1111").unwrap();
/// let fb = score(&secret, &guess);
/// assert_eq!((fb.digits_count, fb.positions_count), (4, 2));
/// ```
pub fn score(secret: &Digits, guess: &Digits) -> Feedback {
    let secret = secret.as_bytes();
    let guess = guess.as_bytes();

    let mut digits_count = 0;
    let mut positions_count = 0;
    for (i, g) in guess.iter().enumerate() {
        if secret.contains(g) {
            digits_count += 1;
        }
        if secret[i] == *g {
            positions_count += 1;
        }
    }

    Feedback {
        digits_count,
        positions_count,
    }
}
