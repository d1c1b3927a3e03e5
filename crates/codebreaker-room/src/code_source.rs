//! Where new room codes come from.

use codebreaker_protocol::RoomCode;
use rand::Rng;

/// Produces candidate room codes for the registry.
///
/// The registry checks every candidate against the active rooms, so a
/// source may return duplicates freely. Any `FnMut() -> RoomCode` closure
/// is a source, which keeps tests deterministic:
///
/// ```
/// use codebreaker_protocol::RoomCode;
/// use codebreaker_room::{RegistryConfig, RoomRegistry};
///
/// let mut codes = [4821, 1234].into_iter().cycle();
/// let registry = RoomRegistry::with_code_source(RegistryConfig::default(), move || {
///     RoomCode::new(codes.next().unwrap_or(1000)).unwrap()
/// });
/// assert!(registry.is_empty());
/// ```
pub trait CodeSource: Send {
    /// Returns the next candidate code.
    fn next_code(&mut self) -> RoomCode;
}

impl<F> CodeSource for F
where
    F: FnMut() -> RoomCode + Send,
{
    fn next_code(&mut self) -> RoomCode {
        self()
    }
}

/// Uniformly random codes in `1000..=9999` from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&mut self) -> RoomCode {
        let offset = rand::rng().random_range(0..RoomCode::CAPACITY as u16);
        RoomCode::from_offset(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_codes_are_four_numeric_characters() {
        let mut source = RandomCodes;
        for _ in 0..1000 {
            let code = source.next_code().to_string();
            assert_eq!(code.len(), 4);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn test_closure_is_a_code_source() {
        let mut n = 0u16;
        let mut source = move || {
            n += 1;
            RoomCode::from_offset(n)
        };
        assert_eq!(source.next_code().value(), 1001);
        assert_eq!(source.next_code().value(), 1002);
    }
}
