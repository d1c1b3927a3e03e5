//! Registry configuration.

/// Configuration for a [`RoomRegistry`](crate::RoomRegistry).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How many codes to draw from the code source before falling back to
    /// scanning for a free code. With few rooms active the first draw
    /// nearly always succeeds.
    pub max_code_attempts: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_code_attempts: 32,
        }
    }
}
