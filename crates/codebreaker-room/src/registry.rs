//! Room registry: the table of active rooms, keyed by code.

use std::collections::HashMap;

use codebreaker_protocol::{RoomCode, SeatIndex};
use codebreaker_transport::ConnectionId;

use crate::{CodeSource, RandomCodes, RegistryConfig, Room, RoomError};

/// Owns every active room.
///
/// A code is unique among active rooms; once a room is removed its code
/// goes back into the pool.
///
/// Like the rest of this crate, the registry is a plain single-owner
/// structure. The server keeps it behind a lock.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    codes: Box<dyn CodeSource>,
    config: RegistryConfig,
}

impl RoomRegistry {
    /// Creates an empty registry that draws random codes.
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_code_source(config, RandomCodes)
    }

    /// Creates an empty registry that draws codes from `source`.
    pub fn with_code_source(
        config: RegistryConfig,
        source: impl CodeSource + 'static,
    ) -> Self {
        Self {
            rooms: HashMap::new(),
            codes: Box::new(source),
            config,
        }
    }

    /// Opens a new room with `owner` in seat 0 and returns its code.
    ///
    /// # Errors
    /// [`RoomError::CapacityExhausted`] if every code is in use.
    pub fn create_room(
        &mut self,
        owner: ConnectionId,
        name: String,
    ) -> Result<RoomCode, RoomError> {
        let code = self.allocate_code()?;
        self.rooms.insert(code, Room::new(code, owner, name));
        tracing::info!(%code, %owner, rooms = self.rooms.len(), "room created");
        Ok(code)
    }

    /// Seats `joiner` in seat 1 of the room with `code`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] if no active room has this code
    /// - [`RoomError::RoomFull`] if both seats are taken
    pub fn join_room(
        &mut self,
        code: RoomCode,
        joiner: ConnectionId,
        name: String,
    ) -> Result<SeatIndex, RoomError> {
        self.rooms
            .get_mut(&code)
            .ok_or(RoomError::NotFound(code))?
            .join(joiner, name)
    }

    pub fn get_room(&self, code: RoomCode) -> Option<&Room> {
        self.rooms.get(&code)
    }

    pub fn get_room_mut(&mut self, code: RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(&code)
    }

    /// Removes the room with `code`, returning it if it was still active.
    /// Removing an absent room is a no-op.
    pub fn remove_room(&mut self, code: RoomCode) -> Option<Room> {
        let removed = self.rooms.remove(&code);
        if removed.is_some() {
            tracing::info!(%code, rooms = self.rooms.len(), "room destroyed");
        }
        removed
    }

    pub fn contains(&self, code: RoomCode) -> bool {
        self.rooms.contains_key(&code)
    }

    /// Returns the number of active rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Draws from the code source a bounded number of times, then falls
    /// back to the lowest free code. Never loops past the code space.
    fn allocate_code(&mut self) -> Result<RoomCode, RoomError> {
        if self.rooms.len() >= RoomCode::CAPACITY {
            tracing::warn!("room code space exhausted");
            return Err(RoomError::CapacityExhausted);
        }

        for attempt in 0..self.config.max_code_attempts {
            let code = self.codes.next_code();
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
            tracing::trace!(%code, attempt, "room code collision");
        }

        tracing::debug!(
            attempts = self.config.max_code_attempts,
            "code source kept colliding, scanning for a free code"
        );
        RoomCode::all()
            .find(|code| !self.rooms.contains_key(code))
            .ok_or(RoomError::CapacityExhausted)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
