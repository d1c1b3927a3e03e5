//! Connection sessions and event dispatch for the codebreaker server.
//!
//! This crate is the glue between "a connection sent an event" and "a room
//! changed":
//!
//! 1. **Session tracking** — one [`Session`] per connection, holding the
//!    declared name and the seat it occupies ([`SessionManager`])
//! 2. **Dispatch** — [`Dispatcher::handle`] checks an event's preconditions,
//!    applies it to the room registry and returns the events to send
//! 3. **Disconnects** — [`Dispatcher::disconnect`] tears the room down and
//!    tells the remaining player
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)  ← owns connections, delivers Outbound events
//!     ↕
//! Session layer (this crate)  ← maps connections to seats, enforces order
//!     ↕
//! Room layer (below)  ← rooms, turns, scoring
//! ```
//!
//! The dispatcher never performs I/O. It returns a list of [`Outbound`]
//! events and leaves delivery to the caller.

mod disconnect;
mod dispatcher;
mod error;
mod manager;
mod session;

pub use dispatcher::{Dispatcher, Outbound};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Binding, Session};
