//! Map-authored spatial triggers
//!
//! Events are a tagged union over [`EventKind`]: chests (optionally
//! locked behind a direction sequence), teleports, and generic triggers.
//! [`EventManager`] owns the events of the loaded map and is the only place
//! activations happen.

pub mod chest;
pub mod event;
pub mod manager;
pub mod teleport;

pub use chest::{ChestEvent, LockAttempt};
pub use event::{EventKind, EventOutcome, GameEvent};
pub use manager::{ChestMarker, EventManager};
pub use teleport::{TeleportEvent, TeleportRequest};
