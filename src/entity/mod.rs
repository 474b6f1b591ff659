//! Creature simulation
//!
//! - `direction`: cardinal movement and facing
//! - `animation`: directional walk-frame selection
//! - `appearance`: per-type sprite size table with a default fallback
//! - `creature`: the idle / chase / return state machine and combat
//! - `manager`: spawn, per-map registry and bulk update

pub mod animation;
pub mod appearance;
pub mod creature;
pub mod direction;
pub mod manager;

pub use animation::{determine_animation_state, AnimationState, DirectionalAnimator};
pub use appearance::{sprite_key, AnySprites, Appearance, AppearanceCatalog, SpriteDirectory, SpriteSource};
pub use creature::{BehaviorState, Contact, Creature, CreatureTick, UpdateEnv};
pub use direction::Direction;
pub use manager::{DebugShape, EntityManager, EntityUpdate, SpawnRequest};
