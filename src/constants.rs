//! Gameplay constants shared across subsystems
//!
//! Distances are in world pixels unless a name says otherwise. World space
//! uses a bottom-left origin with y growing upwards.

/// Size of one map tile in world pixels
pub const TILE_SIZE: f32 = 64.0;

/// Frames per second the movement formulas are tuned for (`speed * dt * 60`)
pub const REFERENCE_FPS: f32 = 60.0;

// Events
pub const EVENT_COOLDOWN_TICKS: u32 = 30; // ~0.5s at 60 FPS
pub const INTERACTION_RADIUS: f32 = TILE_SIZE * 1.5;
pub const CHEST_MARKER_RADIUS: f32 = TILE_SIZE * 3.0;

// Zones
pub const ZONE_SEARCH_RADIUS: f32 = TILE_SIZE * 8.0;

// Player progression
pub const STARTING_REQ_EXP: u32 = 500;
pub const REQ_EXP_GROWTH: f64 = 1.5;
pub const LEVEL_UP_HEALTH_BONUS: i32 = 12;
pub const LEVEL_UP_STRENGTH_BONUS: i32 = 1;
pub const KILL_EXP_REWARD: u32 = 10;

// Player body
pub const PLAYER_SIZE: f32 = 48.0;

// Creatures
pub const WANDER_MIN_SECS: f32 = 1.0;
pub const WANDER_MAX_SECS: f32 = 3.0;
pub const CONTACT_COOLDOWN_SECS: f32 = 1.0;

// Notifications
pub const NOTIFICATION_SECS: f32 = 4.0;
pub const MAX_NOTIFICATIONS: usize = 6;

// Cheat console
pub const CONSOLE_HISTORY_LEN: usize = 32;
pub const CONSOLE_TYPE_INTERVAL: f32 = 0.02;

// Overlays
pub const LOCK_PICK_CLOSE_DELAY: f32 = 1.0;
pub const MENU_KEY_COOLDOWN: f32 = 0.15;

// Screen layout for overlay draw commands
pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;
pub const INVENTORY_COLUMNS: usize = 6;
pub const INVENTORY_ROWS: usize = 5;
