//! Kana Rush - arcade typing game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemies, scoring, shop economy, game state)
//! - `engine`: Event-driven facade consumed by the host (input, confirm, tick, view)
//! - `words`: Vocabulary catalog by difficulty tier
//! - `persistence`: Flat snapshot save/load
//!
//! The crate renders nothing and owns no timers; the host drives it with a
//! per-frame `tick(now_ms)` and raw input events, and reads back a view plus
//! drained game events after every call.

pub mod engine;
pub mod persistence;
pub mod sim;
pub mod words;

pub use engine::{Engine, GameStateView};
pub use persistence::Snapshot;
pub use sim::state::{GameEvent, GamePhase, GameState};
pub use words::{Tier, Word};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (abstract units; the renderer maps them to pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Vertical margin so an enemy never spawns clipped at the bottom edge
    pub const ENEMY_LANE_MARGIN: f32 = 50.0;
    /// Enemies wrap back to the right edge once they pass this x
    pub const DESPAWN_X: f32 = -100.0;

    /// Health bounds
    pub const MAX_HEALTH: i32 = 100;
    /// Health lost when an order times out
    pub const TIMEOUT_DAMAGE: i32 = 3;
    /// Health lost when a trouble customer times out
    pub const TROUBLE_TIMEOUT_DAMAGE: i32 = 6;

    /// Quiet period after the last keystroke before input is resolved
    pub const INPUT_DEBOUNCE_MS: u64 = 500;
    /// Settle delay between leaving the shop and gameplay resuming
    pub const PREPARE_DELAY_MS: u64 = 2000;

    /// Lunch rush difficulty factors
    pub const LUNCH_SPEED_FACTOR: f32 = 1.3;
    pub const LUNCH_TIME_FACTOR: f32 = 0.7;
    /// Extra concurrent enemies during lunch
    pub const LUNCH_EXTRA_ENEMIES: usize = 2;

    /// Default trouble-customer spawn probability
    pub const TROUBLE_CUSTOMER_CHANCE: f64 = 0.1;
}
