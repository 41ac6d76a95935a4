//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven by caller-supplied timestamps only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod effects;
pub mod input;
pub mod score;
pub mod shop;
pub mod spawn;
pub mod state;
pub mod tick;

pub use effects::{AbilityKind, EffectError, ItemKind, Rarity, TimedEffect};
pub use shop::{LeaveShop, Offer, TransactionError, level_goal, rarity_ceiling};
pub use state::{Enemy, GameEvent, GamePhase, GameState};
pub use tick::tick;
