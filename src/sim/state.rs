//! Game state and core simulation types
//!
//! One mutable aggregate owned by the engine; every component mutates it in
//! turn, never concurrently. Ability/item flags and timed windows live here
//! instead of in module-level singletons so resets can cancel everything.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::consts::MAX_HEALTH;
use crate::sim::effects::{AbilityKind, ItemKind, TimedEffects};
use crate::sim::shop::Offer;
use crate::words::{Tier, UnlockedWords, Word, WordBank};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay; the tick loop advances enemies and the clock
    Playing,
    /// Browsing shop offers; ticking is halted
    Shopping,
    /// Settle delay after leaving the shop, before gameplay resumes
    Preparing,
    /// Run finished (all level goals cleared); waiting for restart confirm
    GameOver,
}

/// A timed word-matching challenge
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub word: Word,
    pub tier: Tier,
    pub pos: Vec2,
    pub speed: f32,
    /// Always > 0
    pub time_limit_ms: u64,
    /// Set once at spawn; wraparound does not touch it
    pub spawn_time_ms: u64,
    pub is_trouble_customer: bool,
}

impl Enemy {
    pub fn time_left_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.spawn_time_ms);
        self.time_limit_ms.saturating_sub(elapsed)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawn_time_ms) > self.time_limit_ms
    }
}

/// Purchase/activation state of one ability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityRecord {
    pub kind: AbilityKind,
    pub active: bool,
    pub purchased: bool,
}

impl AbilityRecord {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            active: false,
            purchased: false,
        }
    }
}

/// A consumable in the player's inventory
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InventoryItem {
    pub kind: ItemKind,
    pub purchased_at_ms: u64,
}

/// Notifications drained by the host after each engine call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// One input resolution served this many orders
    OrderServed {
        served: u32,
        points: u64,
        coin_bonus: u64,
    },
    /// An order timed out; damage is 0 while invincibility is active
    OrderExpired { trouble: bool, damage: i32 },
    LevelGoalReached { level: u32 },
    ShopEntered { day: u32 },
    LevelAdvanced { level: u32 },
    /// All level goals cleared
    RunComplete { final_coins: u64 },
    /// Health hit zero; the state has already been reset for a fresh run
    GameOver { level: u32, score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub health: i32,
    pub level: u32,
    pub score: u64,
    pub coins: u64,
    pub day: u32,
    pub hour: f32,
    /// Derived from `hour` each tick; never set independently
    pub is_lunch_time: bool,
    pub score_multiplier: f32,
    /// Spawn order; order matters only as the tie-break for matching
    pub enemies: Vec<Enemy>,
    pub words: WordBank,
    pub unlocked_words: UnlockedWords,
    pub abilities: BTreeMap<AbilityKind, AbilityRecord>,
    pub inventory: Vec<InventoryItem>,
    pub timed: TimedEffects,
    pub offers: Vec<Offer>,
    pub rerolls_used: u32,
    /// Deadline for the Preparing settle delay
    pub prepare_until_ms: u64,
    /// Level-goal event already emitted for the current level
    pub goal_announced: bool,
    next_enemy_id: u32,
}

impl GameState {
    /// Opening time
    pub const START_HOUR: f32 = 9.0;

    pub fn new() -> Self {
        let abilities = AbilityKind::ALL
            .iter()
            .map(|&kind| (kind, AbilityRecord::new(kind)))
            .collect();
        Self {
            phase: GamePhase::Playing,
            health: MAX_HEALTH,
            level: 1,
            score: 0,
            coins: 0,
            day: 1,
            hour: Self::START_HOUR,
            is_lunch_time: false,
            score_multiplier: 1.0,
            enemies: Vec::new(),
            words: WordBank::standard(),
            unlocked_words: UnlockedWords::default(),
            abilities,
            inventory: Vec::new(),
            timed: TimedEffects::default(),
            offers: Vec::new(),
            rerolls_used: 0,
            prepare_until_ms: 0,
            goal_announced: false,
            next_enemy_id: 1,
        }
    }

    pub fn next_enemy_id(&mut self) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        id
    }

    /// Whether an ability's modifier should be consulted
    pub fn ability_active(&self, kind: AbilityKind) -> bool {
        self.abilities
            .get(&kind)
            .map(|record| record.active)
            .unwrap_or(false)
    }

    pub fn ability_purchased(&self, kind: AbilityKind) -> bool {
        self.abilities
            .get(&kind)
            .map(|record| record.purchased)
            .unwrap_or(false)
    }

    /// Mark an ability owned; activation is permanent once purchased
    pub fn mark_ability_purchased(&mut self, kind: AbilityKind) {
        let record = self
            .abilities
            .entry(kind)
            .or_insert_with(|| AbilityRecord::new(kind));
        record.purchased = true;
        record.active = true;
    }

    pub fn apply_damage(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
    }

    /// Reset for a fresh run after game over or run completion.
    ///
    /// Unlocked words, abilities, inventory, coins, and the day survive; only
    /// the run-scoped fields and all pending windows are cleared.
    pub fn reset_run(&mut self) {
        self.health = MAX_HEALTH;
        self.level = 1;
        self.score = 0;
        self.enemies.clear();
        self.offers.clear();
        self.rerolls_used = 0;
        self.timed.clear();
        self.goal_announced = false;
        self.prepare_until_ms = 0;
        self.phase = GamePhase::Playing;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
