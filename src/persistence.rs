//! Save data
//!
//! A snapshot carries progression only: coins, day, abilities, unlocked
//! words, inventory, and the headline run fields. Live orders, timed
//! windows, and shop offers are transient and never serialized; restoring
//! mid-level puts the player at the start of that level.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HEALTH;
use crate::sim::effects::AbilityKind;
use crate::sim::state::{GameState, InventoryItem};
use crate::words::UnlockedWords;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Save failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    UnsupportedVersion(u32),
    Decode(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::UnsupportedVersion(version) => {
                write!(f, "unsupported save version {version}")
            }
            SnapshotError::Decode(msg) => write!(f, "save data unreadable: {msg}"),
        }
    }
}

/// Serializable progression state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub health: i32,
    pub level: u32,
    pub score: u64,
    pub coins: u64,
    pub day: u32,
    pub abilities: Vec<AbilityKind>,
    pub unlocked_words: UnlockedWords,
    pub inventory: Vec<InventoryItem>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            health: state.health,
            level: state.level,
            score: state.score,
            coins: state.coins,
            day: state.day,
            abilities: AbilityKind::ALL
                .iter()
                .copied()
                .filter(|&kind| state.ability_purchased(kind))
                .collect(),
            unlocked_words: state.unlocked_words.clone(),
            inventory: state.inventory.clone(),
        }
    }

    /// Restore progression onto a fresh state. Transient fields (enemies,
    /// timed windows, offers) stay empty; out-of-range values are clamped.
    pub fn apply(&self, state: &mut GameState) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        state.health = self.health.clamp(1, MAX_HEALTH);
        state.level = self.level.max(1);
        state.score = self.score;
        state.coins = self.coins;
        state.day = self.day.max(1);
        for &kind in &self.abilities {
            state.mark_ability_purchased(kind);
        }
        state.unlocked_words = self.unlocked_words.clone();
        state.inventory = self.inventory.clone();
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|err| SnapshotError::Decode(err.to_string()))
    }

    pub fn from_json(data: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(data).map_err(|err| SnapshotError::Decode(err.to_string()))
    }
}
