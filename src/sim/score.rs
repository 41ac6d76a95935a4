//! Scoring
//!
//! Points = base(tier) × multiplier, then the probabilistic double-order
//! modifier last; the order is fixed. Modifier evaluation is fail-soft: an
//! invalid multiplier falls back to the unmodified base points and the tick
//! loop never sees an error.

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::sim::effects::{
    AbilityKind, COIN_BONUS_MULTIPLIER, DOUBLE_ORDER_CHANCE, TimedEffect,
};
use crate::sim::state::GameState;
use crate::words::Tier;

/// Modifier evaluation failure; scoring falls back to the base value
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    InvalidMultiplier(f32),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::InvalidMultiplier(m) => write!(f, "score multiplier {m} is invalid"),
        }
    }
}

/// Points and coin bonus for one served order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub points: u64,
    pub coin_bonus: u64,
}

/// Base point value per tier
pub fn base_score(tier: Tier) -> u64 {
    match tier {
        Tier::Easy => 10,
        Tier::Medium => 20,
        Tier::Hard => 30,
        Tier::Special => 100,
    }
}

fn apply_multiplier(base: u64, multiplier: f32) -> Result<u64, ScoreError> {
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(ScoreError::InvalidMultiplier(multiplier));
    }
    Ok((base as f32 * multiplier) as u64)
}

/// Score one served order. Reads modifiers, never mutates state; the caller
/// applies the outcome to score and coins.
pub fn score_word(state: &GameState, rng: &mut Pcg32, tier: Tier) -> ScoreOutcome {
    let base = base_score(tier);
    let mut points = match apply_multiplier(base, state.score_multiplier) {
        Ok(points) => points,
        Err(err) => {
            log::warn!("scoring modifier rejected, using base value: {err}");
            base
        }
    };

    // Double-order fires independently per scoring event, after the multiplier
    if state.ability_active(AbilityKind::DoubleOrder) && rng.random_bool(DOUBLE_ORDER_CHANCE) {
        points *= 2;
    }

    let coin_bonus = if state.timed.is_active(TimedEffect::CoinBonus) {
        (points as f32 * COIN_BONUS_MULTIPLIER).floor() as u64
    } else {
        0
    };

    ScoreOutcome { points, coin_bonus }
}
