//! Enemy generation
//!
//! Tier odds, speed, and time limits derive from the current level and the
//! lunch window; active ability and item modifiers scale the result. Every
//! random draw goes through the engine's seeded RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::effects::{
    AbilityKind, LUNCH_MASTER_SPEED_FACTOR, LUNCH_MASTER_TIME_FACTOR, TimedEffect,
};
use crate::sim::state::{Enemy, GameState};
use crate::words::{Tier, Word};

/// Special enemies crawl; the challenge is the long word, not the clock
const SPECIAL_ENEMY_SPEED: f32 = 0.3;
const SPECIAL_ENEMY_TIME_LIMIT_MS: u64 = 30_000;

/// Pick a difficulty tier from a uniform(0,1) roll
pub fn pick_tier(level: u32, roll: f32) -> Tier {
    match level {
        1 => Tier::Easy,
        2 => {
            if roll < 0.6 {
                Tier::Medium
            } else {
                Tier::Hard
            }
        }
        _ => {
            if roll < 0.4 {
                Tier::Easy
            } else if roll < 0.8 {
                Tier::Medium
            } else {
                Tier::Hard
            }
        }
    }
}

/// Sample a word uniformly from the base pool plus unlocks for a tier
pub fn sample_word(state: &GameState, rng: &mut Pcg32, tier: Tier) -> Word {
    let base = state.words.base(tier);
    let unlocked = state.unlocked_words.for_tier(tier);
    let total = base.len() + unlocked.len();
    debug_assert!(total > 0, "base catalog is never empty");
    let idx = rng.random_range(0..total);
    if idx < base.len() {
        base[idx].clone()
    } else {
        unlocked[idx - base.len()].clone()
    }
}

/// Roll movement speed for a level, with lunch and lunch-master scaling
pub fn roll_speed(level: u32, is_lunch: bool, lunch_master: bool, rng: &mut Pcg32) -> f32 {
    let mut speed = if level == 2 {
        rng.random_range(0.5..1.5)
    } else {
        rng.random_range(1.0..3.0)
    };
    if is_lunch {
        speed *= LUNCH_SPEED_FACTOR;
        if lunch_master {
            speed *= LUNCH_MASTER_SPEED_FACTOR;
        }
    }
    speed
}

/// Time limit for a level, with lunch and lunch-master scaling
pub fn time_limit_ms(level: u32, is_lunch: bool, lunch_master: bool) -> u64 {
    let base_secs = (20 - 5 * (level as i64 - 1)).max(10) as f32;
    let mut secs = base_secs;
    if is_lunch {
        secs *= LUNCH_TIME_FACTOR;
        if lunch_master {
            secs *= LUNCH_MASTER_TIME_FACTOR;
        }
    }
    (secs * 1000.0) as u64
}

/// Roll a vertical lane within the playfield
pub fn roll_lane(rng: &mut Pcg32) -> f32 {
    rng.random_range(0.0..FIELD_HEIGHT - ENEMY_LANE_MARGIN)
}

/// Concurrent-enemy floor the tick loop tops up to
pub fn max_enemies(level: u32, is_lunch: bool) -> usize {
    let base = 1 + (level / 2) as usize;
    if is_lunch {
        base + LUNCH_EXTRA_ENEMIES
    } else {
        base
    }
}

/// Spawn one enemy and append it to the live set
pub fn spawn_enemy(state: &mut GameState, rng: &mut Pcg32, now_ms: u64) {
    let roll: f32 = rng.random_range(0.0..1.0);
    let tier = pick_tier(state.level, roll);
    let word = sample_word(state, rng, tier);

    let is_lunch = state.is_lunch_time;
    let lunch_master = state.ability_active(AbilityKind::LunchMaster);
    let speed = roll_speed(state.level, is_lunch, lunch_master, rng);
    let time_limit = time_limit_ms(state.level, is_lunch, lunch_master);

    let trouble_chance = if state.timed.is_active(TimedEffect::TroubleBarrier) {
        0.0
    } else {
        TROUBLE_CUSTOMER_CHANCE
    };
    let is_trouble_customer = rng.random_bool(trouble_chance);

    let id = state.next_enemy_id();
    state.enemies.push(Enemy {
        id,
        word,
        tier,
        pos: Vec2::new(FIELD_WIDTH, roll_lane(rng)),
        speed,
        time_limit_ms: time_limit,
        spawn_time_ms: now_ms,
        is_trouble_customer,
    });
}

/// Spawn a slow, high-value special enemy (shop item effect)
pub fn spawn_special_enemy(state: &mut GameState, rng: &mut Pcg32, now_ms: u64) {
    let word = sample_word(state, rng, Tier::Special);
    let id = state.next_enemy_id();
    state.enemies.push(Enemy {
        id,
        word,
        tier: Tier::Special,
        pos: Vec2::new(FIELD_WIDTH, roll_lane(rng)),
        speed: SPECIAL_ENEMY_SPEED,
        time_limit_ms: SPECIAL_ENEMY_TIME_LIMIT_MS,
        spawn_time_ms: now_ms,
        is_trouble_customer: false,
    });
}
