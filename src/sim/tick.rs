//! Per-frame simulation step
//!
//! One call advances the clock, sweeps expired timed windows, moves every
//! live order, settles timeouts, and tops the counter back up. Shopping and
//! game-over phases are frozen; the preparing phase resumes gameplay once its
//! settle deadline passes.

use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::clock;
use crate::sim::effects::TimedEffect;
use crate::sim::score;
use crate::sim::shop::level_goal;
use crate::sim::spawn;
use crate::sim::state::{GameEvent, GamePhase, GameState};

/// Advance the simulation by one step at `now_ms`.
pub fn tick(state: &mut GameState, rng: &mut Pcg32, now_ms: u64, events: &mut Vec<GameEvent>) {
    match state.phase {
        GamePhase::Shopping | GamePhase::GameOver => return,
        GamePhase::Preparing => {
            if now_ms < state.prepare_until_ms {
                return;
            }
            state.prepare_until_ms = 0;
            state.phase = GamePhase::Playing;
        }
        GamePhase::Playing => {}
    }

    let reading = clock::advance(state.hour);
    state.hour = reading.hour;
    state.is_lunch_time = reading.is_lunch_time;

    for effect in state.timed.expire_due(now_ms) {
        log::debug!("timed window expired: {effect:?}");
    }

    if state.timed.is_active(TimedEffect::AutoDestroyer) {
        auto_destroy(state, rng, events);
    }

    settle_orders(state, rng, now_ms, events);

    // Level 1 never leaves the counter empty
    if state.level == 1 && state.enemies.is_empty() {
        spawn::spawn_enemy(state, rng, now_ms);
    }
    let floor = spawn::max_enemies(state.level, state.is_lunch_time);
    while state.enemies.len() < floor {
        spawn::spawn_enemy(state, rng, now_ms);
    }

    if !state.goal_announced
        && let Some(goal) = level_goal(state.level)
        && state.score >= goal
    {
        state.goal_announced = true;
        events.push(GameEvent::LevelGoalReached { level: state.level });
    }

    if state.health <= 0 {
        events.push(GameEvent::GameOver {
            level: state.level,
            score: state.score,
        });
        state.reset_run();
    }
}

/// Serve every live order for free while the auto destroyer window is open
fn auto_destroy(state: &mut GameState, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    while let Some(enemy) = state.enemies.pop() {
        let outcome = score::score_word(state, rng, enemy.tier);
        state.score += outcome.points;
        state.coins += outcome.coin_bonus;
        events.push(GameEvent::OrderServed {
            served: 1,
            points: outcome.points,
            coin_bonus: outcome.coin_bonus,
        });
    }
}

/// Move orders left, settle timeouts, and wrap walk-offs back to the right
fn settle_orders(state: &mut GameState, rng: &mut Pcg32, now_ms: u64, events: &mut Vec<GameEvent>) {
    let invincible = state.timed.is_active(TimedEffect::Invincible);
    let lunch_master = state.ability_active(crate::sim::effects::AbilityKind::LunchMaster);
    let mut expired = Vec::new();

    let mut index = 0;
    while index < state.enemies.len() {
        let enemy = &mut state.enemies[index];
        enemy.pos.x -= enemy.speed;

        if enemy.is_expired(now_ms) {
            expired.push(state.enemies.remove(index));
            continue;
        }

        if enemy.pos.x < DESPAWN_X {
            // Walked off screen; re-enter from the right with a fresh lane
            // and speed, keeping the original spawn time and word
            enemy.pos.x = FIELD_WIDTH;
            enemy.pos.y = spawn::roll_lane(rng);
            enemy.speed = spawn::roll_speed(state.level, state.is_lunch_time, lunch_master, rng);
        }
        index += 1;
    }

    for enemy in expired {
        let damage = if invincible {
            0
        } else if enemy.is_trouble_customer {
            TROUBLE_TIMEOUT_DAMAGE
        } else {
            TIMEOUT_DAMAGE
        };
        state.apply_damage(damage);
        events.push(GameEvent::OrderExpired {
            trouble: enemy.is_trouble_customer,
            damage,
        });
    }
}
