//! Input resolution
//!
//! Matches a committed input string against live orders. Exact matching
//! compares against both the katakana and hiragana readings; the quick-hand
//! ability relaxes this to bidirectional substring containment. Ties break
//! toward the oldest order on screen.

use std::collections::BTreeSet;

use rand_pcg::Pcg32;

use crate::sim::effects::{AbilityKind, TimedEffect};
use crate::sim::score::{self, ScoreOutcome};
use crate::sim::spawn;
use crate::sim::state::GameState;
use crate::words::Word;

/// Everything one input resolution served and earned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub served: u32,
    pub points: u64,
    pub coin_bonus: u64,
}

impl ResolveOutcome {
    fn absorb(&mut self, outcome: ScoreOutcome) {
        self.served += 1;
        self.points += outcome.points;
        self.coin_bonus += outcome.coin_bonus;
    }
}

/// Whether input matches a word under the current matching mode
pub fn matches_word(input: &str, word: &Word, fuzzy: bool) -> bool {
    if input == word.kana || input == word.hira {
        return true;
    }
    if !fuzzy || input.is_empty() {
        return false;
    }
    word.kana.contains(input)
        || word.hira.contains(input)
        || input.contains(word.kana.as_str())
        || input.contains(word.hira.as_str())
}

/// Index of the first (oldest) live order the input matches
pub fn find_match(state: &GameState, input: &str, fuzzy: bool) -> Option<usize> {
    state
        .enemies
        .iter()
        .position(|enemy| matches_word(input, &enemy.word, fuzzy))
}

fn serve(state: &mut GameState, rng: &mut Pcg32, index: usize, outcome: &mut ResolveOutcome) {
    let enemy = state.enemies.remove(index);
    outcome.absorb(score::score_word(state, rng, enemy.tier));
}

/// Resolve one committed input string against the live orders.
///
/// Serves at most one order per call (plus the smart-register duplicate
/// sweep), and refills the screen immediately at level 1 so the player is
/// never staring at an empty counter.
pub fn resolve(
    state: &mut GameState,
    rng: &mut Pcg32,
    input: &str,
    now_ms: u64,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();

    if state.timed.is_active(TimedEffect::SuperFinger) {
        // Any committed input serves the front order
        if !state.enemies.is_empty() {
            serve(state, rng, 0, &mut outcome);
        }
    } else {
        let fuzzy = state.ability_active(AbilityKind::QuickHand);
        if let Some(index) = find_match(state, input, fuzzy) {
            serve(state, rng, index, &mut outcome);
        }
    }

    if outcome.served > 0 && state.ability_active(AbilityKind::SmartRegister) {
        let sweep = smart_register_sweep(state, rng, now_ms);
        outcome.served += sweep.served;
        outcome.points += sweep.points;
        outcome.coin_bonus += sweep.coin_bonus;
    }

    if state.level == 1 && state.enemies.is_empty() {
        spawn::spawn_enemy(state, rng, now_ms);
    }

    outcome
}

/// Serve every order whose word appears more than once on screen
pub fn smart_register_sweep(
    state: &mut GameState,
    rng: &mut Pcg32,
    _now_ms: u64,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();

    // Fix the repeated-word set up front; every member of a repeated group is
    // served, not just the extras beyond the first
    let mut repeated = BTreeSet::new();
    for enemy in &state.enemies {
        let count = state
            .enemies
            .iter()
            .filter(|other| other.word.kana == enemy.word.kana)
            .count();
        if count >= 2 {
            repeated.insert(enemy.word.kana.clone());
        }
    }

    while let Some(index) = state
        .enemies
        .iter()
        .position(|enemy| repeated.contains(enemy.word.kana.as_str()))
    {
        serve(state, rng, index, &mut outcome);
    }
    outcome
}
