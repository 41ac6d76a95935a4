//! Shop and economy
//!
//! Entering the shop folds the level score into the coin balance and advances
//! the day. Offers come from a weighted draw over the unpurchased abilities
//! and unowned items whose rarity the day allows; duplicate offers in one
//! batch are allowed. Purchases are atomic: a failed effect leaves the coin
//! balance and the offer row untouched.

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::PREPARE_DELAY_MS;
use crate::sim::effects::{self, AbilityKind, EffectError, ItemKind, Rarity};
use crate::sim::spawn;
use crate::sim::state::{GamePhase, GameState, InventoryItem};

/// Reroll budget per shop visit
pub const MAX_REROLLS: u32 = 3;
/// Offers per batch
pub const OFFER_COUNT: usize = 5;

/// Cumulative score required to clear a level. `None` past the last level.
pub fn level_goal(level: u32) -> Option<u64> {
    match level {
        1 => Some(100),
        2 => Some(300),
        3 => Some(600),
        4 => Some(1000),
        5 => Some(1500),
        _ => None,
    }
}

/// Highest rarity rank the shop stocks on a given day
pub fn rarity_ceiling(day: u32) -> u32 {
    (day / 3).min(3)
}

/// One purchasable row in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Ability(AbilityKind),
    Item(ItemKind),
}

impl Offer {
    pub fn cost(&self) -> u64 {
        match self {
            Offer::Ability(kind) => kind.cost(),
            Offer::Item(kind) => kind.cost(),
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            Offer::Ability(kind) => kind.rarity(),
            Offer::Item(kind) => kind.rarity(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Offer::Ability(kind) => kind.name(),
            Offer::Item(kind) => kind.name(),
        }
    }

    fn weight(&self) -> u32 {
        match self {
            Offer::Ability(_) => 1,
            Offer::Item(kind) => kind.category().weight(),
        }
    }
}

/// Purchase failure; the offer batch and coin balance are unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    InsufficientCoins { cost: u64, coins: u64 },
    OfferGone(usize),
    Effect(EffectError),
}

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionError::InsufficientCoins { cost, coins } => {
                write!(f, "offer costs {cost} but only {coins} coins held")
            }
            TransactionError::OfferGone(index) => write!(f, "no offer at index {index}"),
            TransactionError::Effect(err) => write!(f, "effect failed: {err}"),
        }
    }
}

impl From<EffectError> for TransactionError {
    fn from(err: EffectError) -> Self {
        TransactionError::Effect(err)
    }
}

/// Outcome of leaving the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveShop {
    Advanced(u32),
    RunComplete,
}

fn candidates(state: &GameState) -> Vec<Offer> {
    let ceiling = rarity_ceiling(state.day);
    let mut pool = Vec::new();
    for kind in AbilityKind::ALL {
        // Abilities are one-time purchases and ignore the rarity ceiling
        if !state.ability_purchased(kind) {
            pool.push(Offer::Ability(kind));
        }
    }
    for kind in ItemKind::ALL {
        let owned = state.inventory.iter().any(|item| item.kind == kind);
        if !owned && kind.rarity().rank() <= ceiling {
            pool.push(Offer::Item(kind));
        }
    }
    pool
}

fn draw_offer(pool: &[Offer], rng: &mut Pcg32) -> Option<Offer> {
    let total: u32 = pool.iter().map(Offer::weight).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.random_range(0..total);
    for offer in pool {
        let weight = offer.weight();
        if roll < weight {
            return Some(*offer);
        }
        roll -= weight;
    }
    None
}

/// Draw a fresh batch of offers. Duplicates within a batch are allowed.
pub fn generate_offers(state: &mut GameState, rng: &mut Pcg32) {
    let pool = candidates(state);
    state.offers.clear();
    for _ in 0..OFFER_COUNT {
        match draw_offer(&pool, rng) {
            Some(offer) => state.offers.push(offer),
            None => break,
        }
    }
}

/// Redraw the offer batch if the visit's reroll budget allows it
pub fn reroll(state: &mut GameState, rng: &mut Pcg32) -> bool {
    if state.rerolls_used >= MAX_REROLLS {
        return false;
    }
    state.rerolls_used += 1;
    generate_offers(state, rng);
    true
}

/// Buy the offer at `index`.
///
/// The effect is applied before coins are deducted so a failed effect leaves
/// the transaction fully unwound.
pub fn purchase(
    state: &mut GameState,
    rng: &mut Pcg32,
    index: usize,
    now_ms: u64,
) -> Result<(), TransactionError> {
    let offer = *state
        .offers
        .get(index)
        .ok_or(TransactionError::OfferGone(index))?;
    let cost = offer.cost();
    if state.coins < cost {
        return Err(TransactionError::InsufficientCoins {
            cost,
            coins: state.coins,
        });
    }

    match offer {
        Offer::Ability(kind) => {
            effects::apply_ability(state, rng, kind, now_ms)?;
            state.mark_ability_purchased(kind);
        }
        Offer::Item(kind) => {
            effects::apply_item(state, rng, kind, now_ms)?;
            state.inventory.push(InventoryItem {
                kind,
                purchased_at_ms: now_ms,
            });
        }
    }

    state.coins -= cost;
    state.offers.remove(index);
    log::info!("purchased {} for {cost} coins", offer.name());
    Ok(())
}

/// Enter the shop after a level goal is met.
///
/// Score folds into coins, the day advances, and everything tied to the
/// finished level (live orders, timed windows, reroll budget) is cleared.
pub fn enter_shop(state: &mut GameState, rng: &mut Pcg32) {
    state.phase = GamePhase::Shopping;
    state.coins += state.score;
    state.score = 0;
    state.day += 1;
    state.rerolls_used = 0;
    state.goal_announced = false;
    state.enemies.clear();
    state.timed.clear();
    generate_offers(state, rng);
    log::info!("shop opened on day {}", state.day);
}

/// Leave the shop, advancing to the next level or ending the run
pub fn leave_shop(state: &mut GameState, rng: &mut Pcg32, now_ms: u64) -> LeaveShop {
    let next = state.level + 1;
    if level_goal(next).is_some() {
        state.level = next;
        state.phase = GamePhase::Preparing;
        state.prepare_until_ms = now_ms + PREPARE_DELAY_MS;
        state.offers.clear();
        // Seed the counter so gameplay resumes with a live order
        spawn::spawn_enemy(state, rng, now_ms);
        LeaveShop::Advanced(next)
    } else {
        state.phase = GamePhase::GameOver;
        state.offers.clear();
        LeaveShop::RunComplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_level_goal_table() {
        assert_eq!(level_goal(1), Some(100));
        assert_eq!(level_goal(5), Some(1500));
        assert_eq!(level_goal(6), None);
    }

    #[test]
    fn test_rarity_ceiling_by_day() {
        assert_eq!(rarity_ceiling(1), 0);
        assert_eq!(rarity_ceiling(3), 1);
        assert_eq!(rarity_ceiling(6), 2);
        assert_eq!(rarity_ceiling(9), 3);
        assert_eq!(rarity_ceiling(30), 3);
    }

    #[test]
    fn test_day_six_excludes_legendary_items() {
        let mut state = GameState::new();
        state.day = 6;
        let mut r = rng(11);
        for _ in 0..50 {
            generate_offers(&mut state, &mut r);
            for offer in &state.offers {
                if let Offer::Item(_) = offer {
                    assert!(offer.rarity().rank() <= 2, "drew {:?}", offer);
                }
            }
        }
    }

    #[test]
    fn test_offer_batch_allows_duplicates() {
        let mut state = GameState::new();
        state.day = 9;
        let mut r = rng(3);
        let mut saw_duplicate = false;
        for _ in 0..100 {
            generate_offers(&mut state, &mut r);
            for i in 0..state.offers.len() {
                if state.offers[i + 1..].contains(&state.offers[i]) {
                    saw_duplicate = true;
                }
            }
        }
        assert!(saw_duplicate, "no duplicate offers in 100 batches");
    }

    #[test]
    fn test_reroll_budget() {
        let mut state = GameState::new();
        state.day = 9;
        let mut r = rng(4);
        generate_offers(&mut state, &mut r);
        assert!(reroll(&mut state, &mut r));
        assert!(reroll(&mut state, &mut r));
        assert!(reroll(&mut state, &mut r));
        let before = state.offers.clone();
        assert!(!reroll(&mut state, &mut r));
        assert_eq!(state.offers, before);
    }

    #[test]
    fn test_purchase_requires_coins() {
        let mut state = GameState::new();
        state.day = 9;
        let mut r = rng(5);
        generate_offers(&mut state, &mut r);
        state.coins = 0;
        let err = purchase(&mut state, &mut r, 0, 0).unwrap_err();
        assert!(matches!(err, TransactionError::InsufficientCoins { .. }));
        assert_eq!(state.offers.len(), OFFER_COUNT);
    }

    #[test]
    fn test_purchase_out_of_range() {
        let mut state = GameState::new();
        let mut r = rng(5);
        generate_offers(&mut state, &mut r);
        let err = purchase(&mut state, &mut r, 99, 0).unwrap_err();
        assert_eq!(err, TransactionError::OfferGone(99));
    }

    #[test]
    fn test_purchase_deducts_and_removes_offer() {
        let mut state = GameState::new();
        state.day = 9;
        let mut r = rng(6);
        generate_offers(&mut state, &mut r);
        state.coins = 10_000;
        let cost = state.offers[0].cost();
        purchase(&mut state, &mut r, 0, 0).unwrap();
        assert_eq!(state.coins, 10_000 - cost);
        assert_eq!(state.offers.len(), OFFER_COUNT - 1);
    }

    #[test]
    fn test_enter_shop_folds_score_into_coins() {
        let mut state = GameState::new();
        state.score = 250;
        state.coins = 40;
        state.level = 2;
        let mut r = rng(7);
        enter_shop(&mut state, &mut r);
        assert_eq!(state.phase, GamePhase::Shopping);
        assert_eq!(state.coins, 290);
        assert_eq!(state.score, 0);
        assert_eq!(state.day, 2);
        assert!(state.enemies.is_empty());
        assert!(state.timed.is_empty());
        assert!(!state.offers.is_empty());
    }

    #[test]
    fn test_leave_shop_advances_until_last_level() {
        let mut state = GameState::new();
        state.level = 2;
        state.phase = GamePhase::Shopping;
        let mut r = rng(8);
        let outcome = leave_shop(&mut state, &mut r, 1_000);
        assert_eq!(outcome, LeaveShop::Advanced(3));
        assert_eq!(state.phase, GamePhase::Preparing);
        assert_eq!(state.prepare_until_ms, 3_000);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_leave_shop_after_final_level_ends_run() {
        let mut state = GameState::new();
        state.level = 5;
        state.phase = GamePhase::Shopping;
        let mut r = rng(9);
        let outcome = leave_shop(&mut state, &mut r, 0);
        assert_eq!(outcome, LeaveShop::RunComplete);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_owned_items_leave_the_pool() {
        let mut state = GameState::new();
        state.day = 30;
        for kind in ItemKind::ALL {
            state.inventory.push(InventoryItem {
                kind,
                purchased_at_ms: 0,
            });
        }
        let pool = candidates(&state);
        assert!(pool.iter().all(|offer| matches!(offer, Offer::Ability(_))));
    }
}
