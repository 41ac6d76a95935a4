//! Abilities and items
//!
//! Every purchasable effect is a variant of a closed enum and goes through the
//! interpreter functions below, so effects stay serializable and testable.
//! Timed windows live in [`TimedEffects`], a deadline table swept by the tick
//! loop; re-activating an effect replaces its deadline (no stacking).

use std::collections::BTreeMap;
use std::fmt;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_HEALTH;
use crate::sim::state::GameState;
use crate::sim::{input, spawn};
use crate::words::{Tier, Word};

/// Offer rarity, gated for items by the day-based ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Rank compared against the shop's rarity ceiling. Epic appears only on
    /// abilities, which bypass the ceiling, so it shares the top rank.
    pub fn rank(&self) -> u32 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 3,
        }
    }
}

/// Chance that double-order doubles a scoring event
pub const DOUBLE_ORDER_CHANCE: f64 = 0.3;
/// Lunch-master difficulty relief (applied during lunch only)
pub const LUNCH_MASTER_SPEED_FACTOR: f32 = 0.8;
pub const LUNCH_MASTER_TIME_FACTOR: f32 = 1.2;
/// Time-saver one-shot extension on live orders
pub const TIME_SAVER_FACTOR: f32 = 1.1;
/// Tip-tip payout per remaining second on each live order
pub const TIP_TIP_RATE: f32 = 0.5;
/// Coin-bonus window payout multiplier
pub const COIN_BONUS_MULTIPLIER: f32 = 2.0;

/// Permanent purchasable abilities
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    SmartRegister,
    TipTip,
    TimeSaver,
    LunchMaster,
    DoubleOrder,
    QuickHand,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 6] = [
        AbilityKind::SmartRegister,
        AbilityKind::TipTip,
        AbilityKind::TimeSaver,
        AbilityKind::LunchMaster,
        AbilityKind::DoubleOrder,
        AbilityKind::QuickHand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AbilityKind::SmartRegister => "スマートレジ",
            AbilityKind::TipTip => "チップティップ",
            AbilityKind::TimeSaver => "タイムセーバー",
            AbilityKind::LunchMaster => "ランチマスター",
            AbilityKind::DoubleOrder => "ダブルオーダー",
            AbilityKind::QuickHand => "クイックハンド",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AbilityKind::SmartRegister => "同じ商品の客を一斉に消す",
            AbilityKind::TipTip => "残り時間を多く残すほどコインが貰える",
            AbilityKind::TimeSaver => "全ての注文の制限時間が10%延長される",
            AbilityKind::LunchMaster => "ランチタイム中の難易度上昇を軽減",
            AbilityKind::DoubleOrder => "ランダムで一部の注文が2倍スコアになる",
            AbilityKind::QuickHand => "タイピング速度が10%上昇（入力判定が甘くなる）",
        }
    }

    pub fn cost(&self) -> u64 {
        match self {
            AbilityKind::SmartRegister => 100,
            AbilityKind::TipTip => 150,
            AbilityKind::TimeSaver => 120,
            AbilityKind::LunchMaster => 180,
            AbilityKind::DoubleOrder => 140,
            AbilityKind::QuickHand => 120,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            AbilityKind::SmartRegister => Rarity::Rare,
            AbilityKind::TipTip => Rarity::Epic,
            AbilityKind::TimeSaver => Rarity::Rare,
            AbilityKind::LunchMaster => Rarity::Epic,
            AbilityKind::DoubleOrder => Rarity::Rare,
            AbilityKind::QuickHand => Rarity::Rare,
        }
    }
}

/// Shop item category, weighted differently when stocking offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Base,
    Special,
    Menu,
}

impl ItemCategory {
    pub fn weight(&self) -> u32 {
        match self {
            ItemCategory::Base => 2,
            ItemCategory::Special => 1,
            ItemCategory::Menu => 3,
        }
    }
}

/// Consumable shop items
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    // Base
    HealHealth,
    TimePlus,
    ScoreBoost,
    // Special
    TroubleBarrier,
    SuperFinger,
    CoinBonus,
    AutoDestroyer,
    SpecialEnemy,
    Invincible,
    // Menu unlocks
    MenuCheesecake,
    MenuShake,
    MenuFriedChicken,
    MenuBigBurger,
    MenuMargherita,
    MenuCarbonara,
}

impl ItemKind {
    pub const ALL: [ItemKind; 15] = [
        ItemKind::HealHealth,
        ItemKind::TimePlus,
        ItemKind::ScoreBoost,
        ItemKind::TroubleBarrier,
        ItemKind::SuperFinger,
        ItemKind::CoinBonus,
        ItemKind::AutoDestroyer,
        ItemKind::SpecialEnemy,
        ItemKind::Invincible,
        ItemKind::MenuCheesecake,
        ItemKind::MenuShake,
        ItemKind::MenuFriedChicken,
        ItemKind::MenuBigBurger,
        ItemKind::MenuMargherita,
        ItemKind::MenuCarbonara,
    ];

    pub fn category(&self) -> ItemCategory {
        match self {
            ItemKind::HealHealth | ItemKind::TimePlus | ItemKind::ScoreBoost => ItemCategory::Base,
            ItemKind::TroubleBarrier
            | ItemKind::SuperFinger
            | ItemKind::CoinBonus
            | ItemKind::AutoDestroyer
            | ItemKind::SpecialEnemy
            | ItemKind::Invincible => ItemCategory::Special,
            _ => ItemCategory::Menu,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::HealHealth => "体力回復",
            ItemKind::TimePlus => "タイムプラス",
            ItemKind::ScoreBoost => "スコア倍率",
            ItemKind::TroubleBarrier => "迷惑客バリア",
            ItemKind::SuperFinger => "スーパーフィンガー",
            ItemKind::CoinBonus => "コインボーナス",
            ItemKind::AutoDestroyer => "自動破壊装置",
            ItemKind::SpecialEnemy => "特殊敵出現",
            ItemKind::Invincible => "無敵時間",
            ItemKind::MenuCheesecake => "新メニュー：チーズケーキ",
            ItemKind::MenuShake => "新メニュー：シェイク",
            ItemKind::MenuFriedChicken => "新メニュー：フライドチキン",
            ItemKind::MenuBigBurger => "新メニュー：ビッグバーガー",
            ItemKind::MenuMargherita => "新メニュー：マルゲリータピザ",
            ItemKind::MenuCarbonara => "新メニュー：カルボナーラ",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ItemKind::HealHealth => "HPを30回復",
            ItemKind::TimePlus => "制限時間を2秒延長",
            ItemKind::ScoreBoost => "スコア獲得量が1.5倍",
            ItemKind::TroubleBarrier => "迷惑客の出現を60秒間防ぐ",
            ItemKind::SuperFinger => "10秒間、全てのタイピングが自動成功",
            ItemKind::CoinBonus => "獲得コインが30秒間2倍",
            ItemKind::AutoDestroyer => "10秒間、敵を自動で倒す",
            ItemKind::SpecialEnemy => "高得点の特殊敵が出現",
            ItemKind::Invincible => "5秒間ダメージを受けない",
            _ => "高得点の新メニューを追加",
        }
    }

    pub fn cost(&self) -> u64 {
        match self {
            ItemKind::HealHealth => 50,
            ItemKind::TimePlus => 60,
            ItemKind::ScoreBoost => 150,
            ItemKind::TroubleBarrier => 100,
            ItemKind::SuperFinger => 200,
            ItemKind::CoinBonus => 120,
            ItemKind::AutoDestroyer => 200,
            ItemKind::SpecialEnemy => 250,
            ItemKind::Invincible => 300,
            ItemKind::MenuCheesecake | ItemKind::MenuShake => 150,
            ItemKind::MenuFriedChicken | ItemKind::MenuBigBurger => 200,
            ItemKind::MenuMargherita | ItemKind::MenuCarbonara => 180,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            ItemKind::HealHealth | ItemKind::TimePlus => Rarity::Common,
            ItemKind::ScoreBoost => Rarity::Uncommon,
            ItemKind::TroubleBarrier | ItemKind::CoinBonus => Rarity::Rare,
            ItemKind::SuperFinger => Rarity::Legendary,
            ItemKind::AutoDestroyer => Rarity::Rare,
            ItemKind::SpecialEnemy | ItemKind::Invincible => Rarity::Legendary,
            ItemKind::MenuCheesecake | ItemKind::MenuShake => Rarity::Uncommon,
            ItemKind::MenuFriedChicken
            | ItemKind::MenuBigBurger
            | ItemKind::MenuMargherita
            | ItemKind::MenuCarbonara => Rarity::Rare,
        }
    }

    /// The timed window this item opens, if any
    pub fn timed_effect(&self) -> Option<TimedEffect> {
        match self {
            ItemKind::TroubleBarrier => Some(TimedEffect::TroubleBarrier),
            ItemKind::SuperFinger => Some(TimedEffect::SuperFinger),
            ItemKind::CoinBonus => Some(TimedEffect::CoinBonus),
            ItemKind::AutoDestroyer => Some(TimedEffect::AutoDestroyer),
            ItemKind::Invincible => Some(TimedEffect::Invincible),
            _ => None,
        }
    }

    /// The vocabulary entry a menu item unlocks, if any
    pub fn menu_unlock(&self) -> Option<(Tier, Word)> {
        let (tier, kana, hira) = match self {
            ItemKind::MenuCheesecake => (Tier::Medium, "チーズケーキ", "ちーずけーき"),
            ItemKind::MenuShake => (Tier::Medium, "シェイク", "しぇいく"),
            ItemKind::MenuFriedChicken => (Tier::Hard, "フライドチキン", "ふらいどちきん"),
            ItemKind::MenuBigBurger => (Tier::Hard, "ビッグバーガー", "びっぐばーがー"),
            ItemKind::MenuMargherita => (Tier::Hard, "マルゲリータピザ", "まるげりーたぴざ"),
            ItemKind::MenuCarbonara => (Tier::Hard, "カルボナーラ", "かるぼなーら"),
            _ => return None,
        };
        Some((tier, Word::new(kana, hira)))
    }
}

/// Flags with an expiry deadline
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimedEffect {
    TroubleBarrier,
    SuperFinger,
    CoinBonus,
    AutoDestroyer,
    Invincible,
}

impl TimedEffect {
    pub fn duration_ms(&self) -> u64 {
        match self {
            TimedEffect::TroubleBarrier => 60_000,
            TimedEffect::SuperFinger => 10_000,
            TimedEffect::CoinBonus => 30_000,
            TimedEffect::AutoDestroyer => 10_000,
            TimedEffect::Invincible => 5_000,
        }
    }
}

/// Scheduled-deadline table for timed effect windows.
///
/// Replaces ambient timers: the tick loop sweeps due entries, and starting an
/// already-running window replaces its deadline (last-write-wins).
#[derive(Debug, Clone, Default)]
pub struct TimedEffects {
    deadlines: BTreeMap<TimedEffect, u64>,
}

impl TimedEffects {
    /// Open (or restart) an effect window ending `duration_ms` from now
    pub fn schedule(&mut self, effect: TimedEffect, now_ms: u64) {
        self.deadlines
            .insert(effect, now_ms + effect.duration_ms());
    }

    pub fn is_active(&self, effect: TimedEffect) -> bool {
        self.deadlines.contains_key(&effect)
    }

    /// Remove and return every window whose deadline has passed
    pub fn expire_due(&mut self, now_ms: u64) -> Vec<TimedEffect> {
        let due: Vec<TimedEffect> = self
            .deadlines
            .iter()
            .filter(|&(_, &deadline)| now_ms >= deadline)
            .map(|(&fx, _)| fx)
            .collect();
        for fx in &due {
            self.deadlines.remove(fx);
        }
        due
    }

    /// Cancel every pending window (reset / shop entry)
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

/// Effect application failure. Fail-soft: callers log and leave state alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    MissingMenuWord(&'static str),
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectError::MissingMenuWord(name) => {
                write!(f, "menu item '{name}' has no vocabulary entry")
            }
        }
    }
}

/// Apply an ability's one-shot purchase effect.
///
/// The permanent part of every ability is its `active` flag on the
/// [`crate::sim::state::AbilityRecord`], consulted by the spawner, resolver
/// and score engine; the effects here run exactly once, at purchase.
pub fn apply_ability(
    state: &mut GameState,
    rng: &mut Pcg32,
    kind: AbilityKind,
    now_ms: u64,
) -> Result<(), EffectError> {
    match kind {
        AbilityKind::SmartRegister => {
            // Clear any duplicate orders already on screen
            let sweep = input::smart_register_sweep(state, rng, now_ms);
            if sweep.served > 0 {
                log::info!("smart register cleared {} duplicate orders", sweep.served);
            }
        }
        AbilityKind::TipTip => {
            let mut bonus = 0u64;
            for enemy in &state.enemies {
                let left_secs = enemy.time_left_ms(now_ms) as f32 / 1000.0;
                bonus += (left_secs * TIP_TIP_RATE).floor() as u64;
            }
            state.coins += bonus;
        }
        AbilityKind::TimeSaver => {
            for enemy in &mut state.enemies {
                enemy.time_limit_ms = (enemy.time_limit_ms as f32 * TIME_SAVER_FACTOR) as u64;
            }
        }
        // Toggle-only abilities; their modifiers are read where they apply
        AbilityKind::LunchMaster | AbilityKind::DoubleOrder | AbilityKind::QuickHand => {}
    }
    Ok(())
}

/// Apply a consumable item's effect
pub fn apply_item(
    state: &mut GameState,
    rng: &mut Pcg32,
    kind: ItemKind,
    now_ms: u64,
) -> Result<(), EffectError> {
    if let Some(effect) = kind.timed_effect() {
        state.timed.schedule(effect, now_ms);
        return Ok(());
    }
    if kind.category() == ItemCategory::Menu {
        let (tier, word) = kind
            .menu_unlock()
            .ok_or(EffectError::MissingMenuWord(kind.name()))?;
        state.unlocked_words.push(tier, word);
        return Ok(());
    }
    match kind {
        ItemKind::HealHealth => {
            state.health = (state.health + 30).min(MAX_HEALTH);
        }
        ItemKind::TimePlus => {
            for enemy in &mut state.enemies {
                enemy.time_limit_ms += 2_000;
            }
        }
        ItemKind::ScoreBoost => {
            state.score_multiplier += 1.5;
        }
        ItemKind::SpecialEnemy => {
            spawn::spawn_special_enemy(state, rng, now_ms);
        }
        // Timed and menu kinds handled above
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_timed_window_replaces_deadline() {
        let mut timed = TimedEffects::default();
        timed.schedule(TimedEffect::SuperFinger, 1_000);
        // Restarting the same window pushes the deadline out; no stacking
        timed.schedule(TimedEffect::SuperFinger, 5_000);

        assert!(timed.expire_due(11_500).is_empty());
        let due = timed.expire_due(15_000);
        assert_eq!(due, vec![TimedEffect::SuperFinger]);
        assert!(timed.is_empty());
    }

    #[test]
    fn test_expiry_clears_only_its_own_flag() {
        let mut timed = TimedEffects::default();
        timed.schedule(TimedEffect::Invincible, 0); // ends at 5s
        timed.schedule(TimedEffect::CoinBonus, 0); // ends at 30s

        let due = timed.expire_due(6_000);
        assert_eq!(due, vec![TimedEffect::Invincible]);
        assert!(timed.is_active(TimedEffect::CoinBonus));
    }

    #[test]
    fn test_heal_clamps_at_max_health() {
        let mut state = GameState::new();
        state.health = 90;
        apply_item(&mut state, &mut rng(), ItemKind::HealHealth, 0).unwrap();
        assert_eq!(state.health, 100);
    }

    #[test]
    fn test_menu_item_unlocks_word() {
        let mut state = GameState::new();
        apply_item(&mut state, &mut rng(), ItemKind::MenuFriedChicken, 0).unwrap();
        let unlocked = state.unlocked_words.for_tier(Tier::Hard);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].kana, "フライドチキン");
    }

    #[test]
    fn test_score_boost_raises_multiplier() {
        let mut state = GameState::new();
        apply_item(&mut state, &mut rng(), ItemKind::ScoreBoost, 0).unwrap();
        assert!((state.score_multiplier - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_time_saver_extends_live_orders() {
        let mut state = GameState::new();
        spawn::spawn_enemy(&mut state, &mut rng(), 0);
        let before = state.enemies[0].time_limit_ms;
        apply_ability(&mut state, &mut rng(), AbilityKind::TimeSaver, 0).unwrap();
        assert_eq!(state.enemies[0].time_limit_ms, (before as f32 * 1.1) as u64);
    }

    #[test]
    fn test_tip_tip_pays_for_remaining_time() {
        let mut state = GameState::new();
        spawn::spawn_enemy(&mut state, &mut rng(), 0);
        state.enemies[0].time_limit_ms = 10_000;
        apply_ability(&mut state, &mut rng(), AbilityKind::TipTip, 4_000).unwrap();
        // 6 seconds left at 0.5 coins per second
        assert_eq!(state.coins, 3);
    }

    #[test]
    fn test_legendary_shares_top_rank_with_epic() {
        assert_eq!(Rarity::Legendary.rank(), 3);
        assert!(Rarity::Rare.rank() < Rarity::Legendary.rank());
    }
}
