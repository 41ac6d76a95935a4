//! Vocabulary catalog by difficulty tier
//!
//! The base catalog is fixed at compile time; purchased menu unlocks extend it
//! at runtime through [`UnlockedWords`], which persists across run resets.

use serde::{Deserialize, Serialize};

/// Vocabulary difficulty class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
    Special,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
            Tier::Special => "special",
        }
    }
}

/// A vocabulary entry with two accepted surface forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub kana: String,
    pub hira: String,
}

impl Word {
    pub fn new(kana: &str, hira: &str) -> Self {
        Self {
            kana: kana.to_string(),
            hira: hira.to_string(),
        }
    }
}

/// Static word catalog
#[derive(Debug, Clone)]
pub struct WordBank {
    easy: Vec<Word>,
    medium: Vec<Word>,
    hard: Vec<Word>,
    special: Vec<Word>,
}

impl WordBank {
    /// The shipped fast-food menu
    pub fn standard() -> Self {
        let w = Word::new;
        Self {
            easy: vec![
                w("コーラ", "こーら"),
                w("サラダ", "さらだ"),
                w("シェイク", "しぇいく"),
                w("ポテト", "ぽてと"),
                w("ナゲット", "なげっと"),
                w("アイス", "あいす"),
                w("パイ", "ぱい"),
                w("パン", "ぱん"),
                w("スープ", "すーぷ"),
                w("ジュース", "じゅーす"),
                w("コーヒー", "こーひー"),
                w("紅茶", "こうちゃ"),
                w("チーズ", "ちーず"),
                w("トマト", "とまと"),
                w("レタス", "れたす"),
            ],
            medium: vec![
                w("ハンバーガー", "はんばーがー"),
                w("フライドポテト", "ふらいどぽてと"),
                w("チキンナゲット", "ちきんなげっと"),
                w("アイスクリーム", "あいすくりーむ"),
            ],
            hard: vec![
                w("チーズバーガー", "ちーずばーがー"),
                w("フィッシュバーガー", "ふぃっしゅばーがー"),
                w("チキンバーガー", "ちきんばーがー"),
                w("ダブルチーズバーガー", "だぶるちーずばーがー"),
                w("ビッグマック", "びっぐまっく"),
            ],
            special: vec![
                w("トリプルバーガー", "とりぷるばーがー"),
                w("メガフライドポテト", "めがふらいどぽてと"),
                w("スーパーシェイク", "すーぱーしぇいく"),
            ],
        }
    }

    /// Base words for a tier (unlocks not included)
    pub fn base(&self, tier: Tier) -> &[Word] {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
            Tier::Special => &self.special,
        }
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::standard()
    }
}

/// Words unlocked through shop purchases, keyed by tier. Append-only.
///
/// Unlocks join the base pool for their tier; they never replace base words.
/// The special tier has no unlock slot (no menu item grants one).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedWords {
    pub easy: Vec<Word>,
    pub medium: Vec<Word>,
    pub hard: Vec<Word>,
}

impl UnlockedWords {
    pub fn for_tier(&self, tier: Tier) -> &[Word] {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
            Tier::Special => &[],
        }
    }

    pub fn push(&mut self, tier: Tier, word: Word) {
        match tier {
            Tier::Easy => self.easy.push(word),
            Tier::Medium => self.medium.push(word),
            Tier::Hard => self.hard.push(word),
            // No-op by construction; menu items only target easy/medium/hard.
            Tier::Special => {}
        }
    }

    pub fn total(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }
}
