//! Core type definitions for Memory Mart.
//!
//! Scenario payloads use the same JSON field names the content API
//! returns, so [`Scenario`] deserializes straight from a response body.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{MartError, Result};

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// How many items the player must remember.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 쉬움: five items, no hints.
    #[default]
    Easy,
    /// 보통: six items.
    Normal,
    /// 어려움: seven items.
    Hard,
}

impl Difficulty {
    /// Korean label shown to the player.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "쉬움",
            Self::Normal => "보통",
            Self::Hard => "어려움",
        }
    }

    /// Number of target items in a round.
    #[must_use]
    pub fn item_count(self) -> usize {
        match self {
            Self::Easy => 5,
            Self::Normal => 6,
            Self::Hard => 7,
        }
    }

    /// Number of decoys mixed into the pool.
    #[must_use]
    pub fn decoy_count(self) -> usize {
        5
    }

    /// Whether the hint button is offered at this level.
    #[must_use]
    pub fn hints_allowed(self) -> bool {
        !matches!(self, Self::Easy)
    }

    /// All levels in display order.
    #[must_use]
    pub fn all() -> &'static [Difficulty] {
        &[Self::Easy, Self::Normal, Self::Hard]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "쉬움" | "easy" => Ok(Self::Easy),
            "보통" | "normal" => Ok(Self::Normal),
            "어려움" | "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Shopping theme; the generated items must belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 시장보기
    #[default]
    Grocery,
    /// 문구사기
    Stationery,
    /// 과일사기
    Fruit,
    /// 가전제품
    Electronics,
    /// 옷사기
    Clothing,
    /// 청소 & 빨래
    Cleaning,
    /// 여행가기
    Travel,
    /// 식사하기
    Dining,
    /// 화장품사기
    Cosmetics,
}

impl Category {
    /// Korean label, also used verbatim in prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Grocery => "시장보기",
            Self::Stationery => "문구사기",
            Self::Fruit => "과일사기",
            Self::Electronics => "가전제품",
            Self::Clothing => "옷사기",
            Self::Cleaning => "청소 & 빨래",
            Self::Travel => "여행가기",
            Self::Dining => "식사하기",
            Self::Cosmetics => "화장품사기",
        }
    }

    /// Sign icon for the category.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Grocery => "🛒",
            Self::Stationery => "✏️",
            Self::Fruit => "🍎",
            Self::Electronics => "📺",
            Self::Clothing => "👕",
            _ => "🛍️",
        }
    }

    /// All categories in display order.
    #[must_use]
    pub fn all() -> &'static [Category] {
        &[
            Self::Grocery,
            Self::Stationery,
            Self::Fruit,
            Self::Electronics,
            Self::Clothing,
            Self::Cleaning,
            Self::Travel,
            Self::Dining,
            Self::Cosmetics,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.label() == s || format!("{c:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Scenario payload
// ---------------------------------------------------------------------------

/// A single product on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameItem {
    /// Identifier unique within one scenario.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Very short description (a few characters).
    pub description: String,
    /// Emoji icon.
    pub icon: String,
}

impl GameItem {
    /// Convenience constructor.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
        }
    }
}

/// Content for one round: ordered targets plus decoys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Store name / theme line.
    pub theme: String,
    /// Items to remember, in order.
    pub items: Vec<GameItem>,
    /// Look-alike items that are not part of the order.
    pub decoys: Vec<GameItem>,
}

impl Scenario {
    /// Check that the scenario is playable.
    ///
    /// # Errors
    /// Returns [`MartError::InvalidScenario`] if there are no target items
    /// or an id appears more than once across items and decoys.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(MartError::InvalidScenario("no items to remember".into()));
        }
        let mut seen = HashSet::with_capacity(self.items.len() + self.decoys.len());
        for item in self.items.iter().chain(&self.decoys) {
            if !seen.insert(item.id.as_str()) {
                return Err(MartError::InvalidScenario(format!(
                    "duplicate item id '{}'",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Items followed by decoys, unshuffled.
    #[must_use]
    pub fn pool(&self) -> Vec<GameItem> {
        self.items.iter().chain(&self.decoys).cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// The four screens of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Picking category and difficulty.
    Lobby,
    /// Countdown while the ordered items are shown.
    Observation,
    /// Rebuilding the order from the shuffled pool.
    FillGaps,
    /// Score and receipt.
    Result,
}
