//! One player's game: the lobby → observation → fill-in → result loop.
//!
//! ```text
//!   Lobby ──start──▶ Observation ──timer hits 0──▶ FillGaps ──check──▶ Result
//!     ▲                                                                  │
//!     └──────────────────────────── go_home ◀──────────────── start ─────┘
//! ```
//!
//! `check` is guarded: every slot must be filled. `go_home` is legal from
//! any phase. Time only moves when the driver calls [`Session::tick`], once
//! per second, which keeps the state machine free of clocks.

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::error::{MartError, Result};
use crate::pool::shuffled_pool;
use crate::scoring::{self, Grade, ReceiptLine};
use crate::types::{Category, Difficulty, GameItem, GamePhase, Scenario};

/// State of a single player's session.
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    phase: GamePhase,
    difficulty: Difficulty,
    category: Category,
    scenario: Option<Scenario>,
    timer: u32,
    answers: Vec<Option<GameItem>>,
    options: Vec<GameItem>,
    score: usize,
    hints_used: u32,
    hint_ticks_left: u32,
}

impl Session {
    /// A fresh session sitting in the lobby.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
            phase: GamePhase::Lobby,
            difficulty: Difficulty::default(),
            category: Category::default(),
            scenario: None,
            timer: 0,
            answers: Vec::new(),
            options: Vec::new(),
            score: 0,
            hints_used: 0,
            hint_ticks_left: 0,
        }
    }

    // -- accessors ---------------------------------------------------------

    /// Current screen.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Selected difficulty.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Selected category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Scenario being played, if a round is in progress.
    #[must_use]
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    /// Seconds left in the observation countdown.
    #[must_use]
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Answer slots, one per target item.
    #[must_use]
    pub fn answers(&self) -> &[Option<GameItem>] {
        &self.answers
    }

    /// Shuffled shelf of targets and decoys.
    #[must_use]
    pub fn options(&self) -> &[GameItem] {
        &self.options
    }

    /// Score of the last checked round.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Whether `item_id` already sits in a slot.
    #[must_use]
    pub fn is_used(&self, item_id: &str) -> bool {
        self.answers.iter().flatten().any(|a| a.id == item_id)
    }

    /// Every slot has an item.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.answers.is_empty() && self.answers.iter().all(Option::is_some)
    }

    /// Whether the hint overlay is currently showing.
    #[must_use]
    pub fn hint_visible(&self) -> bool {
        self.hint_ticks_left > 0
    }

    /// Hints left this round (always 0 on levels without hints).
    #[must_use]
    pub fn hints_remaining(&self) -> u32 {
        if self.difficulty.hints_allowed() {
            self.config.hints_per_round.saturating_sub(self.hints_used)
        } else {
            0
        }
    }

    /// Result tier for the last checked round.
    #[must_use]
    pub fn grade(&self) -> Option<Grade> {
        match (&self.phase, &self.scenario) {
            (GamePhase::Result, Some(s)) => Some(Grade::from_score(self.score, s.items.len())),
            _ => None,
        }
    }

    /// Per-position comparison of targets and answers.
    #[must_use]
    pub fn receipt(&self) -> Vec<ReceiptLine> {
        self.scenario
            .as_ref()
            .map(|s| scoring::receipt(&s.items, &self.answers))
            .unwrap_or_default()
    }

    // -- lobby -------------------------------------------------------------

    /// Pick the difficulty for the next round.
    ///
    /// # Errors
    /// Only legal in the lobby.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        self.require(GamePhase::Lobby, "change difficulty")?;
        self.difficulty = difficulty;
        Ok(())
    }

    /// Pick the category for the next round.
    ///
    /// # Errors
    /// Only legal in the lobby.
    pub fn select_category(&mut self, category: Category) -> Result<()> {
        self.require(GamePhase::Lobby, "change category")?;
        self.category = category;
        Ok(())
    }

    /// Begin a round with `scenario`. Legal from the lobby or the result
    /// screen (play again).
    ///
    /// # Errors
    /// Returns an error for an illegal phase or an unplayable scenario.
    pub fn start<R: Rng + ?Sized>(&mut self, scenario: Scenario, rng: &mut R) -> Result<()> {
        if !matches!(self.phase, GamePhase::Lobby | GamePhase::Result) {
            return Err(MartError::InvalidTransition { from: self.phase, action: "start" });
        }
        scenario.validate()?;

        self.options = shuffled_pool(&scenario, rng);
        self.answers = vec![None; scenario.items.len()];
        self.timer = self.config.observation_secs;
        self.score = 0;
        self.hints_used = 0;
        self.hint_ticks_left = 0;
        debug!(
            theme = %scenario.theme,
            items = scenario.items.len(),
            decoys = scenario.decoys.len(),
            "round started"
        );
        self.scenario = Some(scenario);
        self.phase = if self.timer == 0 { GamePhase::FillGaps } else { GamePhase::Observation };
        Ok(())
    }

    // -- clock -------------------------------------------------------------

    /// Advance one second. Returns the phase after the tick.
    pub fn tick(&mut self) -> GamePhase {
        match self.phase {
            GamePhase::Observation => {
                self.timer = self.timer.saturating_sub(1);
                if self.timer == 0 {
                    debug!("observation over");
                    self.phase = GamePhase::FillGaps;
                }
            }
            GamePhase::FillGaps => {
                self.hint_ticks_left = self.hint_ticks_left.saturating_sub(1);
            }
            GamePhase::Lobby | GamePhase::Result => {}
        }
        self.phase
    }

    /// End the observation countdown early.
    ///
    /// # Errors
    /// Only legal during observation.
    pub fn skip_observation(&mut self) -> Result<()> {
        self.require(GamePhase::Observation, "skip observation")?;
        self.timer = 0;
        self.phase = GamePhase::FillGaps;
        Ok(())
    }

    // -- fill-in -----------------------------------------------------------

    /// Put a shelf item into the first empty slot.
    ///
    /// Returns the slot that was filled, or `None` when the item is
    /// already placed or every slot is taken.
    ///
    /// # Errors
    /// Illegal phase, or an id that is not on the shelf.
    pub fn place(&mut self, item_id: &str) -> Result<Option<usize>> {
        self.require(GamePhase::FillGaps, "place an item")?;
        let item = self
            .options
            .iter()
            .find(|o| o.id == item_id)
            .cloned()
            .ok_or_else(|| MartError::UnknownItem(item_id.to_string()))?;
        if self.is_used(item_id) {
            return Ok(None);
        }
        let Some(slot) = self.answers.iter().position(Option::is_none) else {
            return Ok(None);
        };
        debug!(item = item_id, slot, "item placed");
        self.answers[slot] = Some(item);
        Ok(Some(slot))
    }

    /// Empty a slot, returning what was in it.
    ///
    /// # Errors
    /// Illegal phase, or a slot index past the end.
    pub fn remove(&mut self, slot: usize) -> Result<Option<GameItem>> {
        self.require(GamePhase::FillGaps, "remove an item")?;
        let len = self.answers.len();
        let cell = self
            .answers
            .get_mut(slot)
            .ok_or(MartError::SlotOutOfRange { index: slot, len })?;
        Ok(cell.take())
    }

    /// Show the target order for a few seconds.
    ///
    /// # Errors
    /// Illegal phase, a level without hints, or the budget is spent.
    pub fn use_hint(&mut self) -> Result<()> {
        self.require(GamePhase::FillGaps, "use a hint")?;
        if !self.difficulty.hints_allowed() {
            return Err(MartError::HintUnavailable("no hints on this level"));
        }
        if self.hints_remaining() == 0 {
            return Err(MartError::HintUnavailable("hint already used"));
        }
        self.hints_used += 1;
        self.hint_ticks_left = self.config.hint_display_secs;
        debug!(remaining = self.hints_remaining(), "hint shown");
        Ok(())
    }

    /// Score the round and move to the result screen.
    ///
    /// # Errors
    /// Illegal phase, or some slots are still empty.
    pub fn check(&mut self) -> Result<usize> {
        self.require(GamePhase::FillGaps, "check results")?;
        let empty = self.answers.iter().filter(|a| a.is_none()).count();
        if empty > 0 {
            return Err(MartError::IncompleteAnswers { empty });
        }
        let targets = self.scenario.as_ref().map(|s| s.items.as_slice()).unwrap_or_default();
        self.score = scoring::score(targets, &self.answers);
        self.hint_ticks_left = 0;
        self.phase = GamePhase::Result;
        debug!(score = self.score, total = targets.len(), "round checked");
        Ok(self.score)
    }

    /// Back to the lobby from anywhere.
    pub fn go_home(&mut self) {
        debug!(from = ?self.phase, "returning to lobby");
        self.phase = GamePhase::Lobby;
        self.scenario = None;
        self.answers.clear();
        self.options.clear();
        self.timer = 0;
        self.hint_ticks_left = 0;
    }

    fn require(&self, phase: GamePhase, action: &'static str) -> Result<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(MartError::InvalidTransition { from: self.phase, action })
        }
    }
}
