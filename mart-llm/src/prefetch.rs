//! Lobby prefetch: generate the next scenario before the player presses
//! start.
//!
//! The slot holds at most one scenario, keyed by `(difficulty, category)`.
//! Changing the selection makes any in-flight result stale: a generation
//! counter is bumped and late results for an old generation are dropped.

use std::sync::Arc;

use mart_core::types::{Category, Difficulty, Scenario};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::scenario::ScenarioGenerator;

type Key = (Difficulty, Category);

#[derive(Debug, Default)]
enum SlotState {
    #[default]
    Empty,
    Fetching,
    Ready(Scenario),
}

#[derive(Debug, Default)]
struct Slot {
    key: Option<Key>,
    state: SlotState,
    generation: u64,
}

/// Background scenario prefetcher. Clones share the same slot.
#[derive(Debug, Clone)]
pub struct Prefetcher {
    generator: ScenarioGenerator,
    slot: Arc<Mutex<Slot>>,
}

impl Prefetcher {
    /// Create an empty prefetcher.
    #[must_use]
    pub fn new(generator: ScenarioGenerator) -> Self {
        Self { generator, slot: Arc::new(Mutex::new(Slot::default())) }
    }

    /// Start fetching for `(difficulty, category)` unless that key is
    /// already stored or in flight.
    ///
    /// Must be called from within a tokio runtime. Returns the task handle
    /// when a fetch was started.
    pub fn request(&self, difficulty: Difficulty, category: Category) -> Option<JoinHandle<()>> {
        let key = (difficulty, category);
        let generation = {
            let mut slot = self.slot.lock();
            if slot.key == Some(key) && !matches!(slot.state, SlotState::Empty) {
                return None;
            }
            slot.generation += 1;
            slot.key = Some(key);
            slot.state = SlotState::Fetching;
            slot.generation
        };
        debug!(?difficulty, ?category, generation, "prefetch started");

        let generator = self.generator.clone();
        let slot = Arc::clone(&self.slot);
        Some(tokio::spawn(async move {
            let result = generator.generate(difficulty, category).await;
            let mut slot = slot.lock();
            if slot.generation != generation {
                debug!(generation, "stale prefetch discarded");
                return;
            }
            match result {
                Ok(scenario) => slot.state = SlotState::Ready(scenario),
                Err(e) => {
                    warn!("Pre-fetch failed: {e}");
                    slot.key = None;
                    slot.state = SlotState::Empty;
                }
            }
        }))
    }

    /// Take the stored scenario if it was fetched for this key.
    pub fn take(&self, difficulty: Difficulty, category: Category) -> Option<Scenario> {
        let mut slot = self.slot.lock();
        if slot.key != Some((difficulty, category)) {
            return None;
        }
        match std::mem::take(&mut slot.state) {
            SlotState::Ready(scenario) => {
                slot.key = None;
                Some(scenario)
            }
            other => {
                slot.state = other;
                None
            }
        }
    }

    /// Whether a fetch is running.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        matches!(self.slot.lock().state, SlotState::Fetching)
    }

    /// Whether a scenario is waiting for this key.
    #[must_use]
    pub fn is_ready(&self, difficulty: Difficulty, category: Category) -> bool {
        let slot = self.slot.lock();
        slot.key == Some((difficulty, category)) && matches!(slot.state, SlotState::Ready(_))
    }

    /// Drop whatever is stored or in flight.
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.key = None;
        slot.state = SlotState::Empty;
    }

    /// The generator used for fetches.
    #[must_use]
    pub fn generator(&self) -> &ScenarioGenerator {
        &self.generator
    }
}
