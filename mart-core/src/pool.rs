//! Shelf pool construction.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::{GameItem, Scenario};

/// Targets and decoys in uniformly random order.
#[must_use]
pub fn shuffled_pool<R: Rng + ?Sized>(scenario: &Scenario, rng: &mut R) -> Vec<GameItem> {
    let mut pool = scenario.pool();
    pool.shuffle(rng);
    pool
}
