//! Property-Based Tests for the game session.
//!
//! Uses `proptest` to check the round invariants under random play:
//! the shelf is always a permutation of items and decoys, no item is ever
//! in two slots, and the score never exceeds the number of slots.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use mart_core::config::GameConfig;
use mart_core::fallback::fallback_scenario;
use mart_core::pool::shuffled_pool;
use mart_core::scoring::score;
use mart_core::session::Session;
use mart_core::types::{Category, Difficulty, GameItem, GamePhase};

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![Just(Difficulty::Easy), Just(Difficulty::Normal), Just(Difficulty::Hard)]
}

/// A player action during the fill phase.
#[derive(Debug, Clone)]
enum Action {
    Place(usize),
    Remove(usize),
}

fn arb_actions() -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(
        prop_oneof![
            3 => (0usize..12).prop_map(Action::Place),
            1 => (0usize..7).prop_map(Action::Remove),
        ],
        0..40,
    )
}

proptest! {
    #[test]
    fn shuffle_is_permutation(d in arb_difficulty(), seed in any::<u64>()) {
        let scenario = fallback_scenario(d, Category::Grocery);
        let pool = shuffled_pool(&scenario, &mut StdRng::seed_from_u64(seed));
        let mut got: Vec<String> = pool.into_iter().map(|i| i.id).collect();
        let mut want: Vec<String> = scenario.pool().into_iter().map(|i| i.id).collect();
        got.sort();
        want.sort();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn random_play_never_duplicates(d in arb_difficulty(), seed in any::<u64>(), actions in arb_actions()) {
        let mut session = Session::new(&GameConfig::default());
        session.select_difficulty(d).expect("lobby");
        session.start(fallback_scenario(d, Category::Fruit), &mut StdRng::seed_from_u64(seed)).expect("start");
        session.skip_observation().expect("skip");

        let shelf: Vec<String> = session.options().iter().map(|o| o.id.clone()).collect();
        for action in actions {
            match action {
                Action::Place(i) => { let _ = session.place(&shelf[i % shelf.len()]); }
                Action::Remove(i) => { let _ = session.remove(i); }
            }
            let placed: Vec<&str> = session.answers().iter().flatten().map(|a| a.id.as_str()).collect();
            let mut dedup = placed.clone();
            dedup.sort_unstable();
            dedup.dedup();
            prop_assert_eq!(placed.len(), dedup.len());
        }
        prop_assert_eq!(session.phase(), GamePhase::FillGaps);
    }

    #[test]
    fn score_bounded_by_slots(ids in prop::collection::vec(0u8..6, 1..8), answers in prop::collection::vec(prop::option::of(0u8..6), 0..8)) {
        let targets: Vec<GameItem> = ids.iter().map(|i| GameItem::new(i.to_string(), "", "", "")).collect();
        let answers: Vec<Option<GameItem>> = answers
            .iter()
            .map(|a| a.map(|i| GameItem::new(i.to_string(), "", "", "")))
            .collect();
        let s = score(&targets, &answers);
        prop_assert!(s <= targets.len());
        prop_assert!(s <= answers.iter().flatten().count());
    }
}
