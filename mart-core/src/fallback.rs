//! Placeholder scenario used when generated content is unusable.

use crate::types::{Category, Difficulty, GameItem, Scenario};

/// Build the fixed stand-in scenario for a difficulty and category.
///
/// Ids are `item-{i}` and `decoy-{i}`, so they never collide.
#[must_use]
pub fn fallback_scenario(difficulty: Difficulty, category: Category) -> Scenario {
    let label = category.label();
    Scenario {
        theme: format!("{label} 장터"),
        items: (0..difficulty.item_count())
            .map(|i| GameItem::new(format!("item-{i}"), format!("{label} 물건 {}", i + 1), "신선함", "📦"))
            .collect(),
        decoys: (0..difficulty.decoy_count())
            .map(|i| GameItem::new(format!("decoy-{i}"), format!("{label} 방해 {}", i + 1), "다른것", "❓"))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_matches_difficulty_counts() {
        for &d in Difficulty::all() {
            let s = fallback_scenario(d, Category::Dining);
            assert_eq!(s.items.len(), d.item_count());
            assert_eq!(s.decoys.len(), 5);
            assert!(s.validate().is_ok());
        }
    }

    #[test]
    fn fallback_text() {
        let s = fallback_scenario(Difficulty::Easy, Category::Stationery);
        assert_eq!(s.theme, "문구사기 장터");
        assert_eq!(s.items[0].id, "item-0");
        assert_eq!(s.items[0].name, "문구사기 물건 1");
        assert_eq!(s.items[4].description, "신선함");
        assert_eq!(s.decoys[2].name, "문구사기 방해 3");
        assert_eq!(s.decoys[2].icon, "❓");
    }
}
