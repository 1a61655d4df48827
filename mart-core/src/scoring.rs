//! Answer comparison and result grading.

use crate::types::GameItem;

/// Count positions where the placed item id equals the target id.
///
/// Empty slots never match; extra answers past the targets are ignored.
#[must_use]
pub fn score(targets: &[GameItem], answers: &[Option<GameItem>]) -> usize {
    targets
        .iter()
        .zip(answers)
        .filter(|(target, answer)| answer.as_ref().is_some_and(|a| a.id == target.id))
        .count()
}

/// Result-screen tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    /// Every slot correct.
    Perfect,
    /// At least half correct.
    Great,
    /// Less than half.
    KeepTrying,
}

impl Grade {
    /// Grade a score out of `total`.
    #[must_use]
    pub fn from_score(score: usize, total: usize) -> Self {
        if score == total {
            Self::Perfect
        } else if score * 2 >= total {
            Self::Great
        } else {
            Self::KeepTrying
        }
    }

    /// Big result emoji.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Perfect => "👑",
            Self::Great => "😊",
            Self::KeepTrying => "💪",
        }
    }

    /// Encouragement shown under the score.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Perfect => "와아! 완벽한 기억력입니다!\n마트 VIP로 임명합니다!",
            Self::Great => "정말 대단하세요!\n기억력이 아주 훌륭하십니다!",
            Self::KeepTrying => "조금 아쉽지만 잘하셨어요!\n다시 한 번 도전해 볼까요?",
        }
    }
}

/// One line of the result receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Item that belonged at this position.
    pub target: GameItem,
    /// What the player put there.
    pub placed: Option<GameItem>,
    /// Whether the ids match.
    pub correct: bool,
}

/// Per-position comparison for the receipt view.
#[must_use]
pub fn receipt(targets: &[GameItem], answers: &[Option<GameItem>]) -> Vec<ReceiptLine> {
    targets
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            let placed = answers.get(idx).cloned().flatten();
            let correct = placed.as_ref().is_some_and(|p| p.id == target.id);
            ReceiptLine { target: target.clone(), placed, correct }
        })
        .collect()
}
