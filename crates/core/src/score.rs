//! Derived score values. Always computed from the live counters, never stored.

/// `score / total * 100`, or `0.0` for an empty session.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    score as f64 / total as f64 * 100.0
}

/// Result band used to pick the end-of-quiz message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreTier {
    /// Every answer correct.
    Top,
    /// 80% or better.
    High,
    /// 50% or better.
    Mid,
    Low,
}

impl ScoreTier {
    #[must_use]
    pub fn from_percentage(percent: f64) -> Self {
        if percent >= 100.0 {
            ScoreTier::Top
        } else if percent >= 80.0 {
            ScoreTier::High
        } else if percent >= 50.0 {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }

    #[must_use]
    pub fn for_score(score: usize, total: usize) -> Self {
        Self::from_percentage(percentage(score, total))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreTier::Top => "top",
            ScoreTier::High => "high",
            ScoreTier::Mid => "mid",
            ScoreTier::Low => "low",
        }
    }
}

/// Whether a finished run scored strictly more than half.
#[must_use]
pub fn celebrates(score: usize, total: usize) -> bool {
    total > 0 && score * 2 > total
}

/// Title awarded on the results screen.
///
/// Unlike [`ScoreTier`], the middle rank needs strictly more than half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankTitle {
    ComputerScientist,
    JuniorProgrammer,
    GoodTry,
}

impl RankTitle {
    #[must_use]
    pub fn for_score(score: usize, total: usize) -> Self {
        if total > 0 && score == total {
            RankTitle::ComputerScientist
        } else if celebrates(score, total) {
            RankTitle::JuniorProgrammer
        } else {
            RankTitle::GoodTry
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RankTitle::ComputerScientist => "Computer scientist",
            RankTitle::JuniorProgrammer => "Junior programmer",
            RankTitle::GoodTry => "Good try",
        }
    }
}

/// Growth stage of the progress plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStage {
    Seedling,
    Sprout,
    Tree,
}

impl ProgressStage {
    /// Stage for position `current` out of `total` questions.
    #[must_use]
    pub fn from_position(current: usize, total: usize) -> Self {
        let through = percentage(current, total);
        if through <= 33.0 {
            ProgressStage::Seedling
        } else if through <= 66.0 {
            ProgressStage::Sprout
        } else {
            ProgressStage::Tree
        }
    }
}
