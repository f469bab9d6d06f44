use crate::content::category::Category;

const BASE_SCORE: f64 = 0.5;

const ENGAGEMENT_WORDS: &[&str] = &[
    "secret",
    "shock",
    "amazing",
    "incredible",
    "proven",
    "guaranteed",
];
const EMOTIONAL_WORDS: &[&str] = &["hate", "love", "obsessed", "crazy", "insane", "unbelievable"];
const URGENCY_WORDS: &[&str] = &["now", "today", "limited", "before", "urgent", "immediate"];

const ENGAGEMENT_STEP: f64 = 0.10;
const EMOTIONAL_STEP: f64 = 0.15;
const URGENCY_STEP: f64 = 0.05;

/// Per-category boost applied after the additive terms.
pub fn multiplier(category: Category) -> f64 {
    match category {
        Category::Finance => 1.2,
        Category::Tech => 1.1,
        Category::Lifestyle => 1.0,
        Category::Motivation => 1.15,
        Category::Default => 1.0,
    }
}

/// Breakdown of how a hook scored; handy for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScoreHits {
    pub engagement: usize,
    pub emotional: usize,
    pub urgency: usize,
}

impl ScoreHits {
    pub fn of(hook: &str) -> Self {
        let lowered = hook.to_lowercase();
        let hits = |words: &[&str]| words.iter().filter(|w| lowered.contains(*w)).count();
        Self {
            engagement: hits(ENGAGEMENT_WORDS),
            emotional: hits(EMOTIONAL_WORDS),
            urgency: hits(URGENCY_WORDS),
        }
    }

    /// Additive part of the score, before the category multiplier and the clamp.
    pub fn raw(self) -> f64 {
        BASE_SCORE
            + ENGAGEMENT_STEP * self.engagement as f64
            + EMOTIONAL_STEP * self.emotional as f64
            + URGENCY_STEP * self.urgency as f64
    }
}

/// Heuristic engagement score of `hook` in `[0, 1]`. Pure.
pub fn score(hook: &str, category: Category) -> f64 {
    let hits = ScoreHits::of(hook);
    let value = (hits.raw() * multiplier(category)).clamp(0.0, 1.0);
    tracing::debug!(?hits, %category, value, "scored hook");
    value
}

#[cfg(test)]
#[path = "../../tests/unit/content/scorer.rs"]
mod tests;
