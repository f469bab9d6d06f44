/// Content topic driving template and color selection.
///
/// Declaration order of the keyword-bearing variants is the tie-break priority used by
/// [`classify`]: when two categories match the same number of keywords, the one declared
/// first wins.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Money, trading, business.
    Finance,
    /// AI, apps, software.
    Tech,
    /// Habits, health, productivity.
    Lifestyle,
    /// Mindset, goals, inspiration.
    Motivation,
    /// Fallback when no keyword matched.
    Default,
}

impl Category {
    /// Every category, in priority order.
    pub const ALL: [Category; 5] = [
        Self::Finance,
        Self::Tech,
        Self::Lifestyle,
        Self::Motivation,
        Self::Default,
    ];

    /// Categories that take part in keyword scoring, in tie-break priority order.
    pub const PRIORITY: [Category; 4] = [Self::Finance, Self::Tech, Self::Lifestyle, Self::Motivation];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Tech => "tech",
            Self::Lifestyle => "lifestyle",
            Self::Motivation => "motivation",
            Self::Default => "default",
        }
    }

    /// Lower-case keywords counted by [`classify`].
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Finance => &[
                "money",
                "trading",
                "crypto",
                "investment",
                "profit",
                "business",
                "income",
            ],
            Self::Tech => &[
                "ai",
                "technology",
                "app",
                "software",
                "digital",
                "online",
                "automation",
            ],
            Self::Lifestyle => &[
                "habit",
                "routine",
                "health",
                "fitness",
                "productivity",
                "success",
            ],
            Self::Motivation => &[
                "motivation",
                "inspire",
                "mindset",
                "goal",
                "achieve",
                "dream",
            ],
            Self::Default => &[],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::ReelError::invalid_parameter(format!("unknown category '{s}'")))
    }
}

/// Number of distinct category keywords present in `lowered` (substring match).
pub fn keyword_score(lowered: &str, category: Category) -> usize {
    category
        .keywords()
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .count()
}

/// Map free text onto a [`Category`].
///
/// Total: texts without any recognized keyword resolve to [`Category::Default`].
pub fn classify(text: &str) -> Category {
    let lowered = text.to_lowercase();
    let mut best = Category::Default;
    let mut best_score = 0usize;
    for category in Category::PRIORITY {
        let score = keyword_score(&lowered, category);
        // Strictly greater: an equal later score never displaces an earlier category.
        if score > best_score {
            best = category;
            best_score = score;
        }
    }
    tracing::debug!(category = %best, score = best_score, "classified prompt");
    best
}

#[cfg(test)]
#[path = "../../tests/unit/content/category.rs"]
mod tests;
