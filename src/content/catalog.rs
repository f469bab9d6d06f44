use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use crate::{
    content::category::Category,
    foundation::core::Rgb8,
    foundation::error::{ReelError, ReelResult},
};

/// Which template pool a string is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Opening attention grabber.
    Hook,
    /// Mid-video "keep watching" line.
    Retention,
    /// Closing call to action.
    Cta,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [Self::Hook, Self::Retention, Self::Cta];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hook => "hooks",
            Self::Retention => "retention",
            Self::Cta => "cta",
        }
    }
}

/// Per-category template pools and background palette.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryEntry {
    pub hooks: Vec<String>,
    pub retention: Vec<String>,
    pub cta: Vec<String>,
    /// Cyclic background palette, at least two colors.
    pub colors: Vec<Rgb8>,
}

impl CategoryEntry {
    pub fn pool(&self, kind: TemplateKind) -> &[String] {
        match kind {
            TemplateKind::Hook => &self.hooks,
            TemplateKind::Retention => &self.retention,
            TemplateKind::Cta => &self.cta,
        }
    }

    pub fn pool_mut(&mut self, kind: TemplateKind) -> &mut Vec<String> {
        match kind {
            TemplateKind::Hook => &mut self.hooks,
            TemplateKind::Retention => &mut self.retention,
            TemplateKind::Cta => &mut self.cta,
        }
    }
}

/// Declared content configuration: `{category: {hooks, retention, cta, colors}}` plus the
/// ordered main-point lines shared by every category.
///
/// Loaded once at process start; treat as read-only afterwards.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogConfig {
    pub categories: BTreeMap<Category, CategoryEntry>,
    /// Main-point lines in presentation order. The last line is the finale.
    pub main_points: Vec<String>,
}

impl CatalogConfig {
    /// Parse a catalog from JSON text and validate it.
    pub fn from_json(json: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ReelError::configuration(format!("catalog json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a catalog JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    pub fn entry(&self, category: Category) -> ReelResult<&CategoryEntry> {
        self.categories.get(&category).ok_or_else(|| {
            ReelError::configuration(format!("category '{category}' is not declared"))
        })
    }

    pub fn entry_mut(&mut self, category: Category) -> Option<&mut CategoryEntry> {
        self.categories.get_mut(&category)
    }

    pub fn pool(&self, category: Category, kind: TemplateKind) -> ReelResult<&[String]> {
        Ok(self.entry(category)?.pool(kind))
    }

    pub fn colors(&self, category: Category) -> ReelResult<&[Rgb8]> {
        Ok(&self.entry(category)?.colors)
    }

    /// Check the invariants for a single category.
    pub fn validate_category(&self, category: Category) -> ReelResult<()> {
        let entry = self.entry(category)?;
        for kind in TemplateKind::ALL {
            let pool = entry.pool(kind);
            if pool.is_empty() {
                return Err(ReelError::configuration(format!(
                    "category '{category}' has an empty {} pool",
                    kind.as_str()
                )));
            }
            if pool.iter().any(|s| s.trim().is_empty()) {
                return Err(ReelError::configuration(format!(
                    "category '{category}' has a blank entry in its {} pool",
                    kind.as_str()
                )));
            }
        }
        if entry.colors.len() < 2 {
            return Err(ReelError::configuration(format!(
                "category '{category}' color scheme needs at least 2 colors, got {}",
                entry.colors.len()
            )));
        }
        Ok(())
    }

    /// Check every declared-category invariant. Fatal at startup.
    pub fn validate(&self) -> ReelResult<()> {
        for category in Category::ALL {
            self.validate_category(category)?;
        }
        if self.main_points.is_empty() {
            return Err(ReelError::configuration("main_points must be non-empty"));
        }
        Ok(())
    }

    /// Template pools and palettes shipped with the engine.
    pub fn builtin() -> Self {
        fn lines(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        }

        let retention = lines(&[
            "Wait until you see what happens next...",
            "But here's where it gets interesting...",
            "The shocking truth is...",
            "This will blow your mind...",
            "You won't believe what happened...",
        ]);
        let cta = lines(&[
            "Follow for more secrets like this!",
            "Save this before it gets taken down!",
            "Share this with someone who needs it!",
            "Comment 'YES' if you want part 2!",
            "Double tap if this helped you!",
        ]);
        let entry = |hooks: &[&str], colors: &[Rgb8]| CategoryEntry {
            hooks: lines(hooks),
            retention: retention.clone(),
            cta: cta.clone(),
            colors: colors.to_vec(),
        };

        let lifestyle_colors: [Rgb8; 3] = [[255, 182, 193], [255, 160, 122], [255, 105, 180]];

        let mut categories = BTreeMap::new();
        categories.insert(
            Category::Finance,
            entry(
                &[
                    "This ONE secret made me $10k in 30 days",
                    "Banks HATE this simple trick",
                    "Turn $100 into $1000 (Step by step)",
                    "I discovered this at 3 AM and it changed everything",
                    "Nobody talks about this money strategy",
                ],
                &[[34, 139, 34], [0, 100, 0], [50, 205, 50]],
            ),
        );
        categories.insert(
            Category::Tech,
            entry(
                &[
                    "This AI can do ANYTHING in seconds",
                    "Technology that will replace 90% of jobs",
                    "This app made me $500/day on autopilot",
                    "AI just solved humanity's biggest problem",
                    "This tech breakthrough will shock you",
                ],
                &[[0, 191, 255], [138, 43, 226], [75, 0, 130]],
            ),
        );
        categories.insert(
            Category::Lifestyle,
            entry(
                &[
                    "I did this for 30 days and here's what happened",
                    "This morning habit changed my entire life",
                    "You've been doing this WRONG your whole life",
                    "The 1% secret that nobody teaches you",
                    "This will be trending everywhere in 2024",
                ],
                &lifestyle_colors,
            ),
        );
        categories.insert(
            Category::Motivation,
            entry(
                &[
                    "From broke to millionaire in 2 years",
                    "This mindset shift changed everything",
                    "What successful people do at 5 AM",
                    "The psychology trick that gets you anything",
                    "Why 99% of people never succeed",
                ],
                &[[255, 69, 0], [255, 140, 0], [255, 215, 0]],
            ),
        );
        categories.insert(
            Category::Default,
            entry(
                &[
                    "I tried this for 30 days... SHOCKING results!",
                    "You've been doing this WRONG your whole life!",
                    "This habit will make you UNSTOPPABLE!",
                    "Nobody tells you this, so I will",
                ],
                &lifestyle_colors,
            ),
        );

        Self {
            categories,
            main_points: lines(&[
                "First, understand this key principle...",
                "Next, apply this proven method...",
                "Then, avoid the mistake everyone makes...",
                "Now, stack the small wins...",
                "Here's the part nobody tells you...",
                "Keep going when it gets boring...",
                "Track what actually works...",
                "Finally, see these incredible results...",
            ]),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/catalog.rs"]
mod tests;
