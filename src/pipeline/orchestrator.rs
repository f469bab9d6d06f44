//! End-to-end composition: prompt in, [`Timeline`] plus [`CompositionMetadata`] out.
//!
//! Sequence: classify, draw hook/retention/CTA, score the hook, lay the script out over the
//! clip. Either the whole pair is produced or a single typed error is returned.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::{
    background::motion::BackgroundMotion,
    background::synth::SynthParams,
    content::catalog::CatalogConfig,
    content::category::Category,
    content::script::{ScriptRequest, ScriptStructure, generate_script},
    foundation::core::Canvas,
    foundation::error::{ReelError, ReelResult},
    pipeline::layout::{LayoutPolicy, TimelineSpec, build_timeline},
    pipeline::platform::Platform,
    render::overlay::FontLibrary,
    render::pipeline::FrameSequence,
    timeline::compositor::Compositor,
    timeline::model::Timeline,
};

/// Accepted clip lengths in seconds.
pub const MIN_DURATION: f64 = 15.0;
pub const MAX_DURATION: f64 = 60.0;

pub const OPTIMIZATION_TAG: &str = "viral_shorts";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComposeRequest {
    pub prompt: String,
    /// Skip classification and use this category.
    #[serde(default)]
    pub category: Option<Category>,
    /// Use this hook instead of drawing one.
    #[serde(default)]
    pub hook: Option<String>,
    pub duration: f64,
    pub canvas: Canvas,
    pub fps: u32,
    /// Pins template draws and background grain. `None` uses the orchestrator's shared source.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ComposeRequest {
    /// 30 fps, 720x1280 vertical.
    pub fn new(prompt: impl Into<String>, duration: f64) -> Self {
        Self {
            prompt: prompt.into(),
            category: None,
            hook: None,
            duration,
            canvas: Canvas {
                width: 720,
                height: 1280,
            },
            fps: 30,
            seed: None,
        }
    }

    /// Resolution and fps from `platform`; duration clipped to its limit.
    pub fn for_platform(prompt: impl Into<String>, duration: f64, platform: Platform) -> Self {
        let preset = platform.preset();
        Self {
            canvas: preset.canvas,
            fps: preset.fps,
            duration: preset.clip_duration(duration),
            ..Self::new(prompt, duration)
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(ReelError::invalid_parameter("prompt must be non-empty"));
        }
        if !(self.duration.is_finite() && (MIN_DURATION..=MAX_DURATION).contains(&self.duration)) {
            return Err(ReelError::invalid_parameter(format!(
                "duration must be within [{MIN_DURATION}, {MAX_DURATION}] seconds, got {}",
                self.duration
            )));
        }
        if self.fps == 0 {
            return Err(ReelError::invalid_parameter("fps must be > 0"));
        }
        self.canvas.validate()
    }
}

/// Read-only record describing one finished composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionMetadata {
    pub category: Category,
    pub engagement_score: f64,
    pub duration: f64,
    pub resolution: Canvas,
    pub fps: u32,
    pub created_at: DateTime<Utc>,
    pub optimization: String,
    pub script: ScriptStructure,
}

impl CompositionMetadata {
    pub fn frame_sequence(&self) -> ReelResult<FrameSequence> {
        FrameSequence::new(self.fps, self.duration, self.resolution)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }
}

/// Tunables shared by every composition.
#[derive(Clone, Debug, Default)]
pub struct ComposeSettings {
    pub policy: LayoutPolicy,
    pub synth: SynthParams,
    pub motion: BackgroundMotion,
}

/// Compose with an explicit catalog and random source.
///
/// Only the selected category is checked against the catalog invariants, so this also works
/// with partially configured catalogs.
pub fn compose<R: Rng + ?Sized>(
    catalog: &CatalogConfig,
    settings: &ComposeSettings,
    req: &ComposeRequest,
    rng: &mut R,
) -> ReelResult<(Timeline, CompositionMetadata)> {
    let attempt = catch_unwind(AssertUnwindSafe(|| compose_inner(catalog, settings, req, rng)));
    match attempt {
        Ok(result) => result.map_err(ReelError::into_composition_failure),
        Err(payload) => Err(ReelError::from_panic("composition", payload)),
    }
}

fn compose_inner<R: Rng + ?Sized>(
    catalog: &CatalogConfig,
    settings: &ComposeSettings,
    req: &ComposeRequest,
    rng: &mut R,
) -> ReelResult<(Timeline, CompositionMetadata)> {
    req.validate()?;
    match req.seed {
        Some(seed) => assemble(catalog, settings, req, &mut StdRng::seed_from_u64(seed)),
        None => assemble(catalog, settings, req, rng),
    }
}

fn assemble<R: Rng + ?Sized>(
    catalog: &CatalogConfig,
    settings: &ComposeSettings,
    req: &ComposeRequest,
    rng: &mut R,
) -> ReelResult<(Timeline, CompositionMetadata)> {
    let script = generate_script(
        catalog,
        &ScriptRequest {
            prompt: &req.prompt,
            category: req.category,
            hook: req.hook.as_deref(),
            main_point_count: catalog.main_points.len(),
        },
        rng,
    )?;

    let synth = SynthParams {
        noise_seed: req.seed.unwrap_or_else(|| RngCore::next_u64(rng)),
        ..settings.synth
    };
    let timeline = build_timeline(
        &script,
        &TimelineSpec {
            canvas: req.canvas,
            duration: req.duration,
            policy: settings.policy,
            synth,
            motion: settings.motion,
        },
    )?;

    tracing::info!(
        category = %script.category,
        score = script.engagement_score,
        elements = timeline.elements.len(),
        "composition ready"
    );

    let metadata = CompositionMetadata {
        category: script.category,
        engagement_score: script.engagement_score,
        duration: req.duration,
        resolution: req.canvas,
        fps: req.fps,
        created_at: Utc::now(),
        optimization: OPTIMIZATION_TAG.to_string(),
        script,
    };
    Ok((timeline, metadata))
}

/// Owns the validated catalog and the shared random source.
///
/// Safe to share across threads; concurrent `compose` calls serialize only on the RNG lock.
pub struct Orchestrator {
    catalog: CatalogConfig,
    settings: ComposeSettings,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("categories", &self.catalog.categories.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Validates the whole catalog up front; failures are [`ReelError::Configuration`].
    pub fn new(catalog: CatalogConfig) -> ReelResult<Self> {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Deterministic shared random source.
    pub fn with_seed(catalog: CatalogConfig, seed: u64) -> ReelResult<Self> {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: CatalogConfig, rng: StdRng) -> ReelResult<Self> {
        catalog.validate()?;
        Ok(Self {
            catalog,
            settings: ComposeSettings::default(),
            rng: Mutex::new(rng),
        })
    }

    pub fn settings(mut self, settings: ComposeSettings) -> ReelResult<Self> {
        settings.policy.validate()?;
        settings.synth.validate()?;
        settings.motion.validate()?;
        self.settings = settings;
        Ok(self)
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    #[tracing::instrument(skip(self, req), fields(prompt = %req.prompt, duration = req.duration))]
    pub fn compose(&self, req: &ComposeRequest) -> ReelResult<(Timeline, CompositionMetadata)> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        compose(&self.catalog, &self.settings, req, &mut *rng)
    }

    pub fn compose_with_rng<R: Rng + ?Sized>(
        &self,
        req: &ComposeRequest,
        rng: &mut R,
    ) -> ReelResult<(Timeline, CompositionMetadata)> {
        compose(&self.catalog, &self.settings, req, rng)
    }

    /// Renderer for a timeline produced by this orchestrator.
    pub fn compositor(&self, timeline: Timeline, fonts: &FontLibrary) -> ReelResult<Compositor> {
        Compositor::new(timeline, &self.catalog, fonts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
