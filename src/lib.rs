//! Reelforge composes short vertical videos from procedural backgrounds and timed captions.
//!
//! The engine is split into small layers:
//!
//! - [`content`]: classify a prompt, draw hook/retention/CTA templates, score the hook
//! - [`background`]: deterministic animated backgrounds (color cycle, wave, grain, camera drift)
//! - [`timeline`]: timed overlay elements and the [`Compositor`] that renders them at any `t`
//! - [`render`]: frame buffers, overlay rasterization and parallel frame-sequence rendering
//! - [`pipeline`]: the [`Orchestrator`] tying it all together, platform presets, thumbnails
//!
//! Encoding frames into a container and serving files are left to callers.
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod background;
pub mod content;
pub mod pipeline;
pub mod render;
pub mod timeline;

pub use crate::foundation::core::{Affine, Canvas, Point, Rgb8, TimeSpan, Transform2D, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::anim::{AnimCtx, Animation, ElementTransform};
pub use crate::animation::ease::Ease;
pub use crate::background::motion::BackgroundMotion;
pub use crate::background::synth::{BackgroundSynth, ColorScheme, SynthParams};
pub use crate::content::catalog::{CatalogConfig, CategoryEntry, TemplateKind};
pub use crate::content::category::{Category, classify};
pub use crate::content::scorer::score;
pub use crate::content::script::{ScriptRequest, ScriptStructure, generate_script};
pub use crate::content::selector::{TemplateSelector, select};
pub use crate::pipeline::layout::{LayoutPolicy, SlotPlan, TimelineSpec, build_timeline};
pub use crate::pipeline::orchestrator::{
    ComposeRequest, ComposeSettings, CompositionMetadata, Orchestrator, compose,
};
pub use crate::pipeline::platform::{Platform, PlatformPreset};
pub use crate::pipeline::thumbnail::{THUMBNAIL_AT, enhance, thumbnail};
pub use crate::render::frame::FrameRgb8;
pub use crate::render::overlay::{FontLibrary, OverlayContent, PreparedOverlay, TextStyle};
pub use crate::render::pipeline::{
    FrameSequence, FrameSource, RenderStats, RenderThreading, render_frames, render_frames_with,
};
pub use crate::timeline::compositor::Compositor;
pub use crate::timeline::dsl::{OverlayBuilder, TimelineBuilder};
pub use crate::timeline::model::{BackgroundSpec, Coord, OverlayElement, Position, Timeline};
