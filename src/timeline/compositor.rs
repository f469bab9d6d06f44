use kurbo::{Affine, Vec2};

use crate::{
    animation::anim::{AnimCtx, ElementTransform, sample_or_identity},
    background::synth::BackgroundSynth,
    content::catalog::CatalogConfig,
    foundation::core::{Canvas, Transform2D},
    foundation::error::{ReelError, ReelResult},
    render::frame::FrameRgb8,
    render::overlay::{FontLibrary, PreparedOverlay},
    render::pipeline::FrameSource,
    timeline::model::{OverlayElement, Timeline},
};

/// Renders a [`Timeline`] at arbitrary timestamps.
///
/// Overlay drawables are parsed once at construction; afterwards the compositor is read-only
/// and `render` can be called from many threads at once.
pub struct Compositor {
    timeline: Timeline,
    synth: BackgroundSynth,
    prepared: Vec<PreparedOverlay>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("canvas", &self.timeline.canvas)
            .field("duration", &self.timeline.duration)
            .field("elements", &self.prepared.len())
            .finish()
    }
}

impl Compositor {
    /// Background palettes come from `catalog`, wave/noise constants from the timeline.
    pub fn new(timeline: Timeline, catalog: &CatalogConfig, fonts: &FontLibrary) -> ReelResult<Self> {
        let synth = BackgroundSynth::from_catalog(catalog, timeline.background.synth)?;
        Self::with_synth(timeline, synth, fonts)
    }

    #[tracing::instrument(skip_all, fields(elements = timeline.elements.len()))]
    pub fn with_synth(
        timeline: Timeline,
        synth: BackgroundSynth,
        fonts: &FontLibrary,
    ) -> ReelResult<Self> {
        timeline.validate()?;
        let prepared = timeline
            .elements
            .iter()
            .map(|e| {
                PreparedOverlay::prepare(&e.content, timeline.canvas, fonts).map_err(|err| {
                    ReelError::invalid_parameter(format!("overlay '{}': {err}", e.id))
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;
        tracing::debug!(canvas = %timeline.canvas, duration = timeline.duration, "compositor ready");
        Ok(Self {
            timeline,
            synth,
            prepared,
        })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    pub fn canvas(&self) -> Canvas {
        self.timeline.canvas
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration
    }

    fn check_time(&self, t: f64) -> ReelResult<()> {
        if !t.is_finite() || t < 0.0 || t > self.timeline.duration {
            return Err(ReelError::invalid_parameter(format!(
                "timestamp {t} outside clip [0, {}]",
                self.timeline.duration
            )));
        }
        Ok(())
    }

    /// Background layer only: color cycle, wave, grain, camera drift, edge fades.
    pub fn render_background(&self, t: f64) -> ReelResult<FrameRgb8> {
        self.check_time(t)?;
        let bg = &self.timeline.background;
        let canvas = self.timeline.canvas;
        let mut frame = FrameRgb8::black(canvas)?;
        self.synth.render_into(
            &mut frame,
            t,
            bg.category,
            self.timeline.duration,
            bg.motion.screen_to_world(t, canvas),
            bg.motion.fade(t, self.timeline.duration),
        )?;
        Ok(frame)
    }

    /// Composite frame at `t`: background, then every active overlay in declaration order.
    ///
    /// Driven through [`crate::render_frames_with`], a panic here is reported as
    /// [`ReelError::Computation`].
    pub fn render(&self, t: f64) -> ReelResult<FrameRgb8> {
        let mut frame = self.render_background(t)?;
        for (element, prepared) in self.timeline.elements.iter().zip(&self.prepared) {
            if !element.is_active(t) {
                continue;
            }
            let (xform, opacity) = self.placement(element, prepared, t);
            prepared.draw(&mut frame, xform, opacity)?;
        }
        Ok(frame)
    }

    /// Local-to-frame transform and opacity of `element` at `t`.
    fn placement(&self, element: &OverlayElement, prepared: &PreparedOverlay, t: f64) -> (Affine, f64) {
        let ctx = AnimCtx {
            elapsed: element.span.elapsed(t),
            duration: element.span.duration(),
        };
        let anim: ElementTransform = sample_or_identity(element.animation.as_ref(), ctx);
        let size = prepared.size();
        let xform = Transform2D {
            translate: element.position.top_left(self.timeline.canvas, size),
            rotation_rad: anim.rotation_rad,
            scale: Vec2::new(anim.scale, anim.scale),
            anchor: size / 2.0,
        };
        (xform.to_affine(), anim.opacity)
    }
}

impl FrameSource for Compositor {
    fn canvas(&self) -> Canvas {
        self.timeline.canvas
    }

    fn render_at(&self, t: f64) -> ReelResult<FrameRgb8> {
        self.render(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/compositor.rs"]
mod tests;
