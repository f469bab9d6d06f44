use kurbo::Vec2;

use crate::{
    animation::anim::Animation,
    background::motion::BackgroundMotion,
    background::synth::SynthParams,
    content::category::Category,
    foundation::core::{Canvas, TimeSpan, ensure_positive_secs},
    foundation::error::{ReelError, ReelResult},
    render::overlay::OverlayContent,
};

/// One axis of an element's placement.
///
/// `Px` and `Fraction` give the top/left edge; `Center` centers the element on that axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coord {
    Center,
    Px(f64),
    /// Fraction of the canvas extent.
    Fraction(f64),
}

impl Coord {
    /// Leading edge in pixels for an element of `extent` on an axis of `canvas_extent`.
    pub fn resolve(self, canvas_extent: f64, extent: f64) -> f64 {
        match self {
            Self::Center => (canvas_extent - extent) / 2.0,
            Self::Px(v) => v,
            Self::Fraction(f) => f * canvas_extent,
        }
    }

    fn is_finite(self) -> bool {
        match self {
            Self::Center => true,
            Self::Px(v) | Self::Fraction(v) => v.is_finite(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub const CENTER: Self = Self {
        x: Coord::Center,
        y: Coord::Center,
    };

    /// Horizontally centered, top edge at `y` pixels.
    pub const fn center_x(y: f64) -> Self {
        Self {
            x: Coord::Center,
            y: Coord::Px(y),
        }
    }

    pub const fn px(x: f64, y: f64) -> Self {
        Self {
            x: Coord::Px(x),
            y: Coord::Px(y),
        }
    }

    /// Top-left corner of an element of `size` placed on `canvas`.
    pub fn top_left(self, canvas: Canvas, size: Vec2) -> Vec2 {
        Vec2::new(
            self.x.resolve(f64::from(canvas.width), size.x),
            self.y.resolve(f64::from(canvas.height), size.y),
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::CENTER
    }
}

/// A timed overlay. Visible for `t` in `[span.start, span.end())`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OverlayElement {
    pub id: String,
    pub content: OverlayContent,
    pub span: TimeSpan,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

impl OverlayElement {
    pub fn is_active(&self, t: f64) -> bool {
        self.span.contains(t)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.id.trim().is_empty() {
            return Err(ReelError::invalid_parameter("overlay id must be non-empty"));
        }
        ensure_positive_secs(self.span.duration(), &format!("overlay '{}' duration", self.id))?;
        if !self.span.start.is_finite() {
            return Err(ReelError::invalid_parameter(format!(
                "overlay '{}' start must be finite",
                self.id
            )));
        }
        if !(self.position.x.is_finite() && self.position.y.is_finite()) {
            return Err(ReelError::invalid_parameter(format!(
                "overlay '{}' position must be finite",
                self.id
            )));
        }
        Ok(())
    }
}

/// Procedural layer under every overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundSpec {
    pub category: Category,
    #[serde(default)]
    pub synth: SynthParams,
    #[serde(default)]
    pub motion: BackgroundMotion,
}

impl BackgroundSpec {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            synth: SynthParams::default(),
            motion: BackgroundMotion::default(),
        }
    }
}

/// Ordered overlays over an animated background.
///
/// Declaration order is z-order: later elements paint over earlier ones. Elements may
/// extend past either end of the clip; they are simply never sampled there.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub canvas: Canvas,
    pub duration: f64,
    pub background: BackgroundSpec,
    pub elements: Vec<OverlayElement>,
}

impl Timeline {
    pub fn validate(&self) -> ReelResult<()> {
        self.canvas.validate()?;
        ensure_positive_secs(self.duration, "timeline duration")?;
        self.background.synth.validate()?;
        self.background.motion.validate()?;

        let mut seen = std::collections::HashSet::new();
        for e in &self.elements {
            e.validate()?;
            if !seen.insert(e.id.as_str()) {
                return Err(ReelError::invalid_parameter(format!(
                    "duplicate overlay id '{}'",
                    e.id
                )));
            }
        }
        Ok(())
    }

    /// Elements visible at `t`, in paint order.
    pub fn active_at(&self, t: f64) -> impl Iterator<Item = &OverlayElement> {
        self.elements.iter().filter(move |e| e.is_active(t))
    }

    pub fn element(&self, id: &str) -> Option<&OverlayElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    pub fn from_json(json: &str) -> ReelResult<Self> {
        let timeline: Self =
            serde_json::from_str(json).map_err(|e| ReelError::serde(e.to_string()))?;
        timeline.validate()?;
        Ok(timeline)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
