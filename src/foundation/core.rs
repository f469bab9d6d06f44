use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Point, Vec2};

/// Straight RGB8 triple.
pub type Rgb8 = [u8; 3];

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::invalid_parameter(format!(
                "resolution must be positive, got {self}"
            )));
        }
        Ok(())
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl std::fmt::Display for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Half-open time window `[start, end)` in seconds.
///
/// Both bounds are stored so neighbouring windows can share a boundary exactly.
/// `start` may be negative; the window is simply clipped by whoever samples it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64, // > start
}

impl TimeSpan {
    pub fn new(start: f64, duration: f64) -> ReelResult<Self> {
        if !start.is_finite() {
            return Err(ReelError::invalid_parameter("span start must be finite"));
        }
        ensure_positive_secs(duration, "span duration")?;
        Self::between(start, start + duration)
    }

    /// Window with explicit bounds; `end` must be strictly after `start`.
    pub fn between(start: f64, end: f64) -> ReelResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ReelError::invalid_parameter(format!(
                "span bounds must be finite, got [{start}, {end})"
            )));
        }
        if end <= start {
            return Err(ReelError::invalid_parameter(format!(
                "span [{start}, {end}) is empty"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn end(self) -> f64 {
        self.end
    }

    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Seconds since the window opened.
    pub fn elapsed(self, t: f64) -> f64 {
        t - self.start
    }

    pub fn overlaps(self, other: TimeSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Reject non-finite or non-positive second counts.
pub fn ensure_positive_secs(secs: f64, what: &str) -> ReelResult<()> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ReelError::invalid_parameter(format!(
            "{what} must be finite and > 0, got {secs}"
        )));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    pub translate: Vec2,
    pub rotation_rad: f64,
    pub scale: Vec2,  // default (1,1)
    pub anchor: Vec2, // pivot in local space
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            scale: Vec2::new(1.0, 1.0),
            anchor: Vec2::ZERO,
        }
    }
}

impl Transform2D {
    pub fn to_affine(self) -> Affine {
        let t_translate = Affine::translate(self.translate);
        let t_anchor = Affine::translate(self.anchor);
        let t_unanchor = Affine::translate(-self.anchor);
        let t_rotate = Affine::rotate(self.rotation_rad);
        let t_scale = Affine::scale_non_uniform(self.scale.x, self.scale.y);

        // T(translate) * T(anchor) * R(rot) * S(scale) * T(-anchor)
        t_translate * t_anchor * t_rotate * t_scale * t_unanchor
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
