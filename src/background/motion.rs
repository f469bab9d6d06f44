use kurbo::{Affine, Vec2};

use crate::{
    animation::ease::Ease,
    foundation::core::{Canvas, Transform2D},
    foundation::error::{ReelError, ReelResult},
};

/// Slow camera drift over the background plus cross-fades at the clip edges.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundMotion {
    /// Zoom factor is `1 + zoom_amplitude * sin(zoom_speed * t)`.
    pub zoom_amplitude: f64,
    pub zoom_speed: f64,
    /// Rotation is `rotation_degrees * sin(rotation_speed * t)`.
    pub rotation_degrees: f64,
    pub rotation_speed: f64,
    /// Fade-in from black at the start and fade-out at the end; 0 disables.
    pub crossfade_secs: f64,
    #[serde(default)]
    pub crossfade_ease: Ease,
}

impl Default for BackgroundMotion {
    fn default() -> Self {
        Self {
            zoom_amplitude: 0.05,
            zoom_speed: 0.5,
            rotation_degrees: 2.0,
            rotation_speed: 0.3,
            crossfade_secs: 1.0,
            crossfade_ease: Ease::Linear,
        }
    }
}

impl BackgroundMotion {
    /// No camera movement and no fades.
    pub fn still() -> Self {
        Self {
            zoom_amplitude: 0.0,
            zoom_speed: 0.0,
            rotation_degrees: 0.0,
            rotation_speed: 0.0,
            crossfade_secs: 0.0,
            crossfade_ease: Ease::Linear,
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        let fields = [
            self.zoom_amplitude,
            self.zoom_speed,
            self.rotation_degrees,
            self.rotation_speed,
            self.crossfade_secs,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(ReelError::configuration("background motion values must be finite"));
        }
        if self.crossfade_secs < 0.0 {
            return Err(ReelError::configuration("crossfade_secs must be >= 0"));
        }
        if self.zoom_amplitude.abs() >= 1.0 {
            return Err(ReelError::configuration("zoom_amplitude must be in (-1, 1)"));
        }
        Ok(())
    }

    pub fn zoom(&self, t: f64) -> f64 {
        1.0 + self.zoom_amplitude * (self.zoom_speed * t).sin()
    }

    pub fn rotation_rad(&self, t: f64) -> f64 {
        self.rotation_degrees.to_radians() * (self.rotation_speed * t).sin()
    }

    /// World-to-screen camera transform at `t`, pivoting on the canvas center.
    pub fn camera(&self, t: f64, canvas: Canvas) -> Affine {
        let zoom = self.zoom(t);
        Transform2D {
            translate: Vec2::ZERO,
            rotation_rad: self.rotation_rad(t),
            scale: Vec2::new(zoom, zoom),
            anchor: canvas.center(),
        }
        .to_affine()
    }

    /// Inverse camera: maps output pixels back into the procedural field.
    pub fn screen_to_world(&self, t: f64, canvas: Canvas) -> Affine {
        self.camera(t, canvas).inverse()
    }

    /// Brightness gain in `[0, 1]` from the edge cross-fades.
    pub fn fade(&self, t: f64, total_duration: f64) -> f64 {
        if self.crossfade_secs <= 0.0 {
            return 1.0;
        }
        let fade_in = (t / self.crossfade_secs).clamp(0.0, 1.0);
        let fade_out = ((total_duration - t) / self.crossfade_secs).clamp(0.0, 1.0);
        self.crossfade_ease.apply(fade_in.min(fade_out))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/background/motion.rs"]
mod tests;
