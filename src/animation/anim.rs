use std::sync::Arc;

use crate::animation::ease::Ease;

#[derive(Clone, Copy, Debug)]
/// Sampling context handed to element animations.
pub struct AnimCtx {
    /// Seconds since the element's window opened (`t - start`).
    pub elapsed: f64,
    /// Length of the element's window in seconds.
    pub duration: f64,
}

/// Per-element transform applied before compositing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementTransform {
    /// Uniform scale about the element center.
    pub scale: f64,
    /// Rotation about the element center, radians.
    pub rotation_rad: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ElementTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation_rad: 0.0,
        opacity: 1.0,
    };

    /// Apply `other` on top of `self`: scales and opacities multiply, rotations add.
    pub fn then(self, other: Self) -> Self {
        Self {
            scale: self.scale * other.scale,
            rotation_rad: self.rotation_rad + other.rotation_rad,
            opacity: self.opacity * other.opacity,
        }
    }

    /// Clamp opacity and reject degenerate scales so rasterization never sees NaN.
    pub fn sanitized(self) -> Self {
        let scale = if self.scale.is_finite() {
            self.scale.max(0.0)
        } else {
            1.0
        };
        let rotation_rad = if self.rotation_rad.is_finite() {
            self.rotation_rad
        } else {
            0.0
        };
        let opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            scale,
            rotation_rad,
            opacity,
        }
    }
}

/// Caller-supplied animation function of elapsed time.
#[derive(Clone)]
pub struct AnimFn(pub Arc<dyn Fn(AnimCtx) -> ElementTransform + Send + Sync>);

impl AnimFn {
    pub fn new(f: impl Fn(AnimCtx) -> ElementTransform + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl std::fmt::Debug for AnimFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AnimFn(..)")
    }
}

/// Element animation evaluated at `elapsed = t - element.start`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Animation {
    /// Breathing scale `1 + amplitude * sin(angular_speed * elapsed)`.
    Pulse { amplitude: f64, angular_speed: f64 },
    /// Opacity ramp 0 -> 1 over the first `secs`.
    FadeIn { secs: f64, ease: Ease },
    /// Opacity ramp 1 -> 0 over the last `secs` of the window.
    FadeOut { secs: f64, ease: Ease },
    /// Scale ramp `from_scale` -> 1 over the first `secs`.
    PopIn { secs: f64, from_scale: f64, ease: Ease },
    /// Rotation `degrees * sin(angular_speed * elapsed)`.
    Wobble { degrees: f64, angular_speed: f64 },
    /// All children, combined with [`ElementTransform::then`].
    Stack { layers: Vec<Animation> },
    /// Arbitrary function; not serializable.
    #[serde(skip)]
    Custom(AnimFn),
}

impl Animation {
    pub fn custom(f: impl Fn(AnimCtx) -> ElementTransform + Send + Sync + 'static) -> Self {
        Self::Custom(AnimFn::new(f))
    }

    pub fn sample(&self, ctx: AnimCtx) -> ElementTransform {
        let id = ElementTransform::IDENTITY;
        match self {
            Self::Pulse {
                amplitude,
                angular_speed,
            } => ElementTransform {
                scale: 1.0 + amplitude * (angular_speed * ctx.elapsed).sin(),
                ..id
            },
            Self::FadeIn { secs, ease } => ElementTransform {
                opacity: ramp(ctx.elapsed, *secs, *ease),
                ..id
            },
            Self::FadeOut { secs, ease } => ElementTransform {
                opacity: ramp(ctx.duration - ctx.elapsed, *secs, *ease),
                ..id
            },
            Self::PopIn {
                secs,
                from_scale,
                ease,
            } => ElementTransform {
                scale: from_scale + (1.0 - from_scale) * ramp(ctx.elapsed, *secs, *ease),
                ..id
            },
            Self::Wobble {
                degrees,
                angular_speed,
            } => ElementTransform {
                rotation_rad: degrees.to_radians() * (angular_speed * ctx.elapsed).sin(),
                ..id
            },
            Self::Stack { layers } => layers
                .iter()
                .fold(id, |acc, child| acc.then(child.sample(ctx))),
            Self::Custom(f) => (f.0)(ctx),
        }
    }
}

/// Eased progress of `x` through `[0, secs]`; a zero-length ramp is already complete.
fn ramp(x: f64, secs: f64, ease: Ease) -> f64 {
    if secs <= 0.0 || !secs.is_finite() {
        return 1.0;
    }
    ease.apply(x / secs)
}

/// Sample an optional animation; absent animations are the identity.
pub fn sample_or_identity(anim: Option<&Animation>, ctx: AnimCtx) -> ElementTransform {
    anim.map_or(ElementTransform::IDENTITY, |a| a.sample(ctx))
        .sanitized()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
