use crate::{
    foundation::error::ReelResult,
    foundation::math::to_channel,
    render::frame::FrameRgb8,
    render::pipeline::FrameSource,
};

/// Default thumbnail timestamp in seconds.
pub const THUMBNAIL_AT: f64 = 2.0;

const GAIN: f64 = 1.2;
const LIFT: f64 = 20.0;

/// Brightness/contrast boost `clamp(v * 1.2 + 20)` applied to every channel.
pub fn enhance(frame: &FrameRgb8) -> FrameRgb8 {
    FrameRgb8 {
        data: frame
            .data
            .iter()
            .map(|&v| to_channel(f64::from(v) * GAIN + LIFT))
            .collect(),
        ..frame.clone()
    }
}

/// Enhanced frame at `at` seconds, clamped into `[0, duration]`.
pub fn thumbnail(source: &dyn FrameSource, duration: f64, at: f64) -> ReelResult<FrameRgb8> {
    let t = if at.is_finite() {
        at.clamp(0.0, duration.max(0.0))
    } else {
        0.0
    };
    Ok(enhance(&source.render_at(t)?))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/thumbnail.rs"]
mod tests;
