use std::collections::BTreeMap;

use kurbo::{Affine, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::{
    content::catalog::CatalogConfig,
    content::category::Category,
    foundation::core::{Canvas, Rgb8, ensure_positive_secs},
    foundation::error::{ReelError, ReelResult},
    foundation::math::{lerp, mix64, to_channel},
    render::frame::FrameRgb8,
};

/// Constants of the moving wave texture and the grain on top of it.
///
/// `wave(x, y) = sin((x + y + t * speed) * freq) * amp + offset`
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SynthParams {
    /// Pixels per second the wave front travels (`K`).
    pub wave_speed: f64,
    /// Spatial frequency, radians per pixel.
    pub wave_freq: f64,
    pub wave_amp: f64,
    pub wave_offset: f64,
    /// Grain is uniform in `[-noise_amplitude, noise_amplitude)`; 0 disables it.
    pub noise_amplitude: f64,
    pub noise_seed: u64,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            wave_speed: 50.0,
            wave_freq: 0.02,
            wave_amp: 0.3,
            wave_offset: 0.7,
            noise_amplitude: 10.0,
            noise_seed: 0,
        }
    }
}

impl SynthParams {
    /// Same wave, no grain: frames become pure functions of `t`.
    pub fn without_noise(self) -> Self {
        Self {
            noise_amplitude: 0.0,
            ..self
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("wave_speed", self.wave_speed),
            ("wave_freq", self.wave_freq),
            ("wave_amp", self.wave_amp),
            ("wave_offset", self.wave_offset),
        ] {
            if !v.is_finite() {
                return Err(ReelError::configuration(format!("{name} must be finite")));
            }
        }
        if !self.noise_amplitude.is_finite() || self.noise_amplitude < 0.0 {
            return Err(ReelError::configuration(
                "noise_amplitude must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Wave intensity at world position `(x, y)` and time `t`.
    pub fn wave(&self, x: f64, y: f64, t: f64) -> f64 {
        ((x + y + t * self.wave_speed) * self.wave_freq).sin() * self.wave_amp + self.wave_offset
    }

    /// Temporal period of the wave term in seconds.
    pub fn wave_period(&self) -> f64 {
        std::f64::consts::TAU / (self.wave_speed * self.wave_freq).abs()
    }
}

/// Cyclic palette for one category. Always holds at least two colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorScheme(Vec<Rgb8>);

impl ColorScheme {
    pub fn new(colors: Vec<Rgb8>) -> ReelResult<Self> {
        if colors.len() < 2 {
            return Err(ReelError::configuration(format!(
                "color scheme needs at least 2 colors, got {}",
                colors.len()
            )));
        }
        Ok(Self(colors))
    }

    pub fn colors(&self) -> &[Rgb8] {
        &self.0
    }

    /// Interpolated color at normalized `progress` (wraps around the palette).
    pub fn color_at(&self, progress: f64) -> [f64; 3] {
        let n = self.0.len();
        let scaled = progress.rem_euclid(1.0) * n as f64;
        let idx = (scaled.floor() as usize) % n;
        let next = (idx + 1) % n;
        let blend = scaled.fract();
        let a = self.0[idx];
        let b = self.0[next];
        [0, 1, 2].map(|c| lerp(f64::from(a[c]), f64::from(b[c]), blend))
    }
}

/// Normalized clip progress `(t / total) mod 1`.
pub fn progress(t: f64, total_duration: f64) -> ReelResult<f64> {
    ensure_positive_secs(total_duration, "total duration")?;
    if !t.is_finite() {
        return Err(ReelError::invalid_parameter("timestamp must be finite"));
    }
    Ok((t / total_duration).rem_euclid(1.0))
}

/// Deterministic animated background generator.
///
/// Read-only after construction, so one instance can feed any number of render workers.
#[derive(Clone, Debug)]
pub struct BackgroundSynth {
    schemes: BTreeMap<Category, ColorScheme>,
    params: SynthParams,
}

impl BackgroundSynth {
    pub fn new(schemes: BTreeMap<Category, ColorScheme>, params: SynthParams) -> ReelResult<Self> {
        params.validate()?;
        for category in Category::ALL {
            if !schemes.contains_key(&category) {
                return Err(ReelError::configuration(format!(
                    "no color scheme declared for '{category}'"
                )));
            }
        }
        Ok(Self { schemes, params })
    }

    /// Build from the palettes declared in a catalog.
    pub fn from_catalog(catalog: &CatalogConfig, params: SynthParams) -> ReelResult<Self> {
        let mut schemes = BTreeMap::new();
        for category in Category::ALL {
            let scheme = ColorScheme::new(catalog.colors(category)?.to_vec()).map_err(|e| {
                ReelError::configuration(format!("category '{category}': {e}"))
            })?;
            schemes.insert(category, scheme);
        }
        Self::new(schemes, params)
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    pub fn scheme(&self, category: Category) -> ReelResult<&ColorScheme> {
        self.schemes.get(&category).ok_or_else(|| {
            ReelError::configuration(format!("no color scheme declared for '{category}'"))
        })
    }

    /// Base color at `t` before wave shading and grain.
    pub fn base_color(&self, t: f64, category: Category, total_duration: f64) -> ReelResult<[f64; 3]> {
        let p = progress(t, total_duration)?;
        Ok(self.scheme(category)?.color_at(p))
    }

    /// Shaded pixel value at world position `(x, y)` without grain or clamping.
    pub fn shade(&self, base: [f64; 3], x: f64, y: f64, t: f64) -> [f64; 3] {
        let w = self.params.wave(x, y, t);
        base.map(|c| c * w)
    }

    /// Full frame at `t`: color cycle, wave, grain, clamp.
    pub fn frame_at(
        &self,
        t: f64,
        category: Category,
        total_duration: f64,
        canvas: Canvas,
    ) -> ReelResult<FrameRgb8> {
        let mut frame = FrameRgb8::black(canvas)?;
        self.render_into(
            &mut frame,
            t,
            category,
            total_duration,
            Affine::IDENTITY,
            1.0,
        )?;
        Ok(frame)
    }

    /// Paint the background into `frame`.
    ///
    /// `screen_to_world` maps output pixel coordinates into the procedural field (camera
    /// motion); `gain` scales the final color (cross-fades).
    pub fn render_into(
        &self,
        frame: &mut FrameRgb8,
        t: f64,
        category: Category,
        total_duration: f64,
        screen_to_world: Affine,
        gain: f64,
    ) -> ReelResult<()> {
        let base = self.base_color(t, category, total_duration)?;
        let gain = if gain.is_finite() {
            gain.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let width = frame.width as usize;
        let stride = frame.stride();
        let noise_amp = self.params.noise_amplitude;
        let frame_seed = mix64(self.params.noise_seed ^ mix64(t.to_bits()));

        frame
            .data
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                let mut rng = (noise_amp > 0.0)
                    .then(|| StdRng::seed_from_u64(mix64(frame_seed ^ y as u64)));
                for x in 0..width {
                    let p = screen_to_world * Point::new(x as f64, y as f64);
                    let shaded = self.shade(base, p.x, p.y, t);
                    let grain = match rng.as_mut() {
                        Some(rng) => rng.gen_range(-noise_amp..noise_amp),
                        None => 0.0,
                    };
                    let px = &mut row[x * 3..x * 3 + 3];
                    for c in 0..3 {
                        px[c] = to_channel((shaded[c] + grain).clamp(0.0, 255.0) * gain);
                    }
                }
            });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/background/synth.rs"]
mod tests;
