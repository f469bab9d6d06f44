use std::str::FromStr;

use crate::{
    foundation::core::Canvas,
    foundation::error::{ReelError, ReelResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Tiktok,
    YoutubeShorts,
    Facebook,
}

/// Output constraints of a publishing target.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlatformPreset {
    pub canvas: Canvas,
    pub fps: u32,
    pub max_duration: f64,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Self::Instagram,
        Self::Tiktok,
        Self::YoutubeShorts,
        Self::Facebook,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
            Self::YoutubeShorts => "youtube_shorts",
            Self::Facebook => "facebook",
        }
    }

    pub fn preset(self) -> PlatformPreset {
        let (width, height, max_duration) = match self {
            Self::Instagram | Self::Facebook => (720, 720, 30.0),
            Self::Tiktok => (720, 1280, 30.0),
            Self::YoutubeShorts => (720, 1280, 60.0),
        };
        PlatformPreset {
            canvas: Canvas { width, height },
            fps: 30,
            max_duration,
        }
    }

    /// Lenient lookup: unknown names resolve to Instagram.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(name, "unknown platform, using instagram");
            Self::Instagram
        })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ReelError;

    fn from_str(s: &str) -> ReelResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| ReelError::invalid_parameter(format!("unknown platform '{s}'")))
    }
}

impl PlatformPreset {
    /// Clip `duration` to the platform limit.
    pub fn clip_duration(&self, duration: f64) -> f64 {
        if duration > self.max_duration {
            tracing::warn!(
                requested = duration,
                max = self.max_duration,
                "duration exceeds platform limit, clipping"
            );
            self.max_duration
        } else {
            duration
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/platform.rs"]
mod tests;
