/// Convenience result type used across reelforge.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Catalog or engine configuration is unusable (empty pool, short color scheme, bad file).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A per-call argument was rejected (duration, resolution, timestamp, element window).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unexpected failure while composing or synthesizing frames.
    #[error("computation failure: {0}")]
    Computation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ReelError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`ReelError::Computation`] value.
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Fold any non-taxonomy error into a [`ReelError::Computation`].
    ///
    /// Configuration and parameter errors keep their identity so callers can still tell
    /// "fix your input" apart from "retry".
    pub fn into_composition_failure(self) -> Self {
        match self {
            Self::Configuration(_) | Self::InvalidParameter(_) | Self::Computation(_) => self,
            other => Self::Computation(other.to_string()),
        }
    }

    /// Turn a caught panic payload into a [`ReelError::Computation`].
    pub fn from_panic(what: &str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(%msg, "{what} panicked");
        Self::Computation(format!("{what} panicked: {msg}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
