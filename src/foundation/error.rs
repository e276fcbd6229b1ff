/// Convenience result type used across typomoss.
pub type MossResult<T> = Result<T, MossError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The engine has no IO of its own, so the taxonomy is narrow: the only fatal condition is an
/// unusable render surface at construction time. Everything else is either a rejected update
/// (`Validation`) or a host-side asset problem (`Asset`).
#[derive(thiserror::Error, Debug)]
pub enum MossError {
    /// Invalid user-provided configuration or element data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The render surface is missing, zero-sized, or cannot be allocated.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors while preparing drawable element handles (SVG parsing, rasterization).
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MossError {
    /// Build a [`MossError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MossError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`MossError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`MossError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
