//! Error types for scintpix-core.

use thiserror::Error;

/// Result type alias for scintpix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for scintpix operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A token could not be parsed as a decimal number.
    #[error("invalid numeric token: {token:?}")]
    Parse { token: String },

    /// A record did not have the fixed number of fields.
    #[error("malformed record: expected {expected} fields, found {found}")]
    MalformedRecord { expected: usize, found: usize },

    /// Normalization was requested on an image set without any pixels.
    #[error("cannot compute statistics of an empty image set")]
    EmptyImageSet,

    /// Normalization denominator `max - min` is zero or not finite, or the
    /// pixel mean is not finite.
    #[error("degenerate pixel range: min = {min}, max = {max}")]
    DegenerateRange { min: f64, max: f64 },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Array shape does not match the record layout.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}
