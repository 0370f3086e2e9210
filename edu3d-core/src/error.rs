/// Error types for model construction
use thiserror::Error;

/// Invalid-argument conditions raised before any geometry is computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A real-valued parameter was zero, negative, or not finite.
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A grid axis that must hold at least one cell was zero.
    #[error("{name} must be at least 1")]
    ZeroDimension { name: &'static str },
}

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Reject zero, negative, NaN and infinite values.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::NonPositive { name, value })
    }
}

pub(crate) fn ensure_nonzero(name: &'static str, value: u32) -> Result<u32> {
    if value == 0 {
        Err(GeometryError::ZeroDimension { name })
    } else {
        Ok(value)
    }
}
