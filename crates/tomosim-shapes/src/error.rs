//! Error types for shape construction.

use thiserror::Error;

/// Errors that can occur when constructing a shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Attenuation coefficient is negative or not finite.
    #[error("invalid material coefficient: {0} (must be finite and >= 0)")]
    InvalidMaterial(f64),

    /// Sphere radius is negative or not finite.
    #[error("invalid sphere radius: {0} (must be finite and >= 0)")]
    InvalidRadius(f64),

    /// A position (centre or corner) has a NaN or infinite coordinate.
    #[error("non-finite coordinate in {0}")]
    NonFiniteCoordinate(&'static str),
}

/// Result type for shape construction.
pub type Result<T> = std::result::Result<T, ShapeError>;

/// Validate an attenuation coefficient.
pub(crate) fn check_material(material: f64) -> Result<f64> {
    if material.is_finite() && material >= 0.0 {
        Ok(material)
    } else {
        Err(ShapeError::InvalidMaterial(material))
    }
}
