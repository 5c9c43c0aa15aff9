//! Error types for scan setup.

use thiserror::Error;
use tomosim_math::GeometryError;
use tomosim_shapes::ShapeError;

/// Errors that can occur while setting up a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Grid resolution below the minimum of 2 points per axis.
    #[error("grid resolution {0} is too small (need at least 2 points per axis)")]
    ResolutionTooSmall(usize),

    /// Grid resolution whose N^4 tensor byte size overflows `usize`.
    #[error("grid resolution {0} is too large: the N^4 loss tensor overflows")]
    ResolutionTooLarge(usize),

    /// Loss values whose count is not `N^4` for the stated resolution.
    #[error("loss tensor for resolution {resolution} has {actual} values, expected {expected}")]
    TensorLength {
        /// Stated grid resolution.
        resolution: usize,
        /// `N^4`.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Invalid probe geometry.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Invalid shape parameters.
    #[error("invalid shape #{index}: {source}")]
    Shape {
        /// Position of the shape in the scene's shape list.
        index: usize,
        /// Underlying construction error.
        source: ShapeError,
    },

    /// Scene file could not be read.
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    /// Scene file could not be parsed.
    #[error("failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
