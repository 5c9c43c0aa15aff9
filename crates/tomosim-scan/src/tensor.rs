//! Flattened per-probe loss tensor.

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::grid::checked_segment_count;

/// Total loss for every probe of a detector grid.
///
/// Stored flat and row-major over `(i, j, k, l)`:
/// `values[((i*N + j)*N + k)*N + l]` is the summed loss of the probe from
/// entry point `(i, j)` to exit point `(k, l)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLossTensor")]
pub struct LossTensor {
    resolution: usize,
    values: Vec<f64>,
}

/// Unchecked wire form, validated into a [`LossTensor`].
#[derive(Deserialize)]
struct RawLossTensor {
    resolution: usize,
    values: Vec<f64>,
}

impl TryFrom<RawLossTensor> for LossTensor {
    type Error = ScanError;

    fn try_from(raw: RawLossTensor) -> Result<Self, Self::Error> {
        if raw.resolution < 2 {
            return Err(ScanError::ResolutionTooSmall(raw.resolution));
        }
        let expected = checked_segment_count(raw.resolution)
            .ok_or(ScanError::ResolutionTooLarge(raw.resolution))?;
        if raw.values.len() != expected {
            return Err(ScanError::TensorLength {
                resolution: raw.resolution,
                expected,
                actual: raw.values.len(),
            });
        }
        Ok(Self::new(raw.resolution, raw.values))
    }
}

impl LossTensor {
    pub(crate) fn new(resolution: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), resolution.pow(4));
        Self { resolution, values }
    }

    /// Grid resolution `N` the tensor was computed for.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of entries (`N^4`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the tensor holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat index of probe `(i, j, k, l)`.
    pub fn index(&self, i: usize, j: usize, k: usize, l: usize) -> usize {
        let n = self.resolution;
        ((i * n + j) * n + k) * n + l
    }

    /// Loss of probe `(i, j, k, l)`, or `None` if any index is out of range.
    pub fn get(&self, i: usize, j: usize, k: usize, l: usize) -> Option<f64> {
        let n = self.resolution;
        if i >= n || j >= n || k >= n || l >= n {
            return None;
        }
        self.values.get(self.index(i, j, k, l)).copied()
    }

    /// All losses in flat row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consume the tensor, returning the flat loss vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Sum of all losses.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest single loss (0 for an empty scene).
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Number of probes with a strictly positive loss.
    pub fn nonzero_count(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0.0).count()
    }
}
