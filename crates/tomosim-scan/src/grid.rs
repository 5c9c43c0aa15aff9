//! Detector grid: two parallel planes of sample points and the probes between them.

use tomosim_math::{Point3, Segment};

use crate::error::{Result, ScanError};

/// Z height of the entry plane.
pub const ENTRY_PLANE_Z: f64 = -1.0;

/// Z height of the exit plane.
pub const EXIT_PLANE_Z: f64 = 1.0;

/// Two `N x N` planes of sample points at `z = -1` and `z = +1`, spanning
/// `[-1, 1] x [-1, 1]`.
///
/// Every entry point is paired with every exit point, so a grid of
/// resolution `N` describes `N^4` probe segments indexed `(i, j, k, l)`:
/// entry point `(i, j)` to exit point `(k, l)`. Segments are produced on
/// demand; only the `2 * N^2` plane points are stored.
#[derive(Debug, Clone)]
pub struct DetectorGrid {
    resolution: usize,
    entry_plane: Vec<Point3>,
    exit_plane: Vec<Point3>,
}

impl DetectorGrid {
    /// Build the grid for resolution `n`.
    ///
    /// Point `(i, j)` sits at `(-1 + 2i/(n-1), -1 + 2j/(n-1))` on each plane.
    /// Fails if `n < 2` or if the `n^4` loss tensor's byte size does not fit
    /// in `usize`.
    pub fn new(n: usize) -> Result<Self> {
        if n < 2 {
            return Err(ScanError::ResolutionTooSmall(n));
        }
        Self::estimated_tensor_bytes(n).ok_or(ScanError::ResolutionTooLarge(n))?;

        let mut entry_plane = Vec::with_capacity(n * n);
        let mut exit_plane = Vec::with_capacity(n * n);
        for i in 0..n {
            let x = plane_coordinate(i, n);
            for j in 0..n {
                let y = plane_coordinate(j, n);
                entry_plane.push(Point3::new(x, y, ENTRY_PLANE_Z));
                exit_plane.push(Point3::new(x, y, EXIT_PLANE_Z));
            }
        }

        log::debug!(
            "built {n}x{n} detector grid ({} points per plane, {} segments)",
            n * n,
            n * n * n * n
        );

        Ok(Self {
            resolution: n,
            entry_plane,
            exit_plane,
        })
    }

    /// Points per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Entry plane points, row-major over `(i, j)`.
    pub fn entry_plane(&self) -> &[Point3] {
        &self.entry_plane
    }

    /// Exit plane points, row-major over `(k, l)`.
    pub fn exit_plane(&self) -> &[Point3] {
        &self.exit_plane
    }

    /// Entry point `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn entry(&self, i: usize, j: usize) -> Point3 {
        self.entry_plane[self.plane_index(i, j)]
    }

    /// Exit point `(k, l)`.
    ///
    /// # Panics
    ///
    /// Panics if `k` or `l` is out of range.
    pub fn exit(&self, k: usize, l: usize) -> Point3 {
        self.exit_plane[self.plane_index(k, l)]
    }

    /// Probe from entry point `(i, j)` to exit point `(k, l)`.
    pub fn segment(&self, i: usize, j: usize, k: usize, l: usize) -> Segment {
        // Planes are 2 apart in z, so endpoints never coincide
        Segment::new_unchecked(self.entry(i, j), self.exit(k, l))
    }

    /// Probe at a flattened row-major index `((i*N + j)*N + k)*N + l`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N^4`.
    pub fn segment_at(&self, index: usize) -> Segment {
        assert!(
            index < self.segment_count(),
            "segment index {index} out of range for resolution {}",
            self.resolution
        );
        let per_plane = self.resolution * self.resolution;
        let entry = self.entry_plane[index / per_plane];
        let exit = self.exit_plane[index % per_plane];
        Segment::new_unchecked(entry, exit)
    }

    /// Total number of probes (`N^4`).
    pub fn segment_count(&self) -> usize {
        let per_plane = self.resolution * self.resolution;
        per_plane * per_plane
    }

    /// Lazily iterate all probes in row-major `(i, j, k, l)` order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.entry_plane.iter().flat_map(move |&entry| {
            self.exit_plane
                .iter()
                .map(move |&exit| Segment::new_unchecked(entry, exit))
        })
    }

    /// Bytes needed for the `f64` loss tensor of a resolution-`n` grid.
    ///
    /// Grows as `N^4`; callers can check this before allocating.
    /// Returns `None` on overflow.
    pub fn estimated_tensor_bytes(n: usize) -> Option<usize> {
        checked_segment_count(n)?.checked_mul(std::mem::size_of::<f64>())
    }

    fn plane_index(&self, a: usize, b: usize) -> usize {
        assert!(
            a < self.resolution && b < self.resolution,
            "grid index ({a}, {b}) out of range for resolution {}",
            self.resolution
        );
        a * self.resolution + b
    }
}

/// `-1 + 2i/(n-1)`, divided last so the final point lands exactly on `+1`.
fn plane_coordinate(i: usize, n: usize) -> f64 {
    -1.0 + (2 * i) as f64 / (n - 1) as f64
}

pub(crate) fn checked_segment_count(n: usize) -> Option<usize> {
    let per_plane = n.checked_mul(n)?;
    per_plane.checked_mul(per_plane)
}
