//! Probe-box path length using the slab method.

use tomosim_math::{is_finite_point, Point3, Segment, Tolerance};

use crate::error::{check_material, Result, ShapeError};
use crate::{ProbeModel, Shape};

/// An axis-aligned box of attenuating material.
///
/// Stored in canonical form: `low <= high` componentwise.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisAlignedBox {
    low: Point3,
    high: Point3,
    material: f64,
}

impl AxisAlignedBox {
    /// Create a box from two arbitrary opposite corners.
    ///
    /// The corners are normalised to `(min, max)` per axis, so their order
    /// never matters. Fails on a negative or non-finite `material` or a
    /// non-finite corner.
    pub fn new(corner_a: Point3, corner_b: Point3, material: f64) -> Result<Self> {
        if !is_finite_point(&corner_a) || !is_finite_point(&corner_b) {
            return Err(ShapeError::NonFiniteCoordinate("box corner"));
        }
        let material = check_material(material)?;
        Ok(Self {
            low: Point3::from(corner_a.coords.inf(&corner_b.coords)),
            high: Point3::from(corner_a.coords.sup(&corner_b.coords)),
            material,
        })
    }

    /// Minimum corner.
    pub fn low(&self) -> Point3 {
        self.low
    }

    /// Maximum corner.
    pub fn high(&self) -> Point3 {
        self.high
    }

    /// Clip the segment's line against the three slabs.
    ///
    /// Returns the `(t_min, t_max)` parameter interval where the line is
    /// inside the box, or `None` for a miss. The interval is in the
    /// segment's own parametrisation and is not clamped to `[0, 1]`.
    pub fn slab_interval(&self, segment: &Segment) -> Option<(f64, f64)> {
        let origin = segment.entry();
        let dir = segment.direction();
        let tol = Tolerance::DEFAULT;

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let (o, d) = (origin[axis], dir[axis]);
            let (lo, hi) = (self.low[axis], self.high[axis]);

            // Parallel to this pair of slab planes
            if tol.is_zero(d) {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        // Shorter than the parallel tolerance on every axis
        if !t_min.is_finite() || !t_max.is_finite() {
            return None;
        }

        // Box entirely behind the entry point
        if t_max < 0.0 {
            return None;
        }

        Some((t_min, t_max))
    }
}

impl Shape for AxisAlignedBox {
    fn material(&self) -> f64 {
        self.material
    }

    fn path_length(&self, segment: &Segment, model: ProbeModel) -> f64 {
        let Some((t_min, t_max)) = self.slab_interval(segment) else {
            return 0.0;
        };
        let (t_in, t_out) = match model {
            ProbeModel::Line => (t_min, t_max),
            ProbeModel::Segment => (t_min.max(0.0), t_max.min(1.0)),
        };
        if t_out <= t_in {
            return 0.0;
        }
        (t_out - t_in) * segment.length()
    }

    fn kind(&self) -> &'static str {
        "box"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: [f64; 3], b: [f64; 3]) -> Segment {
        Segment::new(Point3::new(a[0], a[1], a[2]), Point3::new(b[0], b[1], b[2])).unwrap()
    }

    fn unit_box(material: f64) -> AxisAlignedBox {
        AxisAlignedBox::new(
            Point3::new(-0.5, -0.5, -0.5),
            Point3::new(0.5, 0.5, 0.5),
            material,
        )
        .unwrap()
    }

    #[test]
    fn test_straight_through_x() {
        let loss = unit_box(1.0).compute_loss(&seg([-2.0, 0.0, 0.0], [2.0, 0.0, 0.0]));
        assert!((loss - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_direction() {
        let loss = unit_box(1.0).compute_loss(&seg([2.0, 0.1, -0.2], [-2.0, 0.1, -0.2]));
        assert!((loss - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_corners_normalised() {
        let b = AxisAlignedBox::new(Point3::new(1.0, -2.0, 3.0), Point3::new(-1.0, 2.0, -3.0), 1.0)
            .unwrap();
        assert_eq!(b.low(), Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(b.high(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_space_diagonal() {
        // Full body diagonal of the unit box: sqrt(3)
        let loss = unit_box(1.0).compute_loss(&seg([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]));
        assert!((loss - 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_oblique_through_two_faces() {
        // Enters through the x = -0.5 face, exits through the y = 0.5 face
        let b = unit_box(2.0);
        let probe = seg([-1.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
        // x: t in [0.25, 0.75]; y: t in [-0.5, 0.5] -> [0.25, 0.5]
        let expected = 2.0 * 0.25 * 5.0_f64.sqrt();
        assert!((b.compute_loss(&probe) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_outside_is_miss() {
        let b = unit_box(1.0);
        assert_eq!(b.compute_loss(&seg([-2.0, 2.0, 0.0], [2.0, 2.0, 0.0])), 0.0);
        assert_eq!(b.compute_loss(&seg([-2.0, 0.0, -0.6], [2.0, 0.0, -0.6])), 0.0);
    }

    #[test]
    fn test_parallel_on_face_counts() {
        // Grazing along the face plane is inside the closed slab
        let loss = unit_box(1.0).compute_loss(&seg([-2.0, 0.5, 0.0], [2.0, 0.5, 0.0]));
        assert!((loss - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_oblique_miss() {
        let b = unit_box(1.0);
        assert_eq!(b.compute_loss(&seg([-2.0, 1.0, 0.0], [0.0, 3.0, 0.0])), 0.0);
    }

    #[test]
    fn test_box_behind_entry() {
        let b = unit_box(1.0);
        let probe = seg([2.0, 0.0, 0.0], [3.0, 0.0, 0.0]);
        assert!(b.slab_interval(&probe).is_none());
        assert_eq!(b.compute_loss(&probe), 0.0);
    }

    #[test]
    fn test_line_model_ignores_exit_bound() {
        // Box lies beyond the exit point: the line model still sees it
        let b = unit_box(1.0);
        let probe = seg([-3.0, 0.0, 0.0], [-2.0, 0.0, 0.0]);
        assert!((b.compute_loss_with(&probe, ProbeModel::Line) - 1.0).abs() < 1e-12);
        assert_eq!(b.compute_loss_with(&probe, ProbeModel::Segment), 0.0);
    }

    #[test]
    fn test_segment_model_starts_inside() {
        let b = unit_box(3.0);
        let probe = seg([0.0, 0.0, 0.0], [0.0, 0.0, 2.0]);
        assert!((b.compute_loss_with(&probe, ProbeModel::Segment) - 1.5).abs() < 1e-12);
        // Line model measures the whole crossing
        assert!((b.compute_loss_with(&probe, ProbeModel::Line) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_box_has_no_volume_along_thin_axis() {
        let b = AxisAlignedBox::new(Point3::new(-1.0, -1.0, 0.0), Point3::new(1.0, 1.0, 0.0), 5.0)
            .unwrap();
        assert_eq!(b.compute_loss(&seg([0.0, 0.0, -1.0], [0.0, 0.0, 1.0])), 0.0);
    }

    #[test]
    fn test_invalid_material() {
        let a = Point3::origin();
        let c = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(
            AxisAlignedBox::new(a, c, -1.0),
            Err(ShapeError::InvalidMaterial(-1.0))
        );
        assert_eq!(
            AxisAlignedBox::new(a, Point3::new(f64::INFINITY, 0.0, 0.0), 1.0),
            Err(ShapeError::NonFiniteCoordinate("box corner"))
        );
    }
}
