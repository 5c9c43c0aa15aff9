//! Probe-sphere path length (closest approach and chord).

use tomosim_math::{is_finite_point, Point3, Segment};

use crate::error::{check_material, Result, ShapeError};
use crate::{ProbeModel, Shape};

/// A homogeneous sphere of attenuating material.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: f64,
}

impl Sphere {
    /// Create a sphere.
    ///
    /// Fails if `radius` or `material` is negative or not finite, or if the
    /// centre has a non-finite coordinate.
    pub fn new(center: Point3, radius: f64, material: f64) -> Result<Self> {
        if !is_finite_point(&center) {
            return Err(ShapeError::NonFiniteCoordinate("sphere center"));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(ShapeError::InvalidRadius(radius));
        }
        let material = check_material(material)?;
        Ok(Self {
            center,
            radius,
            material,
        })
    }

    /// Centre of the sphere.
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Radius of the sphere.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Chord length for the infinite-line model.
    ///
    /// Finds the point of the segment (parameter clamped to `[0, 1]`)
    /// closest to the centre and returns `2 * sqrt(r^2 - dist^2)`.
    fn line_chord(&self, segment: &Segment) -> f64 {
        let d = segment.direction();
        let s = self.center - segment.entry();
        let dd = d.dot(&d);
        debug_assert!(dd > 0.0, "segment must not be degenerate");

        let t = (s.dot(&d) / dd).clamp(0.0, 1.0);
        let distance = (segment.at(t) - self.center).norm();

        // Tangent probes count as misses
        if distance >= self.radius {
            return 0.0;
        }
        2.0 * (self.radius * self.radius - distance * distance).sqrt()
    }

    /// Chord length clipped to the segment's `[0, 1]` domain.
    fn clipped_chord(&self, segment: &Segment) -> f64 {
        let d = segment.direction();
        let oc = segment.entry() - self.center;

        // |oc + t*d|^2 = r^2
        let a = d.dot(&d);
        let h = d.dot(&oc);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant <= 0.0 {
            return 0.0;
        }

        let sqrt_disc = discriminant.sqrt();
        let t_in = ((-h - sqrt_disc) / a).max(0.0);
        let t_out = ((-h + sqrt_disc) / a).min(1.0);
        if t_out <= t_in {
            return 0.0;
        }
        (t_out - t_in) * a.sqrt()
    }
}

impl Shape for Sphere {
    fn material(&self) -> f64 {
        self.material
    }

    fn path_length(&self, segment: &Segment, model: ProbeModel) -> f64 {
        match model {
            ProbeModel::Line => self.line_chord(segment),
            ProbeModel::Segment => self.clipped_chord(segment),
        }
    }

    fn kind(&self) -> &'static str {
        "sphere"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: [f64; 3], b: [f64; 3]) -> Segment {
        Segment::new(Point3::new(a[0], a[1], a[2]), Point3::new(b[0], b[1], b[2])).unwrap()
    }

    #[test]
    fn test_through_center_unit_sphere() {
        let sphere = Sphere::new(Point3::origin(), 1.0, 1.0).unwrap();
        let loss = sphere.compute_loss(&seg([-3.0, 0.0, 0.0], [3.0, 0.0, 0.0]));
        assert!((loss - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset_chord() {
        // Distance 0.6 from centre of radius 1: chord = 2 * 0.8
        let sphere = Sphere::new(Point3::origin(), 1.0, 1.0).unwrap();
        let loss = sphere.compute_loss(&seg([-2.0, 0.6, 0.0], [2.0, 0.6, 0.0]));
        assert!((loss - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_tangent_is_miss() {
        let sphere = Sphere::new(Point3::origin(), 0.5, 1.0).unwrap();
        let loss = sphere.compute_loss(&seg([-1.0, 0.5, 0.0], [1.0, 0.5, 0.0]));
        assert_eq!(loss, 0.0);
        let loss = sphere.compute_loss_with(&seg([-1.0, 0.5, 0.0], [1.0, 0.5, 0.0]), ProbeModel::Segment);
        assert_eq!(loss, 0.0);
    }

    #[test]
    fn test_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, 5.0), 1.0, 3.0).unwrap();
        assert_eq!(sphere.compute_loss(&seg([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0])), 0.0);
    }

    #[test]
    fn test_closest_point_clamped_to_segment() {
        // The infinite line passes through the centre, but the segment
        // stops at x = -2 so its closest point is 2 units away.
        let sphere = Sphere::new(Point3::origin(), 1.0, 1.0).unwrap();
        assert_eq!(sphere.compute_loss(&seg([-5.0, 0.0, 0.0], [-2.0, 0.0, 0.0])), 0.0);
    }

    #[test]
    fn test_line_model_does_not_clip_inside_endpoints() {
        // Both endpoints inside the sphere: the line model still reports
        // the full chord, the segment model only the traversed part.
        let sphere = Sphere::new(Point3::origin(), 1.0, 1.0).unwrap();
        let probe = seg([-0.25, 0.0, 0.0], [0.25, 0.0, 0.0]);
        assert!((sphere.path_length(&probe, ProbeModel::Line) - 2.0).abs() < 1e-12);
        assert!((sphere.path_length(&probe, ProbeModel::Segment) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_segment_model_partial_entry() {
        // Enters at x = -1, stops at x = 0
        let sphere = Sphere::new(Point3::origin(), 1.0, 2.0).unwrap();
        let probe = seg([-3.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert!((sphere.compute_loss_with(&probe, ProbeModel::Segment) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_model_full_span_matches_line() {
        let sphere = Sphere::new(Point3::new(0.1, -0.2, 0.3), 0.7, 1.5).unwrap();
        let probe = seg([-1.0, -1.0, -1.0], [1.0, 0.5, 1.0]);
        let line = sphere.compute_loss_with(&probe, ProbeModel::Line);
        let clipped = sphere.compute_loss_with(&probe, ProbeModel::Segment);
        approx::assert_relative_eq!(line, clipped, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_radius_never_attenuates() {
        let sphere = Sphere::new(Point3::origin(), 0.0, 10.0).unwrap();
        assert_eq!(sphere.compute_loss(&seg([0.0, 0.0, -1.0], [0.0, 0.0, 1.0])), 0.0);
    }

    #[test]
    fn test_invalid_construction() {
        assert_eq!(
            Sphere::new(Point3::origin(), -1.0, 1.0),
            Err(ShapeError::InvalidRadius(-1.0))
        );
        assert_eq!(
            Sphere::new(Point3::origin(), 1.0, -0.5),
            Err(ShapeError::InvalidMaterial(-0.5))
        );
        assert!(matches!(
            Sphere::new(Point3::origin(), f64::NAN, 1.0),
            Err(ShapeError::InvalidRadius(_))
        ));
        assert!(matches!(
            Sphere::new(Point3::origin(), 1.0, f64::INFINITY),
            Err(ShapeError::InvalidMaterial(_))
        ));
        assert_eq!(
            Sphere::new(Point3::new(f64::NAN, 0.0, 0.0), 1.0, 1.0),
            Err(ShapeError::NonFiniteCoordinate("sphere center"))
        );
    }
}
