#![warn(missing_docs)]

//! Attenuating shapes for the tomosim scanner.
//!
//! Every shape answers one question: how much material-weighted path
//! length does a probe [`Segment`] accumulate while crossing it? The
//! answer is the shape's *loss* for that probe.
//!
//! # Architecture
//!
//! - [`Shape`] - the loss capability shared by all shapes
//! - [`Sphere`] - closest-approach chord algorithm
//! - [`AxisAlignedBox`] - slab-method interval clipping
//! - [`ProbeModel`] - whether a probe is an infinite line or a bounded segment
//!
//! # Example
//!
//! ```
//! use tomosim_math::{Point3, Segment};
//! use tomosim_shapes::{Shape, Sphere};
//!
//! let sphere = Sphere::new(Point3::origin(), 1.0, 1.0).unwrap();
//! let probe = Segment::new(Point3::new(0.0, 0.0, -2.0), Point3::new(0.0, 0.0, 2.0)).unwrap();
//! assert!((sphere.compute_loss(&probe) - 2.0).abs() < 1e-12);
//! ```

mod aabb;
pub mod error;
mod sphere;

pub use aabb::AxisAlignedBox;
pub use error::{Result, ShapeError};
pub use sphere::Sphere;

use serde::{Deserialize, Serialize};
use tomosim_math::Segment;

/// How a probe segment is interpreted when measuring path length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeModel {
    /// The segment samples an infinite parallel-beam line between the two
    /// detector planes. Sphere chords are not clipped, and box intervals
    /// are only rejected when the box lies entirely behind the entry point.
    #[default]
    Line,
    /// The segment is a bounded physical probe. Path length is clipped to
    /// the segment's own `[0, 1]` parameter domain.
    Segment,
}

/// A shape that attenuates probes passing through it.
///
/// Implementors must be thread-safe: the simulator evaluates disjoint
/// probes from several worker threads against the same shapes.
pub trait Shape: Send + Sync + std::fmt::Debug {
    /// Non-negative attenuation coefficient.
    fn material(&self) -> f64;

    /// Geometric length of the probe's path through the shape.
    ///
    /// Always finite and `>= 0`. Misses, tangents and parallel probes
    /// outside the shape yield `0.0`.
    fn path_length(&self, segment: &Segment, model: ProbeModel) -> f64;

    /// Short lowercase name of the shape kind, for diagnostics.
    fn kind(&self) -> &'static str;

    /// Loss under the default [`ProbeModel::Line`] interpretation.
    fn compute_loss(&self, segment: &Segment) -> f64 {
        self.compute_loss_with(segment, ProbeModel::Line)
    }

    /// Loss (`material * path_length`) under an explicit probe model.
    fn compute_loss_with(&self, segment: &Segment, model: ProbeModel) -> f64 {
        self.material() * self.path_length(segment, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomosim_math::Point3;

    #[test]
    fn test_probe_model_default_is_line() {
        assert_eq!(ProbeModel::default(), ProbeModel::Line);
    }

    #[test]
    fn test_trait_objects_sum() {
        let shapes: Vec<Box<dyn Shape>> = vec![
            Box::new(Sphere::new(Point3::origin(), 0.5, 1.0).unwrap()),
            Box::new(
                AxisAlignedBox::new(
                    Point3::new(-0.5, -0.5, -0.5),
                    Point3::new(0.5, 0.5, 0.5),
                    2.0,
                )
                .unwrap(),
            ),
        ];
        let probe = Segment::new(Point3::new(0.0, 0.0, -1.0), Point3::new(0.0, 0.0, 1.0)).unwrap();
        let total: f64 = shapes.iter().map(|s| s.compute_loss(&probe)).sum();
        // Sphere chord 1.0 at material 1 plus box width 1.0 at material 2
        assert!((total - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_loss_scales_with_material() {
        let thin = Sphere::new(Point3::origin(), 1.0, 1.0).unwrap();
        let dense = Sphere::new(Point3::origin(), 1.0, 4.5).unwrap();
        let probe = Segment::new(Point3::new(-3.0, 0.2, 0.0), Point3::new(3.0, 0.2, 0.0)).unwrap();
        let ratio = dense.compute_loss(&probe) / thin.compute_loss(&probe);
        assert!((ratio - 4.5).abs() < 1e-12);
    }
}
