#![warn(missing_docs)]

//! Math types for the tomosim scanner.
//!
//! Thin wrappers around nalgebra providing the point and vector types
//! used by probe geometry, the finite [`Segment`] that every probe is
//! modelled as, and tolerance constants for near-zero comparisons.

use nalgebra::Vector3;
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Errors raised when building probe geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Entry and exit coincide, so the segment has no direction.
    #[error("degenerate segment: entry and exit coincide at ({0}, {1}, {2})")]
    DegenerateSegment(f64, f64, f64),

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Result type for geometry construction.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Returns true if every coordinate of `p` is finite.
pub fn is_finite_point(p: &Point3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// A finite directed line segment from `entry` to `exit`.
///
/// Parametrised as `s(t) = entry + t * (exit - entry)`, so `t = 0` is the
/// entry point and `t = 1` the exit point. A segment is never degenerate:
/// [`Segment::new`] rejects coincident endpoints, which keeps every
/// `dot(d, d)` denominator in the shape algorithms strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    entry: Point3,
    exit: Point3,
}

impl Segment {
    /// Create a segment, rejecting coincident or non-finite endpoints.
    pub fn new(entry: Point3, exit: Point3) -> Result<Self> {
        if !is_finite_point(&entry) {
            return Err(GeometryError::NonFinite("segment entry"));
        }
        if !is_finite_point(&exit) {
            return Err(GeometryError::NonFinite("segment exit"));
        }
        if entry == exit {
            return Err(GeometryError::DegenerateSegment(entry.x, entry.y, entry.z));
        }
        Ok(Self { entry, exit })
    }

    /// Create a segment without validation.
    ///
    /// Meant for the detector grid, whose two planes are separated in z, so
    /// its endpoints are finite and distinct by construction. Shape code
    /// divides by `dot(d, d)`; build any other segment with [`Segment::new`].
    #[inline]
    pub fn new_unchecked(entry: Point3, exit: Point3) -> Self {
        debug_assert!(entry != exit, "segment endpoints must differ");
        Self { entry, exit }
    }

    /// Entry point (`t = 0`).
    #[inline]
    pub fn entry(&self) -> Point3 {
        self.entry
    }

    /// Exit point (`t = 1`).
    #[inline]
    pub fn exit(&self) -> Point3 {
        self.exit
    }

    /// Unnormalised direction `exit - entry`.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.exit - self.entry
    }

    /// Euclidean length of the segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Evaluate the segment's line at parameter `t`: `entry + t * direction`.
    ///
    /// `t` is not restricted to `[0, 1]`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.entry + t * self.direction()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance, in scene units.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-6 linear).
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
