#![warn(missing_docs)]

//! Parallel-beam scan simulation for tomosim.
//!
//! Emulates raw data acquisition for a parallel-projection tomography
//! experiment: a dense set of probe segments is cast between two detector
//! planes, and every probe's material-weighted path length through the
//! scene is summed into a flat loss tensor (the raw "sinogram").
//!
//! # Architecture
//!
//! - [`DetectorGrid`] - entry/exit planes and the `N^4` probe set
//! - [`Simulator`] - sums shape losses per probe, optionally in parallel
//! - [`LossTensor`] - row-major `(i, j, k, l)` result
//! - [`SceneConfig`] - TOML scene description
//!
//! # Memory
//!
//! Plane storage is `O(N^2)` but the loss tensor is `O(N^4)`: resolution
//! 100 already needs 800 MB. Use [`DetectorGrid::estimated_tensor_bytes`]
//! to check before running.
//!
//! # Example
//!
//! ```
//! use tomosim_math::Point3;
//! use tomosim_scan::compute_losses;
//! use tomosim_shapes::{AxisAlignedBox, Shape, Sphere};
//!
//! let shapes: Vec<Box<dyn Shape>> = vec![
//!     Box::new(Sphere::new(Point3::origin(), 0.5, 1.0).unwrap()),
//!     Box::new(AxisAlignedBox::new(Point3::new(0.2, 0.2, 0.2), Point3::new(0.8, 0.8, 0.8), 3.0).unwrap()),
//! ];
//! let losses = compute_losses(8, &shapes).unwrap();
//! assert_eq!(losses.len(), 8 * 8 * 8 * 8);
//! ```

pub mod error;
pub mod grid;
pub mod scene;
pub mod simulator;
pub mod tensor;

pub use error::{Result, ScanError};
pub use grid::DetectorGrid;
pub use scene::{SceneConfig, ShapeConfig};
pub use simulator::{compute_losses, Execution, Simulator};
pub use tensor::LossTensor;
