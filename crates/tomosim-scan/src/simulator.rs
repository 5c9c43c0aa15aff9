//! Loss aggregation over every probe of a detector grid.

use rayon::prelude::*;
use tomosim_math::{Point3, Segment};
use tomosim_shapes::{ProbeModel, Shape};

use crate::error::Result;
use crate::grid::DetectorGrid;
use crate::tensor::LossTensor;

/// Tensor size above which a warning is logged before allocation.
pub const LARGE_TENSOR_BYTES: usize = 1 << 30;

/// How the probe loop is scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// Split the output into per-entry-point rows across the rayon pool.
    #[default]
    Parallel,
    /// Evaluate every probe on the calling thread.
    Serial,
}

/// A scan setup: detector grid, shapes, and probe interpretation.
///
/// # Example
///
/// ```
/// use tomosim_math::Point3;
/// use tomosim_scan::{DetectorGrid, Simulator};
/// use tomosim_shapes::Sphere;
///
/// let grid = DetectorGrid::new(4).unwrap();
/// let sim = Simulator::new(grid).with_shape(Sphere::new(Point3::origin(), 0.5, 1.0).unwrap());
/// let losses = sim.compute_losses();
/// assert_eq!(losses.len(), 256);
/// ```
#[derive(Debug)]
pub struct Simulator {
    grid: DetectorGrid,
    shapes: Vec<Box<dyn Shape>>,
    probe_model: ProbeModel,
    execution: Execution,
}

impl Simulator {
    /// Create a simulator with no shapes.
    pub fn new(grid: DetectorGrid) -> Self {
        Self {
            grid,
            shapes: Vec::new(),
            probe_model: ProbeModel::default(),
            execution: Execution::default(),
        }
    }

    /// Add one shape.
    pub fn with_shape(mut self, shape: impl Shape + 'static) -> Self {
        self.shapes.push(Box::new(shape));
        self
    }

    /// Add several boxed shapes, keeping their order.
    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = Box<dyn Shape>>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    /// Set the probe interpretation.
    pub fn with_probe_model(mut self, model: ProbeModel) -> Self {
        self.probe_model = model;
        self
    }

    /// Set the scheduling mode.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// The detector grid.
    pub fn grid(&self) -> &DetectorGrid {
        &self.grid
    }

    /// The configured shapes, in insertion order.
    pub fn shapes(&self) -> &[Box<dyn Shape>] {
        &self.shapes
    }

    /// The probe interpretation.
    pub fn probe_model(&self) -> ProbeModel {
        self.probe_model
    }

    /// The scheduling mode.
    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Summed loss of one probe over all shapes.
    pub fn segment_loss(&self, segment: &Segment) -> f64 {
        total_loss(&self.shapes, segment, self.probe_model)
    }

    /// Summed loss of an arbitrary probe between two points.
    ///
    /// Fails on coincident or non-finite endpoints instead of returning NaN.
    pub fn probe_loss(&self, entry: Point3, exit: Point3) -> Result<f64> {
        let segment = Segment::new(entry, exit)?;
        Ok(self.segment_loss(&segment))
    }

    /// Evaluate every probe of the grid.
    pub fn compute_losses(&self) -> LossTensor {
        evaluate(&self.grid, &self.shapes, self.probe_model, self.execution)
    }
}

/// Compute the loss tensor for a resolution-`n` grid and a list of shapes.
///
/// Uses the line probe model and parallel execution. Fails if `n < 2`.
pub fn compute_losses(n: usize, shapes: &[Box<dyn Shape>]) -> Result<LossTensor> {
    let grid = DetectorGrid::new(n)?;
    Ok(evaluate(&grid, shapes, ProbeModel::Line, Execution::Parallel))
}

fn total_loss(shapes: &[Box<dyn Shape>], segment: &Segment, model: ProbeModel) -> f64 {
    shapes
        .iter()
        .map(|shape| shape.compute_loss_with(segment, model))
        .sum()
}

/// Fill one row: all probes leaving a single entry point.
fn fill_row(
    row: &mut [f64],
    entry: Point3,
    exit_plane: &[Point3],
    shapes: &[Box<dyn Shape>],
    model: ProbeModel,
) {
    for (slot, &exit) in row.iter_mut().zip(exit_plane) {
        *slot = total_loss(shapes, &Segment::new_unchecked(entry, exit), model);
    }
}

fn evaluate(
    grid: &DetectorGrid,
    shapes: &[Box<dyn Shape>],
    model: ProbeModel,
    execution: Execution,
) -> LossTensor {
    let count = grid.segment_count();
    let bytes = DetectorGrid::estimated_tensor_bytes(grid.resolution()).unwrap_or(usize::MAX);
    if bytes > LARGE_TENSOR_BYTES {
        log::warn!(
            "resolution {} needs a {:.1} GiB loss tensor ({} segments)",
            grid.resolution(),
            bytes as f64 / (1u64 << 30) as f64,
            count
        );
    }
    log::debug!(
        "evaluating {} segments against {} shapes ({:?} probes, {:?})",
        count,
        shapes.len(),
        model,
        execution
    );

    let mut values = vec![0.0; count];
    if shapes.is_empty() {
        return LossTensor::new(grid.resolution(), values);
    }

    let row_len = grid.exit_plane().len();
    let entries = grid.entry_plane();
    let exits = grid.exit_plane();

    // Each row is owned by exactly one entry point, so writes never overlap
    match execution {
        Execution::Parallel => values
            .par_chunks_mut(row_len)
            .zip(entries.par_iter())
            .for_each(|(row, &entry)| fill_row(row, entry, exits, shapes, model)),
        Execution::Serial => values
            .chunks_mut(row_len)
            .zip(entries)
            .for_each(|(row, &entry)| fill_row(row, entry, exits, shapes, model)),
    }

    LossTensor::new(grid.resolution(), values)
}
