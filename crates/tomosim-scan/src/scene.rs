//! Scene description loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tomosim_math::Point3;
use tomosim_shapes::{AxisAlignedBox, ProbeModel, Shape, ShapeError, Sphere};

use crate::error::{Result, ScanError};
use crate::grid::DetectorGrid;
use crate::simulator::Simulator;

/// One shape entry of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeConfig {
    /// A sphere.
    Sphere {
        /// Centre `[x, y, z]`.
        center: [f64; 3],
        /// Radius.
        radius: f64,
        /// Attenuation coefficient.
        material: f64,
    },
    /// An axis-aligned box given by any two opposite corners.
    #[serde(rename = "box", alias = "cuboid")]
    AxisAlignedBox {
        /// First corner `[x, y, z]`.
        corner_a: [f64; 3],
        /// Opposite corner `[x, y, z]`.
        corner_b: [f64; 3],
        /// Attenuation coefficient.
        material: f64,
    },
}

impl ShapeConfig {
    /// Validate and construct the shape.
    pub fn build(&self) -> std::result::Result<Box<dyn Shape>, ShapeError> {
        Ok(match *self {
            ShapeConfig::Sphere {
                center,
                radius,
                material,
            } => Box::new(Sphere::new(Point3::from(center), radius, material)?),
            ShapeConfig::AxisAlignedBox {
                corner_a,
                corner_b,
                material,
            } => Box::new(AxisAlignedBox::new(
                Point3::from(corner_a),
                Point3::from(corner_b),
                material,
            )?),
        })
    }
}

/// A complete scan setup: grid resolution, probe model, and shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Detector points per axis (`N >= 2`).
    pub resolution: usize,
    /// Probe interpretation.
    #[serde(default)]
    pub probe_model: ProbeModel,
    /// Shapes, summed in order.
    #[serde(default)]
    pub shapes: Vec<ShapeConfig>,
}

impl Default for SceneConfig {
    /// Two-point grid with a single dense box around the origin.
    fn default() -> Self {
        Self {
            resolution: 2,
            probe_model: ProbeModel::Line,
            shapes: vec![ShapeConfig::AxisAlignedBox {
                corner_a: [-0.5, -0.5, -0.5],
                corner_b: [0.5, 0.5, 0.5],
                material: 2.0,
            }],
        }
    }
}

impl SceneConfig {
    /// Parse a scene from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading scene from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate every shape and assemble a simulator.
    pub fn build(&self) -> Result<Simulator> {
        let grid = DetectorGrid::new(self.resolution)?;
        let shapes = self
            .shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| shape.build().map_err(|source| ScanError::Shape { index, source }))
            .collect::<Result<Vec<_>>>()?;

        Ok(Simulator::new(grid)
            .with_shapes(shapes)
            .with_probe_model(self.probe_model))
    }
}
