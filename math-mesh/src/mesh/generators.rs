//! Mesh generators for common survey domains
//!
//! Provides uniform meshes and meshes with a fine core region surrounded by
//! geometrically expanding padding cells, plus a JSON description of both.

use super::tensor::TensorMesh;
use crate::error::{MeshError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

impl TensorMesh {
    /// Generate a mesh with uniform cells along each axis
    pub fn uniform(cells: &[usize], widths: &[f64], origin: &[f64]) -> Result<Self> {
        if cells.len() != widths.len() {
            return Err(MeshError::Config(format!(
                "{} cell counts but {} cell widths",
                cells.len(),
                widths.len()
            )));
        }

        let h = cells
            .iter()
            .zip(widths)
            .map(|(&n, &w)| vec![w; n])
            .collect();

        TensorMesh::new(h, origin.to_vec())
    }
}

/// Cell widths for one axis: `n_pad` expanding cells, `n_core` cells of
/// `core_width`, then `n_pad` expanding cells again
pub fn padded_widths(core_width: f64, n_core: usize, n_pad: usize, factor: f64) -> Vec<f64> {
    let pad: Vec<f64> = (1..=n_pad)
        .map(|i| core_width * factor.powi(i as i32))
        .collect();

    pad.iter()
        .rev()
        .copied()
        .chain(std::iter::repeat_n(core_width, n_core))
        .chain(pad.iter().copied())
        .collect()
}

/// One axis of a padded tensor mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Width of core cells
    pub core_width: f64,
    /// Number of core cells
    pub n_core: usize,
    /// Number of padding cells on each side
    #[serde(default)]
    pub n_pad: usize,
    /// Expansion factor between successive padding cells
    #[serde(default = "default_pad_factor")]
    pub pad_factor: f64,
}

fn default_pad_factor() -> f64 {
    1.3
}

impl AxisConfig {
    fn validate(&self, axis: usize) -> Result<()> {
        if self.n_core == 0 {
            return Err(MeshError::Config(format!("axis {axis} has no core cells")));
        }
        if !(self.core_width.is_finite() && self.core_width > 0.0) {
            return Err(MeshError::Config(format!(
                "axis {axis} core width must be positive (got {})",
                self.core_width
            )));
        }
        if self.n_pad > 0 && !(self.pad_factor.is_finite() && self.pad_factor >= 1.0) {
            return Err(MeshError::Config(format!(
                "axis {axis} padding factor must be >= 1 (got {})",
                self.pad_factor
            )));
        }
        Ok(())
    }

    fn widths(&self) -> Vec<f64> {
        padded_widths(self.core_width, self.n_core, self.n_pad, self.pad_factor)
    }
}

/// Tensor mesh configuration loaded from JSON
///
/// ```json
/// {
///   "axes": [
///     { "core_width": 5.0, "n_core": 40, "n_pad": 8 },
///     { "core_width": 5.0, "n_core": 20, "n_pad": 8, "pad_factor": 1.5 }
///   ],
///   "origin": null
/// }
/// ```
///
/// Without an origin the core region is centred on zero along every axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorMeshConfig {
    /// Per-axis description
    pub axes: Vec<AxisConfig>,
    /// Lowest corner of the mesh
    #[serde(default)]
    pub origin: Option<Vec<f64>>,
}

impl TensorMeshConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TensorMeshConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=3).contains(&self.axes.len()) {
            return Err(MeshError::InvalidDimension {
                dim: self.axes.len(),
            });
        }
        for (axis, cfg) in self.axes.iter().enumerate() {
            cfg.validate(axis)?;
        }
        if let Some(origin) = &self.origin {
            if origin.len() != self.axes.len() {
                return Err(MeshError::OriginLength {
                    expected: self.axes.len(),
                    got: origin.len(),
                });
            }
        }
        Ok(())
    }

    /// Build the mesh
    pub fn to_mesh(&self) -> Result<TensorMesh> {
        self.validate()?;

        let h: Vec<Vec<f64>> = self.axes.iter().map(AxisConfig::widths).collect();
        let origin = match &self.origin {
            Some(origin) => origin.clone(),
            None => self
                .axes
                .iter()
                .zip(&h)
                .map(|(cfg, widths)| {
                    let pad: f64 = widths[..cfg.n_pad].iter().sum();
                    -pad - 0.5 * cfg.core_width * cfg.n_core as f64
                })
                .collect(),
        };

        let mesh = TensorMesh::new(h, origin)?;
        log::info!(
            "built {}D tensor mesh with {:?} cells",
            self.axes.len(),
            mesh.shape_cells()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Axis, InterpolationMesh};
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_mesh() {
        let mesh = TensorMesh::uniform(&[4, 2, 3], &[1.0, 2.0, 0.5], &[0.0, 0.0, -1.5]).unwrap();
        assert_eq!(mesh.dim(), 3);
        assert_eq!(mesh.n_cells(), 24);
        assert_eq!(mesh.n_nodes(), 5 * 3 * 4);
        assert_eq!(mesh.nodes_along(Axis::Z), vec![-1.5, -1.0, -0.5, 0.0]);
    }

    #[test]
    fn test_uniform_length_mismatch() {
        assert!(TensorMesh::uniform(&[4, 2], &[1.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_padded_widths() {
        let widths = padded_widths(2.0, 3, 2, 2.0);
        assert_eq!(widths, vec![8.0, 4.0, 2.0, 2.0, 2.0, 4.0, 8.0]);
        assert_eq!(padded_widths(1.0, 2, 0, 1.3), vec![1.0, 1.0]);
    }

    #[test]
    fn test_config_centres_core() {
        let json = r#"{
            "axes": [
                { "core_width": 2.0, "n_core": 4, "n_pad": 1, "pad_factor": 2.0 },
                { "core_width": 1.0, "n_core": 2 }
            ]
        }"#;

        let mesh = TensorMeshConfig::from_json_str(json).unwrap().to_mesh().unwrap();

        assert_eq!(mesh.shape_cells(), vec![6, 2]);
        // 4 pad + 4 half core on the left of zero
        assert_relative_eq!(mesh.origin()[0], -8.0);
        assert_relative_eq!(mesh.origin()[1], -1.0);
        assert_relative_eq!(mesh.nodes_along(Axis::X)[1], -4.0);
    }

    #[test]
    fn test_config_validation() {
        let bad_factor = r#"{ "axes": [ { "core_width": 1.0, "n_core": 2, "n_pad": 2, "pad_factor": 0.5 } ] }"#;
        assert!(TensorMeshConfig::from_json_str(bad_factor).is_err());

        let bad_origin = r#"{ "axes": [ { "core_width": 1.0, "n_core": 2 } ], "origin": [0.0, 1.0] }"#;
        assert!(matches!(
            TensorMeshConfig::from_json_str(bad_origin),
            Err(MeshError::OriginLength { .. })
        ));

        assert!(matches!(
            TensorMeshConfig::from_json_str("{ not json"),
            Err(MeshError::Json(_))
        ));
    }
}
