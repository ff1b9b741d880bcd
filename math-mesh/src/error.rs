//! Error types for mesh construction and interpolation.

use thiserror::Error;

/// Errors that can occur when building meshes or interpolation matrices.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Mesh dimension is not 1, 2 or 3.
    #[error("invalid mesh dimension: {dim} (must be 1, 2 or 3)")]
    InvalidDimension {
        /// The requested dimension
        dim: usize,
    },

    /// Origin does not have one coordinate per axis.
    #[error("origin has {got} coordinates, mesh has {expected} axes")]
    OriginLength {
        /// Number of mesh axes
        expected: usize,
        /// Number of origin coordinates supplied
        got: usize,
    },

    /// An axis has no cells.
    #[error("axis {axis} has no cells")]
    EmptyAxis {
        /// Axis index
        axis: usize,
    },

    /// A cell width is zero, negative or not finite.
    #[error("invalid cell width {width} on axis {axis} at cell {index}")]
    InvalidCellWidth {
        /// Axis index
        axis: usize,
        /// Cell index along the axis
        index: usize,
        /// The offending width
        width: f64,
    },

    /// Grid location tag cannot be parsed.
    #[error("unknown grid location tag: {tag:?}")]
    InvalidTag {
        /// The tag that failed to parse
        tag: String,
    },

    /// Axis label cannot be parsed.
    #[error("unknown axis: {value:?} (expected one of x, y, z)")]
    InvalidAxis {
        /// The label that failed to parse
        value: String,
    },

    /// The mesh cannot interpolate from the requested grid location.
    #[error("cannot interpolate from grid location {tag:?} on a {dim}D mesh")]
    UnsupportedLocation {
        /// Grid location tag
        tag: String,
        /// Mesh dimension
        dim: usize,
    },

    /// Location array has the wrong number of columns.
    #[error("locations have {got} coordinates per row, mesh has {expected} axes")]
    LocationDimension {
        /// Mesh dimension
        expected: usize,
        /// Number of columns in the location array
        got: usize,
    },

    /// A location lies outside the mesh.
    #[error("location {index} at {point:?} lies outside the mesh")]
    PointOutside {
        /// Row of the offending location
        index: usize,
        /// Its coordinates
        point: Vec<f64>,
    },

    /// Mesh configuration is inconsistent.
    #[error("invalid mesh configuration: {0}")]
    Config(String),

    /// Mesh configuration is not valid JSON.
    #[error("failed to parse mesh configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Mesh configuration file cannot be read.
    #[error("failed to read mesh configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;

impl MeshError {
    /// Returns `true` if the error comes from receiver locations rather than the mesh.
    pub fn is_location_error(&self) -> bool {
        matches!(
            self,
            MeshError::LocationDimension { .. } | MeshError::PointOutside { .. }
        )
    }

    /// Returns `true` if the error comes from mesh geometry.
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            MeshError::InvalidDimension { .. }
                | MeshError::OriginLength { .. }
                | MeshError::EmptyAxis { .. }
                | MeshError::InvalidCellWidth { .. }
        )
    }
}
