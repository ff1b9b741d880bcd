//! Error types for SIP receivers.
//!
//! Mesh and sparse-matrix failures are wrapped so callers only deal with
//! [`SipError`].

use crate::receivers::ProjField;
use math_geo_mesh::MeshError;
use math_geo_sparse::SparseError;
use thiserror::Error;

/// Errors that can occur when building or evaluating receivers.
#[derive(Debug, Error)]
pub enum SipError {
    /// Dipole electrode arrays differ in shape.
    #[error("locations_m and locations_n need to be the same size: {m:?} != {n:?}")]
    ElectrodeShapeMismatch {
        /// Shape of the M electrode array
        m: Vec<usize>,
        /// Shape of the N electrode array
        n: Vec<usize>,
    },

    /// A removed accessor was called.
    #[error("{name} has been deprecated, please use {replacement} instead")]
    Deprecated {
        /// Name of the removed accessor
        name: &'static str,
        /// Accessor to use instead
        replacement: &'static str,
    },

    /// A string property is not one of its allowed values.
    #[error("invalid {property}: {value:?} (must be one of {choices})")]
    InvalidChoice {
        /// Property name
        property: &'static str,
        /// The rejected value
        value: String,
        /// Allowed values
        choices: &'static str,
    },

    /// Fields for a source were never stored.
    #[error("no {field} field stored for source {source_index}")]
    MissingField {
        /// Source index
        source_index: usize,
        /// Requested field
        field: ProjField,
    },

    /// Mesh construction or interpolation failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Sparse operator shapes do not line up.
    #[error(transparent)]
    Sparse(#[from] SparseError),

    /// Receiver configuration is inconsistent.
    #[error("invalid receiver configuration: {0}")]
    Config(String),

    /// Receiver configuration is not valid JSON.
    #[error("failed to parse receiver configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Receiver configuration file cannot be read.
    #[error("failed to read receiver configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for receiver operations.
pub type Result<T> = std::result::Result<T, SipError>;

impl SipError {
    /// Returns `true` if this is the deprecated-accessor error.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, SipError::Deprecated { .. })
    }

    /// Returns `true` if this is an electrode or vector shape error.
    pub fn is_shape_error(&self) -> bool {
        match self {
            SipError::ElectrodeShapeMismatch { .. } => true,
            SipError::Sparse(err) => err.is_shape_error(),
            SipError::Mesh(err) => err.is_location_error(),
            _ => false,
        }
    }

    /// Returns `true` if this error comes from configuration input.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SipError::Config(_)
                | SipError::Json(_)
                | SipError::Io(_)
                | SipError::InvalidChoice { .. }
        )
    }
}
