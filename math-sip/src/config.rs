//! JSON configuration for SIP receivers
//!
//! ```json
//! {
//!   "receivers": [
//!     {
//!       "type": "dipole",
//!       "locations_m": [[10.0, 0.0], [20.0, 0.0]],
//!       "locations_n": [[15.0, 0.0], [25.0, 0.0]],
//!       "times": [0.001, 0.01, 0.1]
//!     },
//!     {
//!       "type": "pole",
//!       "locations": [[30.0, 0.0]],
//!       "times": [0.01],
//!       "proj_field": "e",
//!       "orientation": "x"
//!     }
//!   ]
//! }
//! ```

use crate::error::{Result, SipError};
use crate::receivers::{Dipole, Pole, ProjField, SipReceiver, parse_orientation};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Receiver kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverKind {
    Dipole,
    Pole,
}

/// One receiver as described in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Pole or dipole
    #[serde(rename = "type")]
    pub kind: ReceiverKind,
    /// Pole electrode locations
    #[serde(default)]
    pub locations: Option<Vec<Vec<f64>>>,
    /// Dipole M electrode locations
    #[serde(default)]
    pub locations_m: Option<Vec<Vec<f64>>>,
    /// Dipole N electrode locations
    #[serde(default)]
    pub locations_n: Option<Vec<Vec<f64>>>,
    /// Sample times
    pub times: Vec<f64>,
    /// Orientation ("x", "y" or "z")
    #[serde(default)]
    pub orientation: Option<String>,
    /// Projected field ("phi", "e" or "j"); defaults to "phi"
    #[serde(default)]
    pub proj_field: Option<String>,
    /// Keep projection matrices for reuse
    #[serde(default = "default_store_projections")]
    pub store_projections: bool,
}

fn default_store_projections() -> bool {
    true
}

/// Convert a list of coordinate rows to an `(n, dim)` array
fn rows_to_array(name: &str, rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let dim = rows.first().map(Vec::len).unwrap_or(0);
    if rows.is_empty() || dim == 0 {
        return Err(SipError::Config(format!("{name} must not be empty")));
    }
    if let Some(i) = rows.iter().position(|r| r.len() != dim) {
        return Err(SipError::Config(format!(
            "{name}[{i}] has {} coordinates, expected {dim}",
            rows[i].len()
        )));
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), dim), flat)
        .map_err(|e| SipError::Config(format!("{name}: {e}")))
}

impl ReceiverConfig {
    /// Build the receiver
    pub fn to_receiver(&self) -> Result<SipReceiver> {
        let times = Array1::from_vec(self.times.clone());
        let orientation = self
            .orientation
            .as_deref()
            .map(parse_orientation)
            .transpose()?;
        let proj_field = match self.proj_field.as_deref() {
            Some(s) => s.parse::<ProjField>()?,
            None => ProjField::default(),
        };

        let rx: SipReceiver = match self.kind {
            ReceiverKind::Pole => {
                let rows = self
                    .locations
                    .as_ref()
                    .ok_or_else(|| SipError::Config("pole receiver needs locations".into()))?;
                Pole::new(rows_to_array("locations", rows)?, times)
                    .with_orientation(orientation)
                    .with_proj_field(proj_field)
                    .with_store_projections(self.store_projections)
                    .into()
            }
            ReceiverKind::Dipole => {
                let (m, n) = match (&self.locations_m, &self.locations_n) {
                    (Some(m), Some(n)) => (m, n),
                    _ => {
                        return Err(SipError::Config(
                            "dipole receiver needs locations_m and locations_n".into(),
                        ));
                    }
                };
                Dipole::new(
                    rows_to_array("locations_m", m)?,
                    rows_to_array("locations_n", n)?,
                    times,
                )?
                .with_orientation(orientation)
                .with_proj_field(proj_field)
                .with_store_projections(self.store_projections)
                .into()
            }
        };

        Ok(rx)
    }
}

/// A list of receivers loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub receivers: Vec<ReceiverConfig>,
}

impl SurveyConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Build every receiver, failing on the first invalid one
    pub fn to_receivers(&self) -> Result<Vec<SipReceiver>> {
        let receivers = self
            .receivers
            .iter()
            .map(ReceiverConfig::to_receiver)
            .collect::<Result<Vec<_>>>()?;
        log::info!("configured {} receivers", receivers.len());
        Ok(receivers)
    }
}
