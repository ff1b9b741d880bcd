//! Receiver types
//!
//! [`Pole`] receivers measure potential at one electrode per datum,
//! [`Dipole`] receivers the difference between an M and an N electrode.
//! Shared behaviour lives in the [`Receiver`] trait on top of
//! [`ReceiverBase`].

mod base;
mod dipole;
mod pole;

pub use base::ReceiverBase;
pub use dipole::Dipole;
pub use pole::Pole;

use crate::error::{Result, SipError};
use crate::fields::Fields;
use math_geo_mesh::{Axis, GridLocation, InterpolationMesh};
use math_geo_sparse::CsrMatrix;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Field projected to compute the data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjField {
    /// Electric potential
    #[default]
    Phi,
    /// Electric field
    E,
    /// Current density
    J,
}

impl ProjField {
    /// Lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjField::Phi => "phi",
            ProjField::E => "e",
            ProjField::J => "j",
        }
    }
}

impl fmt::Display for ProjField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjField {
    type Err = SipError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "phi" => Ok(ProjField::Phi),
            "e" => Ok(ProjField::E),
            "j" => Ok(ProjField::J),
            _ => Err(SipError::InvalidChoice {
                property: "proj_field",
                value: s.to_string(),
                choices: "phi, e, j",
            }),
        }
    }
}

/// Parse a receiver orientation (`x`, `y` or `z`)
pub fn parse_orientation(s: &str) -> Result<Axis> {
    s.parse::<Axis>().map_err(|_| SipError::InvalidChoice {
        property: "orientation",
        value: s.to_string(),
        choices: "x, y, z",
    })
}

/// Behaviour shared by all SIP receivers
pub trait Receiver {
    /// Common receiver state
    fn base(&self) -> &ReceiverBase;

    /// Number of data in the receiver
    fn n_d(&self) -> usize;

    /// Assemble the projection matrix without consulting the cache
    fn build_projection<M: InterpolationMesh + ?Sized>(
        &self,
        mesh: &M,
        location: GridLocation,
    ) -> Result<CsrMatrix>;

    /// Former name of [`Receiver::n_d`]; always fails
    #[deprecated(note = "use `n_d` instead")]
    fn n_rx(&self) -> Result<usize> {
        Err(SipError::Deprecated {
            name: "n_rx",
            replacement: "n_d",
        })
    }

    /// Grid location of the projected field, with the orientation suffix
    /// appended when the receiver has one
    fn proj_g_loc<F: Fields + ?Sized>(&self, fields: &F) -> GridLocation {
        let base = self.base();
        fields
            .grid_location(base.proj_field())
            .with_component(base.orientation())
    }

    /// Which entries of `times_all` are this receiver's times
    fn get_time_p(&self, times_all: &[f64]) -> Array1<bool> {
        self.base().time_mask(times_all)
    }

    /// Projection matrix from `location` values on `mesh` to receiver data
    ///
    /// Built matrices are cached per mesh when the receiver stores
    /// projections; a cached matrix is returned as the same `Arc`.
    fn get_p<M: InterpolationMesh + ?Sized>(
        &self,
        mesh: &M,
        location: GridLocation,
    ) -> Result<Arc<CsrMatrix>> {
        let base = self.base();
        let mesh_id = mesh.mesh_id();

        if let Some(p) = base.cached_projection(mesh_id, location) {
            log::debug!("projection cache hit for {} on {}", location, mesh_id);
            return Ok(p);
        }

        log::debug!("projection cache miss for {} on {}", location, mesh_id);
        let p = Arc::new(self.build_projection(mesh, location)?);

        if base.store_projections() {
            base.store_projection(mesh_id, location, Arc::clone(&p));
        }

        Ok(p)
    }

    /// Derivative of the data with respect to the projected field
    ///
    /// Returns `P v`, or `Pᵀ v` in adjoint mode.
    fn eval_deriv<M, F>(
        &self,
        mesh: &M,
        fields: &F,
        v: &Array1<f64>,
        adjoint: bool,
    ) -> Result<Array1<f64>>
    where
        M: InterpolationMesh + ?Sized,
        F: Fields + ?Sized,
    {
        let p = self.get_p(mesh, self.proj_g_loc(fields))?;
        if adjoint {
            Ok(p.checked_matvec_transpose(v)?)
        } else {
            Ok(p.checked_matvec(v)?)
        }
    }

    /// Predicted data for `src`: the projected field sampled at the receiver
    fn eval<M, F>(&self, src: &F::Source, mesh: &M, fields: &F) -> Result<Array1<f64>>
    where
        M: InterpolationMesh + ?Sized,
        F: Fields + ?Sized,
    {
        let u = fields.field(src, self.base().proj_field())?;
        self.eval_deriv(mesh, fields, &u, false)
    }
}

/// Either kind of SIP receiver, for heterogeneous receiver lists
#[derive(Debug, Clone)]
pub enum SipReceiver {
    Dipole(Dipole),
    Pole(Pole),
}

impl From<Dipole> for SipReceiver {
    fn from(rx: Dipole) -> Self {
        SipReceiver::Dipole(rx)
    }
}

impl From<Pole> for SipReceiver {
    fn from(rx: Pole) -> Self {
        SipReceiver::Pole(rx)
    }
}

impl Receiver for SipReceiver {
    fn base(&self) -> &ReceiverBase {
        match self {
            SipReceiver::Dipole(rx) => rx.base(),
            SipReceiver::Pole(rx) => rx.base(),
        }
    }

    fn n_d(&self) -> usize {
        match self {
            SipReceiver::Dipole(rx) => rx.n_d(),
            SipReceiver::Pole(rx) => rx.n_d(),
        }
    }

    fn build_projection<M: InterpolationMesh + ?Sized>(
        &self,
        mesh: &M,
        location: GridLocation,
    ) -> Result<CsrMatrix> {
        match self {
            SipReceiver::Dipole(rx) => rx.build_projection(mesh, location),
            SipReceiver::Pole(rx) => rx.build_projection(mesh, location),
        }
    }
}
