//! Pole receiver: potential measured at a single electrode per datum

use super::{ProjField, Receiver, ReceiverBase};
use crate::error::Result;
use math_geo_mesh::{Axis, GridLocation, InterpolationMesh};
use math_geo_sparse::CsrMatrix;
use ndarray::{Array1, Array2};

/// Pole receiver
#[derive(Debug, Clone)]
pub struct Pole {
    base: ReceiverBase,
    locations: Array2<f64>,
}

impl Pole {
    /// Electrodes at the rows of `locations`, sampled at `times`
    pub fn new(locations: Array2<f64>, times: Array1<f64>) -> Self {
        Self {
            base: ReceiverBase::new(times),
            locations,
        }
    }

    /// Single electrode given as one coordinate vector
    pub fn at_point(location: Array1<f64>, times: Array1<f64>) -> Self {
        Self::new(location.insert_axis(ndarray::Axis(0)), times)
    }

    pub fn with_orientation(mut self, orientation: Option<Axis>) -> Self {
        self.base.set_orientation(orientation);
        self
    }

    pub fn with_proj_field(mut self, proj_field: ProjField) -> Self {
        self.base.set_proj_field(proj_field);
        self
    }

    pub fn with_store_projections(mut self, store: bool) -> Self {
        self.base.set_store_projections(store);
        self
    }

    /// Electrode locations, one row per datum
    pub fn locations(&self) -> &Array2<f64> {
        &self.locations
    }
}

impl Receiver for Pole {
    fn base(&self) -> &ReceiverBase {
        &self.base
    }

    fn n_d(&self) -> usize {
        self.locations.nrows()
    }

    fn build_projection<M: InterpolationMesh + ?Sized>(
        &self,
        mesh: &M,
        location: GridLocation,
    ) -> Result<CsrMatrix> {
        let p = mesh.interpolation_matrix(self.locations.view(), location)?;
        log::info!(
            "assembled {}x{} pole projection from {} on {}",
            p.num_rows,
            p.num_cols,
            location,
            mesh.mesh_id()
        );
        Ok(p)
    }
}
