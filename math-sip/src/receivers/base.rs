//! State shared by every receiver: sample times, projection settings and
//! the per-mesh projection cache

use super::ProjField;
use math_geo_mesh::{Axis, GridLocation, MeshId};
use math_geo_sparse::CsrMatrix;
use ndarray::Array1;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type ProjectionCache = HashMap<(MeshId, GridLocation), Arc<CsrMatrix>>;

/// Common receiver state
#[derive(Debug)]
pub struct ReceiverBase {
    times: Array1<f64>,
    orientation: Option<Axis>,
    proj_field: ProjField,
    store_projections: bool,
    projections: Mutex<ProjectionCache>,
}

impl ReceiverBase {
    /// Receiver sampled at `times`, projecting `phi` with no orientation
    pub fn new(times: Array1<f64>) -> Self {
        Self {
            times,
            orientation: None,
            proj_field: ProjField::default(),
            store_projections: true,
            projections: Mutex::new(HashMap::new()),
        }
    }

    /// Sample times
    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// Number of sample times
    pub fn n_time(&self) -> usize {
        self.times.len()
    }

    pub fn orientation(&self) -> Option<Axis> {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Option<Axis>) {
        self.orientation = orientation;
    }

    pub fn proj_field(&self) -> ProjField {
        self.proj_field
    }

    pub fn set_proj_field(&mut self, proj_field: ProjField) {
        self.proj_field = proj_field;
    }

    /// Whether built projection matrices are kept for reuse
    pub fn store_projections(&self) -> bool {
        self.store_projections
    }

    pub fn set_store_projections(&mut self, store: bool) {
        self.store_projections = store;
    }

    /// Membership mask of `times_all` against the receiver's times
    ///
    /// Times are compared exactly; survey time vectors are expected to be
    /// built from the same values as the receivers'.
    pub fn time_mask(&self, times_all: &[f64]) -> Array1<bool> {
        times_all
            .iter()
            .map(|t| self.times.iter().any(|own| own == t))
            .collect()
    }

    /// Number of cached projection matrices
    pub fn cached_projections(&self) -> usize {
        self.cache().len()
    }

    /// Drop every cached projection matrix
    pub fn clear_projections(&self) {
        self.cache().clear();
    }

    pub(crate) fn cached_projection(
        &self,
        mesh: MeshId,
        location: GridLocation,
    ) -> Option<Arc<CsrMatrix>> {
        self.cache().get(&(mesh, location)).cloned()
    }

    pub(crate) fn store_projection(
        &self,
        mesh: MeshId,
        location: GridLocation,
        p: Arc<CsrMatrix>,
    ) {
        self.cache().insert((mesh, location), p);
    }

    fn cache(&self) -> MutexGuard<'_, ProjectionCache> {
        // The map is never left half-updated, so a poisoned lock is still usable
        self.projections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for ReceiverBase {
    /// Clones settings and times; the clone starts with an empty cache
    fn clone(&self) -> Self {
        Self {
            times: self.times.clone(),
            orientation: self.orientation,
            proj_field: self.proj_field,
            store_projections: self.store_projections,
            projections: Mutex::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_defaults() {
        let base = ReceiverBase::new(array![0.1, 0.2]);
        assert_eq!(base.proj_field(), ProjField::Phi);
        assert_eq!(base.orientation(), None);
        assert!(base.store_projections());
        assert_eq!(base.n_time(), 2);
    }

    #[test]
    fn test_time_mask() {
        let base = ReceiverBase::new(array![0.01, 0.1]);
        let all = [0.001, 0.01, 0.05, 0.1, 1.0];

        let mask = base.time_mask(&all);

        assert_eq!(mask.len(), all.len());
        assert_eq!(mask, array![false, true, false, true, false]);
    }

    #[test]
    fn test_time_mask_empty_receiver() {
        let base = ReceiverBase::new(Array1::zeros(0));
        assert!(base.time_mask(&[1.0, 2.0]).iter().all(|&m| !m));
    }

    #[test]
    fn test_cache_round_trip_and_clone() {
        let base = ReceiverBase::new(array![1.0]);
        let id = MeshId::next();
        let p = Arc::new(CsrMatrix::from_triplets(2, 2, vec![(0, 0, 1.0), (1, 1, 1.0)]));

        base.store_projection(id, GridLocation::NODES, Arc::clone(&p));
        assert_eq!(base.cached_projections(), 1);

        let hit = base.cached_projection(id, GridLocation::NODES).unwrap();
        assert!(Arc::ptr_eq(&hit, &p));
        assert!(base.cached_projection(id, GridLocation::CELL_CENTERS).is_none());

        assert_eq!(base.clone().cached_projections(), 0);

        base.clear_projections();
        assert_eq!(base.cached_projections(), 0);
    }
}
