//! Dipole receiver: potential difference between an M and an N electrode

use super::{ProjField, Receiver, ReceiverBase};
use crate::error::{Result, SipError};
use math_geo_mesh::{Axis, GridLocation, InterpolationMesh};
use math_geo_sparse::CsrMatrix;
use ndarray::{Array1, Array2};

/// Dipole receiver
///
/// Row `i` of the data is the field at `locations_m[i]` minus the field at
/// `locations_n[i]`.
#[derive(Debug, Clone)]
pub struct Dipole {
    base: ReceiverBase,
    locations: [Array2<f64>; 2],
}

impl Dipole {
    /// Electrode pairs at matching rows of `locations_m` and `locations_n`
    ///
    /// Fails when the two arrays differ in shape.
    pub fn new(
        locations_m: Array2<f64>,
        locations_n: Array2<f64>,
        times: Array1<f64>,
    ) -> Result<Self> {
        if locations_m.shape() != locations_n.shape() {
            return Err(SipError::ElectrodeShapeMismatch {
                m: locations_m.shape().to_vec(),
                n: locations_n.shape().to_vec(),
            });
        }

        Ok(Self {
            base: ReceiverBase::new(times),
            locations: [locations_m, locations_n],
        })
    }

    /// Single electrode pair given as two coordinate vectors
    pub fn at_points(
        location_m: Array1<f64>,
        location_n: Array1<f64>,
        times: Array1<f64>,
    ) -> Result<Self> {
        if location_m.len() != location_n.len() {
            return Err(SipError::ElectrodeShapeMismatch {
                m: location_m.shape().to_vec(),
                n: location_n.shape().to_vec(),
            });
        }
        Self::new(
            location_m.insert_axis(ndarray::Axis(0)),
            location_n.insert_axis(ndarray::Axis(0)),
            times,
        )
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

    /// Both electrode arrays, M first
    pub fn locations(&self) -> &[Array2<f64>; 2] {
        &self.locations
    }

    pub fn locations_m(&self) -> &Array2<f64> {
        &self.locations[0]
    }

    pub fn locations_n(&self) -> &Array2<f64> {
        &self.locations[1]
    }
}

impl Receiver for Dipole {
    fn base(&self) -> &ReceiverBase {
        &self.base
    }

    fn n_d(&self) -> usize {
        self.locations[0].nrows()
    }

    fn build_projection<M: InterpolationMesh + ?Sized>(
        &self,
        mesh: &M,
        location: GridLocation,
    ) -> Result<CsrMatrix> {
        let p_m = mesh.interpolation_matrix(self.locations[0].view(), location)?;
        let p_n = mesh.interpolation_matrix(self.locations[1].view(), location)?;
        let p = p_m.try_sub(&p_n)?;
        log::info!(
            "assembled {}x{} dipole projection from {} on {}",
            p.num_rows,
            p.num_cols,
            location,
            mesh.mesh_id()
        );
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use math_geo_mesh::TensorMesh;
    use ndarray::array;
    use std::sync::Arc;

    fn mesh() -> TensorMesh {
        TensorMesh::uniform(&[6, 3], &[1.0, 1.0], &[0.0, -3.0]).unwrap()
    }

    #[test]
    fn test_shape_mismatch_fails() {
        let err = Dipole::new(
            array![[0.0, 0.0], [1.0, 0.0]],
            array![[2.0, 0.0]],
            array![0.1],
        )
        .unwrap_err();
        assert!(matches!(err, SipError::ElectrodeShapeMismatch { .. }));

        // Same row count, different coordinate count
        assert!(Dipole::new(array![[0.0, 0.0]], array![[2.0, 0.0, 0.0]], array![0.1]).is_err());
        assert!(Dipole::at_points(array![0.0, 0.0], array![1.0], array![0.1]).is_err());
    }

    #[test]
    fn test_n_d_uses_m_electrodes() {
        let rx = Dipole::new(
            array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]],
            array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]],
            array![0.1, 0.2],
        )
        .unwrap();
        assert_eq!(rx.n_d(), 3);
        assert_eq!(rx.locations_n().nrows(), 3);
    }

    #[test]
    #[allow(deprecated)]
    fn test_n_rx_always_fails() {
        let rx = Dipole::at_points(array![0.0, 0.0], array![1.0, 0.0], array![0.1]).unwrap();
        assert!(rx.n_rx().unwrap_err().is_deprecated());
    }

    #[test]
    fn test_projection_is_difference_of_electrodes() {
        let mesh = mesh();
        let rx = Dipole::at_points(array![1.5, -0.5], array![4.5, -0.5], array![0.1]).unwrap();

        let p = rx.get_p(&mesh, GridLocation::CELL_CENTERS).unwrap();

        assert_eq!(p.shape(), (1, mesh.n_cells()));
        assert_relative_eq!(p.get(0, 1 + 2 * 6), 1.0);
        assert_relative_eq!(p.get(0, 4 + 2 * 6), -1.0);
        assert_relative_eq!(p.row_sums()[0], 0.0);
    }

    #[test]
    fn test_coincident_electrodes_give_empty_row() {
        let mesh = mesh();
        let rx = Dipole::at_points(array![2.2, -1.3], array![2.2, -1.3], array![0.1]).unwrap();

        let p = rx.get_p(&mesh, GridLocation::NODES).unwrap();
        assert_eq!(p.nnz(), 0);
    }

    #[test]
    fn test_get_p_is_cached() {
        let mesh = mesh();
        let rx = Dipole::at_points(array![1.0, -1.0], array![3.0, -1.0], array![0.1]).unwrap();

        let p1 = rx.get_p(&mesh, GridLocation::NODES).unwrap();
        let p2 = rx.get_p(&mesh, GridLocation::NODES).unwrap();
        assert!(Arc::ptr_eq(&p1, &p2));
    }

    #[test]
    fn test_get_p_without_storage() {
        let mesh = mesh();
        let rx = Dipole::at_points(array![1.0, -1.0], array![3.0, -1.0], array![0.1])
            .unwrap()
            .with_store_projections(false);

        let p1 = rx.get_p(&mesh, GridLocation::NODES).unwrap();
        let p2 = rx.get_p(&mesh, GridLocation::NODES).unwrap();

        assert!(!Arc::ptr_eq(&p1, &p2));
        assert_eq!(*p1, *p2);
        assert_relative_eq!(p1.row_sums()[0], 0.0);
        assert_eq!(rx.base().cached_projections(), 0);
    }
}
