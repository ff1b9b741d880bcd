//! Rectilinear tensor mesh
//!
//! Values are ordered with x varying fastest. Face and edge components are
//! stacked x, then y, then z, matching the layout used by staggered-grid
//! finite-volume operators.

use super::types::{Axis, GridLocation, InterpolationMesh, LocationKind, MeshId};
use crate::error::{MeshError, Result};
use math_geo_sparse::CsrMatrix;
use ndarray::ArrayView2;
use serde::Serialize;

/// Relative tolerance for deciding whether a coordinate lies on the mesh boundary
const INSIDE_TOL: f64 = 1e-10;

/// A rectilinear mesh in 1, 2 or 3 dimensions
#[derive(Debug, Clone, Serialize)]
pub struct TensorMesh {
    #[serde(skip)]
    id: MeshId,
    /// Cell widths along each axis
    h: Vec<Vec<f64>>,
    /// Coordinates of the lowest corner
    origin: Vec<f64>,
}

impl TensorMesh {
    /// Create a mesh from per-axis cell widths and an origin
    pub fn new(h: Vec<Vec<f64>>, origin: Vec<f64>) -> Result<Self> {
        let dim = h.len();
        if !(1..=3).contains(&dim) {
            return Err(MeshError::InvalidDimension { dim });
        }
        if origin.len() != dim {
            return Err(MeshError::OriginLength {
                expected: dim,
                got: origin.len(),
            });
        }
        for (axis, widths) in h.iter().enumerate() {
            if widths.is_empty() {
                return Err(MeshError::EmptyAxis { axis });
            }
            if let Some((index, &width)) = widths
                .iter()
                .enumerate()
                .find(|&(_, w)| !w.is_finite() || *w <= 0.0)
            {
                return Err(MeshError::InvalidCellWidth { axis, index, width });
            }
        }

        Ok(Self {
            id: MeshId::next(),
            h,
            origin,
        })
    }

    /// Cell widths along an axis; empty for axes beyond the mesh dimension
    pub fn widths(&self, axis: Axis) -> &[f64] {
        match self.h.get(axis.index()) {
            Some(w) => w,
            None => &[],
        }
    }

    /// Origin (lowest corner)
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// Number of cells along each axis
    pub fn shape_cells(&self) -> Vec<usize> {
        self.h.iter().map(|w| w.len()).collect()
    }

    /// Node coordinates along an axis; empty for axes beyond the mesh dimension
    pub fn nodes_along(&self, axis: Axis) -> Vec<f64> {
        if axis.index() < self.dim() {
            self.nodes_on(axis.index())
        } else {
            Vec::new()
        }
    }

    /// Cell-centre coordinates along an axis; empty for axes beyond the
    /// mesh dimension
    pub fn cell_centers_along(&self, axis: Axis) -> Vec<f64> {
        if axis.index() < self.dim() {
            self.centers_on(axis.index())
        } else {
            Vec::new()
        }
    }

    fn nodes_on(&self, d: usize) -> Vec<f64> {
        let mut nodes = Vec::with_capacity(self.h[d].len() + 1);
        let mut x = self.origin[d];
        nodes.push(x);
        for w in &self.h[d] {
            x += w;
            nodes.push(x);
        }
        nodes
    }

    fn centers_on(&self, d: usize) -> Vec<f64> {
        self.nodes_on(d)
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect()
    }

    /// Number of cells
    pub fn n_cells(&self) -> usize {
        self.h.iter().map(|w| w.len()).product()
    }

    /// Number of nodes
    pub fn n_nodes(&self) -> usize {
        self.h.iter().map(|w| w.len() + 1).product()
    }

    /// Number of faces normal to `axis`
    pub fn n_faces_along(&self, axis: Axis) -> usize {
        self.component_count(axis, LocationKind::Faces)
    }

    /// Number of edges parallel to `axis`
    pub fn n_edges_along(&self, axis: Axis) -> usize {
        self.component_count(axis, LocationKind::Edges)
    }

    /// Total number of faces
    pub fn n_faces(&self) -> usize {
        self.axes().map(|a| self.n_faces_along(a)).sum()
    }

    /// Total number of edges
    pub fn n_edges(&self) -> usize {
        self.axes().map(|a| self.n_edges_along(a)).sum()
    }

    /// Whether a point lies inside the mesh (boundary included)
    pub fn is_inside(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point.iter().enumerate().all(|(axis, &p)| {
                let lo = self.origin[axis];
                let hi = lo + self.h[axis].iter().sum::<f64>();
                let tol = INSIDE_TOL * (hi - lo);
                p >= lo - tol && p <= hi + tol
            })
    }

    fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().take(self.dim())
    }

    /// Number of values of one face/edge component: nodes along the
    /// staggered axes, cell centres along the others
    fn component_count(&self, axis: Axis, kind: LocationKind) -> usize {
        if axis.index() >= self.dim() {
            return 0;
        }
        self.h
            .iter()
            .enumerate()
            .map(|(d, w)| {
                let on_nodes = match kind {
                    LocationKind::Faces => d == axis.index(),
                    _ => d != axis.index(),
                };
                if on_nodes { w.len() + 1 } else { w.len() }
            })
            .product()
    }

    /// Per-axis grid vectors of a location, the column offset of its block
    /// and the total column count of the family it belongs to
    fn location_grid(&self, location: GridLocation) -> Result<(Vec<Vec<f64>>, usize, usize)> {
        let dim = self.dim();
        let unsupported = || MeshError::UnsupportedLocation {
            tag: location.tag(),
            dim,
        };
        let centers = || -> Vec<Vec<f64>> {
            (0..dim).map(|d| self.centers_on(d)).collect()
        };

        match (location.kind, location.component) {
            (LocationKind::CellCenters, None) => Ok((centers(), 0, self.n_cells())),
            (LocationKind::CellCenters, Some(axis)) if axis.index() < dim => Ok((
                centers(),
                axis.index() * self.n_cells(),
                dim * self.n_cells(),
            )),
            (LocationKind::Nodes, None) => Ok((
                (0..dim).map(|d| self.nodes_on(d)).collect(),
                0,
                self.n_nodes(),
            )),
            (kind @ (LocationKind::Faces | LocationKind::Edges), Some(axis))
                if axis.index() < dim =>
            {
                let grid = (0..dim)
                    .map(|d| {
                        let on_nodes = match kind {
                            LocationKind::Faces => d == axis.index(),
                            _ => d != axis.index(),
                        };
                        if on_nodes {
                            self.nodes_on(d)
                        } else {
                            self.centers_on(d)
                        }
                    })
                    .collect();
                let offset = self
                    .axes()
                    .take_while(|a| *a != axis)
                    .map(|a| self.component_count(a, kind))
                    .sum();
                let total = self.axes().map(|a| self.component_count(a, kind)).sum();
                Ok((grid, offset, total))
            }
            _ => Err(unsupported()),
        }
    }
}

/// Linear interpolation stencil of `p` on a sorted 1D grid
///
/// Coordinates beyond the first or last grid point take that point's value.
fn stencil_1d(grid: &[f64], p: f64) -> Vec<(usize, f64)> {
    let last = grid.len() - 1;
    if last == 0 || p <= grid[0] {
        return vec![(0, 1.0)];
    }
    if p >= grid[last] {
        return vec![(last, 1.0)];
    }

    // First index with grid[i] > p; guaranteed to be in 1..=last here
    let upper = grid.partition_point(|&g| g <= p);
    let lower = upper - 1;
    let t = (p - grid[lower]) / (grid[upper] - grid[lower]);

    let mut stencil = Vec::with_capacity(2);
    if t < 1.0 {
        stencil.push((lower, 1.0 - t));
    }
    if t > 0.0 {
        stencil.push((upper, t));
    }
    stencil
}

impl InterpolationMesh for TensorMesh {
    fn mesh_id(&self) -> MeshId {
        self.id
    }

    fn dim(&self) -> usize {
        self.h.len()
    }

    fn interpolation_matrix_with(
        &self,
        locations: ArrayView2<'_, f64>,
        location: GridLocation,
        zeros_outside: bool,
    ) -> Result<CsrMatrix> {
        let dim = self.dim();
        if locations.ncols() != dim {
            return Err(MeshError::LocationDimension {
                expected: dim,
                got: locations.ncols(),
            });
        }

        let (grid, offset, num_cols) = self.location_grid(location)?;

        // x varies fastest within a block
        let mut strides = Vec::with_capacity(dim);
        let mut stride = 1;
        for g in &grid {
            strides.push(stride);
            stride *= g.len();
        }

        let mut triplets = Vec::with_capacity(locations.nrows() * (1 << dim));
        for (row, point) in locations.rows().into_iter().enumerate() {
            let coords = point.to_vec();
            if !self.is_inside(&coords) {
                if zeros_outside {
                    log::warn!(
                        "location {} at {:?} lies outside {}, leaving its row empty",
                        row,
                        coords,
                        self.id
                    );
                    continue;
                }
                return Err(MeshError::PointOutside {
                    index: row,
                    point: coords,
                });
            }

            let mut entries = vec![(offset, 1.0)];
            for (d, &p) in coords.iter().enumerate() {
                let axis_stencil = stencil_1d(&grid[d], p);
                let stride = strides[d];
                entries = entries
                    .iter()
                    .flat_map(|&(col, w)| {
                        axis_stencil
                            .iter()
                            .map(move |&(i, wi)| (col + i * stride, w * wi))
                    })
                    .collect();
            }

            triplets.extend(entries.into_iter().map(|(col, w)| (row, col, w)));
        }

        log::debug!(
            "built {}x{} interpolation matrix from {} on {}",
            locations.nrows(),
            num_cols,
            location,
            self.id
        );

        Ok(CsrMatrix::from_triplets(
            locations.nrows(),
            num_cols,
            triplets,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn mesh_2d() -> TensorMesh {
        TensorMesh::new(vec![vec![1.0, 2.0], vec![1.0; 3]], vec![0.0, -3.0]).unwrap()
    }

    #[test]
    fn test_counts_2d() {
        let mesh = mesh_2d();
        assert_eq!(mesh.n_cells(), 6);
        assert_eq!(mesh.n_nodes(), 12);
        assert_eq!(mesh.n_faces_along(Axis::X), 9);
        assert_eq!(mesh.n_faces_along(Axis::Y), 8);
        assert_eq!(mesh.n_faces(), 17);
        assert_eq!(mesh.n_edges_along(Axis::X), 8);
        assert_eq!(mesh.n_edges_along(Axis::Y), 9);
        assert_eq!(mesh.n_faces_along(Axis::Z), 0);
    }

    #[test]
    fn test_axis_vectors() {
        let mesh = mesh_2d();
        assert_eq!(mesh.nodes_along(Axis::X), vec![0.0, 1.0, 3.0]);
        assert_eq!(mesh.cell_centers_along(Axis::X), vec![0.5, 2.0]);
        assert_eq!(mesh.nodes_along(Axis::Y), vec![-3.0, -2.0, -1.0, 0.0]);
        assert_eq!(mesh.widths(Axis::X), &[1.0, 2.0]);
    }

    #[test]
    fn test_missing_axis_is_empty() {
        let mesh = mesh_2d();
        assert!(mesh.widths(Axis::Z).is_empty());
        assert!(mesh.nodes_along(Axis::Z).is_empty());
        assert!(mesh.cell_centers_along(Axis::Z).is_empty());
        assert_eq!(mesh.n_edges_along(Axis::Z), 0);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(TensorMesh::new(vec![], vec![]).is_err());
        assert!(TensorMesh::new(vec![vec![1.0]], vec![0.0, 0.0]).is_err());
        assert!(matches!(
            TensorMesh::new(vec![vec![1.0, 0.0]], vec![0.0]),
            Err(MeshError::InvalidCellWidth { index: 1, .. })
        ));
        assert!(matches!(
            TensorMesh::new(vec![vec![1.0], vec![]], vec![0.0, 0.0]),
            Err(MeshError::EmptyAxis { axis: 1 })
        ));
    }

    #[test]
    fn test_stencil_1d() {
        let grid = [0.0, 1.0, 3.0];
        assert_eq!(stencil_1d(&grid, -1.0), vec![(0, 1.0)]);
        assert_eq!(stencil_1d(&grid, 1.0), vec![(1, 1.0)]);
        assert_eq!(stencil_1d(&grid, 4.0), vec![(2, 1.0)]);

        let s = stencil_1d(&grid, 2.5);
        assert_eq!(s.len(), 2);
        assert_relative_eq!(s[0].1, 0.25);
        assert_relative_eq!(s[1].1, 0.75);
    }

    #[test]
    fn test_nodal_interpolation_weights() {
        let mesh = mesh_2d();
        let p = mesh
            .interpolation_matrix(array![[2.0, -2.5]].view(), GridLocation::NODES)
            .unwrap();

        // x: halfway between nodes 1 and 2; y: halfway between nodes 0 and 1
        assert_eq!(p.nnz(), 4);
        assert_relative_eq!(p.get(0, 1), 0.25);
        assert_relative_eq!(p.get(0, 2), 0.25);
        assert_relative_eq!(p.get(0, 4), 0.25);
        assert_relative_eq!(p.get(0, 5), 0.25);
    }

    #[test]
    fn test_face_block_offsets() {
        let mesh = mesh_2d();
        let locs = array![[0.5, -2.5]];

        let fx = mesh
            .interpolation_matrix(locs.view(), GridLocation::faces(Axis::X))
            .unwrap();
        let fy = mesh
            .interpolation_matrix(locs.view(), GridLocation::faces(Axis::Y))
            .unwrap();

        assert_eq!(fx.num_cols, mesh.n_faces());
        assert!(fx.col_indices.iter().all(|&c| c < 9));
        assert!(fy.col_indices.iter().all(|&c| (9..17).contains(&c)));
        assert_relative_eq!(fx.row_sums()[0], 1.0);
        assert_relative_eq!(fy.row_sums()[0], 1.0);
    }

    #[test]
    fn test_unsupported_locations() {
        let mesh = mesh_2d();
        let locs = array![[0.5, -2.5]];

        for loc in [
            GridLocation::EDGES,
            GridLocation::FACES,
            GridLocation::faces(Axis::Z),
            GridLocation::NODES.with_component(Some(Axis::X)),
        ] {
            assert!(matches!(
                mesh.interpolation_matrix(locs.view(), loc),
                Err(MeshError::UnsupportedLocation { .. })
            ));
        }
    }

    #[test]
    fn test_outside_points() {
        let mesh = mesh_2d();
        let locs = array![[0.5, -2.5], [10.0, 0.0]];

        assert!(matches!(
            mesh.interpolation_matrix(locs.view(), GridLocation::CELL_CENTERS),
            Err(MeshError::PointOutside { index: 1, .. })
        ));

        let p = mesh
            .interpolation_matrix_with(locs.view(), GridLocation::CELL_CENTERS, true)
            .unwrap();
        assert_eq!(p.row_range(1).len(), 0);
        assert_relative_eq!(p.row_sums()[0], 1.0);
    }

    #[test]
    fn test_location_dimension_mismatch() {
        let mesh = mesh_2d();
        let err = mesh
            .interpolation_matrix(array![[0.5, -2.5, 0.0]].view(), GridLocation::NODES)
            .unwrap_err();
        assert!(err.is_location_error());
    }
}
