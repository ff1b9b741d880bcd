//! Grid-location tags, mesh identity and the interpolation trait

use crate::error::{MeshError, Result};
use math_geo_sparse::CsrMatrix;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cartesian axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in storage order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Zero-based axis index
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Lower-case label used as a tag suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(MeshError::InvalidAxis {
                value: s.to_string(),
            }),
        }
    }
}

/// Where on the staggered grid a family of values lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    /// Cell centres (`CC`)
    CellCenters,
    /// Mesh nodes (`N`)
    Nodes,
    /// Cell edges (`E`)
    Edges,
    /// Cell faces (`F`)
    Faces,
}

impl LocationKind {
    /// Short tag
    pub fn tag(&self) -> &'static str {
        match self {
            LocationKind::CellCenters => "CC",
            LocationKind::Nodes => "N",
            LocationKind::Edges => "E",
            LocationKind::Faces => "F",
        }
    }

    /// Attach an optional component; `None` leaves the location unchanged
    pub fn with_component(self, component: Option<Axis>) -> GridLocation {
        GridLocation {
            kind: self,
            component,
        }
    }
}

/// Grid-location tag such as `CC`, `N`, `Ex` or `Fz`
///
/// A tag is a location kind plus an optional component suffix. Which
/// combinations a mesh can interpolate from is up to the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridLocation {
    pub kind: LocationKind,
    pub component: Option<Axis>,
}

impl GridLocation {
    pub const CELL_CENTERS: GridLocation = GridLocation {
        kind: LocationKind::CellCenters,
        component: None,
    };
    pub const NODES: GridLocation = GridLocation {
        kind: LocationKind::Nodes,
        component: None,
    };
    pub const EDGES: GridLocation = GridLocation {
        kind: LocationKind::Edges,
        component: None,
    };
    pub const FACES: GridLocation = GridLocation {
        kind: LocationKind::Faces,
        component: None,
    };

    /// Edge component along `axis`
    pub fn edges(axis: Axis) -> Self {
        LocationKind::Edges.with_component(Some(axis))
    }

    /// Face component normal to `axis`
    pub fn faces(axis: Axis) -> Self {
        LocationKind::Faces.with_component(Some(axis))
    }

    /// Append a component suffix; unchanged when `component` is `None`
    pub fn with_component(self, component: Option<Axis>) -> Self {
        match component {
            Some(axis) => self.kind.with_component(Some(axis)),
            None => self,
        }
    }

    /// Full tag, e.g. `"Ex"`
    pub fn tag(&self) -> String {
        match self.component {
            Some(axis) => format!("{}{}", self.kind.tag(), axis),
            None => self.kind.tag().to_string(),
        }
    }
}

impl fmt::Display for GridLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.tag())?;
        if let Some(axis) = self.component {
            f.write_str(axis.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for GridLocation {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MeshError::InvalidTag { tag: s.to_string() };

        let (kind, rest) = if let Some(rest) = s.strip_prefix("CC") {
            (LocationKind::CellCenters, rest)
        } else if let Some(rest) = s.strip_prefix('N') {
            (LocationKind::Nodes, rest)
        } else if let Some(rest) = s.strip_prefix('E') {
            (LocationKind::Edges, rest)
        } else if let Some(rest) = s.strip_prefix('F') {
            (LocationKind::Faces, rest)
        } else {
            return Err(invalid());
        };

        let component = match rest {
            "" => None,
            axis => Some(axis.parse::<Axis>().map_err(|_| invalid())?),
        };

        Ok(kind.with_component(component))
    }
}

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique mesh identity
///
/// Receivers key their projection caches on this instead of on mesh
/// contents. Meshes are immutable once built, so a clone may share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    /// Allocate a fresh identity
    pub fn next() -> Self {
        MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value (for logging)
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// A mesh that can build interpolation matrices to arbitrary locations
pub trait InterpolationMesh {
    /// Identity used for caching projections built on this mesh
    fn mesh_id(&self) -> MeshId;

    /// Spatial dimension
    fn dim(&self) -> usize;

    /// Interpolation matrix from values at `location` to the rows of `locations`
    ///
    /// When `zeros_outside` is set, rows for locations outside the mesh are
    /// left empty instead of failing.
    fn interpolation_matrix_with(
        &self,
        locations: ArrayView2<'_, f64>,
        location: GridLocation,
        zeros_outside: bool,
    ) -> Result<CsrMatrix>;

    /// Interpolation matrix; locations outside the mesh are an error
    fn interpolation_matrix(
        &self,
        locations: ArrayView2<'_, f64>,
        location: GridLocation,
    ) -> Result<CsrMatrix> {
        self.interpolation_matrix_with(locations, location, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_composition() {
        assert_eq!(GridLocation::CELL_CENTERS.tag(), "CC");
        assert_eq!(GridLocation::EDGES.with_component(Some(Axis::X)).tag(), "Ex");
        assert_eq!(GridLocation::FACES.with_component(None), GridLocation::FACES);
        assert_eq!(GridLocation::faces(Axis::Z).to_string(), "Fz");
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!("N".parse::<GridLocation>().unwrap(), GridLocation::NODES);
        assert_eq!(
            "Ey".parse::<GridLocation>().unwrap(),
            GridLocation::edges(Axis::Y)
        );
        assert_eq!(
            "CCz".parse::<GridLocation>().unwrap(),
            LocationKind::CellCenters.with_component(Some(Axis::Z))
        );
        assert!("Q".parse::<GridLocation>().is_err());
        assert!("Ew".parse::<GridLocation>().is_err());
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("y".parse::<Axis>().unwrap(), Axis::Y);
        assert!("X".parse::<Axis>().is_err());
        assert_eq!(Axis::Z.index(), 2);
    }

    #[test]
    fn test_mesh_ids_are_unique() {
        let a = MeshId::next();
        let b = MeshId::next();
        assert_ne!(a, b);
    }
}
