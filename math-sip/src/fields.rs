//! Simulated fields as seen by receivers
//!
//! Receivers only need two things from a fields object: where on the grid
//! a given field lives, and its values for a source.

use crate::error::{Result, SipError};
use crate::receivers::ProjField;
use math_geo_mesh::GridLocation;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Access to simulated fields
pub trait Fields {
    /// Identifies a source within the survey
    type Source;

    /// Grid location of `field` in this discretization
    fn grid_location(&self, field: ProjField) -> GridLocation;

    /// Values of `field` for `src`
    fn field(&self, src: &Self::Source, field: ProjField) -> Result<Array1<f64>>;
}

/// Discretization of the DC-resistivity problem underlying SIP simulations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formulation {
    /// Potential at cell centres, fluxes on faces
    CellCentered,
    /// Potential at nodes, fields on edges
    Nodal,
}

impl Formulation {
    /// Grid location of a field in this formulation
    pub fn grid_location(&self, field: ProjField) -> GridLocation {
        match (self, field) {
            (Formulation::CellCentered, ProjField::Phi) => GridLocation::CELL_CENTERS,
            (Formulation::CellCentered, ProjField::E | ProjField::J) => GridLocation::FACES,
            (Formulation::Nodal, ProjField::Phi) => GridLocation::NODES,
            (Formulation::Nodal, ProjField::E | ProjField::J) => GridLocation::EDGES,
        }
    }
}

/// In-memory fields keyed by source index
#[derive(Debug, Clone)]
pub struct FieldStore {
    formulation: Formulation,
    values: HashMap<(usize, ProjField), Array1<f64>>,
}

impl FieldStore {
    /// Empty store for a formulation
    pub fn new(formulation: Formulation) -> Self {
        Self {
            formulation,
            values: HashMap::new(),
        }
    }

    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    /// Store `values` of `field` for source `src`, replacing earlier values
    pub fn insert(&mut self, src: usize, field: ProjField, values: Array1<f64>) {
        self.values.insert((src, field), values);
    }

    /// Number of stored (source, field) pairs
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Fields for FieldStore {
    type Source = usize;

    fn grid_location(&self, field: ProjField) -> GridLocation {
        self.formulation.grid_location(field)
    }

    fn field(&self, src: &usize, field: ProjField) -> Result<Array1<f64>> {
        self.values
            .get(&(*src, field))
            .cloned()
            .ok_or(SipError::MissingField {
                source_index: *src,
                field,
            })
    }
}
