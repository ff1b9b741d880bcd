//! Spectral induced-polarization receivers
//!
//! Receivers describe where and when a survey measures potential
//! differences, and build the sparse projection operators that turn
//! simulated fields on a mesh into predicted data.
//!
//! # Features
//!
//! - **Pole and dipole receivers**: one or two electrode arrays, sample times
//! - **Projection operators**: interpolation matrices built from the mesh,
//!   cached per mesh, applied forward or in adjoint mode
//! - **Time selection**: boolean masks picking a receiver's times out of a survey's
//! - **JSON configuration**: receiver lists loaded from strings or files
//!
//! # Example
//!
//! ```
//! use math_geo_sip::{Dipole, FieldStore, Formulation, Receiver, TensorMesh};
//! use ndarray::{Array1, array};
//!
//! let mesh = TensorMesh::uniform(&[10, 10], &[1.0, 1.0], &[0.0, -10.0]).unwrap();
//! let rx = Dipole::new(
//!     array![[2.0, 0.0], [3.0, 0.0]],
//!     array![[4.0, 0.0], [5.0, 0.0]],
//!     array![0.01, 0.1],
//! )
//! .unwrap();
//!
//! let fields = FieldStore::new(Formulation::Nodal);
//! let v = Array1::ones(mesh.n_nodes());
//! let d = rx.eval_deriv(&mesh, &fields, &v, false).unwrap();
//! assert_eq!(d.len(), rx.n_d());
//! ```

pub mod config;
pub mod error;
pub mod fields;
pub mod receivers;

pub use config::{ReceiverConfig, ReceiverKind, SurveyConfig};
pub use error::{Result, SipError};
pub use fields::{FieldStore, Fields, Formulation};
pub use math_geo_mesh::{Axis, GridLocation, InterpolationMesh, MeshId, TensorMesh};
pub use math_geo_sparse::CsrMatrix;
pub use receivers::{Dipole, Pole, ProjField, Receiver, ReceiverBase, SipReceiver};
