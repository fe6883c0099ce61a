//! Graph construction, bond resolution, and style derivation.
//!
//! This module groups the public entry points that turn scanned atom records into a
//! [`MolecularGraph`](crate::MolecularGraph) and derive per-atom styles from it. Every
//! submodule reports failures through the shared [`Error`] type.

mod error;
mod graph;
mod resolver;
mod style;

pub use graph::{
    GraphBuilder, assign_residue_indices, build_atoms, cross_reference, extract_atom_index,
};

pub use resolver::{AtomRef, BondResolver, DistanceBondResolver, ResolvedBond, ResolvedTopology};

pub use style::{
    AtomStyle, ColorElement, ColorScheme, DEFAULT_COLOR, VisualizationType, create_styles,
    default_scheme,
};

pub use error::{Error, ErrorKind};
