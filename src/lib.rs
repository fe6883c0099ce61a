//! # cif-graph
//!
//! **cif-graph** converts mmCIF macromolecular structures into a JSON-ready molecular graph: an ordered list of atoms with residue indexing and a list of bonds expressed as pairs of atom positions. The crate favors deterministic output, strong typing, and clean error surfaces so visualization pipelines can trust the indices they receive.
//!
//! ## Features
//!
//! - **Positional record scanning** – `ATOM`/`HETATM` lines are tokenized by whitespace and mapped onto fixed field positions, with line-level diagnostics for short or malformed records.
//! - **Pluggable bond resolution** – The `BondResolver` trait abstracts topology sources; the bundled `DistanceBondResolver` perceives covalent bonds from `_atom_site` coordinates using element radii and a spatial grid.
//! - **Index cross-referencing** – Resolver references such as `<Atom CA [1]; In ALA 1>` are mapped back onto atom positions, with an alignment check between both enumerations.
//! - **Style derivation** – `create_styles` assigns a visualization mode and a color per atom, keyed by atom, residue, residue class, or chain.

mod model;
mod utils;

pub mod io;
pub mod ops;

pub use model::graph::{Atom, Bond, MolecularGraph};
pub use model::record::AtomRecord;
pub use model::types::{Element, Point};
