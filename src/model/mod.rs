//! Core data structures for scanned records and molecular graphs.
//!
//! Scanned [`record::AtomRecord`] values are produced by the I/O layer and consumed by the
//! graph builder, which emits the serializable [`graph::MolecularGraph`].

pub mod graph;
pub mod grid;
pub mod record;
pub mod types;
