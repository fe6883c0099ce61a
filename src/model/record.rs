//! Raw coordinate records exactly as the record scanner extracted them.
//!
//! An [`AtomRecord`] mirrors one qualifying `ATOM`/`HETATM` line. Fields keep their file
//! semantics (declared serial, raw residue sequence number, untouched occupancy strings) so
//! the graph builder can decide how each one maps onto the emitted graph.

use super::types::Point;

/// One `ATOM` or `HETATM` line, split into typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Serial number declared by the file. Not necessarily dense or unique.
    pub serial: i64,
    /// Atom name (e.g., `CA`).
    pub name: String,
    /// Residue name (e.g., `ALA`).
    pub residue_name: String,
    /// Chain identifier; may span several characters.
    pub chain_id: String,
    /// Residue sequence number as written in the file.
    pub residue_seq: i32,
    /// Cartesian coordinates in ångströms.
    pub position: Point,
    /// Occupancy, kept as the trimmed source text.
    pub occupancy: String,
    /// Temperature factor, kept as the trimmed source text.
    pub temperature_factor: String,
    /// Element symbol as written in the file.
    pub element: String,
    /// 1-based line number the record was read from.
    pub line_number: usize,
}

impl AtomRecord {
    /// Residue label combining name and sequence number, e.g. `ALA42`.
    pub fn residue_label(&self) -> String {
        format!("{}{}", self.residue_name, self.residue_seq)
    }
}
