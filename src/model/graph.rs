//! Viewer-facing molecular graph: atoms as nodes, bonds as index pairs.
//!
//! The graph is the single artifact handed to visualization components. Its serde layout is
//! the wire format, so field names and field order here define the emitted JSON.

use serde::{Deserialize, Serialize};

/// Graph node describing one atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Atom name (e.g., `CA`).
    pub name: String,
    /// Chain identifier.
    pub chain: String,
    /// Cartesian coordinates `[x, y, z]` in ångströms.
    pub positions: [f64; 3],
    /// Dense, 1-based residue counter across the whole file.
    pub residue_index: usize,
    /// Element symbol as written in the source file.
    pub element: String,
    /// Residue label, residue name followed by its sequence number (e.g., `ALA42`).
    pub residue_name: String,
    /// Residue name without the sequence number (e.g., `SO4`). Not serialized.
    #[serde(skip)]
    pub bare_residue_name: String,
    /// Zero-based position of the atom in [`MolecularGraph::atoms`].
    ///
    /// This is not the serial number declared in the source file; bonds refer to atoms
    /// exclusively through this value.
    pub serial: usize,
}

/// Graph edge between two atoms, referenced by their output `serial`.
///
/// `atom2_index` is filled from the first atom reference reported by the bond resolver and
/// `atom1_index` from the second. Downstream viewers depend on this assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub atom2_index: usize,
    pub atom1_index: usize,
}

impl Bond {
    /// Creates a bond from the indices in the order the resolver reported them.
    ///
    /// # Arguments
    ///
    /// * `first` - Index extracted from the resolver's first atom reference.
    /// * `second` - Index extracted from the resolver's second atom reference.
    pub fn from_resolver_pair(first: usize, second: usize) -> Self {
        Self {
            atom2_index: first,
            atom1_index: second,
        }
    }
}

/// Complete atoms/bonds graph for one structure file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MolecularGraph {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl MolecularGraph {
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        debug_assert!(
            bonds
                .iter()
                .all(|b| b.atom1_index < atoms.len() && b.atom2_index < atoms.len()),
            "Bond index out of bounds"
        );
        Self { atoms, bonds }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Number of distinct residues, i.e. the last assigned residue index.
    pub fn residue_count(&self) -> usize {
        self.atoms.last().map_or(0, |a| a.residue_index)
    }

    /// Distinct chain identifiers in order of first appearance.
    pub fn chains(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for atom in &self.atoms {
            if !seen.contains(&atom.chain.as_str()) {
                seen.push(atom.chain.as_str());
            }
        }
        seen
    }

    /// Iterates over the atoms belonging to `chain`.
    pub fn atoms_in_chain<'a>(&'a self, chain: &'a str) -> impl Iterator<Item = &'a Atom> + 'a {
        self.atoms.iter().filter(move |a| a.chain == chain)
    }
}
