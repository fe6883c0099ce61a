//! Molecular graph assembly from scanned records and a resolved bond topology.
//!
//! The builder runs the whole pipeline for one structure: stage the input, scan its
//! `ATOM`/`HETATM` records, ask a [`BondResolver`] for bonds, then merge both views into a
//! [`MolecularGraph`]. The merge relies on the resolver enumerating atoms in the same order
//! as the record scanner; that alignment is verified by default.

use crate::io;
use crate::model::graph::{Atom, Bond, MolecularGraph};
use crate::model::record::AtomRecord;
use crate::ops::error::Error;
use crate::ops::resolver::{BondResolver, DistanceBondResolver, ResolvedBond, ResolvedTopology};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

static BRACKETED_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("bracketed index pattern is valid"));

/// Builder that turns structure files into [`MolecularGraph`]s.
///
/// # Examples
///
/// ```no_run
/// use cif_graph::ops::{DistanceBondResolver, GraphBuilder};
/// use std::path::Path;
///
/// let graph = GraphBuilder::new(DistanceBondResolver::new().tolerance(0.4))
///     .build_from_path(Path::new("1crn.cif"))?;
/// println!("{} atoms, {} bonds", graph.atom_count(), graph.bond_count());
/// # Ok::<(), cif_graph::ops::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<R> {
    resolver: R,
    verify_alignment: bool,
    stage_input: bool,
}

impl Default for GraphBuilder<DistanceBondResolver> {
    fn default() -> Self {
        Self::new(DistanceBondResolver::default())
    }
}

impl<R: BondResolver> GraphBuilder<R> {
    /// Creates a builder around `resolver`, with alignment verification and input staging
    /// enabled.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            verify_alignment: true,
            stage_input: true,
        }
    }

    /// Controls whether the resolver's atom count must equal the number of scanned records.
    ///
    /// Disabling this keeps only the per-bond range check.
    pub fn verify_alignment(mut self, enabled: bool) -> Self {
        self.verify_alignment = enabled;
        self
    }

    /// Controls whether [`GraphBuilder::build_from_path`] copies the input into a temporary
    /// file before reading it. Stream input is always staged.
    pub fn stage_input(mut self, enabled: bool) -> Self {
        self.stage_input = enabled;
        self
    }

    /// Builds the graph for the structure file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] for unreadable files or malformed records,
    /// [`Error::EmptyInput`] when no atom records exist, and any error reported by the
    /// resolver or by bond cross-referencing.
    pub fn build_from_path(&self, path: &Path) -> Result<MolecularGraph, Error> {
        if self.stage_input {
            let staged = io::stage_path(path)?;
            return self.build_staged(staged.path());
        }

        let file = File::open(path).map_err(|e| io::Error::from_io(e, Some(path.to_path_buf())))?;
        let records =
            io::scan_atom_records(BufReader::new(file)).map_err(|e| e.with_path(path))?;
        self.resolve_and_assemble(&records, path)
    }

    /// Builds the graph for structure text read from `reader`.
    ///
    /// The stream is spooled into a temporary file first so the resolver can load it by path.
    pub fn build_from_reader<T: Read>(&self, reader: T) -> Result<MolecularGraph, Error> {
        let staged = io::stage_reader(reader)?;
        self.build_staged(staged.path())
    }

    fn build_staged(&self, staged: &Path) -> Result<MolecularGraph, Error> {
        let file =
            File::open(staged).map_err(|e| io::Error::from_io(e, Some(staged.to_path_buf())))?;
        let records = io::scan_atom_records(BufReader::new(file))?;
        self.resolve_and_assemble(&records, staged)
    }

    fn resolve_and_assemble(
        &self,
        records: &[AtomRecord],
        path: &Path,
    ) -> Result<MolecularGraph, Error> {
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        let topology = self.resolver.resolve(path)?;
        let graph = self.assemble(records, &topology)?;

        log::info!(
            "built graph with {} atoms, {} residues and {} bonds",
            graph.atom_count(),
            graph.residue_count(),
            graph.bond_count()
        );
        Ok(graph)
    }

    /// Merges scanned records with a resolved topology.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] for an empty record list and
    /// [`Error::BondIndexUnresolvable`] when the topology does not line up with the records.
    pub fn assemble(
        &self,
        records: &[AtomRecord],
        topology: &ResolvedTopology,
    ) -> Result<MolecularGraph, Error> {
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        if topology.atom_count != records.len() {
            if self.verify_alignment {
                return Err(Error::bond_index_unresolvable(format!(
                    "resolver enumerated {} atoms but {} atom records were scanned",
                    topology.atom_count,
                    records.len()
                )));
            }
            log::warn!(
                "resolver enumerated {} atoms but {} atom records were scanned; bonds may be misaligned",
                topology.atom_count,
                records.len()
            );
        }

        let atoms = build_atoms(records);
        let bonds = cross_reference(&topology.bonds, atoms.len())?;
        Ok(MolecularGraph::new(atoms, bonds))
    }
}

/// Assigns a 1-based residue index to every record.
///
/// The index starts at 1 and advances whenever a record's residue sequence number differs
/// from the preceding record's. Chains are not considered: adjacent records from different
/// chains that share a sequence number stay in the same residue.
pub fn assign_residue_indices(records: &[AtomRecord]) -> Vec<usize> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    records
        .iter()
        .scan((first.residue_seq, 1usize), |(current_seq, index), record| {
            if record.residue_seq != *current_seq {
                *current_seq = record.residue_seq;
                *index += 1;
            }
            Some(*index)
        })
        .collect()
}

/// Converts records into graph atoms, numbering them by output position.
pub fn build_atoms(records: &[AtomRecord]) -> Vec<Atom> {
    records
        .iter()
        .zip(assign_residue_indices(records))
        .enumerate()
        .map(|(serial, (record, residue_index))| Atom {
            name: record.name.clone(),
            chain: record.chain_id.clone(),
            positions: [record.position.x, record.position.y, record.position.z],
            residue_index,
            element: record.element.clone(),
            residue_name: record.residue_label(),
            bare_residue_name: record.residue_name.clone(),
            serial,
        })
        .collect()
}

/// Extracts the first bracketed integer from an opaque atom reference.
pub fn extract_atom_index(reference: &str) -> Option<usize> {
    BRACKETED_INDEX
        .captures(reference)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
}

/// Maps resolver bonds onto graph atom serials.
///
/// Resolver order is kept, and duplicate or self-referencing bonds pass through unchanged.
///
/// # Errors
///
/// Returns [`Error::BondIndexUnresolvable`] if either reference of any bond carries no
/// bracketed index or points past `atom_count`.
pub fn cross_reference(bonds: &[ResolvedBond], atom_count: usize) -> Result<Vec<Bond>, Error> {
    bonds
        .iter()
        .enumerate()
        .map(|(position, bond)| {
            let first = resolve_reference(&bond.atom1, position, atom_count)?;
            let second = resolve_reference(&bond.atom2, position, atom_count)?;
            Ok(Bond::from_resolver_pair(first, second))
        })
        .collect()
}

fn resolve_reference(reference: &str, position: usize, atom_count: usize) -> Result<usize, Error> {
    let index = extract_atom_index(reference).ok_or_else(|| {
        Error::bond_index_unresolvable(format!(
            "bond {position}: no bracketed atom index in '{reference}'"
        ))
    })?;

    if index >= atom_count {
        return Err(Error::bond_index_unresolvable(format!(
            "bond {position}: atom index {index} in '{reference}' exceeds atom count {atom_count}"
        )));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Point;
    use crate::ops::error::ErrorKind;
    use std::cell::RefCell;
    use std::io::{Cursor, Write};
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn record(serial: i64, chain: &str, residue_name: &str, residue_seq: i32) -> AtomRecord {
        AtomRecord {
            serial,
            name: "CA".to_string(),
            residue_name: residue_name.to_string(),
            chain_id: chain.to_string(),
            residue_seq,
            position: Point::new(serial as f64, 0.0, 0.0),
            occupancy: "1.00".to_string(),
            temperature_factor: "0.00".to_string(),
            element: "C".to_string(),
            line_number: serial as usize,
        }
    }

    fn topology(atom_count: usize, pairs: &[(usize, usize)]) -> ResolvedTopology {
        ResolvedTopology {
            atom_count,
            bonds: pairs
                .iter()
                .map(|(a, b)| ResolvedBond::new(format!("<Atom X [{a}]>"), format!("<Atom Y [{b}]>")))
                .collect(),
        }
    }

    fn no_bonds(atom_count: usize) -> impl Fn(&Path) -> Result<ResolvedTopology, Error> {
        move |_: &Path| Ok(topology(atom_count, &[]))
    }

    const CRAMBIN_FRAGMENT: &str = "\
data_1CRN
#
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_alt_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_entity_id
_atom_site.label_seq_id
_atom_site.pdbx_PDB_ins_code
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.occupancy
_atom_site.B_iso_or_equiv
_atom_site.pdbx_formal_charge
_atom_site.auth_seq_id
_atom_site.auth_comp_id
_atom_site.auth_asym_id
_atom_site.auth_atom_id
_atom_site.pdbx_PDB_model_num
ATOM   1  N N   . THR A 1 1 ? 17.047 14.099 3.625 1.00 13.79 ? 1 THR A N   1
ATOM   2  C CA  . THR A 1 1 ? 16.967 12.784 4.338 1.00 10.80 ? 1 THR A CA  1
ATOM   3  C C   . THR A 1 1 ? 15.685 12.755 5.133 1.00 9.19  ? 1 THR A C   1
ATOM   4  O O   . THR A 1 1 ? 15.268 13.825 5.594 1.00 9.85  ? 1 THR A O   1
ATOM   5  N N   . THR A 1 2 ? 15.115 11.555 5.265 1.00 7.81  ? 2 THR A N   1
ATOM   6  C CA  . THR A 1 2 ? 13.856 11.469 6.066 1.00 8.31  ? 2 THR A CA  1
HETATM 7  O O   . HOH B 2 . ? 2.000  2.000  2.000 1.00 20.00 ? 101 HOH A O 1
#
";

    fn cif_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn residue_index_starts_at_one_and_advances_on_change() {
        let records = vec![
            record(1, "A", "ALA", 5),
            record(2, "A", "ALA", 5),
            record(3, "A", "GLY", 6),
        ];
        assert_eq!(assign_residue_indices(&records), vec![1, 1, 2]);
    }

    #[test]
    fn residue_index_counts_revisited_sequence_numbers_as_new_residues() {
        let records = vec![
            record(1, "A", "ALA", 1),
            record(2, "A", "GLY", 2),
            record(3, "B", "ALA", 1),
            record(4, "B", "GLY", 2),
        ];
        assert_eq!(assign_residue_indices(&records), vec![1, 2, 3, 4]);
    }

    #[test]
    fn residue_index_merges_chains_sharing_a_boundary_sequence_number() {
        let records = vec![
            record(1, "A", "ALA", 7),
            record(2, "B", "SER", 7),
            record(3, "B", "SER", 8),
        ];
        assert_eq!(assign_residue_indices(&records), vec![1, 1, 2]);
    }

    #[test]
    fn residue_index_is_empty_for_no_records() {
        assert!(assign_residue_indices(&[]).is_empty());
    }

    #[test]
    fn build_atoms_uses_output_positions_as_serials() {
        let records = vec![record(10, "A", "ALA", 42), record(57, "A", "ALA", 42)];
        let atoms = build_atoms(&records);

        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].serial, 0);
        assert_eq!(atoms[1].serial, 1);
        assert_eq!(atoms[1].residue_name, "ALA42");
        assert_eq!(atoms[1].positions, [57.0, 0.0, 0.0]);
        assert_eq!(atoms[1].chain, "A");
        assert_eq!(atoms[1].element, "C");
    }

    #[test]
    fn build_atoms_keeps_bare_residue_name_out_of_json() {
        let atoms = build_atoms(&[record(1, "A", "SO4", 301)]);

        assert_eq!(atoms[0].residue_name, "SO4301");
        assert_eq!(atoms[0].bare_residue_name, "SO4");
        let json = serde_json::to_string(&atoms[0]).unwrap();
        assert!(!json.contains("bare_residue_name"));
    }

    #[test]
    fn extract_atom_index_reads_first_bracketed_integer() {
        assert_eq!(extract_atom_index("<Atom CA [12]; In ALA 3>"), Some(12));
        assert_eq!(extract_atom_index("[0] then [5]"), Some(0));
        assert_eq!(extract_atom_index("<Atom CA>"), None);
        assert_eq!(extract_atom_index("[-1]"), None);
        assert_eq!(extract_atom_index("[99999999999999999999999]"), None);
    }

    #[test]
    fn cross_reference_keeps_resolver_order_and_swaps_field_names() {
        let bonds = topology(10, &[(2, 7), (7, 2), (3, 3)]).bonds;
        let mapped = cross_reference(&bonds, 10).unwrap();

        assert_eq!(
            mapped,
            vec![
                Bond {
                    atom2_index: 2,
                    atom1_index: 7
                },
                Bond {
                    atom2_index: 7,
                    atom1_index: 2
                },
                Bond {
                    atom2_index: 3,
                    atom1_index: 3
                },
            ]
        );
    }

    #[test]
    fn cross_reference_rejects_missing_or_out_of_range_indices() {
        let missing = vec![ResolvedBond::new("<Atom CA [1]>", "<Atom CB>")];
        let err = cross_reference(&missing, 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BondIndexUnresolvable);
        assert!(err.to_string().contains("<Atom CB>"));

        let out_of_range = topology(5, &[(1, 5)]).bonds;
        let err = cross_reference(&out_of_range, 5).unwrap_err();
        assert!(err.to_string().contains("exceeds atom count 5"));
    }

    #[test]
    fn assemble_produces_atoms_and_bonds() {
        let records = vec![
            record(1, "A", "ALA", 5),
            record(2, "A", "ALA", 5),
            record(3, "A", "GLY", 6),
        ];
        let graph = GraphBuilder::new(no_bonds(3))
            .assemble(&records, &topology(3, &[(0, 1), (1, 2)]))
            .unwrap();

        assert_eq!(graph.atom_count(), 3);
        let indices: Vec<usize> = graph.atoms.iter().map(|a| a.residue_index).collect();
        assert_eq!(indices, vec![1, 1, 2]);
        assert_eq!(graph.bonds[0], Bond::from_resolver_pair(0, 1));
        assert_eq!(graph.bonds[1], Bond::from_resolver_pair(1, 2));
    }

    #[test]
    fn assemble_rejects_empty_records() {
        let err = GraphBuilder::new(no_bonds(0))
            .assemble(&[], &topology(0, &[]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn assemble_verifies_alignment_by_default() {
        let records = vec![record(1, "A", "ALA", 1), record(2, "A", "ALA", 1)];
        let err = GraphBuilder::new(no_bonds(3))
            .assemble(&records, &topology(3, &[(0, 1)]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BondIndexUnresolvable);
        assert!(err.to_string().contains("3 atoms but 2 atom records"));
    }

    #[test]
    fn assemble_without_alignment_check_still_range_checks_bonds() {
        let records = vec![record(1, "A", "ALA", 1), record(2, "A", "ALA", 1)];
        let builder = GraphBuilder::new(no_bonds(3)).verify_alignment(false);

        let graph = builder
            .assemble(&records, &topology(3, &[(0, 1)]))
            .unwrap();
        assert_eq!(graph.bond_count(), 1);

        let err = builder
            .assemble(&records, &topology(3, &[(1, 2)]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BondIndexUnresolvable);
    }

    #[test]
    fn build_from_path_runs_full_pipeline_with_distance_resolver() {
        let file = cif_file(CRAMBIN_FRAGMENT);
        let graph = GraphBuilder::default().build_from_path(file.path()).unwrap();

        assert_eq!(graph.atom_count(), 7);
        let indices: Vec<usize> = graph.atoms.iter().map(|a| a.residue_index).collect();
        assert_eq!(indices, vec![1, 1, 1, 1, 2, 2, 3]);
        assert_eq!(graph.atoms[6].residue_name, "HOH101");
        assert_eq!(graph.atoms[6].chain, "B");
        assert_eq!(graph.chains(), vec!["A", "B"]);

        let pairs: Vec<(usize, usize)> = graph
            .bonds
            .iter()
            .map(|b| (b.atom2_index, b.atom1_index))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3), (2, 4), (4, 5)]);
        for bond in &graph.bonds {
            assert!(bond.atom1_index < graph.atom_count());
            assert!(bond.atom2_index < graph.atom_count());
        }
    }

    #[test]
    fn build_from_path_without_staging_matches_staged_output() {
        let file = cif_file(CRAMBIN_FRAGMENT);
        let staged = GraphBuilder::default().build_from_path(file.path()).unwrap();
        let direct = GraphBuilder::default()
            .stage_input(false)
            .build_from_path(file.path())
            .unwrap();
        assert_eq!(staged, direct);
    }

    #[test]
    fn build_is_deterministic() {
        let file = cif_file(CRAMBIN_FRAGMENT);
        let builder = GraphBuilder::default();

        let first = serde_json::to_vec(&builder.build_from_path(file.path()).unwrap()).unwrap();
        let second = serde_json::to_vec(&builder.build_from_path(file.path()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn build_from_reader_matches_build_from_path() {
        let file = cif_file(CRAMBIN_FRAGMENT);
        let from_path = GraphBuilder::default().build_from_path(file.path()).unwrap();
        let from_reader = GraphBuilder::default()
            .build_from_reader(Cursor::new(CRAMBIN_FRAGMENT.as_bytes()))
            .unwrap();
        assert_eq!(from_path, from_reader);
    }

    #[test]
    fn build_reports_empty_input_before_resolving() {
        let called = RefCell::new(false);
        let resolver = |_: &Path| {
            *called.borrow_mut() = true;
            Ok::<_, Error>(ResolvedTopology::default())
        };

        let err = GraphBuilder::new(resolver)
            .build_from_reader(Cursor::new(b"data_EMPTY\n#\n".to_vec()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
        assert!(!*called.borrow());
    }

    #[test]
    fn build_reports_malformed_records_without_partial_output() {
        let input = "\
ATOM 1 C CA . ALA A 1 1 ? 1.0 2.0 3.0 1.00 5.00 ? 7 ALA A CA 1
ATOM 2 C CB . ALA A 1 1 ?
";
        let err = GraphBuilder::new(no_bonds(2))
            .build_from_reader(Cursor::new(input.as_bytes()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn staged_copy_is_removed_when_resolver_fails() {
        let seen: RefCell<Option<PathBuf>> = RefCell::new(None);
        let resolver = |path: &Path| {
            *seen.borrow_mut() = Some(path.to_path_buf());
            Err::<ResolvedTopology, _>(Error::resolver_unavailable(path, "unsupported"))
        };

        let file = cif_file(CRAMBIN_FRAGMENT);
        let err = GraphBuilder::new(resolver)
            .build_from_path(file.path())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResolverUnavailable);

        let staged = seen.borrow().clone().expect("resolver was called");
        assert_ne!(staged, file.path());
        assert!(!staged.exists());
    }

    #[test]
    fn resolver_bonds_with_embedded_indices_map_to_swapped_fields() {
        let file = cif_file(CRAMBIN_FRAGMENT);
        let resolver = |_: &Path| {
            Ok::<_, Error>(ResolvedTopology {
                atom_count: 7,
                bonds: vec![ResolvedBond::new(
                    "<Atom CA [2]; In THR 1>",
                    "<Atom O [6]; In HOH 101>",
                )],
            })
        };

        let graph = GraphBuilder::new(resolver)
            .build_from_path(file.path())
            .unwrap();
        assert_eq!(
            graph.bonds,
            vec![Bond {
                atom2_index: 2,
                atom1_index: 6
            }]
        );
    }
}
