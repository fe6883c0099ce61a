//! Bond-topology resolution behind a narrow, swappable interface.
//!
//! A resolver receives the path of a structure file and reports, in its own atom
//! enumeration, which atom pairs are bonded. Atom references are opaque strings that embed
//! the atom's enumeration index in square brackets (e.g., `<Atom CA [3]; In ALA 12>`); the
//! graph builder recovers that index and nothing else.
//!
//! [`DistanceBondResolver`] is the bundled implementation. It loads the `_atom_site` loop
//! independently of the record scanner and connects atoms whose separation is within the
//! sum of their covalent radii plus a tolerance.

use crate::io::{self, AtomSite};
use crate::model::grid::Grid;
use crate::model::types::Element;
use crate::ops::error::Error;
use crate::utils::parallel::*;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A bond as reported by a resolver, with both atoms given as opaque references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBond {
    pub atom1: String,
    pub atom2: String,
}

impl ResolvedBond {
    pub fn new(atom1: impl Into<String>, atom2: impl Into<String>) -> Self {
        Self {
            atom1: atom1.into(),
            atom2: atom2.into(),
        }
    }
}

/// Complete resolver output for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTopology {
    /// Number of atoms in the resolver's own enumeration.
    pub atom_count: usize,
    /// Bonds in resolver order.
    pub bonds: Vec<ResolvedBond>,
}

/// Anything that can infer a bond list for a structure file.
pub trait BondResolver {
    /// Loads `path` and reports its bonds.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::ResolverUnavailable`] when the file cannot be loaded
    /// or processed.
    fn resolve(&self, path: &Path) -> Result<ResolvedTopology, Error>;
}

impl<F> BondResolver for F
where
    F: Fn(&Path) -> Result<ResolvedTopology, Error>,
{
    fn resolve(&self, path: &Path) -> Result<ResolvedTopology, Error> {
        self(path)
    }
}

/// Human-readable atom reference used by [`DistanceBondResolver`].
///
/// Displays as `<Atom {name} [{index}]; In {residue} {seq}>`.
#[derive(Debug, Clone, Copy)]
pub struct AtomRef<'a> {
    pub index: usize,
    pub site: &'a AtomSite,
}

impl fmt::Display for AtomRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Atom {} [{}]; In {} {}>",
            self.site.name, self.index, self.site.residue_name, self.site.residue_seq
        )
    }
}

/// Geometry-based bond perception over covalent radii.
///
/// Atoms `i` and `j` are bonded when `min_distance < d(i, j) <= r_i + r_j + tolerance`.
/// Atoms with an unknown element are never bonded.
#[derive(Debug, Clone)]
pub struct DistanceBondResolver {
    tolerance: f64,
    min_distance: f64,
}

impl Default for DistanceBondResolver {
    fn default() -> Self {
        Self {
            tolerance: 0.45,
            min_distance: 0.4,
        }
    }
}

impl DistanceBondResolver {
    /// Creates a resolver with a 0.45 Å tolerance and a 0.4 Å minimum separation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the slack in ångströms added to the sum of covalent radii.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the separation in ångströms at or below which two atoms are treated as
    /// overlapping copies (e.g., alternate locations) rather than bonded.
    pub fn min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Infers bonds between `sites`, returning index pairs `(i, j)` with `i < j`, sorted.
    pub fn perceive(&self, sites: &[AtomSite]) -> Vec<(usize, usize)> {
        let tolerance = self.tolerance.max(0.0);
        let min_sq = self.min_distance * self.min_distance;

        let candidates: Vec<(usize, f64)> = sites
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.element.covalent_radius().map(|r| (i, r)))
            .collect();

        if candidates.len() < 2 {
            return Vec::new();
        }

        let reach = 2.0 * Element::MAX_COVALENT_RADIUS + tolerance;
        let grid = Grid::new(
            candidates.iter().map(|&(i, r)| (sites[i].pos, (i, r))),
            reach,
        );

        let mut pairs: Vec<(usize, usize)> = candidates
            .par_iter()
            .flat_map(|&(i, r_i)| {
                let center = sites[i].pos;
                grid.within(&center, r_i + Element::MAX_COVALENT_RADIUS + tolerance)
                    .filter_map(|(pos, &(j, r_j))| {
                        if j <= i {
                            return None;
                        }
                        let d_sq = nalgebra::distance_squared(&center, pos);
                        let cutoff = r_i + r_j + tolerance;
                        (d_sq > min_sq && d_sq <= cutoff * cutoff).then_some((i, j))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        pairs.sort_unstable();
        pairs
    }
}

impl BondResolver for DistanceBondResolver {
    fn resolve(&self, path: &Path) -> Result<ResolvedTopology, Error> {
        let file =
            File::open(path).map_err(|e| Error::resolver_unavailable(path, e.to_string()))?;
        let sites = io::read_atom_sites(BufReader::new(file))
            .map_err(|e| Error::resolver_unavailable(path, e.to_string()))?;

        if sites.is_empty() {
            return Err(Error::resolver_unavailable(
                path,
                "no _atom_site records found",
            ));
        }

        let bonds = self
            .perceive(&sites)
            .into_iter()
            .map(|(i, j)| {
                ResolvedBond::new(
                    AtomRef {
                        index: i,
                        site: &sites[i],
                    }
                    .to_string(),
                    AtomRef {
                        index: j,
                        site: &sites[j],
                    }
                    .to_string(),
                )
            })
            .collect::<Vec<_>>();

        log::debug!(
            "perceived {} bonds among {} atom sites in '{}'",
            bonds.len(),
            sites.len(),
            path.display()
        );

        Ok(ResolvedTopology {
            atom_count: sites.len(),
            bonds,
        })
    }
}
