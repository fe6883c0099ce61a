use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use cif_graph::MolecularGraph;
use cif_graph::ops::GraphBuilder;

use crate::commands::{IoParameters, load_graph, run_with_spinner};

/// Report-only command that builds the graph and summarizes it on stderr.
#[derive(Debug, Default, Args)]
pub struct InfoArgs {}

/// Builds the graph with default settings and prints its statistics.
pub fn run(params: &IoParameters, _args: &InfoArgs) -> Result<()> {
    let (graph, chain_reports, elements) = run_with_spinner("Analyzing structure", || {
        let graph = load_graph(&GraphBuilder::default(), params)?;
        let reports = collect_chain_reports(&graph);
        let elements = count_elements(&graph);
        Ok((graph, reports, elements))
    })?;

    print_tables(&graph, &chain_reports, &elements)
}

fn collect_chain_reports(graph: &MolecularGraph) -> Vec<ChainReport> {
    graph
        .chains()
        .into_iter()
        .map(|chain| {
            let mut atoms = 0;
            let mut residues = BTreeSet::new();
            for atom in graph.atoms_in_chain(chain) {
                atoms += 1;
                residues.insert(atom.residue_index);
            }
            ChainReport {
                id: chain.to_string(),
                residues: residues.len(),
                atoms,
                bonds: count_chain_bonds(graph, chain),
            }
        })
        .collect()
}

/// Counts bonds whose two atoms both belong to `chain`.
fn count_chain_bonds(graph: &MolecularGraph, chain: &str) -> usize {
    graph
        .bonds
        .iter()
        .filter(|bond| {
            graph.atoms[bond.atom1_index].chain == chain
                && graph.atoms[bond.atom2_index].chain == chain
        })
        .count()
}

fn count_elements(graph: &MolecularGraph) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for atom in &graph.atoms {
        *counts.entry(atom.element.clone()).or_insert(0) += 1;
    }
    counts
}

fn print_tables(
    graph: &MolecularGraph,
    reports: &[ChainReport],
    elements: &BTreeMap<String, usize>,
) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "cifgraph Structure Report")?;
    writeln!(&mut stderr)?;

    let mut chain_table = Table::new();
    print_boxed_label(&mut stderr, "Chain Breakdown")?;
    chain_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    chain_table.set_titles(row!["Chain", "Residues", "Atoms", "Intra-chain Bonds"]);
    for report in reports {
        chain_table.add_row(row![report.id, report.residues, report.atoms, report.bonds]);
    }
    chain_table
        .print(&mut stderr)
        .context("Failed to render chain summary")?;
    writeln!(&mut stderr)?;

    let mut element_table = Table::new();
    print_boxed_label(&mut stderr, "Element Composition")?;
    element_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    element_table.set_titles(row!["Element", "Atoms"]);
    for (element, count) in elements {
        element_table.add_row(row![element, count]);
    }
    element_table
        .print(&mut stderr)
        .context("Failed to render element composition")?;
    writeln!(&mut stderr)?;

    let mut summary_table = Table::new();
    print_boxed_label(&mut stderr, "Graph Summary")?;
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["Chains", reports.len()]);
    summary_table.add_row(row!["Residues", graph.residue_count()]);
    summary_table.add_row(row!["Atoms", graph.atom_count()]);
    summary_table.add_row(row!["Bonds", graph.bond_count()]);
    summary_table
        .print(&mut stderr)
        .context("Failed to render graph summary")?;

    Ok(())
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}

#[derive(Debug)]
struct ChainReport {
    id: String,
    residues: usize,
    atoms: usize,
    bonds: usize,
}
