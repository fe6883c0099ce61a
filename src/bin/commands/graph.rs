use anyhow::Result;
use clap::Args;

use cif_graph::MolecularGraph;
use cif_graph::ops::{DistanceBondResolver, GraphBuilder};

use crate::commands::{IoParameters, load_graph, run_with_spinner};

/// Builds the molecular graph and emits it as JSON.
#[derive(Debug, Args)]
pub struct GraphArgs {
    /// Slack added to the sum of covalent radii when perceiving bonds (Å).
    #[arg(long, default_value_t = 0.45)]
    pub tolerance: f64,
    /// Separation at or below which two atoms are never bonded (Å).
    #[arg(long = "min-distance", default_value_t = 0.4)]
    pub min_distance: f64,
    /// Skip the check that the resolver enumerates as many atoms as were scanned.
    #[arg(long = "no-align-check")]
    pub no_align_check: bool,
    /// Read an input file in place instead of copying it to a temporary file first.
    #[arg(long = "no-stage")]
    pub no_stage: bool,
    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(params: &IoParameters, args: &GraphArgs) -> Result<MolecularGraph> {
    let resolver = DistanceBondResolver::new()
        .tolerance(args.tolerance)
        .min_distance(args.min_distance);
    let builder = GraphBuilder::new(resolver)
        .verify_alignment(!args.no_align_check)
        .stage_input(!args.no_stage);

    run_with_spinner("Building molecular graph", || load_graph(&builder, params))
}
