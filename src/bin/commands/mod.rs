use std::fs::File;
use std::io::{self as stdio, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;

use cif_graph::io::{scan_atom_records, write_json};
use cif_graph::ops::{BondResolver, GraphBuilder};
use cif_graph::{AtomRecord, MolecularGraph};

pub mod graph;
pub mod info;
pub mod style;

/// Aggregated IO parameters shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct IoParameters {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Builds a molecular graph from the configured input source.
pub fn load_graph<R: BondResolver>(
    builder: &GraphBuilder<R>,
    params: &IoParameters,
) -> Result<MolecularGraph> {
    match &params.input {
        Some(path) => builder
            .build_from_path(path)
            .with_context(|| format!("Failed to build graph from {}", path.display())),
        None => {
            let stdin = noninteractive_stdin()?;
            builder
                .build_from_reader(stdin.lock())
                .context("Failed to build graph from stdin")
        }
    }
}

/// Scans atom records from the configured input source without resolving bonds.
pub fn load_records(params: &IoParameters) -> Result<Vec<AtomRecord>> {
    match &params.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            scan_atom_records(BufReader::new(file))
                .map_err(|e| e.with_path(path))
                .with_context(|| format!("Failed to scan atom records from {}", path.display()))
        }
        None => {
            let stdin = noninteractive_stdin()?;
            scan_atom_records(stdin.lock()).context("Failed to scan atom records from stdin")
        }
    }
}

fn noninteractive_stdin() -> Result<stdio::Stdin> {
    let stdin = stdio::stdin();
    if stdin.is_terminal() {
        bail!(
            "No --input provided and stdin is a TTY. Provide -i/--input or pipe an mmCIF file into cifgraph."
        );
    }
    Ok(stdin)
}

/// Serializes `value` as JSON to the configured output destination.
pub fn save_json<T: Serialize + ?Sized>(
    value: &T,
    params: &IoParameters,
    pretty: bool,
) -> Result<()> {
    match params.output.as_deref() {
        Some(path) => write_json_file(value, path, pretty),
        None => {
            let stdout = stdio::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_json(&mut writer, value, pretty).context("Failed to write JSON to stdout")?;
            writer.flush().context("Failed to flush stdout")
        }
    }
}

fn write_json_file<T: Serialize + ?Sized>(value: &T, path: &Path, pretty: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, value, pretty)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writer.flush().context("Failed to flush output writer")
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Returns true when stdout is a TTY and no explicit output file was supplied.
pub fn interactive_stdout_requested(params: &IoParameters) -> bool {
    params.output.is_none() && stdio::stdout().is_terminal()
}

/// Ensures commands do not dump JSON directly into an interactive terminal.
pub fn ensure_noninteractive_stdout(command: &str, params: &IoParameters) -> Result<()> {
    if interactive_stdout_requested(params) {
        bail!(
            "Refusing to stream {command} results to an interactive terminal. Use -o/--output or pipe the command into a file."
        );
    }
    Ok(())
}
