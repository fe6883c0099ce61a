use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::IoParameters;
use commands::{graph, info, style};

#[derive(Parser, Debug)]
#[command(
    name = "cifgraph",
    about = "A command-line tool that converts mmCIF structures into JSON molecular graphs and per-atom styles.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Input file path. When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the atom/bond graph and write it as JSON.
    Graph(graph::GraphArgs),
    /// Derive per-atom visualization styles and write them as JSON.
    Style(style::StyleArgs),
    /// Print a chain, residue, atom, and bond report to stderr.
    Info(info::InfoArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let io_params = IoParameters {
        input: cli.input.clone(),
        output: cli.output.clone(),
    };

    match cli.command {
        Command::Graph(args) => {
            commands::ensure_noninteractive_stdout("graph", &io_params)?;
            let graph = graph::run(&io_params, &args)?;
            commands::save_json(&graph, &io_params, args.pretty)?;
        }
        Command::Style(args) => {
            commands::ensure_noninteractive_stdout("style", &io_params)?;
            let styles = style::run(&io_params, &args)?;
            commands::save_json(&styles, &io_params, args.pretty)?;
        }
        Command::Info(args) => {
            info::run(&io_params, &args)?;
        }
    }

    Ok(())
}
