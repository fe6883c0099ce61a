use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use cif_graph::ops::{
    AtomStyle, ColorElement, ColorScheme, Error, VisualizationType, build_atoms, create_styles,
};

use crate::commands::{IoParameters, load_records, run_with_spinner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VisArg {
    Stick,
    Cartoon,
    Sphere,
}

impl From<VisArg> for VisualizationType {
    fn from(value: VisArg) -> Self {
        match value {
            VisArg::Stick => VisualizationType::Stick,
            VisArg::Cartoon => VisualizationType::Cartoon,
            VisArg::Sphere => VisualizationType::Sphere,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorByArg {
    Atom,
    Residue,
    ResidueType,
    Chain,
}

impl From<ColorByArg> for ColorElement {
    fn from(value: ColorByArg) -> Self {
        match value {
            ColorByArg::Atom => ColorElement::Atom,
            ColorByArg::Residue => ColorElement::Residue,
            ColorByArg::ResidueType => ColorElement::ResidueType,
            ColorByArg::Chain => ColorElement::Chain,
        }
    }
}

/// Assigns a drawing mode and a color to every atom.
#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Drawing mode applied to every atom.
    #[arg(long = "vis", value_enum, default_value_t = VisArg::Stick)]
    pub vis: VisArg,
    /// Property that selects each atom's color.
    #[arg(long = "color-by", value_enum, default_value_t = ColorByArg::Atom)]
    pub color_by: ColorByArg,
    /// JSON object mapping keys to colors; replaces the built-in palette.
    #[arg(long, value_name = "FILE")]
    pub scheme: Option<PathBuf>,
    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(params: &IoParameters, args: &StyleArgs) -> Result<Vec<AtomStyle>> {
    let scheme = args.scheme.as_deref().map(load_scheme).transpose()?;

    run_with_spinner("Assigning atom styles", || {
        let records = load_records(params)?;
        if records.is_empty() {
            return Err(Error::EmptyInput.into());
        }
        let atoms = build_atoms(&records);
        Ok(create_styles(
            &atoms,
            args.vis.into(),
            args.color_by.into(),
            scheme.as_ref(),
        ))
    })
}

fn load_scheme(path: &Path) -> Result<ColorScheme> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open color scheme {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Color scheme {} is not a JSON object of strings", path.display()))
}
