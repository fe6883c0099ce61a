//! Per-atom visualization styles derived from a molecular graph.
//!
//! Every atom receives a drawing mode and a color. Colors come from a lookup table keyed by
//! atom, residue, residue class, or chain identity; atoms whose key is absent from the table
//! fall back to [`DEFAULT_COLOR`].

use crate::model::graph::Atom;
use crate::model::types::Element;
use crate::ops::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Color assigned to atoms whose key is missing from the active color scheme.
pub const DEFAULT_COLOR: &str = "#ABABAB";

/// Mapping from a group key (atom name, residue, class, or chain) to a color string.
pub type ColorScheme = HashMap<String, String>;

/// Drawing mode applied to an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationType {
    Stick,
    Cartoon,
    Sphere,
}

/// Atom property that selects the color-scheme key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorElement {
    Atom,
    Residue,
    ResidueType,
    Chain,
}

/// Style record for a single atom, in atom order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomStyle {
    pub visualization_type: VisualizationType,
    pub color: String,
}

impl VisualizationType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stick => "stick",
            Self::Cartoon => "cartoon",
            Self::Sphere => "sphere",
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for VisualizationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stick" => Ok(Self::Stick),
            "cartoon" => Ok(Self::Cartoon),
            "sphere" => Ok(Self::Sphere),
            _ => Err(Error::invalid_style_option(
                "visualization type",
                s,
                "stick, cartoon, sphere",
            )),
        }
    }
}

impl ColorElement {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Atom => "atom",
            Self::Residue => "residue",
            Self::ResidueType => "residue_type",
            Self::Chain => "chain",
        }
    }
}

impl fmt::Display for ColorElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ColorElement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atom" => Ok(Self::Atom),
            "residue" => Ok(Self::Residue),
            "residue_type" => Ok(Self::ResidueType),
            "chain" => Ok(Self::Chain),
            _ => Err(Error::invalid_style_option(
                "color element",
                s,
                "atom, residue, residue_type, chain",
            )),
        }
    }
}

/// Element colors (RasMol CPK). Keys use element-symbol capitalization so that atom names
/// such as `CA` (alpha carbon) do not collide with `Ca` (calcium).
const ATOM_COLORS: &[(&str, &str)] = &[
    ("H", "#FFFFFF"),
    ("C", "#C8C8C8"),
    ("N", "#8F8FFF"),
    ("O", "#F00000"),
    ("S", "#FFC832"),
    ("P", "#FFA500"),
    ("Se", "#FFA500"),
    ("F", "#DAA520"),
    ("Cl", "#00FF00"),
    ("Br", "#A52A2A"),
    ("I", "#A020F0"),
    ("Na", "#0000FF"),
    ("K", "#0000FF"),
    ("Mg", "#228B22"),
    ("Ca", "#808090"),
    ("Mn", "#808090"),
    ("Fe", "#FFA500"),
    ("Cu", "#A52A2A"),
    ("Zn", "#A52A2A"),
];

/// Residue colors (RasMol "shapely" palette).
const RESIDUE_COLORS: &[(&str, &str)] = &[
    ("ALA", "#8CFF8C"),
    ("ARG", "#00007C"),
    ("ASN", "#FF7C70"),
    ("ASP", "#A00042"),
    ("CYS", "#FFFF70"),
    ("GLN", "#FF4C4C"),
    ("GLU", "#660000"),
    ("GLY", "#FFFFFF"),
    ("HIS", "#7070FF"),
    ("ILE", "#004C00"),
    ("LEU", "#455E45"),
    ("LYS", "#4747B8"),
    ("MET", "#B8A042"),
    ("PHE", "#534C52"),
    ("PRO", "#525252"),
    ("SER", "#FF7042"),
    ("THR", "#B84C00"),
    ("TRP", "#4F4600"),
    ("TYR", "#8C704C"),
    ("VAL", "#FF8CFF"),
    ("A", "#A0A0FF"),
    ("C", "#FF8C4B"),
    ("G", "#FF7070"),
    ("U", "#FF8080"),
    ("DA", "#A0A0FF"),
    ("DC", "#FF8C4B"),
    ("DG", "#FF7070"),
    ("DT", "#A0FFA0"),
];

/// Amino-acid classes used by [`ColorElement::ResidueType`].
const AMINO_ACID_CLASSES: &[(&str, &[&str])] = &[
    (
        "hydrophobic",
        &["GLY", "ALA", "VAL", "LEU", "ILE", "MET", "PRO"],
    ),
    ("aromatic", &["PHE", "TRP", "TYR"]),
    ("polar", &["SER", "THR", "CYS", "ASN", "GLN"]),
    ("acidic", &["ASP", "GLU"]),
    ("basic", &["LYS", "ARG", "HIS"]),
];

const RESIDUE_TYPE_COLORS: &[(&str, &str)] = &[
    ("hydrophobic", "#FFD700"),
    ("aromatic", "#9370DB"),
    ("polar", "#32CD32"),
    ("acidic", "#FF4500"),
    ("basic", "#1E90FF"),
];

const CHAIN_COLORS: &[(&str, &str)] = &[
    ("A", "#C0D0FF"),
    ("B", "#B0FFB0"),
    ("C", "#FFC0C8"),
    ("D", "#FFFF80"),
    ("E", "#FFC0FF"),
    ("F", "#B0F0F0"),
    ("G", "#FFD070"),
    ("H", "#F08080"),
    ("I", "#F5DEB3"),
    ("J", "#00BFFF"),
    ("K", "#CD5C5C"),
    ("L", "#66CDAA"),
];

/// Built-in color scheme for `color_element`.
pub fn default_scheme(color_element: ColorElement) -> ColorScheme {
    let table = match color_element {
        ColorElement::Atom => ATOM_COLORS,
        ColorElement::Residue => RESIDUE_COLORS,
        ColorElement::ResidueType => RESIDUE_TYPE_COLORS,
        ColorElement::Chain => CHAIN_COLORS,
    };
    table
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Assigns a style to every atom.
///
/// # Arguments
///
/// * `atoms` - Atoms of a molecular graph.
/// * `visualization_type` - Drawing mode applied to every atom.
/// * `color_element` - Property whose value selects the color.
/// * `color_scheme` - Explicit key-to-color table; the built-in table for `color_element`
///   is used when `None`. For [`ColorElement::ResidueType`] the keys are class names
///   (`hydrophobic`, `aromatic`, `polar`, `acidic`, `basic`).
///
/// # Returns
///
/// One [`AtomStyle`] per atom, in the same order.
pub fn create_styles(
    atoms: &[Atom],
    visualization_type: VisualizationType,
    color_element: ColorElement,
    color_scheme: Option<&ColorScheme>,
) -> Vec<AtomStyle> {
    let defaults;
    let scheme = match color_scheme {
        Some(scheme) => scheme,
        None => {
            defaults = default_scheme(color_element);
            &defaults
        }
    };

    let expanded;
    let scheme = if color_element == ColorElement::ResidueType {
        expanded = expand_residue_classes(scheme);
        &expanded
    } else {
        scheme
    };

    atoms
        .iter()
        .map(|atom| AtomStyle {
            visualization_type,
            color: color_for(atom, color_element, scheme)
                .unwrap_or(DEFAULT_COLOR)
                .to_string(),
        })
        .collect()
}

/// Turns a class-to-color table into a residue-to-color table.
fn expand_residue_classes(class_colors: &ColorScheme) -> ColorScheme {
    let mut by_residue = ColorScheme::new();
    for (class, members) in AMINO_ACID_CLASSES {
        let color = class_colors
            .get(*class)
            .map_or(DEFAULT_COLOR, String::as_str);
        for residue in *members {
            by_residue.insert(residue.to_string(), color.to_string());
        }
    }
    by_residue
}

fn color_for<'a>(atom: &Atom, color_element: ColorElement, scheme: &'a ColorScheme) -> Option<&'a str> {
    let lookup = |key: &str| scheme.get(key).map(String::as_str);

    match color_element {
        ColorElement::Atom => lookup(&atom.name).or_else(|| {
            Element::from_str(&atom.element)
                .ok()
                .and_then(|element| lookup(element.symbol()))
        }),
        ColorElement::Residue | ColorElement::ResidueType => lookup(&atom.residue_name)
            .or_else(|| lookup(&atom.bare_residue_name)),
        ColorElement::Chain => lookup(&atom.chain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, element: &str, residue: &str, seq: i32, chain: &str) -> Atom {
        Atom {
            name: name.to_string(),
            chain: chain.to_string(),
            positions: [0.0, 0.0, 0.0],
            residue_index: 1,
            element: element.to_string(),
            residue_name: format!("{residue}{seq}"),
            bare_residue_name: residue.to_string(),
            serial: 0,
        }
    }

    #[test]
    fn option_names_parse_and_display() {
        assert_eq!(
            "cartoon".parse::<VisualizationType>().unwrap(),
            VisualizationType::Cartoon
        );
        assert_eq!(
            "residue_type".parse::<ColorElement>().unwrap(),
            ColorElement::ResidueType
        );
        assert_eq!(ColorElement::ResidueType.to_string(), "residue_type");
        assert_eq!(VisualizationType::Sphere.to_string(), "sphere");
    }

    #[test]
    fn invalid_option_names_are_rejected() {
        let err = "ribbon".parse::<VisualizationType>().unwrap_err();
        assert!(err.to_string().contains("stick, cartoon, sphere"));
        assert!("element".parse::<ColorElement>().is_err());
    }

    #[test]
    fn styles_serialize_with_lowercase_names() {
        let style = AtomStyle {
            visualization_type: VisualizationType::Stick,
            color: "#FFFFFF".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&style).unwrap(),
            r##"{"visualization_type":"stick","color":"#FFFFFF"}"##
        );
    }

    #[test]
    fn atom_coloring_prefers_name_then_element() {
        let atoms = vec![
            atom("CA", "C", "ALA", 1, "A"),
            atom("CA", "CA", "CA", 301, "A"),
            atom("OXT", "O", "ALA", 1, "A"),
            atom("X1", "Xx", "UNK", 1, "A"),
        ];
        let styles = create_styles(&atoms, VisualizationType::Stick, ColorElement::Atom, None);

        let colors: Vec<&str> = styles.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["#C8C8C8", "#808090", "#F00000", DEFAULT_COLOR]);
        assert!(
            styles
                .iter()
                .all(|s| s.visualization_type == VisualizationType::Stick)
        );
    }

    #[test]
    fn explicit_scheme_replaces_defaults() {
        let atoms = vec![atom("CA", "C", "ALA", 1, "A"), atom("N", "N", "ALA", 1, "A")];
        let scheme: ColorScheme = [("CA".to_string(), "red".to_string())].into_iter().collect();

        let styles = create_styles(
            &atoms,
            VisualizationType::Sphere,
            ColorElement::Atom,
            Some(&scheme),
        );
        assert_eq!(styles[0].color, "red");
        assert_eq!(styles[1].color, DEFAULT_COLOR);
    }

    #[test]
    fn residue_coloring_matches_label_before_base_name() {
        let atoms = vec![atom("CA", "C", "ALA", 42, "A"), atom("CA", "C", "GLY", 43, "A")];
        let scheme: ColorScheme = [
            ("ALA42".to_string(), "gold".to_string()),
            ("ALA".to_string(), "blue".to_string()),
            ("GLY".to_string(), "green".to_string()),
        ]
        .into_iter()
        .collect();

        let styles = create_styles(
            &atoms,
            VisualizationType::Cartoon,
            ColorElement::Residue,
            Some(&scheme),
        );
        assert_eq!(styles[0].color, "gold");
        assert_eq!(styles[1].color, "green");
    }

    #[test]
    fn residue_coloring_keeps_names_ending_in_digits() {
        let atoms = vec![
            atom("S", "S", "SO4", 301, "A"),
            atom("P", "P", "PO4", 4, "A"),
            atom("C1", "C", "PG4", 12, "B"),
        ];
        let scheme: ColorScheme = [
            ("SO4".to_string(), "yellow".to_string()),
            ("PO4".to_string(), "orange".to_string()),
            ("PG".to_string(), "wrong".to_string()),
        ]
        .into_iter()
        .collect();

        let styles = create_styles(
            &atoms,
            VisualizationType::Stick,
            ColorElement::Residue,
            Some(&scheme),
        );
        let colors: Vec<&str> = styles.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["yellow", "orange", DEFAULT_COLOR]);
    }

    #[test]
    fn residue_coloring_uses_default_palette() {
        let atoms = vec![atom("CA", "C", "TRP", 7, "A"), atom("O", "O", "HOH", -3, "A")];
        let styles = create_styles(&atoms, VisualizationType::Stick, ColorElement::Residue, None);
        assert_eq!(styles[0].color, "#4F4600");
        assert_eq!(styles[1].color, DEFAULT_COLOR);
    }

    #[test]
    fn residue_type_coloring_maps_classes_to_members() {
        let atoms = vec![
            atom("CA", "C", "ASP", 10, "A"),
            atom("CA", "C", "LYS", 11, "A"),
            atom("CA", "C", "PHE", 12, "A"),
            atom("C1", "C", "NAG", 500, "A"),
        ];
        let scheme: ColorScheme = [("acidic".to_string(), "red".to_string())]
            .into_iter()
            .collect();

        let styles = create_styles(
            &atoms,
            VisualizationType::Cartoon,
            ColorElement::ResidueType,
            Some(&scheme),
        );
        let colors: Vec<&str> = styles.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["red", DEFAULT_COLOR, DEFAULT_COLOR, DEFAULT_COLOR]);

        let styles = create_styles(
            &atoms,
            VisualizationType::Cartoon,
            ColorElement::ResidueType,
            None,
        );
        assert_eq!(styles[1].color, "#1E90FF");
        assert_eq!(styles[2].color, "#9370DB");
    }

    #[test]
    fn chain_coloring_falls_back_for_unknown_chains() {
        let atoms = vec![atom("CA", "C", "ALA", 1, "B"), atom("CA", "C", "ALA", 1, "ZZ")];
        let styles = create_styles(&atoms, VisualizationType::Stick, ColorElement::Chain, None);
        assert_eq!(styles[0].color, "#B0FFB0");
        assert_eq!(styles[1].color, DEFAULT_COLOR);
    }

    #[test]
    fn create_styles_returns_one_style_per_atom() {
        let atoms: Vec<Atom> = (0..5).map(|_| atom("N", "N", "GLY", 1, "A")).collect();
        assert_eq!(
            create_styles(&atoms, VisualizationType::Stick, ColorElement::Atom, None).len(),
            5
        );
        assert!(create_styles(&[], VisualizationType::Stick, ColorElement::Atom, None).is_empty());
    }
}
