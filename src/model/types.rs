use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

/// Chemical elements commonly encountered in macromolecular coordinate files.
///
/// Anything outside this table parses to [`Element::Unknown`], which carries no covalent
/// radius and is therefore never bonded by distance-based perception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He = 2,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Ca = 20,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Se = 34,
    Br = 35,
    Mo = 42,
    Cd = 48,
    I = 53,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Unknown = 0,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::He => "He",
            Element::Li => "Li",
            Element::Be => "Be",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Al => "Al",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::Mo => "Mo",
            Element::Cd => "Cd",
            Element::I => "I",
            Element::Pt => "Pt",
            Element::Au => "Au",
            Element::Hg => "Hg",
            Element::Unknown => "Unknown",
        }
    }

    /// Single-bond covalent radius in ångströms (Cordero et al., 2008).
    ///
    /// Low-spin values are used for transition metals.
    pub fn covalent_radius(&self) -> Option<f64> {
        let radius = match self {
            Element::H => 0.31,
            Element::He => 0.28,
            Element::Li => 1.28,
            Element::Be => 0.96,
            Element::B => 0.84,
            Element::C => 0.76,
            Element::N => 0.71,
            Element::O => 0.66,
            Element::F => 0.57,
            Element::Na => 1.66,
            Element::Mg => 1.41,
            Element::Al => 1.21,
            Element::Si => 1.11,
            Element::P => 1.07,
            Element::S => 1.05,
            Element::Cl => 1.02,
            Element::K => 2.03,
            Element::Ca => 1.76,
            Element::Mn => 1.39,
            Element::Fe => 1.32,
            Element::Co => 1.26,
            Element::Ni => 1.24,
            Element::Cu => 1.32,
            Element::Zn => 1.22,
            Element::Se => 1.20,
            Element::Br => 1.20,
            Element::Mo => 1.54,
            Element::Cd => 1.44,
            Element::I => 1.39,
            Element::Pt => 1.36,
            Element::Au => 1.36,
            Element::Hg => 1.32,
            Element::Unknown => return None,
        };
        Some(radius)
    }

    /// Largest radius returned by [`Element::covalent_radius`].
    pub const MAX_COVALENT_RADIUS: f64 = 2.03;
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("empty element symbol".to_string());
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "H" | "D" | "T" => Ok(Element::H),
            "HE" => Ok(Element::He),
            "LI" => Ok(Element::Li),
            "BE" => Ok(Element::Be),
            "B" => Ok(Element::B),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            "NA" => Ok(Element::Na),
            "MG" => Ok(Element::Mg),
            "AL" => Ok(Element::Al),
            "SI" => Ok(Element::Si),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "CL" => Ok(Element::Cl),
            "K" => Ok(Element::K),
            "CA" => Ok(Element::Ca),
            "MN" => Ok(Element::Mn),
            "FE" => Ok(Element::Fe),
            "CO" => Ok(Element::Co),
            "NI" => Ok(Element::Ni),
            "CU" => Ok(Element::Cu),
            "ZN" => Ok(Element::Zn),
            "SE" => Ok(Element::Se),
            "BR" => Ok(Element::Br),
            "MO" => Ok(Element::Mo),
            "CD" => Ok(Element::Cd),
            "I" => Ok(Element::I),
            "PT" => Ok(Element::Pt),
            "AU" => Ok(Element::Au),
            "HG" => Ok(Element::Hg),
            _ => Err(format!("unsupported element symbol '{trimmed}'")),
        }
    }
}
