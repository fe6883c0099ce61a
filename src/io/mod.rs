mod cif;
mod error;
mod json;
mod scanner;
mod stage;

pub use scanner::{MIN_FIELDS, is_atom_record, scan as scan_atom_records};

pub use cif::{AtomSite, read_atom_sites, tokenize as tokenize_cif_line};

pub use stage::{stage_path, stage_reader};

pub use json::write_json;

pub use error::Error;
