//! Positional scanner for `ATOM`/`HETATM` coordinate records.
//!
//! The scanner deliberately ignores mmCIF loop headers: every non-blank line is split on
//! whitespace and, if its first token mentions `ATOM` or `HETATM`, its fields are read by
//! fixed position following the column order of the PDBx `_atom_site` category. Lines that
//! qualify but do not carry enough fields are reported, never skipped.

use crate::io::error::Error;
use crate::model::record::AtomRecord;
use crate::model::types::Point;
use std::collections::HashSet;
use std::io::BufRead;
use std::str::FromStr;

const SERIAL: usize = 1;
const ELEMENT: usize = 2;
const ATOM_NAME: usize = 3;
const RESIDUE_NAME: usize = 5;
const CHAIN_ID: usize = 6;
const X: usize = 10;
const Y: usize = 11;
const Z: usize = 12;
const OCCUPANCY: usize = 13;
const TEMPERATURE_FACTOR: usize = 14;
const RESIDUE_SEQ: usize = 16;

/// Minimum token count of a qualifying line.
pub const MIN_FIELDS: usize = RESIDUE_SEQ + 1;

/// Reads all atom records from `reader`, in file order.
///
/// # Arguments
///
/// * `reader` - Buffered text source containing mmCIF data.
///
/// # Returns
///
/// The ordered list of [`AtomRecord`]s. An input without qualifying lines yields an empty
/// list; deciding whether that is acceptable is left to the caller.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] for a qualifying line with too few fields or an
/// unparsable serial, residue sequence, or coordinate, and [`Error::Io`] if reading fails.
pub fn scan<R: BufRead>(reader: R) -> Result<Vec<AtomRecord>, Error> {
    let mut records = Vec::new();
    let mut chains: HashSet<String> = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if !is_atom_record(tokens[0]) {
            continue;
        }

        let record = parse_record(&tokens, trimmed, line_number)?;
        if chains.insert(record.chain_id.clone()) {
            log::debug!(
                "new chain '{}' starts at line {}",
                record.chain_id,
                line_number
            );
        }
        records.push(record);
    }

    log::debug!(
        "scanned {} atom records across {} chains",
        records.len(),
        chains.len()
    );
    Ok(records)
}

/// Returns whether a leading token marks a coordinate record.
///
/// This is a substring test so decorated markers such as `ATOM_` still qualify.
pub fn is_atom_record(first_token: &str) -> bool {
    first_token.contains("ATOM") || first_token.contains("HETATM")
}

fn parse_record(tokens: &[&str], line: &str, line_number: usize) -> Result<AtomRecord, Error> {
    if tokens.len() < MIN_FIELDS {
        return Err(Error::malformed_record(
            line_number,
            line,
            format!(
                "expected at least {MIN_FIELDS} fields, found {}",
                tokens.len()
            ),
        ));
    }

    let serial = parse_field::<i64>(tokens, SERIAL, "serial number", line, line_number)?;
    let residue_seq =
        parse_field::<i32>(tokens, RESIDUE_SEQ, "residue sequence number", line, line_number)?;
    let x = parse_field::<f64>(tokens, X, "X coordinate", line, line_number)?;
    let y = parse_field::<f64>(tokens, Y, "Y coordinate", line, line_number)?;
    let z = parse_field::<f64>(tokens, Z, "Z coordinate", line, line_number)?;

    Ok(AtomRecord {
        serial,
        name: tokens[ATOM_NAME].to_string(),
        residue_name: tokens[RESIDUE_NAME].to_string(),
        chain_id: tokens[CHAIN_ID].to_string(),
        residue_seq,
        position: Point::new(x, y, z),
        occupancy: tokens[OCCUPANCY].trim().to_string(),
        temperature_factor: tokens[TEMPERATURE_FACTOR].trim().to_string(),
        element: tokens[ELEMENT].to_string(),
        line_number,
    })
}

fn parse_field<T: FromStr>(
    tokens: &[&str],
    idx: usize,
    field: &str,
    line: &str,
    line_number: usize,
) -> Result<T, Error> {
    let raw = tokens[idx];
    raw.parse::<T>().map_err(|_| {
        Error::malformed_record(line_number, line, format!("invalid {field} '{raw}'"))
    })
}
