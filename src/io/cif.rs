//! Header-aware reader for the mmCIF `_atom_site` loop.
//!
//! Unlike the positional scanner, this reader resolves columns from the loop header and
//! tokenizes quoted values, so it tolerates files whose `_atom_site` columns are reordered
//! or trimmed. It emits one [`AtomSite`] per loop row, in file order, without merging
//! alternate locations; callers rely on that enumeration matching the raw record stream.

use crate::io::error::Error;
use crate::model::types::{Element, Point};
use smol_str::SmolStr;
use std::io::BufRead;
use std::str::FromStr;

const FORMAT: &str = "mmCIF";

/// One row of the `_atom_site` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSite {
    pub name: SmolStr,
    pub residue_name: SmolStr,
    pub residue_seq: SmolStr,
    pub chain_id: SmolStr,
    pub element: Element,
    pub pos: Point,
}

#[derive(Debug, Default)]
struct AtomSiteColumns {
    auth_atom_id: Option<usize>,
    label_atom_id: Option<usize>,
    auth_comp_id: Option<usize>,
    label_comp_id: Option<usize>,
    auth_asym_id: Option<usize>,
    label_asym_id: Option<usize>,
    auth_seq_id: Option<usize>,
    label_seq_id: Option<usize>,
    cartn_x: Option<usize>,
    cartn_y: Option<usize>,
    cartn_z: Option<usize>,
    type_symbol: Option<usize>,
}

/// Resolved column positions; only produced once all mandatory columns are known.
struct Layout {
    atom: usize,
    residue: usize,
    chain: usize,
    seq: usize,
    x: usize,
    y: usize,
    z: usize,
    element: Option<usize>,
    width: usize,
}

enum ParserState {
    Base,
    InLoopHeader,
    InAtomSiteLoop,
    InOtherLoop,
}

/// Reads every `_atom_site` row from `reader`.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the loop lacks coordinate or identifier columns, a row is
/// shorter than the columns it must provide, or a coordinate is not numeric, and
/// [`Error::Io`] when reading fails.
pub fn read_atom_sites<R: BufRead>(reader: R) -> Result<Vec<AtomSite>, Error> {
    let mut sites = Vec::new();
    let mut state = ParserState::Base;
    let mut headers: Vec<String> = Vec::new();
    let mut layout: Option<Layout> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = tokenize(trimmed);
        if tokens.is_empty() {
            continue;
        }

        if tokens[0] == "loop_" {
            state = ParserState::InLoopHeader;
            headers.clear();
            continue;
        }

        match state {
            ParserState::Base => {}
            ParserState::InLoopHeader => {
                if tokens[0].starts_with('_') {
                    headers.push(tokens[0].clone());
                } else if headers.iter().any(|h| h.starts_with("_atom_site.")) {
                    state = ParserState::InAtomSiteLoop;
                    let resolved = resolve_layout(&headers, line_num)?;
                    sites.push(read_row(&tokens, &resolved, line_num)?);
                    layout = Some(resolved);
                } else {
                    state = ParserState::InOtherLoop;
                }
            }
            ParserState::InAtomSiteLoop => {
                if tokens[0].starts_with('_') || tokens[0].starts_with("data_") {
                    state = ParserState::Base;
                } else if let Some(layout) = &layout {
                    sites.push(read_row(&tokens, layout, line_num)?);
                }
            }
            ParserState::InOtherLoop => {
                if tokens[0].starts_with('_') || tokens[0].starts_with("data_") {
                    state = ParserState::Base;
                }
            }
        }
    }

    Ok(sites)
}

/// Splits a line into whitespace-separated tokens, honoring single and double quotes.
///
/// A quote character inside an unquoted token is kept literally (e.g., `O5'`).
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = None;

    for c in line.chars() {
        match in_quote {
            Some(q) if c == q => {
                in_quote = None;
                tokens.push(std::mem::take(&mut current));
            }
            Some(_) => current.push(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None if (c == '\'' || c == '"') && current.is_empty() => in_quote = Some(c),
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn resolve_layout(headers: &[String], line_num: usize) -> Result<Layout, Error> {
    let mut cols = AtomSiteColumns::default();
    for (i, header) in headers.iter().enumerate() {
        match header.as_str() {
            "_atom_site.auth_atom_id" => cols.auth_atom_id = Some(i),
            "_atom_site.label_atom_id" => cols.label_atom_id = Some(i),
            "_atom_site.auth_comp_id" => cols.auth_comp_id = Some(i),
            "_atom_site.label_comp_id" => cols.label_comp_id = Some(i),
            "_atom_site.auth_asym_id" => cols.auth_asym_id = Some(i),
            "_atom_site.label_asym_id" => cols.label_asym_id = Some(i),
            "_atom_site.auth_seq_id" => cols.auth_seq_id = Some(i),
            "_atom_site.label_seq_id" => cols.label_seq_id = Some(i),
            "_atom_site.Cartn_x" => cols.cartn_x = Some(i),
            "_atom_site.Cartn_y" => cols.cartn_y = Some(i),
            "_atom_site.Cartn_z" => cols.cartn_z = Some(i),
            "_atom_site.type_symbol" => cols.type_symbol = Some(i),
            _ => {}
        }
    }

    let require = |col: Option<usize>, what: &str| {
        col.ok_or_else(|| {
            Error::parse(
                FORMAT,
                None,
                line_num,
                format!("_atom_site loop is missing {what} columns"),
            )
        })
    };

    let atom = require(cols.auth_atom_id.or(cols.label_atom_id), "atom identifier")?;
    let residue = require(cols.auth_comp_id.or(cols.label_comp_id), "residue identifier")?;
    let chain = require(cols.auth_asym_id.or(cols.label_asym_id), "chain identifier")?;
    let seq = require(cols.auth_seq_id.or(cols.label_seq_id), "residue sequence")?;
    let x = require(cols.cartn_x, "Cartn_x")?;
    let y = require(cols.cartn_y, "Cartn_y")?;
    let z = require(cols.cartn_z, "Cartn_z")?;

    let width = [atom, residue, chain, seq, x, y, z]
        .into_iter()
        .chain(cols.type_symbol)
        .max()
        .map_or(0, |max| max + 1);

    Ok(Layout {
        atom,
        residue,
        chain,
        seq,
        x,
        y,
        z,
        element: cols.type_symbol,
        width,
    })
}

fn read_row(tokens: &[String], layout: &Layout, line_num: usize) -> Result<AtomSite, Error> {
    if tokens.len() < layout.width {
        return Err(Error::parse(
            FORMAT,
            None,
            line_num,
            format!(
                "atom record has {} values but the _atom_site header needs {}",
                tokens.len(),
                layout.width
            ),
        ));
    }

    let coordinate = |idx: usize, axis: &str| {
        f64::from_str(&tokens[idx]).map_err(|_| {
            Error::parse(
                FORMAT,
                None,
                line_num,
                format!("Invalid {axis} coordinate '{}'", tokens[idx]),
            )
        })
    };

    let pos = Point::new(
        coordinate(layout.x, "X")?,
        coordinate(layout.y, "Y")?,
        coordinate(layout.z, "Z")?,
    );

    let element = layout
        .element
        .map(|idx| tokens[idx].as_str())
        .filter(|sym| !matches!(*sym, "." | "?"))
        .and_then(|sym| Element::from_str(sym).ok())
        .unwrap_or(Element::Unknown);

    Ok(AtomSite {
        name: SmolStr::new(&tokens[layout.atom]),
        residue_name: SmolStr::new(&tokens[layout.residue]),
        residue_seq: SmolStr::new(&tokens[layout.seq]),
        chain_id: SmolStr::new(&tokens[layout.chain]),
        element,
        pos,
    })
}
