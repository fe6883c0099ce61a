//! Scoped temporary copies of structure input.
//!
//! The record scanner and the bond resolver read the structure independently. Staging the
//! source into a private temporary file first guarantees both see identical bytes, and lets
//! stream input reach resolvers that only accept paths. The copy is removed when the
//! returned [`NamedTempFile`] is dropped.

use crate::io::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn staging_file() -> Result<NamedTempFile, Error> {
    tempfile::Builder::new()
        .prefix("cifgraph-")
        .suffix(".cif")
        .tempfile()
        .map_err(|e| Error::from_io(e, None))
}

/// Copies the file at `path` into a new temporary file.
///
/// # Errors
///
/// Returns [`Error::Io`] naming `path` if it cannot be opened or copied.
pub fn stage_path(path: &Path) -> Result<NamedTempFile, Error> {
    let mut source = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    let staged = stage_reader(&mut source).map_err(|e| e.with_path(path))?;
    log::debug!(
        "staged '{}' at '{}'",
        path.display(),
        staged.path().display()
    );
    Ok(staged)
}

/// Drains `reader` into a new temporary file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the temporary file cannot be created or written.
pub fn stage_reader<R: Read>(mut reader: R) -> Result<NamedTempFile, Error> {
    let mut staged = staging_file()?;
    io::copy(&mut reader, &mut staged).map_err(|e| Error::from_io(e, None))?;
    staged.flush().map_err(|e| Error::from_io(e, None))?;
    Ok(staged)
}
