use crate::io::error::Error;
use serde::Serialize;
use std::io::Write;

/// Writes `value` as JSON, compact or indented, followed by a newline.
///
/// Used for the molecular graph as well as for style lists; output is deterministic for a
/// given value.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), Error> {
    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)
    } else {
        serde_json::to_writer(&mut *writer, value)
    };
    result.map_err(|e| Error::from_io(e.into(), None))?;
    writeln!(writer).map_err(|e| Error::from_io(e, None))
}
