use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed atom record at line {line_number}: {details} (line: '{line}')")]
    MalformedRecord {
        line_number: usize,
        line: String,
        details: String,
    },

    #[error(
        "failed to parse {format} {path_desc}: {details} (line {line_number})",
        path_desc = PathDisplay(path)
    )]
    Parse {
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: String,
    },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn malformed_record(
        line_number: usize,
        line: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            line_number,
            line: line.into(),
            details: details.into(),
        }
    }

    pub fn parse(
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path,
            line_number,
            details: details.into(),
        }
    }

    /// Attaches a source path to errors that were raised while reading a bare stream.
    pub fn with_path(self, new_path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io { path: None, source } => Self::Io {
                path: Some(new_path.into()),
                source,
            },
            Self::Parse {
                format,
                path: None,
                line_number,
                details,
            } => Self::Parse {
                format,
                path: Some(new_path.into()),
                line_number,
                details,
            },
            other => other,
        }
    }
}

struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}
