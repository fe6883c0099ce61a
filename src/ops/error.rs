use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of [`Error`] values, letting batch callers decide whether to retry
/// a file, skip it, or abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    MalformedRecord,
    ResolverUnavailable,
    BondIndexUnresolvable,
    EmptyInput,
    InvalidStyleOption,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] crate::io::Error),

    #[error(
        "bond resolver could not process '{path_desc}': {reason}",
        path_desc = path.display()
    )]
    ResolverUnavailable { path: PathBuf, reason: String },

    #[error("bond cannot be mapped onto the atom list: {details}")]
    BondIndexUnresolvable { details: String },

    #[error("no ATOM or HETATM records found in input")]
    EmptyInput,

    #[error("invalid {kind} '{value}'; expected one of: {expected}")]
    InvalidStyleOption {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Error {
    pub fn resolver_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ResolverUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn bond_index_unresolvable(details: impl Into<String>) -> Self {
        Self::BondIndexUnresolvable {
            details: details.into(),
        }
    }

    pub fn invalid_style_option(
        kind: &'static str,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidStyleOption {
            kind,
            value: value.into(),
            expected,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(crate::io::Error::MalformedRecord { .. }) => ErrorKind::MalformedRecord,
            Self::Input(crate::io::Error::Parse { .. }) => ErrorKind::MalformedRecord,
            Self::Input(crate::io::Error::Io { .. }) => ErrorKind::Io,
            Self::ResolverUnavailable { .. } => ErrorKind::ResolverUnavailable,
            Self::BondIndexUnresolvable { .. } => ErrorKind::BondIndexUnresolvable,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::InvalidStyleOption { .. } => ErrorKind::InvalidStyleOption,
        }
    }
}
