use std::{io, path::PathBuf};

/// Errors raised while reading the text output of `dos.x`, `projwfc.x` and `bands.x`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("header has no `EFermi = <value> eV` marker: {0:?}")]
    MissingFermiMarker(String),

    #[error("line {line}: cannot read {token:?} as a number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: row has {found} columns, expected {expected}")]
    InconsistentRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("no data rows found")]
    Empty,

    #[error("column {index} requested but table is only {width} wide")]
    MissingColumn { index: usize, width: usize },

    #[error("k-point column has {k} entries but energy column has {energy}")]
    LengthMismatch { k: usize, energy: usize },

    #[error("{kind} table has {found} columns, expected one of {expected:?}")]
    UnexpectedWidth {
        kind: &'static str,
        found: usize,
        expected: Vec<usize>,
    },

    #[error("not a projwfc.x PDOS file name: {0:?}")]
    PdosFileName(String),

    #[error("angular moment {0:?} is not one of s, p, d, f")]
    AngularMoment(String),
}

#[derive(Debug, thiserror::Error)]
pub enum QeError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("format error in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("TOML parsing error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no readable source: {}", display_tried(.0))]
    SourcesExhausted(Vec<(PathBuf, String)>),

    #[error("plotting failed: {0}")]
    Plot(String),
}

impl QeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }
}

fn display_tried(tried: &[(PathBuf, String)]) -> String {
    if tried.is_empty() {
        return "no candidates given".to_string();
    }
    tried
        .iter()
        .map(|(path, reason)| format!("{} ({})", path.display(), reason))
        .collect::<Vec<String>>()
        .join("; ")
}
