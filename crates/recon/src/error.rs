use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// A required dataset was never loaded.
    MissingInput(&'static str),
    /// A table is too narrow, or lacks a named header.
    MissingColumn { table: String, column: String },
    /// Export was requested but the run selected no target rows.
    NothingToExport,
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (overlapping columns, bad slot position, etc.).
    ConfigValidation(String),
    /// The next account ID would not fit in an i64.
    IdOverflow(i64),
    /// Serialization or other IO-adjacent failure.
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(name) => write!(f, "missing input: {name} was not loaded"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table}: missing column {column}")
            }
            Self::NothingToExport => {
                write!(f, "nothing to export: reconciliation selected no target rows")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::IdOverflow(last) => {
                write!(f, "account ID sequence exhausted after {last}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
