use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading a delimited file into a `Table`.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file format: {path:?} (expected .csv or .txt)")]
    UnsupportedFormat { path: PathBuf },
    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),
    #[error("no header in {path:?}")]
    NoHeader { path: PathBuf },
    #[error("duplicate column {column:?} in header of {path:?}")]
    DuplicateColumn { path: PathBuf, column: String },
    #[error("malformed {path:?} at line {line}: {message}")]
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// Failures while serializing a `Table` to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures while loading dataset profiles.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read profiles {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse profiles {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid profile {profile:?}: {message}")]
    Invalid { profile: String, message: String },
}

/// Terminal failure of one dataset's run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("no profile matches the columns of {path:?}")]
    UnknownDataset { path: PathBuf },
    #[error("validation of {dataset} failed with {violations} violation(s)")]
    ValidationFailed { dataset: String, violations: usize },
    #[error("{path:?} is already the output of an earlier job")]
    DuplicateOutput { path: PathBuf },
}
