use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating or persisting a run. The
/// simulation core itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing or mistyped field in {}: {source}", path.display())]
    MissingField {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed process file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid resources: {0}")]
    InvalidResources(String),

    #[error("processorCount is {declared} but {listed} processors are listed")]
    ProcessorCountMismatch { declared: i64, listed: usize },

    #[error("invalid process {id}: {reason}")]
    InvalidProcess { id: String, reason: String },

    #[error("invalid algorithm `{name}`: {reason}")]
    InvalidAlgorithm { name: String, reason: String },

    #[error("output directory does not exist: {}", .0.display())]
    MissingOutputDir(PathBuf),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable process exit code for each error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingFile(_) => 2,
            Self::Read { .. } | Self::Json { .. } | Self::Csv { .. } => 4,
            Self::MissingField { .. } => 5,
            Self::ProcessorCountMismatch { .. } => 7,
            Self::InvalidResources(_) => 8,
            Self::InvalidProcess { .. } => 9,
            Self::Write { source, .. } => match source.kind() {
                csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::PermissionDenied => 11,
                _ => 10,
            },
            Self::MissingOutputDir(_) => 12,
            Self::InvalidAlgorithm { .. } => 13,
        }
    }
}
