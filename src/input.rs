// Process list (CSV).

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// A raw row of the process file. Numbers are signed so that negative input
/// reaches validation instead of failing as a parse error. Empty `deadline`
/// and `priority` cells read as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRow {
    pub id: String,
    pub arrival: i64,
    pub run_length: i64,
    pub memory: i64,
    #[serde(default)]
    pub deadline: Option<i64>,
    #[serde(default)]
    pub priority: Option<i64>,
}

pub fn read_processes(path: impl AsRef<Path>) -> Result<Vec<ProcessRow>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_owned()));
    }
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_owned(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<ProcessRow>, _>>()
        .map_err(csv_err)
}
