// Result files (CSV).

use std::path::Path;

use serde::Serialize;

use crate::core::{Memory, ProcessRecord, Ticks};
use crate::error::{Error, Result};
use crate::metrics::RunSummary;
use crate::sim::SimulationResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GlobalRow<'a> {
    id: &'a str,
    arrival: Ticks,
    start: Option<Ticks>,
    end: Option<Ticks>,
    memory: Memory,
    reserved_memory: Option<Memory>,
}

impl<'a> From<&'a ProcessRecord> for GlobalRow<'a> {
    fn from(p: &'a ProcessRecord) -> Self {
        Self {
            id: &p.id,
            arrival: p.arrival,
            start: p.start_time,
            end: p.end_time,
            memory: p.memory,
            reserved_memory: p.reserved_memory,
        }
    }
}

/// One row per terminated process, in termination order.
pub fn write_global_results(path: impl AsRef<Path>, result: &SimulationResult) -> Result<()> {
    write_rows(path.as_ref(), result.terminated.iter().map(GlobalRow::from))
}

/// The allocation log, one row per span.
pub fn write_detailed_results(path: impl AsRef<Path>, result: &SimulationResult) -> Result<()> {
    write_rows(path.as_ref(), result.allocation_log.iter())
}

pub fn write_summaries(path: impl AsRef<Path>, summaries: &[RunSummary]) -> Result<()> {
    write_rows(path.as_ref(), summaries.iter())
}

fn write_rows<T, I>(path: &Path, rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        if !dir.is_dir() {
            return Err(Error::MissingOutputDir(dir.to_owned()));
        }
    }
    let write_err = |source: csv::Error| Error::Write {
        path: path.to_owned(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    for row in rows {
        writer.serialize(row).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| write_err(csv::Error::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent/metrics.csv");
        assert!(matches!(
            write_summaries(&path, &[]),
            Err(Error::MissingOutputDir(_))
        ));
    }

    #[test]
    fn summaries_have_a_header_and_a_row_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let summaries = [RunSummary {
            algorithm: "FIFO".into(),
            average_wait: 0.5,
            average_response: 3.0,
            makespan: 5,
        }];
        write_summaries(&path, &summaries).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "algorithm,averageWait,averageResponse,makespan\nFIFO,0.5,3.0,5\n");
    }
}
