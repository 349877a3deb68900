// Run configuration and resource description files (JSON).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::scheduler::Policy;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub process_file: PathBuf,
    pub resource_file: PathBuf,
    pub metrics_file: PathBuf,
    pub algorithms: Vec<AlgorithmConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmConfig {
    pub name: String,
    pub detailed_results: PathBuf,
    pub global_results: PathBuf,
    #[serde(default)]
    pub quantum: Option<i64>,
}

impl AlgorithmConfig {
    pub fn policy(&self) -> Result<Policy> {
        Policy::from_name(&self.name, self.quantum)
    }
}

impl Config {
    /// Load a configuration file. Relative paths inside it are resolved
    /// against the file's own directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Config = read_json(path)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.process_file = base.join(&config.process_file);
        config.resource_file = base.join(&config.resource_file);
        config.metrics_file = base.join(&config.metrics_file);
        for algo in &mut config.algorithms {
            algo.detailed_results = base.join(&algo.detailed_results);
            algo.global_results = base.join(&algo.global_results);
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFile {
    #[serde(default)]
    pub processor_count: Option<i64>,
    pub total_memory: i64,
    pub processors: Vec<ProcessorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessorEntry {
    pub id: String,
}

impl ResourceFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_owned()));
    }
    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_owned(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_data() {
            Error::MissingField {
                path: path.to_owned(),
                source,
            }
        } else {
            Error::Json {
                path: path.to_owned(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn relative_paths_follow_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "processFile": "processes.csv",
                "resourceFile": "resources.json",
                "metricsFile": "out/metrics.csv",
                "algorithms": [
                    { "name": "FIFO", "detailedResults": "out/d.csv", "globalResults": "out/g.csv" },
                    { "name": "ROUND ROBIN", "detailedResults": "out/rd.csv",
                      "globalResults": "out/rg.csv", "quantum": 2 }
                ]
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.process_file, dir.path().join("processes.csv"));
        assert_eq!(config.algorithms[0].global_results, dir.path().join("out/g.csv"));
        assert_eq!(
            config.algorithms[1].policy().unwrap(),
            Policy::RoundRobin { quantum: 2 }
        );
    }

    #[test]
    fn missing_field_and_bad_syntax_are_distinguished() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        fs::write(&missing, r#"{ "processors": [] }"#).unwrap();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();

        assert!(matches!(
            ResourceFile::load(&missing),
            Err(Error::MissingField { .. })
        ));
        assert!(matches!(ResourceFile::load(&broken), Err(Error::Json { .. })));
        assert!(matches!(
            ResourceFile::load(dir.path().join("absent.json")),
            Err(Error::MissingFile(_))
        ));
    }
}
