//! Where the dashboard finds its indicator files.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::loader::DEFAULT_SKIP_ROWS;
use crate::error::{DataError, Result};

/// Optional per-folder override file.
pub const CONFIG_FILE_NAME: &str = "dashboard.json";

/// File names of the four indicator exports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatasetFiles {
    /// Arable land, hectares per person (AG.LND.ARBL.HA.PC).
    pub arable_land: String,
    /// Rural population, percent of total (SP.RUR.TOTL.ZS).
    pub rural_percent: String,
    /// Rural population, head count (SP.RUR.TOTL).
    pub rural_total: String,
    /// Forest area, square km (AG.LND.FRST.K2).
    pub forest_area: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        DatasetFiles {
            arable_land: "API_AG.LND.ARBL.HA.PC_DS2_en_csv_v2.csv".into(),
            rural_percent: "API_SP.RUR.TOTL.ZS_DS2_en_csv_v2_9948275.csv".into(),
            rural_total: "API_SP.RUR.TOTL_DS2_en_csv_v2_9914824.csv".into(),
            forest_area: "API_AG.LND.FRST.K2_DS2_en_csv_v2_9910393.csv".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Folder holding the indicator files. Always the folder the config
    /// was read from, never taken from the file itself.
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Preamble lines above each header row.
    pub skip_rows: usize,
    pub datasets: DatasetFiles,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_dir: PathBuf::from("data"),
            skip_rows: DEFAULT_SKIP_ROWS,
            datasets: DatasetFiles::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults rooted at `dir`, overridden by `dir/dashboard.json` if present.
    pub fn for_data_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::info!("Using dataset overrides from {}", path.display());
                serde_json::from_str::<DashboardConfig>(&text)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DashboardConfig::default(),
            Err(e) => return Err(DataError::Io { path, source: e }),
        };
        config.data_dir = dir.to_path_buf();
        Ok(config)
    }

    /// Full path of one dataset file.
    pub fn dataset_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::for_data_dir(dir.path()).unwrap();
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.skip_rows, 4);
        assert_eq!(config.datasets, DatasetFiles::default());
    }

    #[test]
    fn test_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "datasets": { "forest_area": "forest.csv" } }"#,
        )
        .unwrap();

        let config = DashboardConfig::for_data_dir(dir.path()).unwrap();
        assert_eq!(config.skip_rows, DEFAULT_SKIP_ROWS);
        assert_eq!(config.datasets.forest_area, "forest.csv");
        assert_eq!(config.datasets.arable_land, DatasetFiles::default().arable_land);
        assert_eq!(config.dataset_path("forest.csv"), dir.path().join("forest.csv"));
    }

    #[test]
    fn test_malformed_override_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::for_data_dir(dir.path()),
            Err(DataError::Json(_))
        ));
    }
}
