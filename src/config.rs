use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "EXPORT_DASH_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "export-dash.json";

/// Dashboard settings.  Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset opened at start-up.
    pub dataset_path: Option<PathBuf>,
    /// `Economic Block` value whose rows are dropped during cleaning.
    pub excluded_block: String,
    /// Composite `"City - UF"` values pre-selected in the city filter.
    pub default_cities: Vec<String>,
    pub histogram_bins: usize,
    /// Column parsed leniently as dates.
    pub date_column: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            excluded_block: "Europe".to_string(),
            default_cities: vec!["Águas Mornas - SC".to_string(), "Alfenas - MG".to_string()],
            histogram_bins: 30,
            date_column: "Data".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config from `$EXPORT_DASH_CONFIG`, else `./export-dash.json`, else
    /// defaults.  `dataset_arg` (first CLI argument) overrides the dataset.
    pub fn discover(dataset_arg: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let local = Path::new(DEFAULT_CONFIG_FILE);

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if local.is_file() => Self::from_file(local)?,
            None => Self::default(),
        };

        if let Some(path) = dataset_arg {
            config.dataset_path = Some(path);
        }
        log::debug!("Using config {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"excluded_block": "Asia", "histogram_bins": 10}"#)
            .unwrap();
        let config = DashboardConfig::from_file(f.path()).unwrap();
        assert_eq!(config.excluded_block, "Asia");
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.date_column, "Data");
        assert_eq!(config.default_cities.len(), 2);
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"{not json").unwrap();
        assert!(matches!(
            DashboardConfig::from_file(f.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        assert!(matches!(
            DashboardConfig::from_file(Path::new("/no/such/config.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
