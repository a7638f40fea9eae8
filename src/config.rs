use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::{ContinentFilter, SizeCategory};
use crate::data::views::HeightMap;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "GAPVIEW_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Dashboard settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub heights: HeightMap,
    pub theme: Theme,
    pub default_year: Option<i32>,
    pub default_continent: String,
    pub default_size: String,
    pub default_log_x: bool,
    pub dataset_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            heights: HeightMap::default(),
            theme: Theme::default(),
            default_year: Some(2007),
            default_continent: "all".to_string(),
            default_size: "medium".to_string(),
            default_log_x: true,
            dataset_path: None,
        }
    }
}

impl DashboardConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by `GAPVIEW_CONFIG`, or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("Loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Default selections must name real categories; a typo here would
    /// otherwise only surface once a dataset is opened.
    pub fn validate(&self) -> Result<()> {
        self.default_continent
            .parse::<ContinentFilter>()
            .context("invalid default_continent")?;
        self.default_size
            .parse::<SizeCategory>()
            .context("invalid default_size")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_fills_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"{{"theme": "dark", "heights": {{"small": 400, "medium": 500, "large": 650}}}}"#
        )?;
        file.flush()?;

        let config = DashboardConfig::load(file.path())?;
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.heights, HeightMap::COMPACT);
        assert_eq!(config.default_continent, "all");
        assert_eq!(config.default_year, Some(2007));
        assert!(config.default_log_x);
        Ok(())
    }

    #[test]
    fn test_bad_default_size_is_rejected() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, r#"{{"default_size": "gigantic"}}"#)?;
        file.flush()?;

        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("gigantic"));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(DashboardConfig::load(Path::new("/nonexistent/gapview.json")).is_err());
    }
}
