use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::view::chart::PlotHeight;
use crate::view::preview::PreviewRows;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "RUSTY_DASHBOARD_CONFIG";

/// Start-up defaults for a dashboard session. Every field is optional in the
/// JSON file:
///
/// ```json
/// { "preview_rows": 20, "plot_height": 500, "csv_delimiter": ";" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub preview_rows: usize,
    pub plot_height: u32,
    /// Delimiter for `.csv`/`.txt` files; `.tsv` files always use tabs.
    pub csv_delimiter: char,
    pub detailed_stats: bool,
    pub show_correlation: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            preview_rows: PreviewRows::default().get(),
            plot_height: PlotHeight::default().get(),
            csv_delimiter: ',',
            detailed_stats: false,
            show_correlation: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig =
            serde_json::from_str(text).context("parsing dashboard config")?;
        config.delimiter()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Read the file named by [`CONFIG_ENV`], or use defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let config = Self::from_file(Path::new(&path))?;
                log::info!("Loaded config from {}", Path::new(&path).display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter(&self) -> Result<u8> {
        if !self.csv_delimiter.is_ascii() {
            bail!("csv_delimiter must be an ASCII character, got {:?}", self.csv_delimiter);
        }
        Ok(self.csv_delimiter as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = DashboardConfig::from_json(r#"{ "preview_rows": 25 }"#).unwrap();
        assert_eq!(config.preview_rows, 25);
        assert_eq!(config.plot_height, 400);
        assert_eq!(config.delimiter().unwrap(), b',');
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        assert!(DashboardConfig::from_json(r#"{ "csv_delimiter": "§" }"#).is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, r#"{ "csv_delimiter": ";", "detailed_stats": true }"#).unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.delimiter().unwrap(), b';');
        assert!(config.detailed_stats);
    }
}
