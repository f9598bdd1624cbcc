use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, config_file_in, data_dir_in, ensure_dir, write_atomic};
use crate::errors::{FinanceError, Result};

/// User preferences stored as `config.json` in the application home.
///
/// Sort names are validated when applied; an unknown name falls back to the
/// list's default ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub expense_sort: String,
    pub income_sort: String,
    pub payment_sort: String,
    pub default_pane: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            expense_sort: "time".into(),
            income_sort: "time".into(),
            payment_sort: "time".into(),
            default_pane: "expense".into(),
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base).map_err(|err| FinanceError::Config(err.to_string()))?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)
            .map_err(|err| FinanceError::Config(format!("{}: {}", self.path.display(), err)))?;
        serde_json::from_str(&data)
            .map_err(|err| FinanceError::Config(format!("{}: {}", self.path.display(), err)))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| FinanceError::Config(err.to_string()))?;
        write_atomic(&self.path, &json).map_err(|err| FinanceError::SaveFailed {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    /// Directory for entity files: the configured override or `<home>/data`.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| data_dir_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
        assert_eq!(
            manager.data_dir(&Config::default()),
            dir.path().join("data")
        );
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            expense_sort: "amount".into(),
            default_pane: "payment".into(),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "payment_sort": "priority" }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.payment_sort, "priority");
        assert_eq!(config.expense_sort, "time");
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "not json").unwrap();
        assert!(matches!(manager.load(), Err(FinanceError::Config(_))));
    }
}
