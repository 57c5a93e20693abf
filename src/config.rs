use std::{env, fs, path::Path, path::PathBuf};

use directories::BaseDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::services::ChartOptions;

const CONFIG: &str = include_str!("../.config/config.json5");

/// Color scheme selected in the config file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
    pub database_file: String,
    pub default_row_limit: usize,
    pub histogram_bins: usize,
    pub page_size: usize,
    #[serde(default)]
    pub keybindings_file: Option<PathBuf>,
    #[serde(default)]
    pub theme: ThemeName,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: get_data_dir(),
            config_dir: get_config_dir(),
            database_file: "datos.db".to_string(),
            default_row_limit: 100,
            histogram_bins: 10,
            page_size: 50,
            keybindings_file: None,
            theme: ThemeName::Dark,
        }
    }
}

impl Config {
    /// Load configuration, creating `~/.csvboard-config.json5` on first run.
    ///
    /// An explicit `config_path` must exist; the home file is optional.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        match config_path {
            Some(p) => Self::from_sources(Some(&expand_tilde(p)), true),
            None => {
                let home_cfg = default_home_config_path();
                if !home_cfg.exists() {
                    if let Some(parent) = home_cfg.parent() {
                        let _ = fs::create_dir_all(parent);
                    }
                    let _ = fs::write(&home_cfg, CONFIG);
                }
                Self::from_sources(Some(&home_cfg), false)
            }
        }
    }

    /// Layer embedded defaults, an optional user file and `CSVBOARD_*` env vars
    pub fn from_sources(user_file: Option<&Path>, required: bool) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        if let Some(path) = user_file {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json5)
                    .required(required),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(PROJECT_NAME.as_str()).try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Full path of the SQLite store
    pub fn database_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.database_file);
        if file.is_absolute() {
            file
        } else {
            self.data_dir.join(file)
        }
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            histogram_bins: self.histogram_bins.max(1),
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if s.starts_with('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(s.replacen('~', base.home_dir().to_str().unwrap_or(""), 1));
            }
        }
    }
    path.to_path_buf()
}

fn default_home_config_path() -> PathBuf {
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join(".csvboard-config.json5");
    }
    PathBuf::from(".csvboard-config.json5")
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults() {
        let cfg = Config::from_sources(None, false).unwrap();
        assert_eq!(cfg.database_file, "datos.db");
        assert_eq!(cfg.default_row_limit, 100);
        assert_eq!(cfg.histogram_bins, 10);
        assert_eq!(cfg.theme, ThemeName::Dark);
        assert!(cfg.keybindings_file.is_none());
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("csvboard.json5");
        fs::write(&path, "{ default_row_limit: 25, theme: 'light' }").unwrap();

        let cfg = Config::from_sources(Some(&path), true).unwrap();
        assert_eq!(cfg.default_row_limit, 25);
        assert_eq!(cfg.theme, ThemeName::Light);
        assert_eq!(cfg.page_size, 50);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json5");
        assert!(Config::from_sources(Some(&path), true).is_err());
        assert!(Config::from_sources(Some(&path), false).is_ok());
    }

    #[test]
    fn test_database_path() {
        let mut cfg = Config::default();
        cfg.data_dir = PathBuf::from("/var/lib/csvboard");
        assert_eq!(cfg.database_path(), PathBuf::from("/var/lib/csvboard/datos.db"));

        cfg.database_file = "/tmp/other.db".to_string();
        assert_eq!(cfg.database_path(), PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn test_chart_options_never_zero_bins() {
        let mut cfg = Config::default();
        cfg.histogram_bins = 0;
        assert_eq!(cfg.chart_options().histogram_bins, 1);
    }
}
