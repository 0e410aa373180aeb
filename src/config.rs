use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::ingest::MalformedRows;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Directory holding the press-release file and the snapshot dumps.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_press_release_file")]
    pub press_release_file: String,

    #[serde(default = "default_boundary_path")]
    pub boundary_path: PathBuf,

    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Log every statement.
    #[serde(default = "default_true")]
    pub verbose: bool,

    /// Rebuild everything. `false` selects update mode, which loads nothing.
    #[serde(default = "default_true")]
    pub first_run: bool,

    #[serde(default)]
    pub skip_malformed_rows: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("01_download_data")
}

fn default_press_release_file() -> String {
    "hksarg_pr.csv".to_string()
}

fn default_boundary_path() -> PathBuf {
    PathBuf::from("gis/chn_admbnda_adm2_ocha/chn_admbnda_adm2_ocha.csv")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("ncorv2019.sqlite")
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            press_release_file: default_press_release_file(),
            boundary_path: default_boundary_path(),
            db_path: default_db_path(),
            verbose: true,
            first_run: true,
            skip_malformed_rows: false,
        }
    }
}

impl Config {
    /// Load from `path`, which must exist, or else from the per-user config
    /// file when present, or else fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_file(Self::resolve_path(path)?.as_deref())
    }

    /// The file `load` reads for `path`, or `None` when defaults apply.
    pub fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>> {
        match path {
            Some(path) if !path.exists() => Err(AppError::Config(format!(
                "config file {} not found",
                path.display()
            ))),
            Some(path) => Ok(Some(path.to_path_buf())),
            None => {
                let default = Self::config_path();
                Ok(default.exists().then_some(default))
            }
        }
    }

    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| AppError::read(path, e))?;
                Self::from_toml(&content)
            }
            None => Ok(Config::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.press_release_file.trim().is_empty() {
            return Err(AppError::Config(
                "press_release_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("outbreak-loader")
            .join("config.toml")
    }

    pub fn press_release_path(&self) -> PathBuf {
        self.data_dir.join(&self.press_release_file)
    }

    pub fn malformed_rows(&self) -> MalformedRows {
        if self.skip_malformed_rows {
            MalformedRows::Skip
        } else {
            MalformedRows::Fail
        }
    }
}
