//! Application configuration.
//!
//! Precedence: CLI > env > config file > defaults. The file is the first of
//! `--config`, `$JOBBOARD_CONFIG`, `./jobboard.toml` that exists.

use crate::errors::DbError;
use crate::jobs::{GeoPlace, StaticGeocoder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_DB_PATH: &str = "jobboard.wal";
pub const DEFAULT_CONFIG_FILE: &str = "jobboard.toml";

/// A `[[geocoder.places]]` entry: what to look up, and the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownPlace {
    pub query: String,
    #[serde(flatten)]
    pub place: GeoPlace,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub places: Vec<KnownPlace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub page_size: Option<usize>,
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    /// # Errors
    /// Returns `Config` when the text is not valid TOML for this layout.
    pub fn from_toml_str(s: &str) -> Result<Self, DbError> {
        toml::from_str(s).map_err(|e| DbError::Config(e.to_string()))
    }

    /// # Errors
    /// Returns `Io` if the file cannot be read, `Config` if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, DbError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| DbError::Config(format!("{}: {e}", path.display())))
    }

    /// Loads the first config file found, then applies environment overrides.
    ///
    /// # Errors
    /// A `--config` path that does not exist is an error; the fallbacks are optional.
    pub fn load(cli_config: Option<&Path>) -> Result<Self, DbError> {
        if let Some(p) = cli_config
            && !p.exists()
        {
            return Err(DbError::Config(format!("config file {} not found", p.display())));
        }
        let mut candidates: Vec<PathBuf> = cli_config.map(Path::to_path_buf).into_iter().collect();
        if let Ok(p) = std::env::var("JOBBOARD_CONFIG") {
            candidates.push(PathBuf::from(p));
        }
        candidates.push(PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut cfg = match candidates.iter().find(|p| p.exists()) {
            Some(p) => {
                log::debug!("loading config from {}", p.display());
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    /// Overrides from `JOBBOARD_DB`, `JOBBOARD_PAGE_SIZE`, `JOBBOARD_LOG_DIR`, `JOBBOARD_LOG_LEVEL`.
    ///
    /// # Errors
    /// Returns `Config` when `JOBBOARD_PAGE_SIZE` is not a positive integer.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), DbError> {
        if let Some(db) = var("JOBBOARD_DB") {
            self.db_path = Some(PathBuf::from(db));
        }
        if let Some(n) = var("JOBBOARD_PAGE_SIZE") {
            let n = n
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| DbError::Config(format!("JOBBOARD_PAGE_SIZE must be a positive integer, got '{n}'")))?;
            self.page_size = Some(n);
        }
        if let Some(dir) = var("JOBBOARD_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = var("JOBBOARD_LOG_LEVEL") {
            self.log_level = Some(level);
        }
        Ok(())
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    #[must_use]
    pub fn geocoder(&self) -> StaticGeocoder {
        let mut g = StaticGeocoder::new();
        for p in &self.geocoder.places {
            g.insert(&p.query, p.place.clone());
        }
        g
    }
}
