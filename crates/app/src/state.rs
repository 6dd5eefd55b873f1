use std::{fs, path::PathBuf};

use common::prelude::SecretKey;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "genevault";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEY_FILE_NAME: &str = "key.pem";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log level (overridden by `RUST_LOG` and `--log-level`)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Shortest sample `run` generates when no data is given
    #[serde(default = "default_gene_data_min_len")]
    pub gene_data_min_len: usize,
    /// Longest sample `run` generates when no data is given
    #[serde(default = "default_gene_data_max_len")]
    pub gene_data_max_len: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_gene_data_min_len() -> usize {
    10
}

fn default_gene_data_max_len() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            gene_data_min_len: default_gene_data_min_len(),
            gene_data_max_len: default_gene_data_max_len(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), StateError> {
        if self.gene_data_min_len == 0 || self.gene_data_min_len > self.gene_data_max_len {
            return Err(StateError::InvalidConfig(format!(
                "gene data length range {}..={} is empty",
                self.gene_data_min_len, self.gene_data_max_len
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the state directory (~/.genevault)
    pub genevault_dir: PathBuf,
    /// Path to the owner key PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the state directory path (custom or default ~/.genevault)
    pub fn genevault_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory with a fresh owner key
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let genevault_dir = Self::genevault_dir(custom_path)?;

        if genevault_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        config.validate()?;

        fs::create_dir_all(&genevault_dir)?;

        let key = SecretKey::generate();
        let key_path = genevault_dir.join(KEY_FILE_NAME);
        fs::write(&key_path, key.to_pem())?;

        let config_path = genevault_dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        Ok(Self {
            genevault_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the state directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let genevault_dir = Self::genevault_dir(custom_path)?;

        if !genevault_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let key_path = genevault_dir.join(KEY_FILE_NAME);
        let config_path = genevault_dir.join(CONFIG_FILE_NAME);

        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&config_path)?)?;
        config.validate()?;

        Ok(Self {
            genevault_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load the owner's secret key from the key file
    pub fn load_key(&self) -> Result<SecretKey, StateError> {
        let pem = fs::read_to_string(&self.key_path)?;
        SecretKey::from_pem(&pem).map_err(|e| StateError::InvalidKey(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("genevault directory not initialized. Run 'genevault init' first")]
    NotInitialized,

    #[error("genevault directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
