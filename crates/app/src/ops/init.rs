use std::path::PathBuf;

use clap::Args;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Default log level written to the config
    #[arg(long, default_value = "info")]
    pub default_log_level: String,

    /// Directory for daily rolling log files (stderr only if unset)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Shortest generated sample for `run`
    #[arg(long, default_value_t = 10)]
    pub gene_data_min_len: usize,

    /// Longest generated sample for `run`
    #[arg(long, default_value_t = 50)]
    pub gene_data_max_len: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            log_level: self.default_log_level.clone(),
            log_dir: self.log_dir.clone(),
            gene_data_min_len: self.gene_data_min_len,
            gene_data_max_len: self.gene_data_max_len,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let address = state.load_key()?.public().to_address();
        tracing::info!(dir = ?state.genevault_dir, "initialized genevault directory");

        let log_dir = match &state.config.log_dir {
            Some(dir) => dir.display().to_string(),
            None => "none (stderr only)".to_string(),
        };

        let output = format!(
            "Initialized genevault directory at: {}\n\
             - Key: {}\n\
             - Address: {}\n\
             - Config: {}\n\
             - Log level: {}\n\
             - Log dir: {}",
            state.genevault_dir.display(),
            state.key_path.display(),
            address,
            state.config_path.display(),
            state.config.log_level,
            log_dir
        );

        Ok(output)
    }
}
