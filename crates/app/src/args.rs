pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "genevault")]
#[command(about = "Encrypt, sign and store genetic data in a content-addressed vault")]
pub struct Args {
    /// Path to the genevault state directory (defaults to ~/.genevault)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (overrides the config file; `RUST_LOG` overrides both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
