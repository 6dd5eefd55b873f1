// CLI modules
mod args;
mod logging;
mod op;
mod ops;
mod state;
mod version;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Init, Keygen, Run, Score, Version};

command_enum! {
    (Init, Init),
    (Keygen, Keygen),
    (Run, Run),
    (Score, Score),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let ctx = op::OpContext::new(args.config_path);

    // --log-level > config file > INFO; RUST_LOG still wins inside the filter
    let level = logging::parse_level(args.log_level.as_deref().unwrap_or(&ctx.config.log_level));
    let guards = logging::init_logging(level, ctx.config.log_dir.as_deref());

    let build = version::build_info();
    tracing::debug!(
        version = build.package_version,
        repo_version = build.repo_version,
        build_profile = build.build_profile,
        "genevault starting"
    );

    let result = args.command.execute(&ctx).await;
    // flush buffered log lines before exiting
    drop(guards);

    match result {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
