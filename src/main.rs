use anyhow::{Context, Result};
use botstrap::logging::{self, Logger};
use botstrap::settings::Settings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "botstrap", about = "Bot startup check: settings + logging bring-up")]
struct Args {
    /// Directory containing .env / .env.dev / .env.prod
    #[arg(long, default_value = ".")]
    env_dir: PathBuf,

    /// Rotating log file path
    #[arg(long, default_value = "logs.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Settings validation happens before any other startup work; an invalid
    // ENV or missing TOKEN stops the process here.
    let settings = Settings::load(&args.env_dir)
        .with_context(|| format!("failed to load settings from {}", args.env_dir.display()))?;

    let logger = Logger::new(logging::default_config(&args.log_file))
        .context("failed to initialize logging")?;

    logger.info("botstrap", settings.report());
    logger.info(
        "botstrap",
        format!(
            "Logging to console and {} (10 MiB, 5 backups)",
            args.log_file.display()
        ),
    );

    Ok(())
}
