//! meshtrc - SMPL mesh sequence to TRC converter

use anyhow::{bail, Context};
use meshtrc::cli::{Cli, Commands};
use meshtrc::{convert_trial, run_batch, ConverterConfig};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConverterConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    match &cli.command {
        Commands::Convert { trial_dir, output } => {
            let output_dir = match output {
                Some(dir) => dir.as_path(),
                None => trial_dir.parent().unwrap_or_else(|| Path::new(".")),
            };
            let report = convert_trial(trial_dir, output_dir, &config)
                .with_context(|| format!("Failed to convert {}", trial_dir.display()))?;
            if !report.issues.is_empty() {
                warn!("{} marker positions could not be read and were written as nan", report.issues.len());
            }
            info!(
                "{} frames x {} markers written to {}",
                report.frame_count,
                report.marker_count,
                report.output_file.display()
            );
        }
        Commands::Batch { root, .. } => {
            let report = run_batch(root, &config)?;
            info!(
                "Converted {} of {} trials ({} unreadable marker positions)",
                report.trial_count() - report.failure_count(),
                report.trial_count(),
                report.issue_count()
            );
            if report.failure_count() > 0 {
                for (trial_dir, error) in report.failed() {
                    warn!("Failed: {}: {}", trial_dir.display(), error);
                }
                bail!("{} of {} trials failed", report.failure_count(), report.trial_count());
            }
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
