//! Command-Line Interface

use crate::config::ConverterConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// meshtrc - Convert SMPL mesh sequences into TRC marker trajectories
#[derive(Parser, Debug)]
#[command(name = "meshtrc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Frame rate of the mesh sequence in Hz (overrides the config)
    #[arg(long, global = true)]
    pub rate: Option<f64>,

    /// Align markers to the floor frame built from the feet
    #[arg(long, global = true)]
    pub align: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one trial directory of frame files
    Convert {
        /// Directory holding the frame files of one trial
        trial_dir: PathBuf,

        /// Output directory (defaults to the trial directory's parent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find and convert every trial below a root folder
    Batch {
        /// Root folder to search
        root: PathBuf,

        /// Name of the estimator output folders to search for
        #[arg(short, long)]
        tag: Option<String>,

        /// Convert trials one after the other
        #[arg(long)]
        sequential: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply command line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut ConverterConfig) {
        if let Some(rate) = self.rate {
            config.sampling_rate = rate;
        }
        if self.align {
            config.align_to_floor = true;
        }
        if let Commands::Batch { tag, sequential, .. } = &self.command {
            if let Some(tag) = tag {
                config.search_tag = tag.clone();
            }
            if *sequential {
                config.parallel = false;
            }
        }
    }
}
