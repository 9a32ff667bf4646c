//! # meshtrc
//!
//! Converts per-frame SMPL mesh files (OBJ) written by a body-mesh estimator
//! into TRC marker trajectory files for OpenSim and OpenCap.
//!
//! This is the umbrella crate. It re-exports the workspace crates and adds
//! the layer that turns a folder tree of trials into TRC files:
//! configuration, the per-trial pipeline and the batch runner.
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshtrc::prelude::*;
//!
//! let config = ConverterConfig::default();
//! let report = convert_trial("data/S01/CameraHMR/walk", "data/S01/MarkerData_CameraHMR", &config)?;
//! println!("{} frames written to {}", report.frame_count, report.output_file.display());
//! # Ok::<(), meshtrc::Error>(())
//! ```
//!
//! ## Crates
//!
//! - `meshtrc-core`: points, marker map, trajectories, rigid transforms, errors
//! - `meshtrc-io`: OBJ frame reading, trial extraction, trial naming, TRC writing
//! - `meshtrc-algorithms`: floor alignment

pub mod config;
pub mod pipeline;
pub mod batch;
pub mod cli;

// Re-export core functionality
pub use meshtrc_core::*;

// Re-export sub-crates
pub use meshtrc_algorithms as algorithms;
pub use meshtrc_io as io;

pub use batch::{run_batch, BatchReport, TrialOutcome};
pub use config::ConverterConfig;
pub use pipeline::{convert_trial, TrialReport};

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshtrc_core::*;
    pub use meshtrc_algorithms::*;
    pub use meshtrc_io::*;

    pub use crate::batch::*;
    pub use crate::config::ConverterConfig;
    pub use crate::pipeline::*;
}
