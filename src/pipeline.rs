//! Single trial conversion: extract, optionally align, name, write

use crate::config::ConverterConfig;
use meshtrc_algorithms::align_to_floor;
use meshtrc_core::{Error, FrameIssue, Result};
use meshtrc_io::{derive_trial_name, extract_trial, TrcWriter, TRC_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of a successfully converted trial
#[derive(Debug, Clone)]
pub struct TrialReport {
    pub trial_dir: PathBuf,
    pub output_file: PathBuf,
    pub trial_name: String,
    pub frame_count: usize,
    pub marker_count: usize,
    /// Recoverable per-marker problems; each one left a `nan` entry in the output
    pub issues: Vec<FrameIssue>,
    pub aligned: bool,
}

/// Convert the frame files of `trial_dir` into one TRC file inside `output_dir`.
///
/// `output_dir` is created if it does not exist. The file is named after the
/// frame files (see [`derive_trial_name`]), falling back to the trial
/// directory name when the frame names share nothing.
pub fn convert_trial<P: AsRef<Path>, Q: AsRef<Path>>(
    trial_dir: P,
    output_dir: Q,
    config: &ConverterConfig,
) -> Result<TrialReport> {
    let trial_dir = trial_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let mut data = extract_trial(trial_dir, &config.markers)?;
    debug!(
        "Extracted {} frames with {} issues from {}",
        data.frame_count(),
        data.issues.len(),
        trial_dir.display()
    );

    let missing = data.trajectories.sentinel_count();
    if missing > 0 {
        debug!("{} marker positions missing, written as nan", missing);
    }

    if config.align_to_floor {
        align_to_floor(&mut data.trajectories, &config.anchors)?;
    }

    let trial_name = trial_name_or_dir(&data.frame_files, trial_dir);

    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
    let output_file = output_dir.join(format!("{}.{}", trial_name, TRC_EXTENSION));
    info!("Saving TRC file to: {}", output_file.display());
    TrcWriter::write_trajectories(&output_file, &config.markers, &data.trajectories, config.sampling_rate)?;

    Ok(TrialReport {
        trial_dir: trial_dir.to_path_buf(),
        output_file,
        trial_name,
        frame_count: data.frame_count(),
        marker_count: data.trajectories.marker_count(),
        issues: data.issues,
        aligned: config.align_to_floor,
    })
}

fn trial_name_or_dir(frame_files: &[String], trial_dir: &Path) -> String {
    let name = derive_trial_name(frame_files);
    if !name.is_empty() {
        return name;
    }
    trial_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trial".to_string())
}
