//! Batch conversion of every trial below a root folder
//!
//! Expected layout: `<root>/.../<tag>/<trial>/*.obj`, e.g.
//! `data/S01/CameraHMR/walk/walk_0000.obj`. Output goes to the folder at the
//! same level as the tag folder, named `<prefix><tag>`, e.g.
//! `data/S01/MarkerData_CameraHMR/walk.trc`.

use crate::config::ConverterConfig;
use crate::pipeline::{convert_trial, TrialReport};
use meshtrc_core::{Error, Result};
use meshtrc_io::FRAME_EXTENSION;
use rayon::prelude::*;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info, warn};

/// Result of converting one trial directory
#[derive(Debug)]
pub struct TrialOutcome {
    pub trial_dir: PathBuf,
    pub output_dir: PathBuf,
    pub result: Result<TrialReport>,
}

/// Per-trial results of a batch run, in discovery order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub tagged_folders: Vec<PathBuf>,
    pub outcomes: Vec<TrialOutcome>,
}

impl BatchReport {
    pub fn trial_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &TrialReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.trial_dir.as_path(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Recoverable frame issues summed over all converted trials
    pub fn issue_count(&self) -> usize {
        self.succeeded().map(|r| r.issues.len()).sum()
    }
}

/// Find every directory named `tag` below `root` (sorted)
pub fn find_tagged_folders<P: AsRef<Path>>(root: P, tag: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk_dirs(root.as_ref(), &mut |dir: &Path| {
        if dir.file_name() == Some(OsStr::new(tag)) {
            found.push(dir.to_path_buf());
        }
        Ok(())
    })?;
    found.sort();
    found.dedup();
    Ok(found)
}

/// Find `folder` and every directory below it that directly holds frame files (sorted)
pub fn find_trial_dirs<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let folder = folder.as_ref();
    if has_frame_files(folder)? {
        found.push(folder.to_path_buf());
    }
    walk_dirs(folder, &mut |dir: &Path| {
        match has_frame_files(dir) {
            Ok(true) => found.push(dir.to_path_buf()),
            Ok(false) => {}
            Err(e) => warn!("Skipping unreadable directory: {}", e),
        }
        Ok(())
    })?;
    found.sort();
    Ok(found)
}

/// Output folder for a trial: its parent directory with the first component
/// equal to `tag` renamed to `<prefix><tag>`. Paths without such a component
/// map to the parent directory itself.
pub fn output_dir_for(trial_dir: &Path, tag: &str, prefix: &str) -> PathBuf {
    let parent = trial_dir.parent().unwrap_or(trial_dir);
    let replacement = format!("{}{}", prefix, tag);

    let mut replaced = false;
    let mut out = PathBuf::new();
    for component in parent.components() {
        match component {
            Component::Normal(name) if !replaced && name == OsStr::new(tag) => {
                out.push(&replacement);
                replaced = true;
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Discover and convert every trial below `root`.
///
/// Failing trials are recorded in the report and never stop the others.
/// Only an unreadable root aborts the run.
pub fn run_batch<P: AsRef<Path>>(root: P, config: &ConverterConfig) -> Result<BatchReport> {
    let root = root.as_ref();
    let tagged_folders = find_tagged_folders(root, &config.search_tag)?;
    if tagged_folders.is_empty() {
        info!("No {} folders found below {}", config.search_tag, root.display());
    }

    let mut trial_dirs = Vec::new();
    for folder in &tagged_folders {
        info!("Processing {} folder: {}", config.search_tag, folder.display());
        match find_trial_dirs(folder) {
            Ok(found) => trial_dirs.extend(found),
            Err(e) => warn!("Skipping {}: {}", folder.display(), e),
        }
    }
    // A tag folder nested in another one is walked twice
    trial_dirs.sort();
    trial_dirs.dedup();

    let outcomes = convert_trials(&trial_dirs, config);
    Ok(BatchReport {
        tagged_folders,
        outcomes,
    })
}

/// Convert the given trial directories, in parallel if the config allows it
pub fn convert_trials(trial_dirs: &[PathBuf], config: &ConverterConfig) -> Vec<TrialOutcome> {
    let convert = |trial_dir: &PathBuf| {
        let output_dir = output_dir_for(trial_dir, &config.search_tag, &config.output_prefix);
        info!("Found subfolder with frame files: {}", trial_dir.display());
        let result = convert_trial(trial_dir, &output_dir, config);
        if let Err(e) = &result {
            error!("Error processing folder {}: {}", trial_dir.display(), e);
        }
        TrialOutcome {
            trial_dir: trial_dir.clone(),
            output_dir,
            result,
        }
    };

    if config.parallel {
        trial_dirs.par_iter().map(convert).collect()
    } else {
        trial_dirs.iter().map(convert).collect()
    }
}

/// Visit every directory below `dir` (not `dir` itself). Symlinks are not followed.
///
/// Only an unreadable `dir` is an error; subdirectories that cannot be
/// listed are logged and skipped.
fn walk_dirs(dir: &Path, visit: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()> {
    for subdir in list_subdirs(dir)? {
        visit(&subdir)?;
        if let Err(e) = walk_dirs(&subdir, visit) {
            warn!("Skipping unreadable directory: {}", e);
        }
    }
    Ok(())
}

fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_dir() {
            subdirs.push(entry.path());
        }
    }
    subdirs.sort();
    Ok(subdirs)
}

fn has_frame_files(dir: &Path) -> Result<bool> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.extension() == Some(OsStr::new(FRAME_EXTENSION))
            && entry.file_type().map_err(|e| Error::io(&path, e))?.is_file()
        {
            return Ok(true);
        }
    }
    Ok(false)
}
