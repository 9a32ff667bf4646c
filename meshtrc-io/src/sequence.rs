//! Frame sequence extraction
//!
//! A trial is one directory of frame files. Files are ordered by name, so
//! frame numbers must be zero padded for name order to equal time order.
//! That ordering is assumed, not checked.

use crate::obj::ObjFrameReader;
use meshtrc_core::{Error, FrameIssue, MarkerVertexMap, Result, TrajectorySet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension of mesh frame files
pub const FRAME_EXTENSION: &str = "obj";

/// Everything extracted from one trial directory
#[derive(Debug, Clone)]
pub struct TrialData {
    /// Frame file names in processing order
    pub frame_files: Vec<String>,
    /// One trajectory per marker, each `frame_files.len()` long
    pub trajectories: TrajectorySet,
    /// Recoverable per-marker problems found while reading
    pub issues: Vec<FrameIssue>,
}

impl TrialData {
    pub fn frame_count(&self) -> usize {
        self.trajectories.frame_count()
    }
}

/// List the frame files directly inside `dir`, sorted by file name
pub fn list_frame_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let is_file = entry.file_type().map_err(|e| Error::io(&path, e))?.is_file();
        if is_file && path.extension().and_then(|s| s.to_str()) == Some(FRAME_EXTENSION) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Extract marker trajectories from every frame file of a trial directory
pub fn extract_trial<P: AsRef<Path>>(dir: P, markers: &MarkerVertexMap) -> Result<TrialData> {
    let dir = dir.as_ref();
    let files = list_frame_files(dir)?;
    if files.is_empty() {
        return Err(Error::EmptyTrial {
            dir: dir.to_path_buf(),
        });
    }
    debug!("Found {} frame files in {}", files.len(), dir.display());
    extract_frames(&files, markers)
}

/// Extract marker trajectories from an explicit, already ordered list of frame files
pub fn extract_frames<P: AsRef<Path>>(files: &[P], markers: &MarkerVertexMap) -> Result<TrialData> {
    let mut trajectories = TrajectorySet::new(markers);
    let mut frame_files = Vec::with_capacity(files.len());
    let mut issues = Vec::new();

    for path in files {
        let path = path.as_ref();
        let readout = ObjFrameReader::read_markers(path, markers)?;

        for issue in &readout.issues {
            warn!("{}", issue);
        }
        issues.extend(readout.issues);
        trajectories.push_frame(readout.positions)?;
        frame_files.push(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }

    if frame_files.is_empty() {
        return Err(Error::InvalidData("No frame files given".to_string()));
    }

    Ok(TrialData {
        frame_files,
        trajectories,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshtrc_core::{is_sentinel, Point3d};
    use std::fs;
    use tempfile::tempdir;

    fn write_frame(dir: &Path, name: &str, vertices: &[[f64; 3]]) {
        let body: String = vertices
            .iter()
            .map(|[x, y, z]| format!("v {} {} {}\n", x, y, z))
            .collect();
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_frames_sorted_by_name() {
        let dir = tempdir().unwrap();
        write_frame(dir.path(), "walk_002.obj", &[[2.0, 0.0, 0.0]]);
        write_frame(dir.path(), "walk_000.obj", &[[0.0, 0.0, 0.0]]);
        write_frame(dir.path(), "walk_001.obj", &[[1.0, 0.0, 0.0]]);
        fs::write(dir.path().join("notes.txt"), "v 9 9 9\n").unwrap();
        fs::create_dir(dir.path().join("nested.obj")).unwrap();

        let markers = MarkerVertexMap::from_pairs(&[("M", 0)]).unwrap();
        let data = extract_trial(dir.path(), &markers).unwrap();

        assert_eq!(data.frame_files, vec!["walk_000.obj", "walk_001.obj", "walk_002.obj"]);
        let xs: Vec<f64> = data.trajectories.get("M").unwrap().positions.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_short_frame_yields_sentinel_not_shorter_trajectory() {
        let dir = tempdir().unwrap();
        write_frame(dir.path(), "t_000.obj", &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        write_frame(dir.path(), "t_001.obj", &[[0.0, 0.0, 0.0]]);
        write_frame(dir.path(), "t_002.obj", &[[0.0, 0.0, 0.0], [3.0, 3.0, 3.0]]);

        let markers = MarkerVertexMap::from_pairs(&[("ROOT", 0), ("TIP", 1)]).unwrap();
        let data = extract_trial(dir.path(), &markers).unwrap();

        assert_eq!(data.frame_count(), 3);
        for trajectory in &data.trajectories {
            assert_eq!(trajectory.len(), 3);
        }
        assert!(is_sentinel(&data.trajectories.position("TIP", 1).unwrap()));
        assert_eq!(data.trajectories.position("TIP", 2), Some(Point3d::new(3.0, 3.0, 3.0)));
        assert_eq!(data.issues.len(), 1);
        assert_eq!(data.issues[0].marker(), "TIP");
    }

    #[test]
    fn test_empty_directory_is_empty_trial() {
        let dir = tempdir().unwrap();
        let markers = MarkerVertexMap::from_pairs(&[("M", 0)]).unwrap();
        let result = extract_trial(dir.path(), &markers);
        assert!(matches!(result, Err(Error::EmptyTrial { .. })));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let markers = MarkerVertexMap::from_pairs(&[("M", 0)]).unwrap();
        let result = extract_trial("no/such/trial", &markers);
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
