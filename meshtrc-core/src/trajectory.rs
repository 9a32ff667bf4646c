//! Per-marker trajectories and per-frame marker snapshots

use crate::error::{Error, Result};
use crate::markers::MarkerVertexMap;
use crate::point::*;
use crate::transform::RigidTransform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Time series of one marker's positions, one entry per processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerTrajectory {
    pub name: String,
    pub positions: Vec<Point3d>,
}

impl MarkerTrajectory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of frames holding a sentinel instead of a measurement
    pub fn sentinel_count(&self) -> usize {
        self.positions.iter().filter(|p| is_sentinel(p)).count()
    }
}

/// Trajectories of every marker of a trial, in marker-map order.
///
/// All trajectories always have the same length: frames are appended as a
/// whole, and a marker without a measurement gets a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySet {
    trajectories: Vec<MarkerTrajectory>,
    frame_count: usize,
}

impl TrajectorySet {
    /// Create an empty set with one trajectory per marker
    pub fn new(markers: &MarkerVertexMap) -> Self {
        Self {
            trajectories: markers.names().map(MarkerTrajectory::new).collect(),
            frame_count: 0,
        }
    }

    /// Append one frame. `positions` is in marker-map order; `None` becomes a sentinel.
    pub fn push_frame(&mut self, positions: Vec<Option<Point3d>>) -> Result<()> {
        if positions.len() != self.trajectories.len() {
            return Err(Error::InvalidData(format!(
                "Frame has {} marker positions, expected {}",
                positions.len(),
                self.trajectories.len()
            )));
        }

        for (trajectory, position) in self.trajectories.iter_mut().zip(positions) {
            trajectory.positions.push(position.unwrap_or_else(sentinel_point));
        }
        self.frame_count += 1;
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn marker_count(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarkerTrajectory> {
        self.trajectories.iter()
    }

    /// Trajectory of a marker by name
    pub fn get(&self, name: &str) -> Option<&MarkerTrajectory> {
        self.trajectories.iter().find(|t| t.name == name)
    }

    /// Position of a marker in a given frame (may be a sentinel)
    pub fn position(&self, name: &str, frame: usize) -> Option<Point3d> {
        self.get(name).and_then(|t| t.positions.get(frame).copied())
    }

    /// Total number of sentinel entries over all markers and frames
    pub fn sentinel_count(&self) -> usize {
        self.trajectories.iter().map(|t| t.sentinel_count()).sum()
    }

    /// Apply a rigid transform to every position of every frame
    pub fn transform(&mut self, transform: &RigidTransform) {
        for trajectory in &mut self.trajectories {
            for point in &mut trajectory.positions {
                *point = transform.transform_point(point);
            }
        }
    }

    /// Regroup the trajectories frame by frame. Sentinels are left out of the frames.
    pub fn frames(&self) -> Vec<MarkerFrame> {
        (0..self.frame_count)
            .map(|i| {
                self.trajectories
                    .iter()
                    .filter_map(|t| {
                        let p = t.positions[i];
                        (!is_sentinel(&p)).then(|| (t.name.clone(), p))
                    })
                    .collect()
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a TrajectorySet {
    type Item = &'a MarkerTrajectory;
    type IntoIter = std::slice::Iter<'a, MarkerTrajectory>;

    fn into_iter(self) -> Self::IntoIter {
        self.trajectories.iter()
    }
}

/// Marker positions of a single frame, keyed by marker name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerFrame {
    positions: HashMap<String, Point3d>,
}

impl MarkerFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, position: Point3d) {
        self.positions.insert(name.into(), position);
    }

    pub fn get(&self, name: &str) -> Option<&Point3d> {
        self.positions.get(name)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(String, Point3d)> for MarkerFrame {
    fn from_iter<I: IntoIterator<Item = (String, Point3d)>>(iter: I) -> Self {
        Self {
            positions: HashMap::from_iter(iter),
        }
    }
}
