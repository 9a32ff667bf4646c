//! Marker definitions: which mesh vertex stands for which anatomical landmark

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named marker bound to a fixed 0-based mesh vertex index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerVertex {
    pub name: String,
    pub vertex: usize,
}

impl MarkerVertex {
    pub fn new(name: impl Into<String>, vertex: usize) -> Self {
        Self {
            name: name.into(),
            vertex,
        }
    }
}

/// Ordered marker-name to vertex-index mapping.
///
/// The order is the output column order. Names are unique and non-empty;
/// the map is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MarkerVertex>", into = "Vec<MarkerVertex>")]
pub struct MarkerVertexMap {
    entries: Vec<MarkerVertex>,
}

/// Marker set used for SMPL meshes (6890 vertices), in output order
const SMPL_MARKERS: &[(&str, usize)] = &[
    ("RASI", 6573), ("LASI", 3156), ("SACR", 3159),
    ("RKNE", 4495), ("RKNM", 4634), ("RTT", 4664),
    ("RANK", 6727), ("RANM", 6833), ("RHEE", 6786),
    ("RTOE", 6741), ("RD1M", 6750), ("RD5M", 6715),
    ("LKNE", 1010), ("LKNM", 1148), ("LTT", 1178),
    ("LANK", 3327), ("LANM", 3433), ("LHEE", 3387),
    ("LTOE", 3340), ("LD1M", 3350), ("LD5M", 3348),
    ("T10", 3015), ("C7", 828), ("CLAV", 3078), ("STRN", 3076),
    ("LSHO", 1239), ("LELB", 1658), ("LUPA", 1505),
    ("LWRA", 2112), ("LWRB", 2108), ("LFIN", 2135),
    ("RSHO", 4724), ("RELB", 5129), ("RUPA", 6282),
    ("RWRA", 5573), ("RWRB", 5608), ("RFIN", 5595),
];

impl MarkerVertexMap {
    /// Build a map, rejecting empty or duplicate marker names
    pub fn new(entries: Vec<MarkerVertex>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(Error::Config("Marker names must not be empty".to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::Config(format!("Duplicate marker name: {}", entry.name)));
            }
        }
        Ok(Self { entries })
    }

    /// Build a map from `(name, vertex)` pairs
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, usize)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|(name, vertex)| MarkerVertex::new(name.as_ref(), *vertex))
                .collect(),
        )
    }

    /// The 37-marker set for SMPL body meshes
    pub fn smpl_default() -> Self {
        Self {
            entries: SMPL_MARKERS
                .iter()
                .map(|(name, vertex)| MarkerVertex::new(*name, *vertex))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarkerVertex> {
        self.entries.iter()
    }

    /// Marker names in output order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl Default for MarkerVertexMap {
    fn default() -> Self {
        Self::smpl_default()
    }
}

impl TryFrom<Vec<MarkerVertex>> for MarkerVertexMap {
    type Error = Error;

    fn try_from(entries: Vec<MarkerVertex>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<MarkerVertexMap> for Vec<MarkerVertex> {
    fn from(map: MarkerVertexMap) -> Self {
        map.entries
    }
}

impl<'a> IntoIterator for &'a MarkerVertexMap {
    type Item = &'a MarkerVertex;
    type IntoIter = std::slice::Iter<'a, MarkerVertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smpl_default_order() {
        let map = MarkerVertexMap::smpl_default();
        assert_eq!(map.len(), 37);
        assert_eq!(map.names().next(), Some("RASI"));
        assert_eq!(map.names().last(), Some("RFIN"));
        let ltoe = map.iter().nth(18).unwrap();
        assert_eq!((ltoe.name.as_str(), ltoe.vertex), ("LTOE", 3340));
        assert!(map.iter().all(|m| m.vertex < 6890));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = MarkerVertexMap::from_pairs(&[("C7", 828), ("C7", 829)]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = MarkerVertexMap::from_pairs(&[(" ", 1)]);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
