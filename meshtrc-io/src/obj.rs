//! OBJ frame support
//!
//! Only vertex definition lines (`v x y z`) are read. Their order of
//! appearance is taken as the mesh vertex index, which holds for the flat,
//! single-object meshes written by SMPL-based estimators. Faces, normals,
//! texture coordinates and groups are skipped.

use meshtrc_core::{Error, FrameIssue, MarkerVertexMap, Point3d, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Marker positions read from one frame file
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReadout {
    /// One entry per marker, in marker-map order; `None` if the marker could not be read
    pub positions: Vec<Option<Point3d>>,
    /// Problems found for individual markers of this frame
    pub issues: Vec<FrameIssue>,
    /// Number of vertex definition lines in the file
    pub vertex_count: usize,
}

/// OBJ frame reader implementation
pub struct ObjFrameReader;

impl ObjFrameReader {
    /// Read the configured marker vertices from a frame file
    pub fn read_markers<P: AsRef<Path>>(path: P, markers: &MarkerVertexMap) -> Result<FrameReadout> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = BufReader::new(file);

        let mut vertex_lines = Vec::new();
        for line_result in reader.lines() {
            let line = line_result.map_err(|e| Error::io(path, e))?;
            if is_vertex_line(&line) {
                vertex_lines.push(line);
            }
        }

        Ok(Self::resolve(&vertex_lines, markers, path))
    }

    /// Read the configured marker vertices from OBJ text already in memory.
    /// `source` is only used to label issues.
    pub fn parse_str(content: &str, markers: &MarkerVertexMap, source: &Path) -> FrameReadout {
        let vertex_lines: Vec<&str> = content.lines().filter(|l| is_vertex_line(l)).collect();
        Self::resolve(&vertex_lines, markers, source)
    }

    fn resolve<S: AsRef<str>>(vertex_lines: &[S], markers: &MarkerVertexMap, source: &Path) -> FrameReadout {
        let mut positions = Vec::with_capacity(markers.len());
        let mut issues = Vec::new();

        for marker in markers {
            let Some(line) = vertex_lines.get(marker.vertex) else {
                issues.push(FrameIssue::MissingVertexIndex {
                    marker: marker.name.clone(),
                    index: marker.vertex,
                    vertex_count: vertex_lines.len(),
                    file: source.to_path_buf(),
                });
                positions.push(None);
                continue;
            };

            let line = line.as_ref();
            match parse_vertex(line) {
                Some(point) => positions.push(Some(point)),
                None => {
                    issues.push(FrameIssue::FrameParse {
                        marker: marker.name.clone(),
                        index: marker.vertex,
                        line: line.trim().to_string(),
                        file: source.to_path_buf(),
                    });
                    positions.push(None);
                }
            }
        }

        FrameReadout {
            positions,
            issues,
            vertex_count: vertex_lines.len(),
        }
    }
}

/// A vertex definition line has `v` as its first token
fn is_vertex_line(line: &str) -> bool {
    line.split_whitespace().next() == Some("v")
}

/// Parse the three coordinates following the `v` token. Extra tokens are ignored.
fn parse_vertex(line: &str) -> Option<Point3d> {
    let mut tokens = line.split_whitespace().skip(1);
    let mut next_coord = || tokens.next()?.parse::<f64>().ok();
    let x = next_coord()?;
    let y = next_coord()?;
    let z = next_coord()?;
    Some(Point3d::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FRAME: &str = "\
# SMPL frame
o body
v 0.1 0.2 0.3
vn 0.0 1.0 0.0
vt 0.5 0.5
v -1.5 2.25 -0.125 1.0
f 1 2 3
v 4.0 5.0 6.0
";

    fn markers(pairs: &[(&str, usize)]) -> MarkerVertexMap {
        MarkerVertexMap::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_only_vertex_lines_are_indexed() {
        let readout = ObjFrameReader::parse_str(
            FRAME,
            &markers(&[("A", 0), ("B", 1), ("C", 2)]),
            Path::new("frame_000.obj"),
        );
        assert_eq!(readout.vertex_count, 3);
        assert!(readout.issues.is_empty());
        assert_eq!(readout.positions[0], Some(Point3d::new(0.1, 0.2, 0.3)));
        assert_eq!(readout.positions[1], Some(Point3d::new(-1.5, 2.25, -0.125)));
        assert_eq!(readout.positions[2], Some(Point3d::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn test_out_of_range_vertex_reported() {
        let readout = ObjFrameReader::parse_str(
            FRAME,
            &markers(&[("A", 0), ("FAR", 6890)]),
            Path::new("frame_000.obj"),
        );
        assert_eq!(readout.positions.len(), 2);
        assert!(readout.positions[0].is_some());
        assert_eq!(readout.positions[1], None);
        assert_eq!(
            readout.issues,
            vec![FrameIssue::MissingVertexIndex {
                marker: "FAR".to_string(),
                index: 6890,
                vertex_count: 3,
                file: Path::new("frame_000.obj").to_path_buf(),
            }]
        );
    }

    #[test]
    fn test_bad_coordinates_only_affect_their_marker() {
        let content = "v 1.0 2.0 3.0\nv 1.0 abc 3.0\nv 1.0 2.0\n";
        let readout = ObjFrameReader::parse_str(
            content,
            &markers(&[("GOOD", 0), ("BAD", 1), ("SHORT", 2)]),
            Path::new("frame_001.obj"),
        );
        assert_eq!(readout.positions[0], Some(Point3d::new(1.0, 2.0, 3.0)));
        assert_eq!(readout.positions[1], None);
        assert_eq!(readout.positions[2], None);
        assert_eq!(readout.issues.len(), 2);
        assert!(matches!(&readout.issues[0], FrameIssue::FrameParse { marker, .. } if marker == "BAD"));
        assert!(matches!(&readout.issues[1], FrameIssue::FrameParse { marker, .. } if marker == "SHORT"));
    }

    #[test]
    fn test_read_markers_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FRAME.as_bytes()).unwrap();
        file.flush().unwrap();

        let readout = ObjFrameReader::read_markers(file.path(), &markers(&[("B", 1)])).unwrap();
        assert_eq!(readout.positions, vec![Some(Point3d::new(-1.5, 2.25, -0.125))]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ObjFrameReader::read_markers("does/not/exist.obj", &markers(&[("A", 0)]));
        match result {
            Err(Error::Io { path, .. }) => assert_eq!(path, Path::new("does/not/exist.obj")),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
