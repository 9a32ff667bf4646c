//! Error types for meshtrc

use std::path::PathBuf;
use thiserror::Error;

/// Trial-level error: the current trial cannot produce an output file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No frame files found in {}", .dir.display())]
    EmptyTrial { dir: PathBuf },

    #[error("Alignment error: {0}")]
    Alignment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for meshtrc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable problem with one marker in one frame.
///
/// The marker gets a sentinel position for that frame and the trial goes on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameIssue {
    #[error("Vertex index {index} of marker {marker} out of range in {} ({vertex_count} vertices)", .file.display())]
    MissingVertexIndex {
        marker: String,
        index: usize,
        vertex_count: usize,
        file: PathBuf,
    },

    #[error("Unparseable coordinates for marker {marker} (vertex {index}) in {}: {line:?}", .file.display())]
    FrameParse {
        marker: String,
        index: usize,
        line: String,
        file: PathBuf,
    },
}

impl FrameIssue {
    /// Name of the marker affected by this issue
    pub fn marker(&self) -> &str {
        match self {
            FrameIssue::MissingVertexIndex { marker, .. } => marker,
            FrameIssue::FrameParse { marker, .. } => marker,
        }
    }
}
