//! I/O operations for mesh frame sequences and marker trajectories
//!
//! This crate reads the vertex lines of per-frame OBJ files produced by a
//! body-mesh estimator and writes marker trajectories in the TRC format
//! used by OpenSim and OpenCap.

pub mod obj;
pub mod sequence;
pub mod naming;
pub mod trc;

pub use obj::{ObjFrameReader, FrameReadout};
pub use sequence::{extract_trial, extract_frames, list_frame_files, TrialData, FRAME_EXTENSION};
pub use naming::derive_trial_name;
pub use trc::{TrcWriter, TRC_EXTENSION};
