//! Core data structures for meshtrc
//!
//! This crate provides the fundamental types shared by the conversion
//! pipeline: double precision points, the ordered marker-to-vertex map,
//! per-marker trajectories, rigid transforms and the error taxonomy.

pub mod point;
pub mod markers;
pub mod trajectory;
pub mod transform;
pub mod error;

pub use point::*;
pub use markers::*;
pub use trajectory::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix3};
