//! # meshtrc algorithms
//!
//! Processing stages applied to extracted marker trajectories before they
//! are written out.

pub mod alignment;

// Re-export commonly used items
pub use alignment::*;
