//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Placeholder position for a marker that could not be measured in a frame.
///
/// Every coordinate is NaN, so arithmetic on it (e.g. a rigid transform)
/// keeps it a sentinel.
pub fn sentinel_point() -> Point3d {
    Point3d::new(f64::NAN, f64::NAN, f64::NAN)
}

/// Returns true if every coordinate of the point is NaN.
///
/// A point with only some NaN coordinates is data read from a frame file and
/// is passed through as is.
pub fn is_sentinel(point: &Point3d) -> bool {
    point.iter().all(|c| c.is_nan())
}
