//! Rigid transformation utilities

use crate::point::{Point3d, Vector3d};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// A rotation followed by a translation: `p' = rotation * p + translation`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3d,
}

impl RigidTransform {
    /// Create a pure translation
    pub fn translation(translation: Vector3d) -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation,
        }
    }

    /// Create a transformation from a rotation matrix and a translation
    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3d) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3d) -> Point3d {
        Point3d::from(self.rotation * point.coords + self.translation)
    }

    /// Check that the rotation columns are orthonormal within `epsilon`
    pub fn is_orthonormal(&self, epsilon: f64) -> bool {
        (self.rotation.transpose() * self.rotation - Matrix3::identity()).norm() < epsilon
    }

    /// Check for a proper (right-handed) rotation: orthonormal with determinant +1
    pub fn is_proper_rotation(&self, epsilon: f64) -> bool {
        self.is_orthonormal(epsilon) && (self.rotation.determinant() - 1.0).abs() < epsilon
    }
}
