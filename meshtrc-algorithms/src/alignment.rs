//! Floor alignment
//!
//! Builds a foot frame from the first frame of a trial: origin at the mean of
//! both heels and toes, X along the right foot, Y normal to the feet and
//! pointing up (positive world Y component), Z completing a right-handed set.
//!
//! The rotation has these axes as its columns and is applied as `R * (p - o)`.
//! That moves the anchor centroid to the origin and preserves distances, but
//! it rotates *by* the foot frame rather than projecting *onto* it, so tilted
//! feet do not end up on `y = 0` (that would need the transpose).

use meshtrc_core::{Error, Point3d, Result, RigidTransform, TrajectorySet, Vector3d};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Names of the four markers the floor frame is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootAnchors {
    pub right_heel: String,
    pub right_toe: String,
    pub left_heel: String,
    pub left_toe: String,
}

impl Default for FootAnchors {
    fn default() -> Self {
        Self {
            right_heel: "RHEE".to_string(),
            right_toe: "RTOE".to_string(),
            left_heel: "LHEE".to_string(),
            left_toe: "LTOE".to_string(),
        }
    }
}

impl FootAnchors {
    fn names(&self) -> [&str; 4] {
        [
            self.right_heel.as_str(),
            self.right_toe.as_str(),
            self.left_heel.as_str(),
            self.left_toe.as_str(),
        ]
    }
}

/// Compute the floor transform from the four anchor positions
pub fn floor_transform(
    right_heel: &Point3d,
    right_toe: &Point3d,
    left_heel: &Point3d,
    left_toe: &Point3d,
) -> RigidTransform {
    let origin = (right_heel.coords + right_toe.coords + left_heel.coords + left_toe.coords) / 4.0;

    let x_axis = (right_toe - right_heel)
        .try_normalize(0.0)
        .unwrap_or_else(|| Vector3d::x());

    let temp_y = x_axis
        .cross(&(left_toe - right_toe))
        .try_normalize(0.0)
        .unwrap_or_else(|| Vector3d::y());

    // Zero only when the Y fallback is parallel to the heel-toe direction
    let mut z_axis = temp_y
        .cross(&x_axis)
        .try_normalize(0.0)
        .unwrap_or_else(|| Vector3d::z());

    let mut y_axis = z_axis.cross(&x_axis);

    // Up must point up; flipping both keeps the frame right-handed
    if y_axis.y < 0.0 {
        y_axis = -y_axis;
        z_axis = -z_axis;
    }

    let rotation = Matrix3::from_columns(&[x_axis, y_axis, z_axis]);
    let translation = -(rotation * origin);
    RigidTransform::from_parts(rotation, translation)
}

/// Compute the floor transform from the first frame of a trial
pub fn compute_floor_alignment(
    trajectories: &TrajectorySet,
    anchors: &FootAnchors,
) -> Result<RigidTransform> {
    if trajectories.is_empty() {
        return Err(Error::Alignment("Trial has no frames to align".to_string()));
    }

    let mut points = [Point3d::origin(); 4];
    for (slot, name) in points.iter_mut().zip(anchors.names()) {
        let first = trajectories
            .position(name, 0)
            .ok_or_else(|| Error::Alignment(format!("Anchor marker {} is not configured", name)))?;
        if !first.iter().all(|c| c.is_finite()) {
            return Err(Error::Alignment(format!(
                "Anchor marker {} has no finite position in the first frame",
                name
            )));
        }
        *slot = first;
    }

    let [right_heel, right_toe, left_heel, left_toe] = points;
    Ok(floor_transform(&right_heel, &right_toe, &left_heel, &left_toe))
}

/// Compute the floor transform from the first frame and apply it to every frame
pub fn align_to_floor(
    trajectories: &mut TrajectorySet,
    anchors: &FootAnchors,
) -> Result<RigidTransform> {
    let transform = compute_floor_alignment(trajectories, anchors)?;
    trajectories.transform(&transform);
    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshtrc_core::{is_sentinel, MarkerVertexMap};
    use nalgebra::Rotation3;

    const EPS: f64 = 1e-9;

    fn feet_markers() -> MarkerVertexMap {
        MarkerVertexMap::from_pairs(&[("RHEE", 0), ("RTOE", 1), ("LHEE", 2), ("LTOE", 3), ("C7", 4)])
            .unwrap()
    }

    /// Feet flat on y = 0, pointing along +X, right foot at +Z
    fn flat_feet() -> [Point3d; 4] {
        [
            Point3d::new(0.0, 0.0, 0.1),
            Point3d::new(0.2, 0.0, 0.1),
            Point3d::new(0.0, 0.0, -0.1),
            Point3d::new(0.2, 0.0, -0.1),
        ]
    }

    fn moved(points: [Point3d; 4]) -> [Point3d; 4] {
        let rotation = Rotation3::from_euler_angles(0.3, -0.5, 1.1);
        let offset = Vector3d::new(1.5, -0.7, 2.0);
        points.map(|p| rotation * p + offset)
    }

    fn centroid(points: &[Point3d]) -> Point3d {
        Point3d::from(points.iter().map(|p| p.coords).sum::<Vector3d>() / points.len() as f64)
    }

    #[test]
    fn test_flat_feet_only_translate() {
        let [rh, rt, lh, lt] = flat_feet();
        let transform = floor_transform(&rh, &rt, &lh, &lt);
        assert_relative_eq!(transform.rotation, Matrix3::identity(), epsilon = EPS);
        assert_relative_eq!(transform.translation, Vector3d::new(-0.1, 0.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_anchor_centroid_lands_on_origin() {
        let anchors = moved(flat_feet());
        let [rh, rt, lh, lt] = anchors;
        let transform = floor_transform(&rh, &rt, &lh, &lt);

        assert!(transform.is_proper_rotation(EPS));
        assert_relative_eq!(transform.rotation.column(0).into_owned(), (rt - rh).normalize(), epsilon = EPS);

        let aligned: Vec<Point3d> = anchors.iter().map(|p| transform.transform_point(p)).collect();
        assert_relative_eq!(centroid(&aligned), Point3d::origin(), epsilon = EPS);
        // rigid: the foot keeps its length
        assert_relative_eq!((aligned[1] - aligned[0]).norm(), 0.2, epsilon = EPS);
    }

    #[test]
    fn test_up_axis_has_positive_world_y() {
        let [rh, rt, lh, lt] = moved(flat_feet());
        let transform = floor_transform(&rh, &rt, &lh, &lt);
        assert!(transform.rotation[(1, 1)] >= 0.0);
    }

    #[test]
    fn test_coincident_anchors_fall_back_to_world_axes() {
        let p = Point3d::new(0.4, 0.5, 0.6);
        let transform = floor_transform(&p, &p, &p, &p);
        assert_relative_eq!(transform.rotation, Matrix3::identity(), epsilon = EPS);
        assert_relative_eq!(transform.transform_point(&p), Point3d::origin(), epsilon = EPS);
    }

    #[test]
    fn test_vertical_foot_still_proper_rotation() {
        let heel = Point3d::new(0.0, 0.0, 0.0);
        let toe = Point3d::new(0.0, 1.0, 0.0);
        let transform = floor_transform(&heel, &toe, &heel, &toe);
        assert!(transform.is_proper_rotation(EPS));
        assert!(transform.rotation.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_align_to_floor_uses_first_frame_for_all_frames() {
        let markers = feet_markers();
        let mut set = TrajectorySet::new(&markers);
        let first = moved(flat_feet());
        let head = Point3d::new(0.0, 1.6, 0.0);
        set.push_frame(first.iter().copied().map(Some).chain([Some(head)]).collect()).unwrap();
        set.push_frame(vec![Some(head), None, None, None, Some(head)]).unwrap();

        let transform = align_to_floor(&mut set, &FootAnchors::default()).unwrap();

        let aligned: Vec<Point3d> = ["RHEE", "RTOE", "LHEE", "LTOE"]
            .iter()
            .map(|name| set.position(name, 0).unwrap())
            .collect();
        assert_relative_eq!(centroid(&aligned), Point3d::origin(), epsilon = EPS);
        assert_relative_eq!(set.position("RHEE", 1).unwrap(), transform.transform_point(&head), epsilon = EPS);
        assert!(is_sentinel(&set.position("RTOE", 1).unwrap()));
        assert_eq!(set.frame_count(), 2);
    }

    #[test]
    fn test_missing_anchor_marker() {
        let markers = MarkerVertexMap::from_pairs(&[("RHEE", 0), ("RTOE", 1), ("LHEE", 2)]).unwrap();
        let mut set = TrajectorySet::new(&markers);
        set.push_frame(vec![Some(Point3d::origin()); 3]).unwrap();

        let result = compute_floor_alignment(&set, &FootAnchors::default());
        assert!(matches!(result, Err(Error::Alignment(msg)) if msg.contains("LTOE")));
    }

    #[test]
    fn test_sentinel_anchor_in_first_frame() {
        let mut set = TrajectorySet::new(&feet_markers());
        set.push_frame(vec![Some(Point3d::origin()), None, Some(Point3d::origin()), Some(Point3d::origin()), None])
            .unwrap();

        let result = compute_floor_alignment(&set, &FootAnchors::default());
        assert!(matches!(result, Err(Error::Alignment(msg)) if msg.contains("RTOE")));
    }

    #[test]
    fn test_partially_nan_anchor_rejected() {
        let mut set = TrajectorySet::new(&feet_markers());
        let mut frame = vec![Some(Point3d::origin()); 5];
        frame[2] = Some(Point3d::new(0.0, f64::NAN, 0.1));
        set.push_frame(frame).unwrap();

        let result = compute_floor_alignment(&set, &FootAnchors::default());
        assert!(matches!(result, Err(Error::Alignment(msg)) if msg.contains("LHEE")));
    }

    #[test]
    fn test_empty_trial_cannot_be_aligned() {
        let set = TrajectorySet::new(&feet_markers());
        let result = compute_floor_alignment(&set, &FootAnchors::default());
        assert!(matches!(result, Err(Error::Alignment(_))));
    }
}
