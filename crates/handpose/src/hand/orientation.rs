//! Removes the in-plane rotation of a hand.
//!
//! Finger extension is decided by comparing landmark Y coordinates, which only works if the hand
//! is upright. [`normalize`] rotates all landmarks around the wrist so that the line from the wrist
//! to the middle finger's knuckle points straight up.

use nalgebra::{Matrix2, Matrix3, Rotation2, Vector2, Vector3};

use crate::landmark::Landmark;

use super::{frame::HandFrame, landmark::LandmarkIdx};

/// Computes the signed angle between the line `from → to` and the vertical image axis, in degrees.
///
/// This is `atan2(dx, dy)`: the arguments are swapped compared to the usual angle-from-horizontal
/// computation. A line pointing straight down has an angle of 0°, one pointing straight up ±180°.
/// Lines leaning to the right have positive angles, lines leaning to the left negative ones.
pub fn angle_from_vertical(from: [f32; 2], to: [f32; 2]) -> f32 {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    dx.atan2(dy).to_degrees()
}

/// Direction of a rotation, as seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// A rigid 2D transformation (rotation + translation) that makes a hand upright.
///
/// The transformation is stored as a single homogeneous 3x3 matrix, so applying it to a landmark
/// costs one matrix-vector multiplication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationTransform {
    matrix: Matrix3<f32>,
    rotation_degrees: f32,
    direction: Direction,
    degenerate: bool,
}

impl OrientationTransform {
    /// A transform that leaves all points where they are.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
            rotation_degrees: 0.0,
            direction: Direction::CounterClockwise,
            degenerate: false,
        }
    }

    /// Computes the transform that makes `frame` upright.
    pub fn for_frame(frame: &HandFrame) -> Self {
        Self::from_axis(
            frame.landmark(LandmarkIdx::Wrist).xy(),
            frame.landmark(LandmarkIdx::MiddleFingerMcp).xy(),
        )
    }

    /// Computes the transform that rotates the reference axis `pivot → end` around `pivot` so that
    /// it points straight up.
    ///
    /// If `pivot` and `end` coincide (or are not finite), no rotation can be derived and the
    /// identity transform is returned, marked as [degenerate][Self::is_degenerate].
    pub fn from_axis(pivot: [f32; 2], end: [f32; 2]) -> Self {
        let (dx, dy) = (end[0] - pivot[0], end[1] - pivot[1]);
        let length = dx.hypot(dy);
        if !(length.is_finite() && length > 0.0) {
            log::debug!(
                "reference axis {:?} -> {:?} is degenerate; hand orientation is not normalized",
                pivot,
                end,
            );
            return Self {
                degenerate: true,
                ..Self::identity()
            };
        }

        let angle = angle_from_vertical(pivot, end);
        let rotation_degrees = 180.0 - angle.abs();
        let direction = if angle < 0.0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        log::trace!("axis angle {angle}°, rotating {rotation_degrees}° {direction:?}");

        // Y points down, so positive angles are clockwise on screen.
        let signed = match direction {
            Direction::Clockwise => rotation_degrees,
            Direction::CounterClockwise => -rotation_degrees,
        }
        .to_radians();

        // Move the pivot to the origin, align the axis with the X axis, rotate, then undo the
        // alignment and the translation.
        let pivot = Vector2::new(pivot[0], pivot[1]);
        let axis_angle = dy.atan2(dx);
        let to_origin = Matrix3::new_translation(&-pivot);
        let align = Rotation2::new(-axis_angle).to_homogeneous();
        let rotate = Rotation2::new(signed).to_homogeneous();
        let unalign = Rotation2::new(axis_angle).to_homogeneous();
        let from_origin = Matrix3::new_translation(&pivot);

        Self {
            matrix: from_origin * unalign * rotate * align * to_origin,
            rotation_degrees,
            direction,
            degenerate: false,
        }
    }

    /// Returns the homogeneous transformation matrix.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.matrix
    }

    /// Returns the magnitude of the applied rotation, in degrees (`0..=180`).
    #[inline]
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns whether the reference axis was degenerate, in which case this is the identity
    /// transform.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Returns the transform that undoes `self`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        // For a rigid transform `[R t; 0 1]`, the inverse is `[R^T -R^T*t; 0 1]`.
        let rot: Matrix2<f32> = self.matrix.fixed_view::<2, 2>(0, 0).transpose();
        let translation: Vector2<f32> = self.matrix.fixed_view::<2, 1>(0, 2).into_owned();
        let translation = -(rot * translation);

        let mut matrix = Matrix3::identity();
        matrix.fixed_view_mut::<2, 2>(0, 0).copy_from(&rot);
        matrix.fixed_view_mut::<2, 1>(0, 2).copy_from(&translation);

        Self {
            matrix,
            rotation_degrees: self.rotation_degrees,
            direction: self.direction.reversed(),
            degenerate: self.degenerate,
        }
    }

    /// Transforms a point.
    #[inline]
    pub fn apply_xy(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        let v = self.matrix * Vector3::new(x, y, 1.0);
        [v.x, v.y]
    }

    /// Transforms the X and Y coordinates of a landmark. Z is left untouched.
    #[inline]
    pub fn apply(&self, landmark: Landmark) -> Landmark {
        landmark.with_xy(self.apply_xy(landmark.xy()))
    }
}

/// A [`HandFrame`] whose landmarks have been rotated into the upright orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedFrame {
    frame: HandFrame,
    transform: OrientationTransform,
}

impl OrientedFrame {
    /// Returns the frame with the rotated landmarks.
    ///
    /// Handedness and image dimensions are the same as in the source frame.
    #[inline]
    pub fn frame(&self) -> &HandFrame {
        &self.frame
    }

    #[inline]
    pub fn transform(&self) -> &OrientationTransform {
        &self.transform
    }

    /// Returns whether normalization fell back to the identity transform.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.transform.is_degenerate()
    }

    /// Maps the rotated landmarks back to the source frame's coordinates.
    pub fn to_original(&self) -> HandFrame {
        let inverse = self.transform.inverse();
        self.frame
            .with_points(self.frame.points().map(|lm| inverse.apply(lm)))
    }
}

/// Rotates the landmarks of `frame` around the wrist so that the wrist → middle finger MCP axis
/// points straight up.
///
/// `frame` itself is not modified. If the axis has zero length, the landmarks are returned
/// unrotated (see [`OrientedFrame::is_degenerate`]).
pub fn normalize(frame: &HandFrame) -> OrientedFrame {
    let transform = OrientationTransform::for_frame(frame);
    OrientedFrame {
        frame: frame.with_points(frame.points().map(|lm| transform.apply(lm))),
        transform,
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use itertools::zip_eq;

    use crate::test::{open_right_hand, rotated};

    use super::*;

    /// Max. deviation of the reference axis from the vertical, in radians.
    const MAX_AXIS_ERROR: f32 = 0.001;
    const MAX_POSITION_DELTA: f32 = 0.01;

    fn axis(frame: &HandFrame) -> Vector2<f32> {
        frame.landmark(LandmarkIdx::MiddleFingerMcp).to_point2()
            - frame.landmark(LandmarkIdx::Wrist).to_point2()
    }

    /// Asserts that the reference axis of `frame` points straight up.
    fn assert_upright(frame: &HandFrame) {
        let axis = axis(frame);
        assert!(axis.y < 0.0, "axis {axis:?} does not point up");
        let error = axis.x.atan2(-axis.y);
        assert!(
            error.abs() <= MAX_AXIS_ERROR,
            "axis {axis:?} is {error} rad off the vertical"
        );
    }

    fn assert_same_points(a: &HandFrame, b: &HandFrame) {
        for (a, b) in zip_eq(a.points(), b.points()) {
            assert_abs_diff_eq!(a.x(), b.x(), epsilon = MAX_POSITION_DELTA);
            assert_abs_diff_eq!(a.y(), b.y(), epsilon = MAX_POSITION_DELTA);
            assert_eq!(a.z(), b.z());
        }
    }

    #[test]
    fn angle_convention() {
        let origin = [100.0, 100.0];
        let cases = [
            ([100.0, 50.0], 180.0),
            ([100.0, 150.0], 0.0),
            ([150.0, 100.0], 90.0),
            ([50.0, 100.0], -90.0),
            ([150.0, 50.0], 135.0),
            ([50.0, 50.0], -135.0),
        ];
        for (to, expected) in cases {
            assert_abs_diff_eq!(angle_from_vertical(origin, to), expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn upright_hand_is_unchanged() {
        let hand = open_right_hand();
        let oriented = normalize(&hand);
        assert_abs_diff_eq!(oriented.transform().rotation_degrees(), 0.0, epsilon = 1e-4);
        assert!(!oriented.is_degenerate());
        assert_same_points(oriented.frame(), &hand);
    }

    #[test]
    fn direction_follows_lean() {
        // Leaning right needs a counter-clockwise rotation to become upright, leaning left a
        // clockwise one.
        let right = OrientationTransform::from_axis([0.0, 0.0], [10.0, -10.0]);
        assert_eq!(right.direction(), Direction::CounterClockwise);
        assert_abs_diff_eq!(right.rotation_degrees(), 45.0, epsilon = 1e-3);
        let left = OrientationTransform::from_axis([0.0, 0.0], [-10.0, -10.0]);
        assert_eq!(left.direction(), Direction::Clockwise);
        assert_abs_diff_eq!(left.rotation_degrees(), 45.0, epsilon = 1e-3);

        let [x, y] = right.apply_xy([10.0, -10.0]);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(y, -(200.0f32).sqrt(), epsilon = 1e-4);

        let down = OrientationTransform::from_axis([0.0, 0.0], [0.0, 10.0]);
        assert_abs_diff_eq!(down.rotation_degrees(), 180.0, epsilon = 1e-3);
        let [x, y] = down.apply_xy([0.0, 10.0]);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(y, -10.0, epsilon = 1e-4);
    }

    #[test]
    fn any_rotation_becomes_upright() {
        let hand = open_right_hand();
        let length = axis(&hand).norm();
        for deg in -180..=180 {
            for pivot in [[0.0, 0.0], [320.0, 240.0], [-50.0, 900.0]] {
                let input = rotated(&hand, deg as f32, pivot);
                let oriented = normalize(&input);
                assert_upright(oriented.frame());

                // Rotation happens around the wrist, and does not scale.
                let wrist = input.landmark(LandmarkIdx::Wrist);
                let out_wrist = oriented.frame().landmark(LandmarkIdx::Wrist);
                assert_abs_diff_eq!(wrist.x(), out_wrist.x(), epsilon = MAX_POSITION_DELTA);
                assert_abs_diff_eq!(wrist.y(), out_wrist.y(), epsilon = MAX_POSITION_DELTA);
                assert_relative_eq!(axis(oriented.frame()).norm(), length, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn random_rotations() {
        let hand = open_right_hand();
        let mut rng = fastrand::Rng::with_seed(0x8d2a_51c7_3b90_e4f1);
        for _ in 0..500 {
            let deg = rng.f32() * 360.0 - 180.0;
            let pivot = [rng.f32() * 640.0, rng.f32() * 480.0];
            assert_upright(normalize(&rotated(&hand, deg, pivot)).frame());
        }
    }

    #[test]
    fn idempotent() {
        let hand = open_right_hand();
        for deg in [-170.0, -90.0, -33.3, 12.5, 77.0, 135.0, 180.0] {
            let once = normalize(&rotated(&hand, deg, [300.0, 300.0]));
            let twice = normalize(once.frame());
            assert_abs_diff_eq!(
                twice.transform().rotation_degrees(),
                0.0,
                epsilon = MAX_AXIS_ERROR.to_degrees()
            );
            assert_same_points(twice.frame(), once.frame());
        }
    }

    #[test]
    fn invertible() {
        let hand = open_right_hand();
        for deg in [-179.0, -120.0, -45.0, 0.0, 10.0, 90.0, 150.0] {
            let input = rotated(&hand, deg, [100.0, 50.0]);
            let oriented = normalize(&input);
            assert_same_points(&oriented.to_original(), &input);

            let inverse = oriented.transform().inverse();
            assert_eq!(inverse.direction(), oriented.transform().direction().reversed());
            let roundtrip = inverse.matrix() * oriented.transform().matrix();
            assert_relative_eq!(roundtrip, Matrix3::identity(), epsilon = 1e-3);
        }
    }

    #[test]
    fn source_frame_is_untouched() {
        let input = rotated(&open_right_hand(), 60.0, [0.0, 0.0]);
        let copy = input.clone();
        let oriented = normalize(&input);
        assert_eq!(input, copy);
        assert_ne!(oriented.frame().points(), input.points());
    }

    #[test]
    fn degenerate_axis() {
        let hand = open_right_hand();
        let mut points = *hand.points();
        points[LandmarkIdx::MiddleFingerMcp.index()] = points[LandmarkIdx::Wrist.index()];
        let hand = hand.with_points(points);

        let oriented = normalize(&hand);
        assert!(oriented.is_degenerate());
        assert_eq!(oriented.transform().matrix(), &Matrix3::identity());
        assert_eq!(oriented.frame(), &hand);

        let nan = OrientationTransform::from_axis([0.0, 0.0], [f32::NAN, 1.0]);
        assert!(nan.is_degenerate());
    }
}
