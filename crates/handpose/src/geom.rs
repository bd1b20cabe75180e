//! Distance and angle helpers for 2D landmark positions.

/// Returns the Euclidean distance between `a` and `b`.
#[inline]
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

/// Result of [`find_distance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceInfo {
    pub length: f32,
    pub from: [f32; 2],
    pub to: [f32; 2],
    /// Midpoint between `from` and `to`.
    pub center: [f32; 2],
}

/// Measures the distance between two points, and also returns the points and their midpoint.
pub fn find_distance(from: [f32; 2], to: [f32; 2]) -> DistanceInfo {
    DistanceInfo {
        length: distance(from, to),
        from,
        to,
        center: [(from[0] + to[0]) * 0.5, (from[1] + to[1]) * 0.5],
    }
}

/// Computes the angle at `p2` between the lines to `p1` and `p3`, in degrees.
///
/// The angle is measured from `p2→p1` to `p2→p3` and lies in range `[0, 360)`. In image
/// coordinates (Y pointing down) positive angles are clockwise.
pub fn angle(p1: [f32; 2], p2: [f32; 2], p3: [f32; 2]) -> f32 {
    let a = (p3[1] - p2[1]).atan2(p3[0] - p2[0]);
    let b = (p1[1] - p2[1]).atan2(p1[0] - p2[0]);
    wrap_degrees((a - b).to_degrees())
}

/// Wraps `degrees` into `[0, 360)`.
fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // Tiny negative inputs round up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
