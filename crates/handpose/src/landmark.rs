//! The landmark point type shared by all hand geometry code.

use nalgebra::{Point2, Vector3};

type Position = [f32; 3];

/// A landmark in 3D space.
///
/// X and Y are image pixel coordinates, Z is a depth estimate in the same scale as X.
#[derive(Debug, Default, PartialEq, PartialOrd, Clone, Copy)]
pub struct Landmark {
    pos: Position,
}

impl Landmark {
    #[inline]
    pub const fn new(position: Position) -> Self {
        Self { pos: position }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }

    /// Returns the X and Y coordinates, dropping Z.
    #[inline]
    pub fn xy(&self) -> [f32; 2] {
        [self.pos[0], self.pos[1]]
    }

    /// Returns a copy of this landmark with X and Y replaced. Z is kept.
    #[inline]
    pub fn with_xy(self, [x, y]: [f32; 2]) -> Self {
        Self {
            pos: [x, y, self.pos[2]],
        }
    }

    #[inline]
    pub fn to_point2(&self) -> Point2<f32> {
        Point2::new(self.pos[0], self.pos[1])
    }

    #[inline]
    pub fn to_vector3(&self) -> Vector3<f32> {
        Vector3::from(self.pos)
    }
}

impl From<Position> for Landmark {
    #[inline]
    fn from(pos: Position) -> Self {
        Self::new(pos)
    }
}

impl From<Landmark> for Position {
    #[inline]
    fn from(lm: Landmark) -> Self {
        lm.pos
    }
}

/// Computes the average position of a set of landmarks.
///
/// Returns [`None`] if `landmarks` is empty.
pub fn average_position<I>(landmarks: I) -> Option<Landmark>
where
    I: IntoIterator<Item = Landmark>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0;
    for lm in landmarks {
        sum += lm.to_vector3();
        count += 1;
    }
    if count == 0 {
        return None;
    }

    let avg = sum / count as f32;
    Some(Landmark::new([avg.x, avg.y, avg.z]))
}
