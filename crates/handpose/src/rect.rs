//! Axis-aligned pixel bounding boxes.

use itertools::{Itertools, MinMaxResult};

/// An axis-aligned rectangle in integer pixel coordinates.
///
/// Bounding boxes are allowed to have zero height and/or width. Negative dimensions are not
/// allowed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl BoundingBox {
    /// Creates a bounding box extending downwards and right from a point.
    ///
    /// # Panics
    ///
    /// This method panics if `width` or `height` is negative.
    pub fn from_top_left(x: i32, y: i32, width: i32, height: i32) -> Self {
        assert!(width >= 0, "width={width}");
        assert!(height >= 0, "height={height}");
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Computes the bounding box that encompasses the X and Y coordinates of `points`.
    ///
    /// Coordinates are truncated towards zero before computing the box, so that landmarks given in
    /// (fractional) pixel coordinates map to the pixels containing them.
    ///
    /// If `points` is empty, an empty box at the origin is returned. Coordinates beyond the `i32`
    /// range are clamped to it, and so are the resulting dimensions.
    pub fn of<I: IntoIterator<Item = [f32; 2]>>(points: I) -> Self {
        let (xs, ys): (Vec<i32>, Vec<i32>) = points
            .into_iter()
            .map(|[x, y]| (x as i32, y as i32))
            .unzip();

        let (x_min, x_max) = span(xs);
        let (y_min, y_max) = span(ys);
        Self::from_top_left(
            x_min,
            y_min,
            x_max.saturating_sub(x_min),
            y_max.saturating_sub(y_min),
        )
    }

    /// Returns the X coordinate of the left side of the box.
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Returns the Y coordinate of the top side of the box.
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns the box as an `(x, y, width, height)` tuple.
    #[inline]
    pub fn to_xywh(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }

    /// Returns the center of the box, rounded down to whole pixels.
    #[inline]
    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// Returns whether the pixel at `(x, y)` lies inside the box, edges included.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x <= self.x.saturating_add(self.width)
            && y >= self.y
            && y <= self.y.saturating_add(self.height)
    }

    /// Grows the box by `margin` pixels on every side.
    ///
    /// A negative margin shrinks the box, but never below a size of 0.
    #[must_use]
    pub fn grow(&self, margin: i32) -> Self {
        let grow = margin.saturating_mul(2);
        let width = self.width.saturating_add(grow).max(0);
        let height = self.height.saturating_add(grow).max(0);
        Self {
            x: self.x.saturating_sub(margin),
            y: self.y.saturating_sub(margin),
            width,
            height,
        }
    }
}

fn span(values: Vec<i32>) -> (i32, i32) {
    match values.into_iter().minmax() {
        MinMaxResult::NoElements => (0, 0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    }
}
