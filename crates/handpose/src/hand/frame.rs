//! The per-hand landmark frame produced by a detector.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail};
use nalgebra::{Rotation2, Vector2};

use crate::{
    geom,
    landmark::{average_position, Landmark},
    rect::BoundingBox,
};

use super::landmark::{LandmarkIdx, NUM_LANDMARKS, PALM_LANDMARKS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Returns the opposite hand.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    /// Applies the mirroring convention: returns the opposite hand if `flip` is `true`.
    ///
    /// Detectors report anatomical handedness as seen from the camera. When the camera image is
    /// displayed mirrored (like a selfie view), callers usually want the label swapped.
    #[must_use]
    pub fn flip_if(self, flip: bool) -> Self {
        if flip {
            self.flipped()
        } else {
            self
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => f.write_str("Left"),
            Handedness::Right => f.write_str("Right"),
        }
    }
}

impl FromStr for Handedness {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Left" | "left" | "L" => Ok(Handedness::Left),
            "Right" | "right" | "R" => Ok(Handedness::Right),
            _ => bail!("invalid handedness label '{s}'"),
        }
    }
}

/// The 21 landmarks of one detected hand in one image, in pixel coordinates.
///
/// A [`HandFrame`] always holds exactly [`NUM_LANDMARKS`] points, ordered as described by
/// [`LandmarkIdx`]. The point count is checked when the frame is created, so everything operating
/// on a [`HandFrame`] can index it freely.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    points: [Landmark; NUM_LANDMARKS],
    handedness: Handedness,
    image_width: u32,
    image_height: u32,
}

impl HandFrame {
    /// Creates a [`HandFrame`] from pixel-space landmark positions.
    ///
    /// # Errors
    ///
    /// Returns an error if `points` does not yield exactly [`NUM_LANDMARKS`] points.
    pub fn new<I>(
        points: I,
        handedness: Handedness,
        image_width: u32,
        image_height: u32,
    ) -> anyhow::Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Landmark>,
    {
        let points = points.into_iter().map(Into::into).collect::<Vec<Landmark>>();
        let points: [Landmark; NUM_LANDMARKS] = points.try_into().map_err(|v: Vec<_>| {
            anyhow!("expected {} hand landmarks, got {}", NUM_LANDMARKS, v.len())
        })?;

        Ok(Self::from_points(
            points,
            handedness,
            image_width,
            image_height,
        ))
    }

    /// Creates a [`HandFrame`] from an array of exactly [`NUM_LANDMARKS`] points.
    pub fn from_points(
        points: [Landmark; NUM_LANDMARKS],
        handedness: Handedness,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        Self {
            points,
            handedness,
            image_width,
            image_height,
        }
    }

    /// Creates a [`HandFrame`] from detector output in normalized coordinates.
    ///
    /// Detectors output X and Y in range 0.0 to 1.0 relative to the image size, and Z relative to
    /// the image width. This maps all three to pixels and truncates them towards zero.
    ///
    /// If `flip` is `true`, `handedness` is swapped (see [`Handedness::flip_if`]).
    ///
    /// # Errors
    ///
    /// Returns an error if `normalized` does not contain exactly [`NUM_LANDMARKS`] points.
    pub fn from_normalized(
        normalized: &[[f32; 3]],
        handedness: Handedness,
        image_width: u32,
        image_height: u32,
        flip: bool,
    ) -> anyhow::Result<Self> {
        let (w, h) = (image_width as f32, image_height as f32);
        Self::new(
            normalized
                .iter()
                .map(|&[x, y, z]| [(x * w).trunc(), (y * h).trunc(), (z * w).trunc()]),
            handedness.flip_if(flip),
            image_width,
            image_height,
        )
    }

    #[inline]
    pub fn points(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.points
    }

    #[inline]
    pub fn landmark(&self, idx: LandmarkIdx) -> Landmark {
        self.points[idx.index()]
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    #[inline]
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    #[inline]
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Computes the axis-aligned bounding box of all landmarks.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::of(self.points.iter().map(Landmark::xy))
    }

    /// Computes the center position of the hand's palm by averaging some of the landmarks.
    pub fn palm_center(&self) -> Landmark {
        average_position(PALM_LANDMARKS.iter().map(|&idx| self.landmark(idx)))
            .unwrap_or_default()
    }

    /// Computes the clockwise rotation of the palm compared to an upright position.
    ///
    /// A rotation of 0° means that fingers are pointed upwards.
    pub fn rotation_radians(&self) -> f32 {
        let finger = self.landmark(LandmarkIdx::MiddleFingerMcp).to_point2();
        let wrist = self.landmark(LandmarkIdx::Wrist).to_point2();

        let rel = wrist - finger;
        Rotation2::rotation_between(&Vector2::y(), &rel).angle()
    }

    /// Returns the 2D distance between two landmarks of this hand.
    pub fn distance(&self, a: LandmarkIdx, b: LandmarkIdx) -> f32 {
        geom::distance(self.landmark(a).xy(), self.landmark(b).xy())
    }

    /// Mirrors this hand horizontally inside its image, and swaps the handedness.
    ///
    /// The result depicts the same pose as seen in a mirror, so it has the same fingers extended.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let width = self.image_width as f32;
        Self {
            points: self.points.map(|lm| lm.with_xy([width - lm.x(), lm.y()])),
            handedness: self.handedness.flipped(),
            ..*self
        }
    }

    /// Returns a copy of this frame with the landmark positions replaced.
    ///
    /// Handedness and image dimensions are kept.
    #[must_use]
    pub fn with_points(&self, points: [Landmark; NUM_LANDMARKS]) -> Self {
        Self { points, ..*self }
    }
}
