//! Palm/back-of-hand disambiguation.

use crate::landmark::Landmark;

use super::{frame::Handedness, landmark::LandmarkIdx};

/// Which side of the hand faces the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Palm,
    Back,
}

impl Facing {
    #[inline]
    pub fn is_palm(self) -> bool {
        self == Facing::Palm
    }

    /// Decides whether the palm or the back of a hand faces the camera.
    ///
    /// `landmarks` must already be upright (see [`normalize`]); on arbitrarily rotated landmarks
    /// the result is meaningless.
    ///
    /// The decision compares the vertical order of wrist and middle finger MCP with the horizontal
    /// order of the index and pinky MCPs. This is a heuristic and can misclassify unusual poses.
    ///
    /// If `landmarks` is missing any of the required landmarks, a warning is logged and
    /// [`Facing::Palm`] is returned.
    ///
    /// [`normalize`]: super::orientation::normalize
    pub fn detect(landmarks: &[Landmark], handedness: Handedness) -> Self {
        let get = |idx: LandmarkIdx| landmarks.get(idx.index()).copied();
        let (Some(wrist), Some(index_mcp), Some(middle_mcp), Some(pinky_mcp)) = (
            get(LandmarkIdx::Wrist),
            get(LandmarkIdx::IndexFingerMcp),
            get(LandmarkIdx::MiddleFingerMcp),
            get(LandmarkIdx::PinkyMcp),
        ) else {
            log::warn!(
                "cannot tell palm from back with only {} landmarks; assuming palm",
                landmarks.len()
            );
            return Facing::Palm;
        };

        let (y0, y9) = (wrist.y(), middle_mcp.y());
        let (x5, x17) = (index_mcp.x(), pinky_mcp.x());

        let back = match handedness {
            Handedness::Right => (y9 < y0 && x17 < x5) || (y0 < y9 && x5 < x17),
            Handedness::Left => (y9 < y0 && x17 > x5) || (y0 < y9 && x5 > x17),
        };

        if back {
            Facing::Back
        } else {
            Facing::Palm
        }
    }
}
