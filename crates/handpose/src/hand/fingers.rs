//! Finger extension classification.

use std::{fmt, ops::Index};

use crate::landmark::Landmark;

use super::{
    frame::{HandFrame, Handedness},
    landmark::{Finger, LandmarkIdx, NUM_LANDMARKS},
    orientation::{normalize, OrientedFrame},
    palm::Facing,
};

/// Which fingers of a hand are extended.
///
/// Ordered like [`Finger::ALL`]: thumb, index, middle, ring, pinky.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FingerState([bool; 5]);

impl FingerState {
    pub const fn new(extended: [bool; 5]) -> Self {
        Self(extended)
    }

    #[inline]
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Returns the state as `0`/`1` flags, with `1` meaning "extended".
    pub fn to_array(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }

    /// Returns the number of extended fingers.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    /// Returns an iterator over the extended fingers.
    pub fn extended(&self) -> impl Iterator<Item = Finger> + '_ {
        Finger::ALL
            .into_iter()
            .filter(move |&finger| self.is_extended(finger))
    }
}

impl Index<Finger> for FingerState {
    type Output = bool;

    #[inline]
    fn index(&self, finger: Finger) -> &bool {
        &self.0[finger as usize]
    }
}

impl From<FingerState> for [u8; 5] {
    fn from(state: FingerState) -> Self {
        state.to_array()
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.to_array();
        write!(f, "[{a}, {b}, {c}, {d}, {e}]")
    }
}

/// Everything derived from a single [`HandFrame`] by [`classify`].
#[derive(Debug, Clone)]
pub struct Classification {
    oriented: OrientedFrame,
    facing: Facing,
    fingers: FingerState,
}

impl Classification {
    /// Returns the upright landmarks the classification was computed on.
    #[inline]
    pub fn oriented(&self) -> &OrientedFrame {
        &self.oriented
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn fingers(&self) -> FingerState {
        self.fingers
    }
}

/// Normalizes the orientation of `frame`, then determines its [`Facing`] and [`FingerState`].
///
/// This never fails. If the hand's orientation cannot be determined (because wrist and middle
/// finger MCP coincide), the landmarks are classified as they are.
pub fn classify(frame: &HandFrame) -> Classification {
    let oriented = normalize(frame);
    let points = oriented.frame().points();
    let handedness = frame.handedness();
    let facing = Facing::detect(&points[..], handedness);
    let fingers = finger_state(points, handedness, facing);

    Classification {
        oriented,
        facing,
        fingers,
    }
}

/// Determines which fingers of `frame` are extended.
///
/// Shorthand for `classify(frame).fingers()`.
pub fn fingers_up(frame: &HandFrame) -> FingerState {
    classify(frame).fingers()
}

/// Classifies upright landmarks.
///
/// The thumb is extended if its tip lies further outwards than its IP joint. Which way is
/// "outwards" depends on the handedness and on whether the palm faces the camera. All other
/// fingers are extended if their tip lies above their PIP joint.
fn finger_state(
    points: &[Landmark; NUM_LANDMARKS],
    handedness: Handedness,
    facing: Facing,
) -> FingerState {
    let lm = |idx: LandmarkIdx| points[idx.index()];

    let mut extended = [false; 5];
    for (finger, out) in Finger::ALL.into_iter().zip(&mut extended) {
        let tip = lm(finger.tip());
        let joint = lm(finger.reference_joint());
        *out = match finger {
            Finger::Thumb => match (handedness, facing) {
                (Handedness::Right, Facing::Palm) | (Handedness::Left, Facing::Back) => {
                    tip.x() < joint.x()
                }
                (Handedness::Right, Facing::Back) | (Handedness::Left, Facing::Palm) => {
                    tip.x() > joint.x()
                }
            },
            _ => tip.y() < joint.y(),
        };
    }

    FingerState(extended)
}
