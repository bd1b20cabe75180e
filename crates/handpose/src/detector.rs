//! Wrapping an external hand landmark detector.
//!
//! This crate does not run any neural network. Instead, a detector is plugged in by implementing
//! [`HandLandmarker`], and [`HandDetector`] turns its raw output into [`Hand`]s with pixel-space
//! landmarks, bounding boxes and finger states.

use std::{
    cmp::Ordering,
    env::{self, VarError},
    sync::OnceLock,
};

use anyhow::{ensure, Context};

use crate::{
    hand::{
        fingers::{classify, fingers_up, Classification, FingerState},
        frame::{HandFrame, Handedness},
    },
    rect::BoundingBox,
};

/// One hand as reported by a [`HandLandmarker`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawHand {
    /// Landmark positions. X and Y are normalized to range 0.0 to 1.0 relative to the image size,
    /// Z is relative to the image width.
    pub landmarks: Vec<[f32; 3]>,
    /// Handedness as reported by the detector, without any mirroring applied.
    pub handedness: Handedness,
    /// Detection confidence, by convention in range 0.0 to 1.0.
    pub score: f32,
}

/// Output of [`HandLandmarker::detect`] for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDetections {
    pub image_width: u32,
    pub image_height: u32,
    pub hands: Vec<RawHand>,
}

/// Trait implemented by hand landmark detectors.
///
/// Implementations wrap a perception model (for example MediaPipe's hand landmark network) that
/// finds hands in an image and estimates their 21 landmarks.
pub trait HandLandmarker {
    /// The image type accepted by [`HandLandmarker::detect`].
    type Image: ?Sized;

    /// Applies detector configuration.
    ///
    /// This is called once by [`HandDetector::new`]. Implementations can ignore options they do
    /// not support. The filtering by `detection_confidence` and `max_hands` is always performed by the [`HandDetector`] as well.
    fn configure(&mut self, options: &DetectorOptions) {
        let _ = options;
    }

    /// Detects all hands in `image`.
    fn detect(&mut self, image: &Self::Image) -> anyhow::Result<RawDetections>;
}

impl<L: HandLandmarker + ?Sized> HandLandmarker for Box<L> {
    type Image = L::Image;

    fn configure(&mut self, options: &DetectorOptions) {
        (**self).configure(options);
    }

    fn detect(&mut self, image: &Self::Image) -> anyhow::Result<RawDetections> {
        (**self).detect(image)
    }
}

const FLIP_TYPE_VAR: &str = "HANDPOSE_FLIP_TYPE";

const DEFAULT_FLIP_TYPE: bool = true;

fn default_flip_type() -> bool {
    static FLIP_TYPE: OnceLock<bool> = OnceLock::new();
    *FLIP_TYPE.get_or_init(|| {
        let flip = parse_flip_type(env::var(FLIP_TYPE_VAR));
        log::debug!("default flip type: {flip}");
        flip
    })
}

fn parse_flip_type(var: Result<String, VarError>) -> bool {
    match var.as_deref() {
        Ok("1" | "true" | "on") => true,
        Ok("0" | "false" | "off") => false,
        Ok(invalid) => {
            log::warn!("invalid value set for `{FLIP_TYPE_VAR}` variable: '{invalid}'; ignoring");
            DEFAULT_FLIP_TYPE
        }
        Err(VarError::NotPresent) => DEFAULT_FLIP_TYPE,
        Err(VarError::NotUnicode(s)) => {
            log::warn!(
                "invalid value set for `{FLIP_TYPE_VAR}` variable: {}; ignoring",
                s.to_string_lossy()
            );
            DEFAULT_FLIP_TYPE
        }
    }
}

/// Configuration of a [`HandDetector`].
///
/// The fields can be read by [`HandLandmarker::configure`] implementations. They are set through
/// the builder methods of the same name, and checked by [`HandDetector::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorOptions {
    pub static_mode: bool,
    pub max_hands: usize,
    pub model_complexity: u8,
    pub detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub flip_type: bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            static_mode: false,
            max_hands: 2,
            model_complexity: 1,
            detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            flip_type: default_flip_type(),
        }
    }
}

impl DetectorOptions {
    /// Sets whether every image should be treated as unrelated to the previous one.
    ///
    /// In static mode, the detector runs full detection on every image instead of tracking hands
    /// across frames. This is slower, but better suited for unrelated photos.
    #[inline]
    pub fn static_mode(self, static_mode: bool) -> Self {
        Self {
            static_mode,
            ..self
        }
    }

    /// Sets the maximum number of hands to report per image.
    ///
    /// If more hands are detected, the ones with the highest score are kept.
    #[inline]
    pub fn max_hands(self, max_hands: usize) -> Self {
        Self { max_hands, ..self }
    }

    /// Sets the complexity of the landmark model (0 = lite, 1 = full).
    #[inline]
    pub fn model_complexity(self, model_complexity: u8) -> Self {
        Self {
            model_complexity,
            ..self
        }
    }

    /// Sets the minimum detection score. Hands with a lower score are discarded.
    #[inline]
    pub fn detection_confidence(self, detection_confidence: f32) -> Self {
        Self {
            detection_confidence,
            ..self
        }
    }

    /// Sets the minimum confidence at which a tracked hand is considered still in view.
    #[inline]
    pub fn min_tracking_confidence(self, min_tracking_confidence: f32) -> Self {
        Self {
            min_tracking_confidence,
            ..self
        }
    }

    /// Sets whether the handedness reported by the detector should be swapped.
    ///
    /// Detectors report handedness as it appears to the camera. When the image is shown mirrored,
    /// the labels need to be swapped to match what the user sees.
    ///
    /// The default is `true`, unless overridden by the `HANDPOSE_FLIP_TYPE` environment variable.
    #[inline]
    pub fn flip_type(self, flip_type: bool) -> Self {
        Self { flip_type, ..self }
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.max_hands > 0, "`max_hands` must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&self.detection_confidence),
            "`detection_confidence` must be in range 0.0 to 1.0, got {}",
            self.detection_confidence
        );
        ensure!(
            (0.0..=1.0).contains(&self.min_tracking_confidence),
            "`min_tracking_confidence` must be in range 0.0 to 1.0, got {}",
            self.min_tracking_confidence
        );
        Ok(())
    }
}

/// A hand found by a [`HandDetector`].
#[derive(Debug, Clone)]
pub struct Hand {
    frame: HandFrame,
    bbox: BoundingBox,
    score: f32,
}

impl Hand {
    /// Returns the landmarks of this hand, in pixel coordinates of the input image.
    #[inline]
    pub fn frame(&self) -> &HandFrame {
        &self.frame
    }

    /// Returns the handedness, with the [`DetectorOptions::flip_type`] convention applied.
    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.frame.handedness()
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Returns the center of the bounding box.
    #[inline]
    pub fn center(&self) -> (i32, i32) {
        self.bbox.center()
    }

    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Determines which fingers are extended.
    pub fn fingers_up(&self) -> FingerState {
        fingers_up(&self.frame)
    }

    /// Computes the upright landmarks, palm/back facing and finger state of this hand.
    pub fn classify(&self) -> Classification {
        classify(&self.frame)
    }
}

/// Finds hands using a [`HandLandmarker`], and derives bounding boxes and finger states.
pub struct HandDetector<L: HandLandmarker> {
    landmarker: L,
    options: DetectorOptions,
}

impl<L: HandLandmarker> HandDetector<L> {
    /// Creates a new [`HandDetector`] and configures `landmarker` with `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` contains invalid values.
    pub fn new(mut landmarker: L, options: DetectorOptions) -> anyhow::Result<Self> {
        options.validate()?;
        landmarker.configure(&options);
        log::debug!("created hand detector with {:?}", options);
        Ok(Self {
            landmarker,
            options,
        })
    }

    #[inline]
    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Returns a reference to the wrapped [`HandLandmarker`].
    #[inline]
    pub fn landmarker(&self) -> &L {
        &self.landmarker
    }

    /// Finds the hands in `image`.
    ///
    /// Hands scoring below [`DetectorOptions::detection_confidence`] are discarded, and at most
    /// [`DetectorOptions::max_hands`] hands are returned, best score first.
    ///
    /// # Errors
    ///
    /// Returns an error if the landmarker fails, or if it reports a hand with a number of
    /// landmarks other than 21.
    pub fn find_hands(&mut self, image: &L::Image) -> anyhow::Result<Vec<Hand>> {
        let detections = self
            .landmarker
            .detect(image)
            .context("hand landmark detection failed")?;

        let mut raw = detections.hands;
        let total = raw.len();
        raw.retain(|hand| hand.score >= self.options.detection_confidence);
        raw.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        raw.truncate(self.options.max_hands);
        if raw.len() != total {
            log::trace!(
                "dropped {} of {} hands (min. score {}, max. hands {})",
                total - raw.len(),
                total,
                self.options.detection_confidence,
                self.options.max_hands,
            );
        }

        raw.into_iter()
            .enumerate()
            .map(|(i, hand)| -> anyhow::Result<Hand> {
                let frame = HandFrame::from_normalized(
                    &hand.landmarks,
                    hand.handedness,
                    detections.image_width,
                    detections.image_height,
                    self.options.flip_type,
                )
                .with_context(|| format!("invalid landmarks for hand #{i}"))?;
                Ok(Hand {
                    bbox: frame.bounding_box(),
                    frame,
                    score: hand.score,
                })
            })
            .collect()
    }

    /// Determines which fingers of `hand` are extended.
    pub fn fingers_up(&self, hand: &Hand) -> FingerState {
        hand.fingers_up()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use std::ffi::OsString;

    use crate::hand::landmark::LandmarkIdx;
    use crate::test::{fist_right_hand, open_right_hand};

    use super::*;

    /// Returns a fixed set of hands, regardless of the input.
    struct Scripted {
        detections: RawDetections,
        configured: Option<DetectorOptions>,
    }

    impl HandLandmarker for Scripted {
        type Image = ();

        fn configure(&mut self, options: &DetectorOptions) {
            self.configured = Some(options.clone());
        }

        fn detect(&mut self, _: &()) -> anyhow::Result<RawDetections> {
            Ok(self.detections.clone())
        }
    }

    struct Failing;

    impl HandLandmarker for Failing {
        type Image = ();

        fn detect(&mut self, _: &()) -> anyhow::Result<RawDetections> {
            bail!("camera unplugged")
        }
    }

    fn raw(frame: &HandFrame, score: f32) -> RawHand {
        let (w, h) = (frame.image_width() as f32, frame.image_height() as f32);
        RawHand {
            landmarks: frame
                .points()
                .iter()
                .map(|lm| [lm.x() / w, lm.y() / h, lm.z() / w])
                .collect(),
            handedness: frame.handedness(),
            score,
        }
    }

    fn scripted(hands: Vec<RawHand>) -> Scripted {
        Scripted {
            detections: RawDetections {
                image_width: 640,
                image_height: 480,
                hands,
            },
            configured: None,
        }
    }

    #[test]
    fn finds_hands() {
        let hands = vec![
            raw(&open_right_hand(), 0.9),
            raw(&fist_right_hand(), 0.95),
            raw(&open_right_hand(), 0.3),
        ];
        let options = DetectorOptions::default().flip_type(false);
        let mut detector = HandDetector::new(scripted(hands), options.clone()).unwrap();
        let configured = detector.landmarker().configured.as_ref().unwrap();
        assert_eq!(configured, &options);
        assert_eq!(configured.max_hands, 2);
        assert_eq!(configured.detection_confidence, 0.5);
        assert!(!configured.flip_type);

        let hands = detector.find_hands(&()).unwrap();
        assert_eq!(hands.len(), 2);

        // Best score first.
        assert_eq!(hands[0].score(), 0.95);
        assert_eq!(detector.fingers_up(&hands[0]).to_array(), [0, 0, 0, 0, 0]);
        assert_eq!(hands[1].fingers_up().to_array(), [1, 1, 1, 1, 1]);
        assert_eq!(hands[1].handedness(), Handedness::Right);

        // Landmarks are mapped back to (truncated) pixels, within float error.
        let wrist = hands[1].frame().landmark(LandmarkIdx::Wrist);
        assert!((wrist.x() - 200.0).abs() <= 1.0);
        assert!((wrist.y() - 400.0).abs() <= 1.0);
        let bbox = hands[1].bounding_box();
        assert!(bbox.contains(hands[1].center().0, hands[1].center().1));
    }

    #[test]
    fn flip_type_from_env() {
        for value in ["1", "true", "on"] {
            assert!(parse_flip_type(Ok(value.to_string())), "{value}");
        }
        for value in ["0", "false", "off"] {
            assert!(!parse_flip_type(Ok(value.to_string())), "{value}");
        }
        assert_eq!(parse_flip_type(Ok("yes please".into())), DEFAULT_FLIP_TYPE);
        assert_eq!(parse_flip_type(Ok(String::new())), DEFAULT_FLIP_TYPE);
        assert_eq!(parse_flip_type(Err(VarError::NotPresent)), DEFAULT_FLIP_TYPE);
        assert_eq!(
            parse_flip_type(Err(VarError::NotUnicode(OsString::from("off")))),
            DEFAULT_FLIP_TYPE
        );
    }

    #[test]
    fn max_hands() {
        let hands = (0..5)
            .map(|i| raw(&open_right_hand(), 0.5 + i as f32 * 0.1))
            .collect();
        let options = DetectorOptions::default().max_hands(1);
        let mut detector = HandDetector::new(scripted(hands), options).unwrap();
        let hands = detector.find_hands(&()).unwrap();
        assert_eq!(hands.len(), 1);
        assert!((hands[0].score() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn flip_type() {
        let hands = vec![raw(&open_right_hand(), 1.0)];
        let mut detector =
            HandDetector::new(scripted(hands), DetectorOptions::default().flip_type(true))
                .unwrap();
        let hands = detector.find_hands(&()).unwrap();
        assert_eq!(hands[0].handedness(), Handedness::Left);
    }

    #[test]
    fn errors() {
        let mut bad = raw(&open_right_hand(), 1.0);
        bad.landmarks.pop();
        let mut detector =
            HandDetector::new(scripted(vec![bad]), DetectorOptions::default()).unwrap();
        let err = detector.find_hands(&()).unwrap_err();
        assert_eq!(err.to_string(), "invalid landmarks for hand #0");
        assert_eq!(
            err.root_cause().to_string(),
            "expected 21 hand landmarks, got 20"
        );

        let mut detector = HandDetector::new(Failing, DetectorOptions::default()).unwrap();
        let err = detector.find_hands(&()).unwrap_err();
        assert_eq!(err.root_cause().to_string(), "camera unplugged");

        assert!(HandDetector::new(Failing, DetectorOptions::default().max_hands(0)).is_err());
        assert!(HandDetector::new(
            Failing,
            DetectorOptions::default().detection_confidence(1.5)
        )
        .is_err());
        assert!(HandDetector::new(
            Failing,
            DetectorOptions::default().min_tracking_confidence(-0.1)
        )
        .is_err());
    }

    #[test]
    fn boxed_landmarker() {
        let boxed: Box<dyn HandLandmarker<Image = ()>> =
            Box::new(scripted(vec![raw(&open_right_hand(), 1.0)]));
        let mut detector = HandDetector::new(boxed, DetectorOptions::default()).unwrap();
        assert_eq!(detector.find_hands(&()).unwrap().len(), 1);
    }
}
