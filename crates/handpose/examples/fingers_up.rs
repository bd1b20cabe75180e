//! Counts extended fingers on a synthetic hand that spins in front of a fake camera.
//!
//! A real application would implement [`HandLandmarker`] on top of a landmark detection network
//! and feed it webcam frames. Here, the "detector" just replays a canned hand pose, rotated a bit
//! more each frame, and curls one finger after another.

use handpose::detector::{DetectorOptions, HandDetector, HandLandmarker, RawDetections, RawHand};
use handpose::hand::{frame::Handedness, landmark::Finger};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

/// Normalized landmarks of an open right hand, fingers up.
const OPEN_HAND: [[f32; 2]; 21] = [
    [0.50, 0.80],
    [0.44, 0.76],
    [0.40, 0.70],
    [0.37, 0.64],
    [0.34, 0.59],
    [0.44, 0.60],
    [0.43, 0.50],
    [0.42, 0.44],
    [0.42, 0.38],
    [0.50, 0.58],
    [0.50, 0.47],
    [0.50, 0.40],
    [0.50, 0.34],
    [0.56, 0.60],
    [0.57, 0.50],
    [0.57, 0.44],
    [0.58, 0.39],
    [0.61, 0.63],
    [0.62, 0.56],
    [0.63, 0.52],
    [0.63, 0.48],
];

/// Plays back [`OPEN_HAND`], rotated by `frame * 7°` around the wrist.
struct Turntable {
    frame: u32,
}

impl HandLandmarker for Turntable {
    /// There is no image; the frame number is used instead.
    type Image = ();

    fn configure(&mut self, options: &DetectorOptions) {
        log::info!("configured with {options:?}");
    }

    fn detect(&mut self, _: &()) -> anyhow::Result<RawDetections> {
        let frame = self.frame;
        self.frame += 1;

        let mut points = OPEN_HAND.map(|[x, y]| [x * WIDTH as f32, y * HEIGHT as f32]);

        // Curl one finger per frame by moving its tip down below the MCP.
        let curled = Finger::ALL[frame as usize % Finger::ALL.len()];
        let [bx, by] = points[curled.base().index()];
        let tip = &mut points[curled.tip().index()];
        *tip = match curled {
            Finger::Thumb => [bx + 30.0, by - 20.0],
            _ => [bx + 4.0, by + 10.0],
        };

        let angle = (frame as f32 * 7.0).to_radians();
        let (sin, cos) = angle.sin_cos();
        let [wx, wy] = points[0];
        let landmarks = points
            .iter()
            .map(|&[x, y]| {
                let (dx, dy) = (x - wx, y - wy);
                [
                    (wx + cos * dx - sin * dy) / WIDTH as f32,
                    (wy + sin * dx + cos * dy) / HEIGHT as f32,
                    0.0,
                ]
            })
            .collect();

        Ok(RawDetections {
            image_width: WIDTH,
            image_height: HEIGHT,
            hands: vec![RawHand {
                landmarks,
                handedness: Handedness::Right,
                score: 0.97,
            }],
        })
    }
}

fn main() -> anyhow::Result<()> {
    handpose::init_logger!();

    let options = DetectorOptions::default().max_hands(2).flip_type(false);
    let mut detector = HandDetector::new(Turntable { frame: 0 }, options)?;

    for _ in 0..52 {
        for hand in detector.find_hands(&())? {
            let result = hand.classify();
            let fingers = result.fingers();
            log::info!(
                "{} hand at {:?}, rotated {:.1}° {:?}, {:?}: {} ({} up)",
                hand.handedness(),
                hand.bounding_box().to_xywh(),
                result.oriented().transform().rotation_degrees(),
                result.oriented().transform().direction(),
                result.facing(),
                fingers,
                fingers.count(),
            );
        }
    }

    Ok(())
}
