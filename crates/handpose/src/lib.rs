//! Geometry on top of 21-point hand landmarks.
//!
//! This library does not detect hands. It consumes the output of an external hand landmark
//! detector (anything producing the 21 MediaPipe hand landmarks) and derives higher-level facts
//! from it: a bounding box, a canonical upright orientation, whether the palm or the back of the
//! hand faces the camera, and which fingers are extended.
//!
//! The entry points are [`hand::fingers::classify`] for a single [`hand::frame::HandFrame`], and
//! [`detector::HandDetector`] for wrapping a detector implementation.
//!
//! # Coordinates
//!
//! All landmark coordinates are in image pixels: X points to the right, Y points *down*, the
//! origin is in the top left corner of the image. Z is a depth proxy in the same scale as X.
//!
//! Angles given in degrees follow the convention of the image coordinate system, so a positive
//! rotation appears clockwise on screen.
//!
//! # Environment Variables
//!
//! * `HANDPOSE_FLIP_TYPE`: Overrides the default of [`DetectorOptions::flip_type`]. Allowed values
//!   are `1`, `true`, `on` and `0`, `false`, `off`.
//!
//! [`DetectorOptions::flip_type`]: detector::DetectorOptions::flip_type

use log::LevelFilter;

pub mod detector;
pub mod geom;
pub mod hand;
pub mod landmark;
pub mod rect;


/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and `handpose` will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` can be used to override this.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
