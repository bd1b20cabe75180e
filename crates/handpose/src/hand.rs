//! Orientation-aware analysis of human hands.
//!
//! The pipeline for one [`HandFrame`] is:
//!
//! 1. [`orientation::normalize`] rotates the landmarks so that the hand is upright.
//! 2. [`palm::Facing::detect`] decides whether the palm or the back of the hand is visible.
//! 3. [`fingers::classify`] decides which fingers are extended.
//!
//! [`HandFrame`]: frame::HandFrame

pub mod fingers;
pub mod frame;
pub mod landmark;
pub mod orientation;
pub mod palm;
