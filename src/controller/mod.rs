//! # Controller Module
//!
//! Click detection for a single VR controller button.
//!
//! This module handles:
//! - Separating joystick clicks from joystick deflection with a dead zone
//! - Latching the click state and reporting rising/falling edges
//! - Skipping samples the runtime has already delivered

pub mod dead_zone;
pub mod edge;

pub use dead_zone::DeadZone;
pub use edge::{poll, Event, PacketTracking, SessionState};
