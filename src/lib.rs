//! # VR Edge Library
//!
//! Turn VR controller joystick clicks into discrete rising/falling edge events.
//!
//! The VR runtime reports the same button bit for clicking a joystick and for
//! pushing it. This library latches the button state, filters out presses
//! made while the stick is deflected, and reports one event per press and one
//! per release.

pub mod config;
pub mod controller;
pub mod error;
pub mod event_log;
pub mod poller;
pub mod vr;
