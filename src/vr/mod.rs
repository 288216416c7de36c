//! # VR Runtime Module
//!
//! The seam between edge detection and the VR runtime.
//!
//! This module handles:
//! - The [`VrSystem`] trait the detector polls through
//! - Controller roles, button ids and snapshots
//! - Replaying recorded snapshots without a headset

pub mod replay;
pub mod types;

pub use replay::ReplaySystem;
pub use types::{
    AxisState, ButtonId, ControllerRole, ControllerSnapshot, TrackedDeviceIndex, AXIS_COUNT,
};

/// Controller queries offered by a VR runtime.
///
/// Both calls report failure as `None`; callers treat that as "nothing new
/// this tick" rather than an error.
#[cfg_attr(test, mockall::automock)]
pub trait VrSystem {
    /// Resolves the device currently assigned to `role`.
    fn tracked_device_index_for_controller_role(
        &self,
        role: ControllerRole,
    ) -> Option<TrackedDeviceIndex>;

    /// Fetches the latest controller sample for `index`.
    fn controller_state(&mut self, index: TrackedDeviceIndex) -> Option<ControllerSnapshot>;
}
