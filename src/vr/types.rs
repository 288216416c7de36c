//! # VR Runtime Types
//!
//! Controller roles, button identifiers and the per-tick controller snapshot,
//! laid out the way the VR runtime reports them.
//!
//! ## Button Identifiers
//!
//! Buttons are bit indices into the 64-bit `button_mask` of a snapshot,
//! numbered like the runtime's `EVRButtonId`:
//!
//! | Name | Id | Notes |
//! |------|----|-------|
//! | `system` | 0 | |
//! | `menu` / `b` | 1 | Index controller B |
//! | `grip` / `a` | 2 | Index controller A |
//! | `joystick` | 32 | Axis 0 click/touch, also fires on deflection |
//! | `trigger` | 33 | Axis 1 |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of analog axis slots in a controller snapshot.
pub const AXIS_COUNT: usize = 5;

/// Which hand a controller is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerRole {
    Left,
    Right,
}

/// Role names accepted in configuration.
static ROLE_NAMES: &[(&str, ControllerRole)] = &[
    ("left", ControllerRole::Left),
    ("right", ControllerRole::Right),
];

impl ControllerRole {
    /// Looks up a role by name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use vr_edge::vr::ControllerRole;
    ///
    /// assert_eq!(ControllerRole::from_name("Left"), Some(ControllerRole::Left));
    /// assert_eq!(ControllerRole::from_name("both"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        ROLE_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, role)| role)
    }

    /// Lowercase name of the role.
    pub fn name(&self) -> &'static str {
        match self {
            ControllerRole::Left => "left",
            ControllerRole::Right => "right",
        }
    }
}

impl fmt::Display for ControllerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown controller role '{}'", s))
    }
}

/// Bit index of a button in [`ControllerSnapshot::button_mask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonId(pub u32);

impl ButtonId {
    pub const SYSTEM: ButtonId = ButtonId(0);
    pub const APPLICATION_MENU: ButtonId = ButtonId(1);
    pub const GRIP: ButtonId = ButtonId(2);
    pub const A: ButtonId = ButtonId(7);
    pub const AXIS0: ButtonId = ButtonId(32);
    pub const AXIS1: ButtonId = ButtonId(33);
    pub const AXIS2: ButtonId = ButtonId(34);
    pub const AXIS3: ButtonId = ButtonId(35);
    pub const AXIS4: ButtonId = ButtonId(36);

    /// Valve Index controller A button.
    pub const INDEX_A: ButtonId = Self::GRIP;
    /// Valve Index controller B button.
    pub const INDEX_B: ButtonId = Self::APPLICATION_MENU;
    /// Valve Index controller thumbstick.
    pub const INDEX_JOYSTICK: ButtonId = Self::AXIS3;

    /// Looks up a button by name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use vr_edge::vr::ButtonId;
    ///
    /// assert_eq!(ButtonId::from_name("joystick"), Some(ButtonId::AXIS0));
    /// assert_eq!(ButtonId::from_name("A"), Some(ButtonId::INDEX_A));
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        BUTTON_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, id)| id)
    }

    /// Single-bit mask for this button, or 0 when the id is outside the 64-bit mask.
    #[must_use]
    pub fn mask(&self) -> u64 {
        1u64.checked_shl(self.0).unwrap_or(0)
    }
}

/// Button names accepted in configuration.
static BUTTON_NAMES: &[(&str, ButtonId)] = &[
    ("a", ButtonId::INDEX_A),
    ("b", ButtonId::INDEX_B),
    ("joystick", ButtonId::AXIS0),
    ("system", ButtonId::SYSTEM),
    ("menu", ButtonId::APPLICATION_MENU),
    ("grip", ButtonId::GRIP),
    ("trigger", ButtonId::AXIS1),
];

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "button {}", self.0)
    }
}

impl FromStr for ButtonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown button '{}'", s))
    }
}

/// Runtime-assigned index of a tracked device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackedDeviceIndex(pub u32);

/// Position of one analog axis, each component in -1.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisState {
    pub x: f32,
    pub y: f32,
}

impl AxisState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance from center.
    #[must_use]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }
}

/// One sample of a controller as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerSnapshot {
    /// Changes whenever the runtime has a new sample.
    pub packet_number: u32,
    /// Pressed buttons, one bit per [`ButtonId`].
    pub button_mask: u64,
    /// Axis 0 is the primary joystick.
    pub axes: [AxisState; AXIS_COUNT],
}

impl ControllerSnapshot {
    /// Creates a snapshot with every axis centered.
    pub fn new(packet_number: u32, button_mask: u64) -> Self {
        Self {
            packet_number,
            button_mask,
            axes: [AxisState::default(); AXIS_COUNT],
        }
    }

    /// Sets the primary joystick position.
    #[must_use]
    pub fn with_joystick(mut self, x: f32, y: f32) -> Self {
        self.axes[0] = AxisState::new(x, y);
        self
    }

    /// Primary joystick position.
    pub fn joystick(&self) -> AxisState {
        self.axes[0]
    }

    /// Whether `button` is down in this sample.
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.button_mask & button.mask() != 0
    }
}
