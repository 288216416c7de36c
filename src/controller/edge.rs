//! # Edge Detector Module
//!
//! Turns per-tick controller snapshots into discrete press/release events.
//!
//! ## State Machine
//!
//! | State | Condition this tick | Next state | Event |
//! |-------|---------------------|------------|-------|
//! | Low | clicked | High | [`Event::RisingEdge`] |
//! | Low | not clicked | Low | [`Event::None`] |
//! | High | clicked | High | [`Event::None`] |
//! | High | not clicked | Low | [`Event::FallingEdge`] |
//!
//! "Clicked" means the target button bit is set and the joystick is inside the
//! [`DeadZone`]. The initial state is Low.
//!
//! A tick is skipped (no event, no state change) when the role cannot be
//! resolved, the runtime has no sample, or the sample carries the packet number
//! already recorded in the session.
//!
//! ## Usage
//!
//! ```
//! use vr_edge::controller::edge::{poll, Event, SessionState};
//! use vr_edge::vr::{ButtonId, ControllerRole, ReplaySystem};
//!
//! let recording = r#"{"left": {"packet_number": 1, "button_mask": 4294967296}}"#;
//! let mut session = SessionState::new(ReplaySystem::parse(recording, false)?);
//!
//! let event = poll(&mut session, ControllerRole::Left, ButtonId::AXIS0);
//! assert_eq!(event, Event::RisingEdge);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;
use std::fmt;
use tracing::trace;

use super::dead_zone::DeadZone;
use crate::vr::{ButtonId, ControllerRole, VrSystem};

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Nothing changed, or nothing could be read.
    None,
    /// The button went from released to clicked.
    RisingEdge,
    /// The button went from clicked to released.
    FallingEdge,
}

impl Event {
    /// Whether this is a rising or falling edge.
    pub fn is_edge(&self) -> bool {
        !matches!(self, Event::None)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Event::None => "none",
            Event::RisingEdge => "rising edge",
            Event::FallingEdge => "falling edge",
        })
    }
}

/// How the session remembers which packet it saw last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketTracking {
    /// Record every processed packet number, so replays of it are skipped.
    Latest,
    /// Never record; only the initial packet number (0) is ever skipped.
    ///
    /// A release reported on the same packet number as the last press still
    /// produces a falling edge.
    #[default]
    FirstOnly,
}

/// Mutable detector state plus the VR system it reads from.
#[derive(Debug)]
pub struct SessionState<S> {
    system: S,
    last_packet: u32,
    event_high: bool,
    dead_zone: DeadZone,
    packet_tracking: PacketTracking,
}

impl<S: VrSystem> SessionState<S> {
    /// Creates a session in the Low state with the default dead zone.
    pub fn new(system: S) -> Self {
        Self {
            system,
            last_packet: 0,
            event_high: false,
            dead_zone: DeadZone::default(),
            packet_tracking: PacketTracking::default(),
        }
    }

    /// Replaces the dead zone.
    #[must_use]
    pub fn with_dead_zone(mut self, dead_zone: DeadZone) -> Self {
        self.dead_zone = dead_zone;
        self
    }

    /// Replaces the packet tracking policy.
    #[must_use]
    pub fn with_packet_tracking(mut self, packet_tracking: PacketTracking) -> Self {
        self.packet_tracking = packet_tracking;
        self
    }

    /// Whether the latch is currently High.
    pub fn event_high(&self) -> bool {
        self.event_high
    }

    /// Last recorded packet number.
    pub fn last_packet(&self) -> u32 {
        self.last_packet
    }

    /// Dead zone applied to the primary joystick.
    pub fn dead_zone(&self) -> DeadZone {
        self.dead_zone
    }

    /// Current packet tracking policy.
    pub fn packet_tracking(&self) -> PacketTracking {
        self.packet_tracking
    }
}

/// Polls `role` once and reports an edge on `button`, if any.
///
/// Never fails: an unresolvable role, a missing sample, or a repeated packet
/// all yield [`Event::None`] and leave the session untouched.
pub fn poll<S: VrSystem>(
    session: &mut SessionState<S>,
    role: ControllerRole,
    button: ButtonId,
) -> Event {
    let Some(index) = session.system.tracked_device_index_for_controller_role(role) else {
        trace!("No device assigned to {} hand", role);
        return Event::None;
    };

    let Some(snapshot) = session.system.controller_state(index) else {
        trace!("No controller state for device {}", index.0);
        return Event::None;
    };

    if snapshot.packet_number == session.last_packet {
        return Event::None;
    }

    if session.packet_tracking == PacketTracking::Latest {
        session.last_packet = snapshot.packet_number;
    }

    let clicked =
        snapshot.is_pressed(button) && session.dead_zone.contains(snapshot.joystick());

    if clicked {
        if session.event_high {
            Event::None
        } else {
            session.event_high = true;
            Event::RisingEdge
        }
    } else if session.event_high {
        session.event_high = false;
        Event::FallingEdge
    } else {
        Event::None
    }
}
