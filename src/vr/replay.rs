//! # Replay Backend
//!
//! A [`VrSystem`] that plays back controller snapshots recorded as JSON Lines,
//! so edge detection can run without a headset attached.
//!
//! ## Recording Format
//!
//! One frame per line; each frame carries an optional snapshot per hand:
//!
//! ```text
//! # joystick click while centered
//! {"left": {"packet_number": 1, "button_mask": 4294967296, "axes": [{"x": 0.0, "y": 0.0}]}}
//! {"left": {"packet_number": 2, "button_mask": 0}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Missing axes are
//! centered. Every call to [`VrSystem::controller_state`] consumes one frame.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::{AxisState, ControllerRole, ControllerSnapshot, TrackedDeviceIndex, AXIS_COUNT};
use super::VrSystem;
use crate::error::{Result, VrEdgeError};

/// Device index reported for the left hand.
pub const LEFT_DEVICE_INDEX: TrackedDeviceIndex = TrackedDeviceIndex(1);
/// Device index reported for the right hand.
pub const RIGHT_DEVICE_INDEX: TrackedDeviceIndex = TrackedDeviceIndex(2);

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordedSnapshot {
    packet_number: u32,
    #[serde(default)]
    button_mask: u64,
    #[serde(default)]
    axes: Vec<AxisState>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordedFrame {
    #[serde(default)]
    left: Option<RecordedSnapshot>,
    #[serde(default)]
    right: Option<RecordedSnapshot>,
}

impl RecordedSnapshot {
    fn into_snapshot(self, line: usize) -> Result<ControllerSnapshot> {
        if self.axes.len() > AXIS_COUNT {
            return Err(VrEdgeError::Replay(format!(
                "line {}: {} axes recorded, at most {} supported",
                line,
                self.axes.len(),
                AXIS_COUNT
            )));
        }

        let mut snapshot = ControllerSnapshot::new(self.packet_number, self.button_mask);
        snapshot.axes[..self.axes.len()].copy_from_slice(&self.axes);
        Ok(snapshot)
    }
}

/// One recorded tick for both hands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayFrame {
    pub left: Option<ControllerSnapshot>,
    pub right: Option<ControllerSnapshot>,
}

impl ReplayFrame {
    /// Snapshot recorded for `role`, if the hand was present.
    pub fn snapshot(&self, role: ControllerRole) -> Option<&ControllerSnapshot> {
        match role {
            ControllerRole::Left => self.left.as_ref(),
            ControllerRole::Right => self.right.as_ref(),
        }
    }
}

/// Plays recorded frames through the [`VrSystem`] interface.
#[derive(Debug, Clone)]
pub struct ReplaySystem {
    frames: Vec<ReplayFrame>,
    cursor: usize,
    loop_playback: bool,
    has_left: bool,
    has_right: bool,
}

impl ReplaySystem {
    /// Creates a replay from already-built frames.
    pub fn from_frames(frames: Vec<ReplayFrame>, loop_playback: bool) -> Self {
        let has_left = frames.iter().any(|f| f.left.is_some());
        let has_right = frames.iter().any(|f| f.right.is_some());
        Self {
            frames,
            cursor: 0,
            loop_playback,
            has_left,
            has_right,
        }
    }

    /// Loads a JSON Lines recording from disk.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The file cannot be read
    /// - A line is not a valid frame
    /// - A snapshot records more than five axes
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vr_edge::vr::ReplaySystem;
    ///
    /// let replay = ReplaySystem::load("demos/joystick_click.jsonl", false)?;
    /// println!("{} frames", replay.len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P, loop_playback: bool) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let replay = Self::parse(&contents, loop_playback)?;
        info!("Loaded {} replay frames from {}", replay.len(), path.display());
        Ok(replay)
    }

    /// Parses a JSON Lines recording.
    ///
    /// # Errors
    ///
    /// Returns `ReplayParse` with the 1-based line number of the first bad
    /// line, or `Replay` for too many axes.
    pub fn parse(contents: &str, loop_playback: bool) -> Result<Self> {
        let mut frames = Vec::new();

        for (idx, raw) in contents.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let recorded: RecordedFrame = serde_json::from_str(trimmed)
                .map_err(|source| VrEdgeError::ReplayParse { line, source })?;

            frames.push(ReplayFrame {
                left: recorded.left.map(|s| s.into_snapshot(line)).transpose()?,
                right: recorded.right.map(|s| s.into_snapshot(line)).transpose()?,
            });
        }

        Ok(Self::from_frames(frames, loop_playback))
    }

    /// Number of frames in the recording.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the recording has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn role_for_index(index: TrackedDeviceIndex) -> Option<ControllerRole> {
        match index {
            LEFT_DEVICE_INDEX => Some(ControllerRole::Left),
            RIGHT_DEVICE_INDEX => Some(ControllerRole::Right),
            _ => None,
        }
    }
}

impl VrSystem for ReplaySystem {
    fn tracked_device_index_for_controller_role(
        &self,
        role: ControllerRole,
    ) -> Option<TrackedDeviceIndex> {
        match role {
            ControllerRole::Left if self.has_left => Some(LEFT_DEVICE_INDEX),
            ControllerRole::Right if self.has_right => Some(RIGHT_DEVICE_INDEX),
            _ => None,
        }
    }

    fn controller_state(&mut self, index: TrackedDeviceIndex) -> Option<ControllerSnapshot> {
        if self.cursor >= self.frames.len() {
            if !self.loop_playback || self.frames.is_empty() {
                return None;
            }
            debug!("Replay reached end, wrapping to first frame");
            self.cursor = 0;
        }

        let frame = &self.frames[self.cursor];
        self.cursor += 1;

        let role = Self::role_for_index(index)?;
        frame.snapshot(role).cloned()
    }
}
