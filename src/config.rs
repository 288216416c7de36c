//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock behavior: left joystick click, 0.7 dead zone, polled every 100 ms.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::controller::{DeadZone, PacketTracking};
use crate::error::{Result, VrEdgeError};
use crate::vr::{ButtonId, ControllerRole};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub event_log: EventLogConfig,
}

/// Polling and click detection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_hand")]
    pub hand: String,

    #[serde(default = "default_button")]
    pub button: String,

    #[serde(default = "default_dead_zone_radius")]
    pub dead_zone_radius: f32,

    #[serde(default = "default_track_last_packet")]
    pub track_last_packet: bool,
}

/// Recorded input playback configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    #[serde(default = "default_replay_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub loop_playback: bool,
}

/// Edge event log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EventLogConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_event_log_path")]
    pub path: PathBuf,
}

// Default value functions
fn default_interval_ms() -> u64 { 100 }
fn default_hand() -> String { "left".to_string() }
fn default_button() -> String { "joystick".to_string() }
fn default_dead_zone_radius() -> f32 { 0.7 }
fn default_track_last_packet() -> bool { false }

fn default_replay_path() -> PathBuf { PathBuf::from("demos/joystick_click.jsonl") }

fn default_event_log_path() -> PathBuf { PathBuf::from("./logs/edges.jsonl") }

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            hand: default_hand(),
            button: default_button(),
            dead_zone_radius: default_dead_zone_radius(),
            track_last_packet: default_track_last_packet(),
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            path: default_replay_path(),
            loop_playback: false,
        }
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_event_log_path(),
        }
    }
}

fn invalid(msg: impl std::fmt::Display) -> VrEdgeError {
    VrEdgeError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vr_edge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_ms == 0 || self.poll.interval_ms > 10000 {
            return Err(invalid("interval_ms must be between 1 and 10000"));
        }

        // Rejects NaN as well
        if !(self.poll.dead_zone_radius > 0.0 && self.poll.dead_zone_radius <= 1.0) {
            return Err(invalid("dead_zone_radius must be greater than 0.0 and at most 1.0"));
        }

        self.role()?;
        self.button()?;

        if self.replay.path.as_os_str().is_empty() {
            return Err(invalid("replay path cannot be empty"));
        }

        if self.event_log.enabled && self.event_log.path.as_os_str().is_empty() {
            return Err(invalid("event_log path cannot be empty when enabled"));
        }

        Ok(())
    }

    /// Controller role named by `poll.hand`.
    pub fn role(&self) -> Result<ControllerRole> {
        self.poll.hand.parse().map_err(invalid)
    }

    /// Button named by `poll.button`.
    pub fn button(&self) -> Result<ButtonId> {
        self.poll.button.parse().map_err(invalid)
    }

    /// Dead zone built from `poll.dead_zone_radius`.
    pub fn dead_zone(&self) -> DeadZone {
        DeadZone::new(self.poll.dead_zone_radius)
    }

    /// Packet tracking policy selected by `poll.track_last_packet`.
    pub fn packet_tracking(&self) -> PacketTracking {
        if self.poll.track_last_packet {
            PacketTracking::Latest
        } else {
            PacketTracking::FirstOnly
        }
    }
}
