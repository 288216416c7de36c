//! # Event Log Module
//!
//! Appends detected edges to a JSON Lines file.
//!
//! Each record is one line:
//!
//! ```text
//! {"timestamp":"2024-05-01T12:00:00.123Z","role":"left","button":32,"event":"rising_edge"}
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::controller::Event;
use crate::error::{Result, VrEdgeError};
use crate::vr::{ButtonId, ControllerRole};

/// One logged edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub timestamp: DateTime<Utc>,
    pub role: ControllerRole,
    pub button: ButtonId,
    pub event: Event,
}

impl EdgeRecord {
    /// Creates a record stamped with the current time.
    pub fn now(role: ControllerRole, button: ButtonId, event: Event) -> Self {
        Self {
            timestamp: Utc::now(),
            role,
            button,
            event,
        }
    }
}

/// JSON Lines writer for [`EdgeRecord`]s.
#[derive(Debug)]
pub struct EventLog<W: Write> {
    writer: W,
    records_written: u64,
}

impl EventLog<File> {
    /// Opens `path` for appending, creating it and its parent directories.
    ///
    /// # Errors
    ///
    /// Returns `EventLog` error if the directory or file cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                VrEdgeError::EventLog(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| VrEdgeError::EventLog(format!("Failed to open {}: {}", path.display(), e)))?;

        info!("Logging edge events to {}", path.display());
        Ok(Self::new(file))
    }
}

impl<W: Write> EventLog<W> {
    /// Wraps an arbitrary writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    /// Appends one record as a single line and flushes.
    ///
    /// # Errors
    ///
    /// Returns `EventLog` error if serialization or the write fails.
    pub fn append(&mut self, record: &EdgeRecord) -> Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| VrEdgeError::EventLog(format!("Failed to serialize record: {}", e)))?;

        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| VrEdgeError::EventLog(format!("Failed to write record: {}", e)))?;

        self.records_written += 1;
        Ok(())
    }

    /// Number of records appended so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}
