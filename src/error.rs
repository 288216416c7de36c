//! # Error Types
//!
//! Custom error types for VR Edge using `thiserror`.

use thiserror::Error;

/// Main error type for VR Edge
#[derive(Debug, Error)]
pub enum VrEdgeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Recording contents that parse but make no sense
    #[error("Replay error: {0}")]
    Replay(String),

    /// Malformed JSON in a recording
    #[error("Replay parse error on line {line}: {source}")]
    ReplayParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Event log could not be opened or written
    #[error("Event log error: {0}")]
    EventLog(String),
}

/// Result type alias for VR Edge
pub type Result<T> = std::result::Result<T, VrEdgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_parse_message_includes_line() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = VrEdgeError::ReplayParse { line: 7, source };
        assert!(err.to_string().starts_with("Replay parse error on line 7"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VrEdgeError = io.into();
        assert!(matches!(err, VrEdgeError::Io(_)));
    }
}
