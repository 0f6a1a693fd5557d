//! Error types for race event processing.
//!
//! Errors fall into two groups that the replay loop treats differently:
//!
//! - **Event errors**: a single feed line or event could not be applied
//!   (bad timestamp, unknown kind, rule violation). These are reported and the
//!   replay continues with the next line.
//! - **Run errors**: configuration could not be loaded or the feed could not be
//!   read. These abort the whole replay.
//!
//! ```rust
//! use snowline::RaceError;
//!
//! let error = RaceError::NoPenaltyOwed { competitor: 7 };
//! if error.is_recoverable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::CompetitorId;

/// Result type alias for race operations.
pub type Result<T, E = RaceError> = std::result::Result<T, E>;

/// Main error type for race operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RaceError {
    #[error("Invalid timestamp '{value}': expected HH:MM:SS.mmm")]
    InvalidTimestamp { value: String },

    #[error("Unknown event kind '{value}'")]
    UnknownEventKind { value: String },

    #[error("The competitor({competitor}) is already registered")]
    AlreadyRegistered { competitor: CompetitorId },

    #[error("Invalid firing range for competitor({competitor}): {details}")]
    InvalidRangeNumber { competitor: CompetitorId, details: String },

    #[error("No shooting record for lap {lap} of competitor({competitor})")]
    InvalidLapIndex { competitor: CompetitorId, lap: usize },

    #[error("The competitor({competitor}) has no penalty laps to run")]
    NoPenaltyOwed { competitor: CompetitorId },

    #[error("Invalid {field} '{value}'")]
    InvalidParameter { field: &'static str, value: String },

    #[error("Malformed feed line {line_number}: {details}")]
    MalformedLine { line_number: usize, details: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RaceError {
    /// Returns whether the replay can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RaceError::InvalidTimestamp { .. } => true,
            RaceError::UnknownEventKind { .. } => true,
            RaceError::AlreadyRegistered { .. } => true,
            RaceError::InvalidRangeNumber { .. } => true,
            RaceError::InvalidLapIndex { .. } => true,
            RaceError::NoPenaltyOwed { .. } => true,
            RaceError::InvalidParameter { .. } => true,
            RaceError::MalformedLine { .. } => true,
            RaceError::Config { .. } => false,
            RaceError::File { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RaceError::InvalidTimestamp { .. } => vec![
                "Check the timestamp uses HH:MM:SS.mmm",
                "Verify the line starts with a bracketed timestamp",
            ],
            RaceError::UnknownEventKind { .. } => vec![
                "Use an inbound event code between 1 and 11",
                "Outcome codes 32 and 33 cannot appear in the feed",
            ],
            RaceError::AlreadyRegistered { .. } => {
                vec!["Remove the duplicate registration line from the feed"]
            }
            RaceError::InvalidRangeNumber { .. } => vec![
                "Check the firing line number against firingLines in the configuration",
                "Make sure the competitor entered the firing range before leaving it",
            ],
            RaceError::InvalidLapIndex { .. } => {
                vec!["Make sure the competitor entered the firing range before shooting"]
            }
            RaceError::NoPenaltyOwed { .. } => vec![
                "Check that shots were recorded before the penalty loop",
                "Look for a duplicate penalty exit in the feed",
            ],
            RaceError::InvalidParameter { .. } => {
                vec!["Check the parameter after the competitor id"]
            }
            RaceError::MalformedLine { .. } => {
                vec!["Event kind and competitor id must be whole numbers"]
            }
            RaceError::Config { .. } => vec![
                "Check the configuration keys: laps, lapLen, penaltyLen, firingLines, start, \
                 startDelta",
                "Times must use HH:MM:SS or HH:MM:SS.mmm",
            ],
            RaceError::File { .. } => {
                vec!["Check the file exists and is readable", "Check file permissions"]
            }
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        RaceError::File { path, source }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(reason: impl Into<String>) -> Self {
        RaceError::Config { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn error_messages_carry_their_context(
            value in "[ -~]{0,32}",
            competitor in any::<u32>(),
            lap in 0usize..100,
        ) {
            let timestamp = RaceError::InvalidTimestamp { value: value.clone() };
            prop_assert!(timestamp.to_string().contains(&value));

            let range = RaceError::InvalidRangeNumber { competitor, details: value.clone() };
            prop_assert!(range.to_string().contains(&value));
            prop_assert!(range.to_string().contains(&competitor.to_string()));

            let lap_error = RaceError::InvalidLapIndex { competitor, lap };
            prop_assert!(lap_error.to_string().contains(&lap.to_string()));
        }
    }

    #[test]
    fn event_errors_are_recoverable() {
        let errors = [
            RaceError::InvalidTimestamp { value: "xx".into() },
            RaceError::UnknownEventKind { value: "99".into() },
            RaceError::AlreadyRegistered { competitor: 1 },
            RaceError::InvalidRangeNumber { competitor: 1, details: "4".into() },
            RaceError::InvalidLapIndex { competitor: 1, lap: 0 },
            RaceError::NoPenaltyOwed { competitor: 1 },
            RaceError::InvalidParameter { field: "target", value: "x".into() },
            RaceError::MalformedLine { line_number: 3, details: "bad".into() },
        ];

        for error in &errors {
            assert!(error.is_recoverable(), "{} should be recoverable", error);
            assert!(!error.recovery_suggestions().is_empty());
        }
    }

    #[test]
    fn run_errors_are_fatal() {
        let config = RaceError::config_error("laps must be positive");
        let file = RaceError::file_error(
            PathBuf::from("/missing/events"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );

        assert!(!config.is_recoverable());
        assert!(!file.is_recoverable());
        assert!(config.to_string().contains("laps must be positive"));
        assert!(std::error::Error::source(&file).is_some());
    }

    #[test]
    fn error_is_send_sync_static() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<RaceError>();
    }
}
