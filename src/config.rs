//! Race configuration loading
//!
//! The configuration file carries the race parameters:
//!
//! ```json
//! {
//!     "laps": 2,
//!     "lapLen": 3651,
//!     "penaltyLen": 50,
//!     "firingLines": 1,
//!     "start": "09:30:00",
//!     "startDelta": "00:00:30"
//! }
//! ```
//!
//! Files ending in `.json` are read as JSON; anything else is read as YAML with the
//! same keys. Times are validated here so that a bad file fails before any event
//! is processed.

use std::path::Path;

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{parse_clock, parse_clock_duration};
use crate::{RaceError, Result};

/// Which lap a shot is filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LapIndexing {
    /// Furthest lap completed by any competitor in the race
    #[default]
    RaceWide,
    /// The shooting competitor's own completed laps
    PerCompetitor,
}

/// Configuration file contents before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfigFile {
    pub laps: usize,
    pub lap_len: u32,
    pub penalty_len: u32,
    pub firing_lines: usize,
    pub start: String,
    pub start_delta: String,
    #[serde(default)]
    pub lap_indexing: LapIndexing,
}

/// Validated, immutable race parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    /// Main laps each competitor must complete
    pub laps: usize,
    /// Main lap length in meters
    pub lap_length: u32,
    /// Penalty loop length in meters
    pub penalty_length: u32,
    /// Number of firing lines on the range
    pub firing_lines: usize,
    /// Official race start
    pub official_start: NaiveTime,
    /// Start window after a competitor's scheduled start
    pub max_start_delta: TimeDelta,
    pub lap_indexing: LapIndexing,
}

impl RaceConfig {
    pub fn new(
        laps: usize,
        lap_length: u32,
        penalty_length: u32,
        firing_lines: usize,
        official_start: NaiveTime,
        max_start_delta: TimeDelta,
    ) -> Self {
        Self {
            laps,
            lap_length,
            penalty_length,
            firing_lines,
            official_start,
            max_start_delta,
            lap_indexing: LapIndexing::default(),
        }
    }

    pub fn with_lap_indexing(mut self, lap_indexing: LapIndexing) -> Self {
        self.lap_indexing = lap_indexing;
        self
    }

    /// Load configuration from a JSON or YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RaceError::file_error(path.to_path_buf(), e))?;

        let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
        debug!(path = %path.display(), json = is_json, "Loading race configuration");

        if is_json { Self::from_json_str(&text) } else { Self::from_yaml_str(&text) }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: RaceConfigFile = serde_json::from_str(text)
            .map_err(|e| RaceError::config_error(format!("invalid JSON: {}", e)))?;
        Self::try_from(file)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let file: RaceConfigFile = serde_yaml_ng::from_str(text)
            .map_err(|e| RaceError::config_error(format!("invalid YAML: {}", e)))?;
        Self::try_from(file)
    }

    /// Check the parameters are usable for a race.
    pub fn validate(&self) -> Result<()> {
        if self.laps == 0 {
            return Err(RaceError::config_error("laps must be at least 1"));
        }
        if self.max_start_delta < TimeDelta::zero() {
            return Err(RaceError::config_error("startDelta must not be negative"));
        }
        Ok(())
    }
}

impl TryFrom<RaceConfigFile> for RaceConfig {
    type Error = RaceError;

    fn try_from(file: RaceConfigFile) -> Result<Self> {
        let official_start = parse_clock(&file.start).ok_or_else(|| {
            RaceError::config_error(format!("start '{}' is not HH:MM:SS[.mmm]", file.start))
        })?;
        let max_start_delta = parse_clock_duration(&file.start_delta).ok_or_else(|| {
            RaceError::config_error(format!(
                "startDelta '{}' is not HH:MM:SS[.mmm]",
                file.start_delta
            ))
        })?;

        let config = RaceConfig {
            laps: file.laps,
            lap_length: file.lap_len,
            penalty_length: file.penalty_len,
            firing_lines: file.firing_lines,
            official_start,
            max_start_delta,
            lap_indexing: file.lap_indexing,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON: &str = r#"{
        "laps": 2,
        "lapLen": 3651,
        "penaltyLen": 50,
        "firingLines": 1,
        "start": "09:30:00.000",
        "startDelta": "00:00:30"
    }"#;

    #[test]
    fn test_parse_json_config() {
        let config = RaceConfig::from_json_str(JSON).unwrap();
        assert_eq!(config.laps, 2);
        assert_eq!(config.lap_length, 3651);
        assert_eq!(config.penalty_length, 50);
        assert_eq!(config.firing_lines, 1);
        assert_eq!(config.official_start, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(config.max_start_delta, TimeDelta::seconds(30));
        assert_eq!(config.lap_indexing, LapIndexing::RaceWide);
    }

    #[test]
    fn test_parse_yaml_config_with_lap_indexing() {
        let yaml = "\
laps: 3
lapLen: 4000
penaltyLen: 150
firingLines: 2
start: \"10:00:00\"
startDelta: \"00:01:30\"
lapIndexing: perCompetitor
";
        let config = RaceConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.laps, 3);
        assert_eq!(config.firing_lines, 2);
        assert_eq!(config.max_start_delta, TimeDelta::seconds(90));
        assert_eq!(config.lap_indexing, LapIndexing::PerCompetitor);
    }

    #[test]
    fn test_rejects_bad_times() {
        let bad_start = JSON.replace("09:30:00.000", "half past nine");
        let err = RaceConfig::from_json_str(&bad_start).unwrap_err();
        assert!(matches!(err, RaceError::Config { .. }));

        let bad_delta = JSON.replace("00:00:30", "30s");
        let err = RaceConfig::from_json_str(&bad_delta).unwrap_err();
        assert!(err.to_string().contains("startDelta"));
    }

    #[test]
    fn test_rejects_missing_fields_and_zero_laps() {
        let err = RaceConfig::from_json_str(r#"{"laps": 2}"#).unwrap_err();
        assert!(!err.is_recoverable());

        let zero_laps = JSON.replace("\"laps\": 2", "\"laps\": 0");
        assert!(RaceConfig::from_json_str(&zero_laps).is_err());
    }

    #[test]
    fn test_load_from_file_by_extension() {
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json_file.write_all(JSON.as_bytes()).unwrap();
        let config = RaceConfig::load(json_file.path()).unwrap();
        assert_eq!(config.laps, 2);

        let mut yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml_file
            .write_all(
                b"laps: 1\nlapLen: 100\npenaltyLen: 10\nfiringLines: 1\n\
                  start: \"10:00:00\"\nstartDelta: \"00:00:05\"\n",
            )
            .unwrap();
        let config = RaceConfig::load(yaml_file.path()).unwrap();
        assert_eq!(config.laps, 1);
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let err = RaceConfig::load("/definitely/not/here/config.json").unwrap_err();
        assert!(matches!(err, RaceError::File { .. }));
        assert!(!err.is_recoverable());
    }
}
