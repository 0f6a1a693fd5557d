//! Test utilities for locating race fixtures
//!
//! Fixtures live under `test-data/` at the crate root and are resolved from the
//! manifest directory, so tests and benches find them from any working directory.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};

use chrono::{NaiveTime, TimeDelta};

use crate::config::{LapIndexing, RaceConfig};
use crate::types::EventRecord;

/// Error returned when a required fixture cannot be located.
#[derive(Debug, Clone)]
pub struct FixtureError {
    message: String,
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FixtureError {}

/// Require that a fixture exists on disk.
pub fn require_fixture<P: AsRef<Path>>(path: P) -> Result<PathBuf, FixtureError> {
    let path = path.as_ref();
    if path.exists() {
        Ok(path.to_path_buf())
    } else {
        Err(FixtureError {
            message: format!(
                "Missing race fixture: {} (expected under test-data/)",
                path.display()
            ),
        })
    }
}

/// The `test-data/` directory of this crate
pub fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

/// Sample race configuration
pub fn sample_config_path() -> PathBuf {
    test_data_dir().join("config.json")
}

/// Sample feed matching [`sample_config_path`]
pub fn sample_events_path() -> PathBuf {
    test_data_dir().join("events")
}

/// Configuration with a single firing line and a 30 second start window at 10:00.
pub fn quick_config(laps: usize) -> RaceConfig {
    RaceConfig::new(
        laps,
        3500,
        150,
        1,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        TimeDelta::seconds(30),
    )
}

/// Configuration for [`synthetic_race`] feeds.
///
/// The generated feed lists competitors one after another, so shooting laps are
/// counted per competitor.
pub fn synthetic_config(laps: usize) -> RaceConfig {
    quick_config(laps).with_lap_indexing(LapIndexing::PerCompetitor)
}

/// Generated feed for `competitors` runners over `laps` clean laps.
///
/// Every competitor registers, draws a start ten seconds after the previous one,
/// shoots five hits per lap and finishes.
pub fn synthetic_race(competitors: u32, laps: usize) -> Vec<EventRecord> {
    let base = NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default();
    let stamp = |offset: i64| {
        crate::clock::format_time_of_day(base + TimeDelta::milliseconds(offset))
    };

    let mut records = Vec::new();
    for id in 1..=competitors {
        let start = i64::from(id) * 10_000;
        records.push(EventRecord::new(stamp(-3_600_000), 1, id, ""));
        records.push(EventRecord::new(stamp(-1_800_000), 2, id, stamp(start)));
        records.push(EventRecord::new(stamp(start), 4, id, ""));

        for lap in 0..laps as i64 {
            let range = start + (lap + 1) * 600_000;
            records.push(EventRecord::new(stamp(range), 5, id, "1"));
            for target in 1..=5 {
                let shot_at = stamp(range + target * 1_000);
                records.push(EventRecord::new(shot_at, 6, id, target.to_string()));
            }
            records.push(EventRecord::new(stamp(range + 6_000), 7, id, ""));
            records.push(EventRecord::new(stamp(range + 300_000), 10, id, ""));
        }
    }
    records
}

/// Render records back into feed lines
pub fn render_feed(records: &[EventRecord]) -> String {
    records
        .iter()
        .map(|r| {
            if r.parameter.is_empty() {
                format!("[{}] {} {}\n", r.timestamp, r.kind, r.competitor)
            } else {
                format!("[{}] {} {} {}\n", r.timestamp, r.kind, r.competitor, r.parameter)
            }
        })
        .collect()
}
