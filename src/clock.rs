//! Time-of-day parsing and rendering for race timestamps.
//!
//! Feed timestamps and drawn start times are strict `HH:MM:SS.mmm`.
//! Configuration values (`start`, `startDelta`) may omit the milliseconds.

use chrono::{NaiveTime, TimeDelta, Timelike};

use crate::{RaceError, Result};

/// Rendering format for every timestamp the crate emits.
pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

const PARSE_FORMAT: &str = "%H:%M:%S%.f";

/// Parse a strict `HH:MM:SS.mmm` time of day.
///
/// Leap seconds (`SS` of 60) are rejected.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime> {
    let invalid = || RaceError::InvalidTimestamp { value: text.to_string() };

    let (_, millis) = text.split_once('.').ok_or_else(invalid)?;
    if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    parse_clock(text).ok_or_else(invalid)
}

/// Parse `HH:MM:SS` with optional fractional seconds.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), PARSE_FORMAT)
        .ok()
        .filter(|time| !is_leap_second(*time))
}

/// chrono keeps a leap second as a nanosecond count past one second.
fn is_leap_second(time: NaiveTime) -> bool {
    time.nanosecond() >= 1_000_000_000
}

/// Parse an `HH:MM:SS[.mmm]` duration such as a start window.
pub fn parse_clock_duration(text: &str) -> Option<TimeDelta> {
    parse_clock(text).map(|time| time.signed_duration_since(NaiveTime::default()))
}

/// Render a time of day as `HH:MM:SS.mmm`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Render a non-negative duration as `HH:MM:SS.mmm`.
pub fn format_duration(duration: TimeDelta) -> String {
    let millis = duration.num_milliseconds().max(0);
    let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, millis) = (rest / 1000, rest % 1000);
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Latest allowed start for a scheduled start and window.
///
/// Returns `None` when the window runs past midnight; such a start can never be late.
pub fn start_deadline(scheduled: NaiveTime, window: TimeDelta) -> Option<NaiveTime> {
    let (deadline, wrapped_secs) = scheduled.overflowing_add_signed(window);
    (wrapped_secs == 0).then_some(deadline)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms_milli(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    #[test]
    fn test_parse_time_of_day_accepts_millis() {
        assert_eq!(parse_time_of_day("09:05:59.867").unwrap(), hms_milli(9, 5, 59, 867));
        assert_eq!(parse_time_of_day("10:00:00.000").unwrap(), hms_milli(10, 0, 0, 0));
    }

    #[test]
    fn test_parse_time_of_day_rejects_malformed() {
        let malformed = [
            "",
            "10:00:00",
            "10:00:00.5",
            "10:00:00.5000",
            "25:00:00.000",
            "10:00:60.000",
            "23:59:60.999",
            "aa:bb:cc.ddd",
        ];
        for text in malformed {
            let err = parse_time_of_day(text).unwrap_err();
            assert!(matches!(err, RaceError::InvalidTimestamp { .. }), "{:?}", text);
        }
    }

    #[test]
    fn test_parse_clock_duration() {
        assert_eq!(parse_clock_duration("00:01:30").unwrap(), TimeDelta::seconds(90));
        assert_eq!(parse_clock_duration("0:00:05").unwrap(), TimeDelta::seconds(5));
        assert_eq!(parse_clock_duration("00:00:01.250").unwrap(), TimeDelta::milliseconds(1250));
        assert!(parse_clock_duration("90s").is_none());
        assert!(parse_clock_duration("00:00:60").is_none());
    }

    #[test]
    fn test_format_round_trips_millis() {
        let time = hms_milli(10, 0, 6, 42);
        assert_eq!(format_time_of_day(time), "10:00:06.042");
        assert_eq!(format_duration(TimeDelta::milliseconds(3_723_004)), "01:02:03.004");
    }

    #[test]
    fn test_start_deadline_does_not_wrap() {
        let deadline = start_deadline(hms_milli(10, 0, 0, 0), TimeDelta::seconds(5));
        assert_eq!(deadline, Some(hms_milli(10, 0, 5, 0)));

        assert_eq!(start_deadline(hms_milli(23, 59, 58, 0), TimeDelta::seconds(5)), None);
    }
}
