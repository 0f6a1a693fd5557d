//! Event records flowing from the feed into the race state machine

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::event_codes::{inbound, outgoing};
use crate::clock::format_time_of_day;

/// Competitor identity as it appears in the feed.
pub type CompetitorId = u32;

/// Event kinds a feed can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Registration,
    StartTimeSet,
    OnStartLine,
    Started,
    OnFiringRange,
    Shot,
    LeftFiringRange,
    EnteredPenalty,
    LeftPenalty,
    LapCompleted,
    CannotContinue,
}

impl EventKind {
    /// Decode a feed code. Outcome codes are not feed events and decode to `None`.
    pub fn from_inbound_code(code: u32) -> Option<Self> {
        let kind = match code {
            inbound::REGISTRATION => EventKind::Registration,
            inbound::START_TIME_SET => EventKind::StartTimeSet,
            inbound::ON_START_LINE => EventKind::OnStartLine,
            inbound::STARTED => EventKind::Started,
            inbound::ON_FIRING_RANGE => EventKind::OnFiringRange,
            inbound::SHOT => EventKind::Shot,
            inbound::LEFT_FIRING_RANGE => EventKind::LeftFiringRange,
            inbound::ENTERED_PENALTY => EventKind::EnteredPenalty,
            inbound::LEFT_PENALTY => EventKind::LeftPenalty,
            inbound::LAP_COMPLETED => EventKind::LapCompleted,
            inbound::CANNOT_CONTINUE => EventKind::CannotContinue,
            _ => return None,
        };
        Some(kind)
    }

    /// Wire code for this kind.
    pub fn code(self) -> u32 {
        match self {
            EventKind::Registration => inbound::REGISTRATION,
            EventKind::StartTimeSet => inbound::START_TIME_SET,
            EventKind::OnStartLine => inbound::ON_START_LINE,
            EventKind::Started => inbound::STARTED,
            EventKind::OnFiringRange => inbound::ON_FIRING_RANGE,
            EventKind::Shot => inbound::SHOT,
            EventKind::LeftFiringRange => inbound::LEFT_FIRING_RANGE,
            EventKind::EnteredPenalty => inbound::ENTERED_PENALTY,
            EventKind::LeftPenalty => inbound::LEFT_PENALTY,
            EventKind::LapCompleted => inbound::LAP_COMPLETED,
            EventKind::CannotContinue => inbound::CANNOT_CONTINUE,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Event kinds only the state machine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Disqualified,
    Finished,
}

impl OutcomeKind {
    pub fn code(self) -> u32 {
        match self {
            OutcomeKind::Disqualified => outgoing::DISQUALIFIED,
            OutcomeKind::Finished => outgoing::FINISHED,
        }
    }
}

/// One decoded feed line, ready for the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Raw timestamp text from inside the brackets
    pub timestamp: String,
    /// Raw inbound event code
    pub kind: u32,
    /// Competitor the event refers to
    pub competitor: CompetitorId,
    /// Remaining fields joined by single spaces, empty when absent
    pub parameter: String,
}

impl EventRecord {
    pub fn new(
        timestamp: impl Into<String>,
        kind: u32,
        competitor: CompetitorId,
        parameter: impl Into<String>,
    ) -> Self {
        Self { timestamp: timestamp.into(), kind, competitor, parameter: parameter.into() }
    }
}

/// A finish or disqualification emitted by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub timestamp: NaiveTime,
    pub kind: OutcomeKind,
    pub competitor: CompetitorId,
    pub reason: Option<String>,
}

impl fmt::Display for OutcomeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            format_time_of_day(self.timestamp),
            self.kind.code(),
            self.competitor
        )?;
        if let Some(reason) = self.reason.as_deref().filter(|r| !r.is_empty()) {
            write!(f, " {}", reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_codes_round_trip() {
        for code in 1..=11 {
            let kind = EventKind::from_inbound_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn test_outcome_codes_are_not_inbound() {
        assert_eq!(EventKind::from_inbound_code(0), None);
        assert_eq!(EventKind::from_inbound_code(12), None);
        assert_eq!(EventKind::from_inbound_code(32), None);
        assert_eq!(EventKind::from_inbound_code(33), None);
        assert_eq!(OutcomeKind::Disqualified.code(), 32);
        assert_eq!(OutcomeKind::Finished.code(), 33);
    }

    #[test]
    fn test_outcome_display() {
        let timestamp = NaiveTime::from_hms_milli_opt(10, 0, 6, 0).unwrap();
        let finished = OutcomeEvent {
            timestamp,
            kind: OutcomeKind::Finished,
            competitor: 1,
            reason: None,
        };
        assert_eq!(finished.to_string(), "[10:00:06.000] 33 1");

        let dq = OutcomeEvent {
            timestamp,
            kind: OutcomeKind::Disqualified,
            competitor: 4,
            reason: Some("NotFinished: Lost in the forest".to_string()),
        };
        assert_eq!(dq.to_string(), "[10:00:06.000] 32 4 NotFinished: Lost in the forest");
    }
}
