//! Race state machine
//!
//! [`RaceStateMachine`] consumes feed events one at a time, applies the race rules to
//! the referenced competitor and writes the race log through an [`EventSink`].
//!
//! ## Rules
//!
//! - A competitor registers once; a second registration is rejected.
//! - A start later than the drawn start time plus the configured window disqualifies.
//! - Each firing range visit is five shots; every missing hit owes a penalty loop.
//! - A competitor finishes on the lap that reaches the configured lap count with no
//!   penalty loops outstanding.
//!
//! Competitors that have finished or been disqualified still accept events.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::{NaiveTime, TimeDelta};
//! use snowline::{MemorySink, RaceConfig, RaceStateMachine};
//!
//! let start = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
//! let config = RaceConfig::new(1, 3500, 150, 1, start, TimeDelta::seconds(30));
//! let mut race = RaceStateMachine::new(config, MemorySink::new());
//!
//! race.process_event("09:05:59.867", 1, 1, "").unwrap();
//! assert!(race.competitor(1).unwrap().registered);
//! assert_eq!(race.sink().rendered(), vec!["[09:05:59.867] The competitor(1) registered"]);
//! ```

mod range;

use std::collections::BTreeMap;

use chrono::NaiveTime;
use tracing::{debug, info, trace};

use crate::clock::{format_duration, format_time_of_day, parse_time_of_day, start_deadline};
use crate::config::{LapIndexing, RaceConfig};
use crate::shooting::{AlwaysHit, ShotJudge};
use crate::sink::EventSink;
use crate::types::{
    CompetitorId, CompetitorRecord, EventKind, EventRecord, OutcomeEvent, OutcomeKind,
};
use crate::{RaceError, Result};

/// Applies race rules to competitors and reports through the sink.
///
/// Kept apart from the competitor map so a handler can hold one competitor
/// mutably while updating race-wide state.
struct Referee<S, J> {
    config: RaceConfig,
    /// Furthest lap completed by any competitor
    current_lap: usize,
    outcomes: Vec<OutcomeEvent>,
    sink: S,
    judge: J,
}

/// Event-driven race state for every competitor in a feed.
pub struct RaceStateMachine<S, J = AlwaysHit> {
    competitors: BTreeMap<CompetitorId, CompetitorRecord>,
    referee: Referee<S, J>,
}

impl<S: EventSink> RaceStateMachine<S, AlwaysHit> {
    /// Create a race where every shot hits.
    pub fn new(config: RaceConfig, sink: S) -> Self {
        Self::with_judge(config, sink, AlwaysHit)
    }
}

impl<S: EventSink, J: ShotJudge> RaceStateMachine<S, J> {
    /// Create a race with a custom hit/miss decision.
    pub fn with_judge(config: RaceConfig, sink: S, judge: J) -> Self {
        Self {
            competitors: BTreeMap::new(),
            referee: Referee { config, current_lap: 0, outcomes: Vec::new(), sink, judge },
        }
    }

    /// Process one decoded feed record.
    pub fn process(&mut self, record: &EventRecord) -> Result<()> {
        self.process_event(&record.timestamp, record.kind, record.competitor, &record.parameter)
    }

    /// Process one event.
    ///
    /// The timestamp must be `HH:MM:SS.mmm` and `kind` an inbound event code.
    /// Every handler validates before it mutates, so a rejected event leaves the
    /// competitor as it was. A bad timestamp or unknown kind is rejected before the
    /// competitor is looked up, so ids seen only in such events never appear in
    /// [`competitors`](Self::competitors).
    pub fn process_event(
        &mut self,
        timestamp: &str,
        kind: u32,
        competitor: CompetitorId,
        parameter: &str,
    ) -> Result<()> {
        let at = parse_time_of_day(timestamp)?;
        let kind = EventKind::from_inbound_code(kind)
            .ok_or_else(|| RaceError::UnknownEventKind { value: kind.to_string() })?;

        let record = self.competitors.entry(competitor).or_insert_with(|| {
            debug!(competitor, "New competitor");
            CompetitorRecord::new(competitor)
        });
        trace!(competitor, kind = %kind, parameter, "Processing event at {}", timestamp);

        let referee = &mut self.referee;
        match kind {
            EventKind::Registration => referee.register(record, at)?,
            EventKind::StartTimeSet => referee.set_start_time(record, at, parameter)?,
            EventKind::OnStartLine => {}
            EventKind::Started => referee.start(record, at),
            EventKind::OnFiringRange => referee.enter_range(record, at, parameter)?,
            EventKind::Shot => referee.shot(record, at, parameter)?,
            EventKind::LeftFiringRange => referee.leave_range(record, at)?,
            EventKind::EnteredPenalty => referee.enter_penalty(record, at)?,
            EventKind::LeftPenalty => referee.leave_penalty(record, at)?,
            EventKind::LapCompleted => referee.complete_lap(record, at),
            EventKind::CannotContinue => {
                referee.disqualify(record, at, format!("NotFinished: {}", parameter))
            }
        }

        record.touch(at);
        Ok(())
    }

    pub fn config(&self) -> &RaceConfig {
        &self.referee.config
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&CompetitorRecord> {
        self.competitors.get(&id)
    }

    /// All competitors seen so far, ordered by id.
    pub fn competitors(&self) -> impl Iterator<Item = &CompetitorRecord> {
        self.competitors.values()
    }

    /// Furthest lap completed by any competitor.
    pub fn current_lap(&self) -> usize {
        self.referee.current_lap
    }

    /// Finish and disqualification events in the order they were emitted.
    pub fn outcomes(&self) -> &[OutcomeEvent] {
        &self.referee.outcomes
    }

    pub fn sink(&self) -> &S {
        &self.referee.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.referee.sink
    }

    pub fn judge(&self) -> &J {
        &self.referee.judge
    }

    pub fn into_sink(self) -> S {
        self.referee.sink
    }
}

impl<S: EventSink, J: ShotJudge> Referee<S, J> {
    fn log(&mut self, at: NaiveTime, message: &str) {
        self.sink.log_event(at, message);
    }

    /// Lap index shots are filed under for this competitor.
    fn shooting_lap(&self, record: &CompetitorRecord) -> usize {
        match self.config.lap_indexing {
            LapIndexing::RaceWide => self.current_lap,
            LapIndexing::PerCompetitor => record.laps_completed,
        }
    }

    fn register(&mut self, record: &mut CompetitorRecord, at: NaiveTime) -> Result<()> {
        if record.registered {
            return Err(RaceError::AlreadyRegistered { competitor: record.id });
        }
        record.registered = true;
        self.log(at, &format!("The competitor({}) registered", record.id));
        Ok(())
    }

    fn set_start_time(
        &mut self,
        record: &mut CompetitorRecord,
        at: NaiveTime,
        parameter: &str,
    ) -> Result<()> {
        let scheduled = parse_time_of_day(parameter.trim())?;
        record.scheduled_start = Some(scheduled);
        self.log(
            at,
            &format!(
                "The start time for the competitor({}) was set by a draw to {}",
                record.id,
                format_time_of_day(scheduled)
            ),
        );
        Ok(())
    }

    fn start(&mut self, record: &mut CompetitorRecord, at: NaiveTime) {
        record.actual_start = Some(at);
        self.log(at, &format!("The competitor({}) has started", record.id));

        // Without a draw the competitor is held to the official start
        let scheduled = record.scheduled_start.unwrap_or(self.config.official_start);
        let Some(deadline) = start_deadline(scheduled, self.config.max_start_delta) else {
            return;
        };

        if at > deadline {
            debug!(
                competitor = record.id,
                scheduled = %format_time_of_day(scheduled),
                "Late start"
            );
            let reason = format!("late start (allowed until {})", format_time_of_day(deadline));
            self.disqualify(record, at, reason);
        }
    }

    fn complete_lap(&mut self, record: &mut CompetitorRecord, at: NaiveTime) {
        record.laps_completed += 1;
        self.current_lap = self.current_lap.max(record.laps_completed);
        self.log(at, &format!("The competitor({}) ended the main lap", record.id));

        if record.laps_completed >= self.config.laps
            && record.penalty_laps == 0
            && !record.finished
        {
            self.finish(record, at);
        }
    }

    fn finish(&mut self, record: &mut CompetitorRecord, at: NaiveTime) {
        record.finished = true;
        record.total_time = record.actual_start.map(|start| at.signed_duration_since(start));

        if let Some(total) = record.total_time {
            info!(competitor = record.id, total = %format_duration(total), "Competitor finished");
        }
        self.emit(at, OutcomeKind::Finished, record.id, None);
    }

    fn disqualify(&mut self, record: &mut CompetitorRecord, at: NaiveTime, reason: String) {
        record.disqualified = true;
        info!(competitor = record.id, reason = %reason, "Competitor disqualified");
        self.emit(at, OutcomeKind::Disqualified, record.id, Some(reason));
    }

    /// Log a synthesized outcome and keep it for later inspection.
    fn emit(
        &mut self,
        at: NaiveTime,
        kind: OutcomeKind,
        competitor: CompetitorId,
        reason: Option<String>,
    ) {
        let outcome = OutcomeEvent { timestamp: at, kind, competitor, reason };
        self.log(at, &outcome.to_string());
        self.outcomes.push(outcome);
    }
}
