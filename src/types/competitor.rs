//! Per-competitor race state

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::CompetitorId;

/// Shot outcomes indexed by lap, then firing line.
///
/// A lap entry only exists once the competitor has entered a firing range on that lap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootingStats {
    laps: Vec<Vec<Vec<bool>>>,
}

impl ShootingStats {
    /// Number of laps with a shooting entry.
    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn has_lap(&self, lap: usize) -> bool {
        lap < self.laps.len()
    }

    /// Open a shooting entry for `lap` with `firing_lines` empty lines.
    ///
    /// Appends a single entry when `lap` is not yet covered; an existing entry is left untouched.
    pub fn open_lap(&mut self, lap: usize, firing_lines: usize) {
        if self.laps.len() <= lap {
            self.laps.push(vec![Vec::new(); firing_lines]);
        }
    }

    /// Shots recorded on a line during a lap.
    pub fn shots(&self, lap: usize, line: usize) -> Option<&[bool]> {
        self.laps.get(lap)?.get(line).map(Vec::as_slice)
    }

    /// Mutable shots for a line during a lap.
    pub fn line_mut(&mut self, lap: usize, line: usize) -> Option<&mut Vec<bool>> {
        self.laps.get_mut(lap)?.get_mut(line)
    }

    /// Hits recorded on a line during a lap.
    pub fn hits(&self, lap: usize, line: usize) -> Option<usize> {
        self.shots(lap, line).map(|shots| shots.iter().filter(|&&hit| hit).count())
    }

    pub fn total_shots(&self) -> usize {
        self.laps.iter().flatten().map(Vec::len).sum()
    }

    pub fn total_hits(&self) -> usize {
        self.laps.iter().flatten().flatten().filter(|&&hit| hit).count()
    }
}

/// Race outcome as seen from the competitor flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitorStatus {
    NotRegistered,
    Registered,
    Started,
    Finished,
    Disqualified,
}

/// Mutable state for one competitor, created on first reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitorRecord {
    pub id: CompetitorId,
    pub registered: bool,
    pub finished: bool,
    pub disqualified: bool,
    /// Start time assigned by the draw
    pub scheduled_start: Option<NaiveTime>,
    /// Time the competitor actually crossed the start
    pub actual_start: Option<NaiveTime>,
    pub laps_completed: usize,
    /// Penalty loops still owed
    pub penalty_laps: u32,
    pub shooting: ShootingStats,
    /// Finish time minus actual start, set on finish
    pub total_time: Option<TimeDelta>,
    pub first_event: Option<NaiveTime>,
    pub last_event: Option<NaiveTime>,
    pub events_count: usize,
}

impl CompetitorRecord {
    pub fn new(id: CompetitorId) -> Self {
        Self {
            id,
            registered: false,
            finished: false,
            disqualified: false,
            scheduled_start: None,
            actual_start: None,
            laps_completed: 0,
            penalty_laps: 0,
            shooting: ShootingStats::default(),
            total_time: None,
            first_event: None,
            last_event: None,
            events_count: 0,
        }
    }

    /// Outcome status; disqualification wins over finish.
    pub fn status(&self) -> CompetitorStatus {
        if self.disqualified {
            CompetitorStatus::Disqualified
        } else if self.finished {
            CompetitorStatus::Finished
        } else if self.actual_start.is_some() {
            CompetitorStatus::Started
        } else if self.registered {
            CompetitorStatus::Registered
        } else {
            CompetitorStatus::NotRegistered
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.finished || self.disqualified
    }

    /// Record that an event for this competitor was handled.
    pub(crate) fn touch(&mut self, at: NaiveTime) {
        self.first_event.get_or_insert(at);
        self.last_event = Some(at);
        self.events_count += 1;
    }
}
