//! Hit/miss decisions for shots fired on the range
//!
//! The feed only says that a shot was fired, not whether it hit. The race state
//! machine asks a [`ShotJudge`] for every `Shot` event. [`AlwaysHit`] is the
//! default; [`ScriptedShots`] replays outcomes supplied ahead of time.

use std::collections::{HashMap, VecDeque};

use crate::types::CompetitorId;

/// Everything known about a shot at the moment it is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotContext {
    pub competitor: CompetitorId,
    /// Lap index the shot is filed under
    pub lap: usize,
    /// Firing line index within the lap entry
    pub line: usize,
    /// Zero-based index of this shot on the line
    pub shot_index: usize,
    /// Target number from the feed
    pub target: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Hit,
    Miss,
}

impl ShotOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, ShotOutcome::Hit)
    }
}

impl From<bool> for ShotOutcome {
    fn from(hit: bool) -> Self {
        if hit { ShotOutcome::Hit } else { ShotOutcome::Miss }
    }
}

/// Decides the outcome of each shot.
pub trait ShotJudge {
    fn judge(&mut self, shot: &ShotContext) -> ShotOutcome;
}

/// Every shot hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysHit;

impl ShotJudge for AlwaysHit {
    fn judge(&mut self, _shot: &ShotContext) -> ShotOutcome {
        ShotOutcome::Hit
    }
}

impl<F> ShotJudge for F
where
    F: FnMut(&ShotContext) -> ShotOutcome,
{
    fn judge(&mut self, shot: &ShotContext) -> ShotOutcome {
        self(shot)
    }
}

/// Outcomes queued per competitor, consumed in shot order.
///
/// Once a competitor's queue is empty further shots hit.
#[derive(Debug, Clone, Default)]
pub struct ScriptedShots {
    queues: HashMap<CompetitorId, VecDeque<ShotOutcome>>,
}

impl ScriptedShots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for a competitor after any already queued.
    pub fn with_outcomes<I>(mut self, competitor: CompetitorId, outcomes: I) -> Self
    where
        I: IntoIterator<Item = ShotOutcome>,
    {
        self.queues.entry(competitor).or_default().extend(outcomes);
        self
    }

    /// Outcomes still queued for a competitor.
    pub fn remaining(&self, competitor: CompetitorId) -> usize {
        self.queues.get(&competitor).map_or(0, VecDeque::len)
    }
}

impl ShotJudge for ScriptedShots {
    fn judge(&mut self, shot: &ShotContext) -> ShotOutcome {
        self.queues
            .get_mut(&shot.competitor)
            .and_then(VecDeque::pop_front)
            .unwrap_or(ShotOutcome::Hit)
    }
}
