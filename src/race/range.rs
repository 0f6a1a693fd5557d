//! Firing range and penalty loop handlers

use chrono::NaiveTime;
use tracing::debug;

use super::Referee;
use crate::shooting::{ShotContext, ShotJudge};
use crate::sink::EventSink;
use crate::types::{CompetitorRecord, SHOTS_PER_RANGE};
use crate::{RaceError, Result};

/// Firing line every shot of a lap is filed under.
const RANGE_LINE: usize = 0;

impl<S: EventSink, J: ShotJudge> Referee<S, J> {
    pub(super) fn enter_range(
        &mut self,
        record: &mut CompetitorRecord,
        at: NaiveTime,
        parameter: &str,
    ) -> Result<()> {
        let firing_lines = self.config.firing_lines;
        let line = parameter
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|line| (1..=firing_lines).contains(line))
            .ok_or_else(|| RaceError::InvalidRangeNumber {
                competitor: record.id,
                details: format!("'{}' is not between 1 and {}", parameter, firing_lines),
            })?;

        let lap = self.shooting_lap(record);
        record.shooting.open_lap(lap, firing_lines);
        self.log(at, &format!("The competitor({}) is on the firing range({})", record.id, line));
        Ok(())
    }

    pub(super) fn shot(
        &mut self,
        record: &mut CompetitorRecord,
        at: NaiveTime,
        parameter: &str,
    ) -> Result<()> {
        let target = parameter
            .trim()
            .parse::<u32>()
            .map_err(|_| RaceError::InvalidParameter {
                field: "target",
                value: parameter.to_string(),
            })?;

        let lap = self.shooting_lap(record);
        let shots = record
            .shooting
            .line_mut(lap, RANGE_LINE)
            .ok_or(RaceError::InvalidLapIndex { competitor: record.id, lap })?;

        let context = ShotContext {
            competitor: record.id,
            lap,
            line: RANGE_LINE,
            shot_index: shots.len(),
            target,
        };
        let outcome = self.judge.judge(&context);
        shots.push(outcome.is_hit());

        if outcome.is_hit() {
            self.log(
                at,
                &format!("The target({}) has been hit by competitor({})", target, record.id),
            );
        } else {
            record.penalty_laps += 1;
            debug!(competitor = record.id, target, lap, "Missed shot");
        }
        Ok(())
    }

    pub(super) fn leave_range(
        &mut self,
        record: &mut CompetitorRecord,
        at: NaiveTime,
    ) -> Result<()> {
        let lap = self.shooting_lap(record);
        let hits = record.shooting.hits(lap, RANGE_LINE).ok_or_else(|| {
            RaceError::InvalidRangeNumber {
                competitor: record.id,
                details: format!("no firing range entered on lap {}", lap),
            }
        })?;

        let misses = SHOTS_PER_RANGE.saturating_sub(hits);
        if misses > 0 {
            record.penalty_laps += misses as u32;
            debug!(competitor = record.id, hits, misses, "Penalty loops owed");
            self.log(at, &format!("The competitor({}) left the firing range", record.id));
        }
        Ok(())
    }

    pub(super) fn enter_penalty(
        &mut self,
        record: &mut CompetitorRecord,
        at: NaiveTime,
    ) -> Result<()> {
        if record.penalty_laps == 0 {
            return Err(RaceError::NoPenaltyOwed { competitor: record.id });
        }
        self.log(at, &format!("The competitor({}) entered the penalty laps", record.id));
        Ok(())
    }

    pub(super) fn leave_penalty(
        &mut self,
        record: &mut CompetitorRecord,
        at: NaiveTime,
    ) -> Result<()> {
        if record.penalty_laps == 0 {
            return Err(RaceError::NoPenaltyOwed { competitor: record.id });
        }
        record.penalty_laps -= 1;
        self.log(at, &format!("The competitor({}) left the penalty laps", record.id));
        Ok(())
    }
}
