//! Replay drives a race state machine from an event source

use tracing::{debug, error, info, trace, warn};

use crate::Result;
use crate::provider::EventSource;
use crate::race::RaceStateMachine;
use crate::shooting::ShotJudge;
use crate::sink::EventSink;

/// Counts collected over one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events the state machine accepted
    pub processed: usize,
    /// Lines or events that were reported and dropped
    pub rejected: usize,
    /// Lines that were not events at all
    pub skipped: usize,
}

/// Replay feeds every event from a source into a race, in feed order.
///
/// A rejected line is logged and the replay moves on to the next one. Only a
/// failure to read the source stops it early.
pub struct Replay;

impl Replay {
    /// Run the source to completion against `race`
    pub async fn run<P, S, J>(
        source: &mut P,
        race: &mut RaceStateMachine<S, J>,
    ) -> Result<ReplaySummary>
    where
        P: EventSource + ?Sized,
        S: EventSink,
        J: ShotJudge,
    {
        info!("Replay started");
        let mut summary = ReplaySummary::default();

        loop {
            let record = match source.next_event().await {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) if e.is_recoverable() => {
                    summary.rejected += 1;
                    warn!("Error processing event: {}", e);
                    continue;
                }
                Err(e) => {
                    error!("Event source failed: {}", e);
                    return Err(e);
                }
            };

            trace!(
                "Event [{}] {} {} {:?}",
                record.timestamp, record.kind, record.competitor, record.parameter
            );

            match race.process(&record) {
                Ok(()) => summary.processed += 1,
                Err(e) => {
                    summary.rejected += 1;
                    warn!("Error processing event: {}", e);
                    for hint in e.recovery_suggestions() {
                        debug!("  hint: {}", hint);
                    }
                }
            }
        }

        summary.skipped = source.skipped_lines();
        info!(
            "Replay ended: {} processed, {} rejected, {} skipped",
            summary.processed, summary.rejected, summary.skipped
        );
        Ok(summary)
    }
}
