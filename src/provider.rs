//! Source trait for race event feeds

use crate::Result;
use crate::types::EventRecord;

/// Trait for race event sources
///
/// A source yields decoded feed records in feed order. Errors come in two kinds,
/// told apart with [`RaceError::is_recoverable`](crate::RaceError::is_recoverable):
/// a malformed line is recoverable and the next call continues after it, while a
/// failure to read the feed ends the replay.
#[async_trait::async_trait]
pub trait EventSource: Send {
    /// Get the next event record
    ///
    /// Returns:
    /// - `Ok(Some(record))` - Next event in the feed
    /// - `Ok(None)` - Feed ended
    /// - `Err(e)` - Line could not be decoded, or the feed could not be read
    async fn next_event(&mut self) -> Result<Option<EventRecord>>;

    /// Lines dropped because they did not look like events
    fn skipped_lines(&self) -> usize {
        0
    }
}
