//! Core types for race event data.
//!
//! - [`EventRecord`] is one decoded feed line handed to the state machine
//! - [`EventKind`] maps the numeric feed codes to named events
//! - [`OutcomeEvent`] is a finish or disqualification synthesized by the race, tagged
//!   with an [`OutcomeKind`]
//! - [`CompetitorRecord`] holds the mutable per-competitor state
//! - [`ShootingStats`] stores shot outcomes by lap and firing line
//!
//! ## Usage Example
//!
//! ```rust
//! use snowline::types::{EventKind, EventRecord};
//!
//! let record = EventRecord::new("09:05:59.867", 1, 1, "");
//! assert_eq!(EventKind::from_inbound_code(record.kind), Some(EventKind::Registration));
//! ```

mod competitor;
mod event;
pub mod event_codes;

pub use competitor::{CompetitorRecord, CompetitorStatus, ShootingStats};
pub use event::{CompetitorId, EventKind, EventRecord, OutcomeEvent, OutcomeKind};
pub use event_codes::SHOTS_PER_RANGE;
