//! Event-driven biathlon race processing.
//!
//! Snowline replays a recorded race feed against a race configuration and writes
//! the race log: registrations, start draws, firing range visits, penalty loops,
//! finishes and disqualifications.
//!
//! # Features
//!
//! - **State machine**: [`RaceStateMachine`] applies race rules one event at a time
//! - **Pluggable output**: any [`EventSink`] receives the log lines
//! - **Pluggable shooting**: a [`ShotJudge`] decides whether each shot hits
//! - **Feed replay**: [`FeedProvider`] and [`Replay`] read a feed file end to end
//!
//! ## Example (feed replay)
//!
//! ```rust,no_run
//! use snowline::{ConsoleSink, FeedProvider, RaceConfig, RaceStateMachine, Replay};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> snowline::Result<()> {
//!     let config = RaceConfig::load("config.json")?;
//!     let mut feed = FeedProvider::open("events").await?;
//!     let mut race = RaceStateMachine::new(config, ConsoleSink);
//!
//!     let summary = Replay::run(&mut feed, &mut race).await?;
//!     println!("{} events processed", summary.processed);
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod clock;
pub mod config;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Race rules
pub mod race;
pub mod shooting;
pub mod sink;

// Feed replay
pub mod provider;
pub mod providers;
pub mod replay;

// Core exports
pub use error::*;
pub use types::*;

pub use config::{LapIndexing, RaceConfig};
pub use race::RaceStateMachine;
pub use shooting::{AlwaysHit, ScriptedShots, ShotContext, ShotJudge, ShotOutcome};
pub use sink::{ConsoleSink, EventSink, LogLine, MemorySink, WriterSink};

// Replay exports
pub use provider::EventSource;
pub use providers::{FeedProvider, parse_line};
pub use replay::{Replay, ReplaySummary};
