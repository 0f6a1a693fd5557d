//! Destinations for the race log
//!
//! Every line the race emits goes through an [`EventSink`] as a timestamp plus a
//! message and is rendered as `[HH:MM:SS.mmm] message`. Sinks never report
//! failure back to the race; a sink that cannot write logs a warning and moves on.

use std::io::Write;

use chrono::NaiveTime;
use tracing::warn;

use crate::clock::format_time_of_day;

/// Accepts rendered race log lines.
pub trait EventSink {
    fn log_event(&mut self, timestamp: NaiveTime, message: &str);
}

/// Render a log line as `[timestamp] message`.
pub fn render_line(timestamp: NaiveTime, message: &str) -> String {
    format!("[{}] {}", format_time_of_day(timestamp), message)
}

/// Writes log lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn log_event(&mut self, timestamp: NaiveTime, message: &str) {
        println!("{}", render_line(timestamp, message));
    }
}

/// Writes log lines to any [`Write`] implementation, such as a file.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    failed_writes: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, failed_writes: 0 }
    }

    /// Lines that could not be written.
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for WriterSink<W> {
    fn log_event(&mut self, timestamp: NaiveTime, message: &str) {
        if let Err(e) = writeln!(self.writer, "{}", render_line(timestamp, message)) {
            self.failed_writes += 1;
            warn!(error = %e, "Failed to write race log line");
        }
    }
}

/// One buffered log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: NaiveTime,
    pub message: String,
}

impl LogLine {
    pub fn render(&self) -> String {
        render_line(self.timestamp, &self.message)
    }
}

/// Keeps log lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Vec<LogLine>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// All lines rendered as they would appear on the console.
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(LogLine::render).collect()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl EventSink for MemorySink {
    fn log_event(&mut self, timestamp: NaiveTime, message: &str) {
        self.lines.push(LogLine { timestamp, message: message.to_string() });
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn log_event(&mut self, timestamp: NaiveTime, message: &str) {
        (**self).log_event(timestamp, message);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn log_event(&mut self, timestamp: NaiveTime, message: &str) {
        (**self).log_event(timestamp, message);
    }
}
