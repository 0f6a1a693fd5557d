//! Feed provider for recorded race event logs
//!
//! Each feed line looks like:
//!
//! ```text
//! [09:49:31.659] 5 1 1
//! [09:59:03.872] 11 1 Lost in the forest
//! ```
//!
//! The bracketed timestamp is followed by the event code, the competitor id and an
//! optional parameter. Lines without a leading bracketed timestamp, or with fewer
//! than two fields after it, are skipped.
//!
//! Lines are read as raw bytes. Bytes that are not UTF-8 (free-text reasons in a
//! legacy code page, for example) are replaced with U+FFFD and the line is still
//! processed.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, trace};

use crate::provider::EventSource;
use crate::types::EventRecord;
use crate::{RaceError, Result};

/// Decode one feed line.
///
/// Returns `Ok(None)` for lines that are skipped. The timestamp text is passed
/// through unchecked; the state machine validates it.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<EventRecord>> {
    let Some(rest) = line.trim_start().strip_prefix('[') else {
        return Ok(None);
    };
    let Some((timestamp, data)) = rest.split_once(']') else {
        return Ok(None);
    };

    let fields: Vec<&str> = data.split_whitespace().collect();
    let [kind, competitor, parameter @ ..] = fields.as_slice() else {
        return Ok(None);
    };

    let kind = kind
        .parse::<u32>()
        .map_err(|_| RaceError::UnknownEventKind { value: kind.to_string() })?;
    let competitor = competitor.parse::<u32>().map_err(|_| RaceError::MalformedLine {
        line_number,
        details: format!("competitor id '{}' is not a number", competitor),
    })?;

    let parameter = parameter.join(" ");
    Ok(Some(EventRecord::new(timestamp.trim(), kind, competitor, parameter)))
}

/// Decode a raw line without its terminator.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Event source reading a feed line by line
pub struct FeedProvider<R> {
    reader: R,

    /// Raw bytes of the current line
    buffer: Vec<u8>,

    /// Feed path for error context
    path: PathBuf,

    /// Lines read so far
    line_number: usize,

    /// Lines that were not events
    skipped: usize,
}

impl FeedProvider<BufReader<File>> {
    /// Open a feed file
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|e| RaceError::file_error(path.to_path_buf(), e))?;

        info!("Opened event feed: {}", path.display());
        Ok(Self::with_path(BufReader::new(file), path.to_path_buf()))
    }
}

impl FeedProvider<Cursor<Vec<u8>>> {
    /// Feed held in memory
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_reader(Cursor::new(text.into().into_bytes()))
    }
}

impl<R: AsyncBufRead + Unpin> FeedProvider<R> {
    /// Feed from any buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self::with_path(reader, PathBuf::from("<memory>"))
    }

    fn with_path(reader: R, path: PathBuf) -> Self {
        Self { reader, buffer: Vec::new(), path, line_number: 0, skipped: 0 }
    }

    /// Lines read so far, including skipped ones
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[async_trait::async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for FeedProvider<R> {
    async fn next_event(&mut self) -> Result<Option<EventRecord>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buffer)
                .await
                .map_err(|e| RaceError::file_error(self.path.clone(), e))?;

            if read == 0 {
                debug!("Reached end of feed after {} lines", self.line_number);
                return Ok(None);
            }
            self.line_number += 1;

            let line = decode_line(&self.buffer);
            if let Cow::Owned(_) = line {
                debug!(line_number = self.line_number, "Replaced invalid UTF-8 in feed line");
            }

            match parse_line(&line, self.line_number)? {
                Some(record) => return Ok(Some(record)),
                None => {
                    self.skipped += 1;
                    trace!(line_number = self.line_number, "Skipping line: {:?}", line);
                }
            }
        }
    }

    fn skipped_lines(&self) -> usize {
        self.skipped
    }
}
