//! Event source implementations

pub mod feed;

pub use feed::{FeedProvider, parse_line};
