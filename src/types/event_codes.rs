//! Wire codes for race feed events
//!
//! Inbound codes are the numbers that appear in the feed after the timestamp.
//! Outcome codes are only ever produced by the race state machine.

// Inbound events read from the feed
pub mod inbound {
    pub const REGISTRATION: u32 = 1;
    pub const START_TIME_SET: u32 = 2;
    pub const ON_START_LINE: u32 = 3;
    pub const STARTED: u32 = 4;
    pub const ON_FIRING_RANGE: u32 = 5;
    pub const SHOT: u32 = 6;
    pub const LEFT_FIRING_RANGE: u32 = 7;
    pub const ENTERED_PENALTY: u32 = 8;
    pub const LEFT_PENALTY: u32 = 9;
    pub const LAP_COMPLETED: u32 = 10;
    pub const CANNOT_CONTINUE: u32 = 11;
}

// Outcome events synthesized by the state machine
pub mod outgoing {
    pub const DISQUALIFIED: u32 = 32;
    pub const FINISHED: u32 = 33;
}

/// Shots fired per firing range visit.
pub const SHOTS_PER_RANGE: usize = 5;
