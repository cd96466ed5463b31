//! International Morse timing: every duration is a fixed multiple of one
//! tunable base unit.
//!
//! | element        | units |
//! |----------------|-------|
//! | dit            | 1     |
//! | dah            | 3     |
//! | intra-char gap | 1     |
//! | inter-char gap | 3     |
//! | word gap       | 7     |
//!
//! The multipliers are invariant; only the base unit is configurable.

use std::time::Duration;

use crate::encoder::Token;

pub const DIT_UNITS: u32 = 1;
pub const DAH_UNITS: u32 = 3;
pub const INTRA_GAP_UNITS: u32 = 1;
pub const INTER_CHAR_GAP_UNITS: u32 = 3;
pub const WORD_GAP_UNITS: u32 = 7;

/// Reference base unit: 250/2500 s = 100 ms per unit.
pub const DEFAULT_UNIT: Duration = Duration::from_millis(100);

/// Per-emission timing, derived entirely from one base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    unit: Duration,
}

impl Timing {
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    pub fn dit(&self) -> Duration {
        self.unit * DIT_UNITS
    }

    pub fn dah(&self) -> Duration {
        self.unit * DAH_UNITS
    }

    pub fn intra_gap(&self) -> Duration {
        self.unit * INTRA_GAP_UNITS
    }

    pub fn inter_char_gap(&self) -> Duration {
        self.unit * INTER_CHAR_GAP_UNITS
    }

    pub fn word_gap(&self) -> Duration {
        self.unit * WORD_GAP_UNITS
    }

    /// Duration the emitter spends on `token`.
    pub fn duration_of(&self, token: Token) -> Duration {
        match token {
            Token::Dit => self.dit(),
            Token::Dah => self.dah(),
            Token::IntraGap => self.intra_gap(),
            Token::InterCharGap => self.inter_char_gap(),
            Token::WordGap => self.word_gap(),
        }
    }

    /// Deterministic wall-time of a full emission: the sum of each token's
    /// fixed duration.
    pub fn total_duration(&self, tokens: &[Token]) -> Duration {
        tokens
            .iter()
            .map(|&token| self.duration_of(token))
            .sum()
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT)
    }
}
