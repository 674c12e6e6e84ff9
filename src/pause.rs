//! Pause policy — how much silence precedes each chunk after the first.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::segment::Chunk;

/// Caller-selected pacing. `"typing"` is the fast mode; any other value
/// falls back to the normal writing pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Typing,
    #[default]
    #[serde(other)]
    Writing,
}

impl Pace {
    pub fn parse(s: &str) -> Self {
        if s == "typing" {
            Pace::Typing
        } else {
            Pace::Writing
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pace::Typing => "typing",
            Pace::Writing => "writing",
        }
    }
}

impl FromStr for Pace {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Pace::parse(s))
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pause lengths in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    /// Base pause for [`Pace::Typing`].
    pub fast_base_secs: f64,
    /// Base pause for every other pace.
    pub normal_base_secs: f64,
    /// Added when the upcoming chunk is a pair of long words.
    pub long_pair_bonus_secs: f64,
    /// A word is long when it has more than this many characters.
    pub long_word_chars: usize,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            fast_base_secs: 1.8,
            normal_base_secs: 3.0,
            long_pair_bonus_secs: 1.0,
            long_word_chars: 5,
        }
    }
}

impl PauseConfig {
    /// Silence to insert before `chunk`.
    pub fn pause_for(&self, chunk: &Chunk, pace: Pace) -> f64 {
        let base = match pace {
            Pace::Typing => self.fast_base_secs,
            Pace::Writing => self.normal_base_secs,
        };
        if chunk.is_long_pair(self.long_word_chars) {
            base + self.long_pair_bonus_secs
        } else {
            base
        }
    }
}

/// [`PauseConfig::pause_for`] with the default pause lengths.
pub fn pause_for(chunk: &Chunk, pace: Pace) -> f64 {
    PauseConfig::default().pause_for(chunk, pace)
}
