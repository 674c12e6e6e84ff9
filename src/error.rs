//! Error type shared by every stage of the stitching pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::pcm::PcmFormat;

/// Boxed error returned by an external [`Synthesizer`](crate::Synthesizer).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StitchError {
    /// Tokenisation produced no words, so there is nothing to synthesize.
    #[error("no text to synthesize")]
    NoContent,

    /// The synthesizer rejected a segment. `index` is the chunk position;
    /// the trailing period segment uses the chunk count as its index.
    #[error("segment {index} ({text:?}) synthesis failed: {source}")]
    SynthesisFailed {
        index: usize,
        text: String,
        #[source]
        source: BoxError,
    },

    /// A segment came back in a different format than the first one.
    #[error("segment {index} has format {found:?}, expected {expected:?}")]
    FormatMismatch {
        index: usize,
        expected: PcmFormat,
        found: PcmFormat,
    },

    #[error("unsupported WAV sample format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// A config value parsed but is out of range.
    #[error("invalid config value: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StitchError>;
