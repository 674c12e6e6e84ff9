//! Request pipeline — segment, synthesize each chunk in order, assemble.
//!
//! 1. The first chunk's audio is the lead-in and fixes the output format.
//! 2. Every later chunk gets a pause sized by the [`PauseConfig`](crate::PauseConfig)
//!    for that chunk, then is appended with a fade-in.
//! 3. Text that does not end in `.`, `!` or `?` gets a spoken "." appended
//!    with its tail faded out.
//!
//! Any synthesis failure aborts the request; partial output is dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    assemble::Assembler,
    config::StitchConfig,
    error::{Result, StitchError},
    pause::Pace,
    pcm::{PcmBuffer, PcmFormat},
    segment::{chunk, ends_with_terminal, tokenize},
};

/// Text of the closing segment spoken after unterminated input.
const PERIOD: &str = ".";

// ─────────────────────────────────────────────────────────────────────────────
// Synthesizer seam
// ─────────────────────────────────────────────────────────────────────────────

/// External text-to-speech engine: one call per chunk.
///
/// `rate` is forwarded untouched from the request. Every call within one
/// request must return the same [`PcmFormat`].
pub trait Synthesizer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn synthesize(&self, text: &str, rate: f64) -> std::result::Result<PcmBuffer, Self::Error>;
}

impl<F, E> Synthesizer for F
where
    F: Fn(&str, f64) -> std::result::Result<PcmBuffer, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn synthesize(&self, text: &str, rate: f64) -> std::result::Result<PcmBuffer, E> {
        self(text, rate)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

fn default_rate() -> f64 {
    1.0
}

/// One stitching request. `speed` is accepted as an alias of `rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchRequest {
    pub text: String,
    #[serde(default)]
    pub pace: Pace,
    #[serde(default = "default_rate", alias = "speed")]
    pub rate: f64,
}

impl StitchRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), pace: Pace::default(), rate: default_rate() }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stitcher
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Stitcher {
    pub config: StitchConfig,
}

impl Stitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stitcher after checking `config` with [`StitchConfig::validate`].
    pub fn with_config(config: StitchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Render `request` into one continuous PCM buffer.
    pub fn render<S>(&self, request: &StitchRequest, synth: &S) -> Result<PcmBuffer>
    where
        S: Synthesizer + ?Sized,
    {
        let words = tokenize(&request.text);
        let chunks = chunk(&words);
        let (first, rest) = chunks.split_first().ok_or(StitchError::NoContent)?;
        debug!(
            words = words.len(),
            chunks = chunks.len(),
            pace = %request.pace,
            rate = request.rate,
            "segmented text"
        );

        let lead = synthesize_segment(synth, first.index, &first.text(), request.rate)?;
        let mut asm = Assembler::start(lead, self.config.fades.clone());

        for chunk in rest {
            let text = chunk.text();
            let audio = synthesize_segment(synth, chunk.index, &text, request.rate)?;
            check_format(asm.format(), chunk.index, &audio)?;

            let pause = self.config.pause.pause_for(chunk, request.pace);
            debug!(index = chunk.index, text = %text, pause, frames = audio.frames(), "appending chunk");
            asm.append_pause(pause);
            asm.append_chunk_with_fade_in(&audio.samples);
        }

        if self.config.terminal_period && !ends_with_terminal(&words) {
            let index = chunks.len();
            let audio = synthesize_segment(synth, index, PERIOD, request.rate)?;
            check_format(asm.format(), index, &audio)?;
            debug!(index, frames = audio.frames(), "appending closing period");
            asm.append_chunk_with_fade_out(&audio.samples);
        }

        let out = asm.finish();
        info!(
            chunks = chunks.len(),
            secs = out.duration_secs(),
            sample_rate = out.format.sample_rate,
            "stitched recording"
        );
        Ok(out)
    }

    /// [`render`](Self::render) and wrap the result in a WAV file.
    pub fn render_wav<S>(&self, request: &StitchRequest, synth: &S) -> Result<Vec<u8>>
    where
        S: Synthesizer + ?Sized,
    {
        self.render(request, synth)?.to_wav_bytes()
    }
}

/// Render with the default configuration.
pub fn stitch<S>(text: &str, pace: Pace, rate: f64, synth: &S) -> Result<PcmBuffer>
where
    S: Synthesizer + ?Sized,
{
    let request = StitchRequest { text: text.to_string(), pace, rate };
    Stitcher::new().render(&request, synth)
}

fn synthesize_segment<S>(synth: &S, index: usize, text: &str, rate: f64) -> Result<PcmBuffer>
where
    S: Synthesizer + ?Sized,
{
    synth.synthesize(text, rate).map_err(|e| {
        warn!(index, text, error = %e, "segment synthesis failed");
        StitchError::SynthesisFailed {
            index,
            text: text.to_string(),
            source: Box::new(e),
        }
    })
}

fn check_format(expected: PcmFormat, index: usize, audio: &PcmBuffer) -> Result<()> {
    if audio.format == expected {
        Ok(())
    } else {
        Err(StitchError::FormatMismatch { index, expected, found: audio.format })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
