//! # speech_stitch
//!
//! Turns arbitrary text into one continuous, naturally paced recording built
//! from many short text-to-speech calls.
//!
//! The synthesizer itself is supplied by the caller through the
//! [`Synthesizer`] trait (any `Fn(&str, f64) -> Result<PcmBuffer, E>` works).
//!
//! ## Quick start
//!
//! ```no_run
//! use speech_stitch::{stitch, Pace, PcmBuffer, PcmFormat};
//!
//! // Stand-in engine: 0.2 s of silence per call at 22.05 kHz mono.
//! let engine = |_text: &str, _rate: f64| -> Result<PcmBuffer, std::io::Error> {
//!     Ok(PcmBuffer::new(PcmFormat::mono(22_050), vec![0; 4_410]))
//! };
//!
//! let audio = stitch("Well-known facts are not always true", Pace::Writing, 1.0, &engine).unwrap();
//! audio.write_wav(std::path::Path::new("output.wav")).unwrap();
//! ```
//!
//! ## Pipeline
//! 1. **Tokenise** — words and punctuation; `well-known` → `well dash known`.
//! 2. **Chunk** — two-word groups; short function words never open a group.
//! 3. **Synthesize** — one engine call per chunk, in order.
//! 4. **Assemble** — lead-in verbatim, then pause + faded-in chunk per group.
//! 5. **Close** — unterminated text gets a spoken "." with a faded tail.

pub mod assemble;
pub mod config;
pub mod error;
pub mod pause;
pub mod pcm;
pub mod pipeline;
pub mod segment;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use assemble::{Assembler, FadeConfig};
pub use config::StitchConfig;
pub use error::{Result, StitchError};
pub use pause::{pause_for, Pace, PauseConfig};
pub use pcm::{PcmBuffer, PcmFormat};
pub use pipeline::{stitch, StitchRequest, Stitcher, Synthesizer};
pub use segment::{chunk, segment, tokenize, Chunk};
