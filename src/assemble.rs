//! Waveform assembler — stitches per-chunk PCM into one recording.
//!
//! The first chunk is written verbatim as the lead-in. Every later chunk is
//! preceded by a silence gap and gets a short linear fade-in so the jump out
//! of silence does not click. An optional trailing segment (the spoken
//! period) gets a fade-out instead.
//!
//! Fade and silence lengths are counted in frames; for mono audio a frame is
//! one sample. Gains are `start + i * step` in `f64`, and the scaled sample
//! is truncated toward zero when converted back to `i16`.
//!
//! | Stage                       | Window  |
//! |-----------------------------|---------|
//! | silence head/tail ramps     | 5 ms    |
//! | chunk fade-in               | 8 ms    |
//! | trailing segment fade-out   | 5 ms    |

use serde::{Deserialize, Serialize};

use crate::pcm::{PcmBuffer, PcmFormat};

/// Fade window lengths in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Ramp at each end of an inserted silence gap.
    pub silence_fade_secs: f64,
    /// Fade-in at the head of every chunk after the first.
    pub lead_in_fade_secs: f64,
    /// Fade-out at the tail of the trailing segment.
    pub tail_fade_secs: f64,
    /// Also fade out the tail of every word-group chunk, lead-in included.
    pub fade_chunk_tails: bool,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            silence_fade_secs: 0.005,
            lead_in_fade_secs: 0.008,
            tail_fade_secs: 0.005,
            fade_chunk_tails: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

fn channel_count(format: PcmFormat) -> usize {
    format.channels.max(1) as usize
}

#[inline]
fn scale(sample: i16, gain: f64) -> i16 {
    (sample as f64 * gain) as i16
}

/// Ramp the first `frames` frames by `i / frames` (0 included, 1 excluded).
///
/// `frames` must not exceed the frame count of `samples`.
pub fn fade_in(samples: &mut [i16], channels: usize, frames: usize) {
    let step = 1.0 / frames as f64;
    for (i, frame) in samples.chunks_mut(channels).take(frames).enumerate() {
        let gain = i as f64 * step;
        for s in frame {
            *s = scale(*s, gain);
        }
    }
}

/// Ramp the last `frames` frames by `1 - i / frames` (1 included, 0 excluded).
///
/// `frames` must not exceed the frame count of `samples`.
pub fn fade_out(samples: &mut [i16], channels: usize, frames: usize) {
    let total = samples.len() / channels;
    let start = total.saturating_sub(frames);
    let step = -1.0 / frames as f64;
    for (i, frame) in samples[start * channels..].chunks_mut(channels).enumerate() {
        let gain = 1.0 + i as f64 * step;
        for s in frame {
            *s = scale(*s, gain);
        }
    }
}

/// Silence of `secs` seconds with ramped head and tail.
///
/// Returns an empty vector when `secs` rounds to zero frames. The ramp is
/// shortened to half the gap when the gap is shorter than two ramps.
pub fn silence(format: PcmFormat, secs: f64, fade_secs: f64) -> Vec<i16> {
    let total = format.frames_for(secs);
    if total == 0 {
        return Vec::new();
    }
    let channels = channel_count(format);
    let fade = format.frames_for(fade_secs).min(total / 2);

    let mut gap = vec![0i16; total * channels];
    if fade > 0 {
        fade_in(&mut gap, channels, fade);
        fade_out(&mut gap, channels, fade);
    }
    gap
}

// ─────────────────────────────────────────────────────────────────────────────
// Assembler
// ─────────────────────────────────────────────────────────────────────────────

/// Per-request accumulator owning the growing output buffer.
#[derive(Debug)]
pub struct Assembler {
    format: PcmFormat,
    samples: Vec<i16>,
    config: FadeConfig,
}

impl Assembler {
    /// Begin a recording with `first` as the lead-in; its format is captured
    /// for the rest of the request.
    pub fn start(first: PcmBuffer, config: FadeConfig) -> Self {
        let PcmBuffer { format, mut samples } = first;
        if config.fade_chunk_tails {
            fade_tail(format, config.tail_fade_secs, &mut samples);
        }
        Self { format, samples, config }
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / channel_count(self.format)
    }

    /// Append a faded silence gap. A gap that rounds to zero frames is a no-op.
    pub fn append_pause(&mut self, secs: f64) {
        let gap = silence(self.format, secs, self.config.silence_fade_secs);
        self.samples.extend_from_slice(&gap);
    }

    /// Append a chunk with its head faded in. Chunks no longer than the fade
    /// window are appended unchanged.
    pub fn append_chunk_with_fade_in(&mut self, samples: &[i16]) {
        let mut chunk = samples.to_vec();
        let channels = channel_count(self.format);
        let fade = self.format.frames_for(self.config.lead_in_fade_secs);
        if fade > 0 && chunk.len() / channels > fade {
            fade_in(&mut chunk, channels, fade);
        }
        if self.config.fade_chunk_tails {
            fade_tail(self.format, self.config.tail_fade_secs, &mut chunk);
        }
        self.samples.extend(chunk);
    }

    /// Append a segment with its tail faded out. Segments no longer than the
    /// fade window are appended unchanged.
    pub fn append_chunk_with_fade_out(&mut self, samples: &[i16]) {
        let mut chunk = samples.to_vec();
        fade_tail(self.format, self.config.tail_fade_secs, &mut chunk);
        self.samples.extend(chunk);
    }

    pub fn finish(self) -> PcmBuffer {
        PcmBuffer::new(self.format, self.samples)
    }
}

fn fade_tail(format: PcmFormat, secs: f64, samples: &mut [i16]) {
    let channels = channel_count(format);
    let fade = format.frames_for(secs);
    if fade > 0 && samples.len() / channels > fade {
        fade_out(samples, channels, fade);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // 8 kHz keeps the windows round: 40 frames for 5 ms, 64 frames for 8 ms.
    const RATE: u32 = 8_000;

    fn mono(samples: Vec<i16>) -> PcmBuffer {
        PcmBuffer::new(PcmFormat::mono(RATE), samples)
    }

    fn assembler() -> Assembler {
        Assembler::start(mono(vec![]), FadeConfig::default())
    }

    #[test]
    fn test_start_is_verbatim() {
        let first = mono(vec![1000; 500]);
        let out = Assembler::start(first.clone(), FadeConfig::default()).finish();
        assert_eq!(out, first);
    }

    #[test]
    fn test_silence_shape() {
        let gap = silence(PcmFormat::mono(RATE), 0.5, 0.005);
        assert_eq!(gap.len(), 4_000);
        assert!(gap.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_silence_rounds_to_nearest_frame() {
        // 0.10006 s * 8000 = 800.48
        assert_eq!(silence(PcmFormat::mono(RATE), 0.10006, 0.005).len(), 800);
        // 0.10007 s * 8000 = 800.56
        assert_eq!(silence(PcmFormat::mono(RATE), 0.10007, 0.005).len(), 801);
    }

    #[test]
    fn test_silence_stereo_counts_frames() {
        let gap = silence(PcmFormat::new(RATE, 2), 0.01, 0.005);
        assert_eq!(gap.len(), 160);
    }

    #[test]
    fn test_zero_pause_is_noop() {
        let mut asm = assembler();
        asm.append_pause(0.0);
        asm.append_pause(0.00001);
        asm.append_pause(-2.0);
        assert_eq!(asm.frames(), 0);
    }

    #[test]
    fn test_tiny_pause_keeps_length() {
        // three frames: ramp shrinks to one frame
        let mut asm = assembler();
        asm.append_pause(3.0 / RATE as f64);
        assert_eq!(asm.finish().samples, vec![0, 0, 0]);
    }

    #[test]
    fn test_fade_in_ramp() {
        let mut asm = assembler();
        asm.append_chunk_with_fade_in(&[1000; 100]);
        let out = asm.finish().samples;
        assert_eq!(out.len(), 100);
        assert_eq!(out[0], 0);
        assert_eq!(out[32], 500);
        assert_eq!(out[63], 984);
        assert!(out[64..].iter().all(|&s| s == 1000));
        assert!(out[..64].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_fade_in_negative_truncates_toward_zero() {
        let mut asm = assembler();
        asm.append_chunk_with_fade_in(&[-1000; 100]);
        let out = asm.finish().samples;
        assert_eq!(out[63], -984);
    }

    #[test]
    fn test_fade_out_ramp() {
        let mut asm = assembler();
        asm.append_chunk_with_fade_out(&[1000; 100]);
        let out = asm.finish().samples;
        assert_eq!(out.len(), 100);
        assert!(out[..61].iter().all(|&s| s == 1000));
        assert_eq!(out[80], 500);
        assert!(out[60..].windows(2).all(|w| w[0] >= w[1]));
        assert!(out[99] > 0 && out[99] < 50);
    }

    #[test]
    fn test_ramp_products_land_on_exact_integers() {
        // 21/40 and 13/40 of 3000 are whole numbers; an f32 gain truncates them one low
        let mut head = vec![3000i16; 100];
        fade_in(&mut head, 1, 40);
        assert_eq!(head[21], 1575);
        assert_eq!(head[13], 975);

        let mut tail = vec![30000i16; 100];
        fade_in(&mut tail, 1, 40);
        assert_eq!(tail[21], 15750);
    }

    #[test]
    fn test_extreme_samples_do_not_wrap() {
        let mut asm = assembler();
        asm.append_chunk_with_fade_in(&[i16::MIN; 100]);
        asm.append_chunk_with_fade_out(&[i16::MAX; 100]);
        let out = asm.finish().samples;
        assert!(out[..64].iter().all(|&s| s <= 0));
        assert!(out[100..].iter().all(|&s| s >= 0));
    }

    #[test]
    fn test_short_buffers_unmodified() {
        let mut asm = assembler();
        asm.append_chunk_with_fade_in(&[700; 64]);
        asm.append_chunk_with_fade_out(&[700; 40]);
        asm.append_chunk_with_fade_in(&[]);
        asm.append_chunk_with_fade_out(&[]);
        let out = asm.finish().samples;
        assert_eq!(out, vec![700; 104]);
    }

    #[test]
    fn test_stereo_fade_in_per_frame() {
        let mut asm = Assembler::start(
            PcmBuffer::new(PcmFormat::new(RATE, 2), vec![]),
            FadeConfig::default(),
        );
        asm.append_chunk_with_fade_in(&[1000; 200]);
        let out = asm.finish().samples;
        // frame 32 of 64 is at half gain on both channels
        assert_eq!(out[64], 500);
        assert_eq!(out[65], 500);
        assert_eq!(out[128], 1000);
    }

    #[test]
    fn test_pause_then_chunk_concatenates() {
        let mut asm = Assembler::start(mono(vec![5; 10]), FadeConfig::default());
        asm.append_pause(0.25);
        asm.append_chunk_with_fade_in(&[1000; 100]);
        assert_eq!(asm.frames(), 10 + 2_000 + 100);
        let out = asm.finish().samples;
        assert_eq!(&out[..10], &[5; 10]);
        assert!(out[10..2_010].iter().all(|&s| s == 0));
        assert_eq!(out[2_010], 0);
        assert_eq!(out[2_109], 1000);
    }

    #[test]
    fn test_fade_chunk_tails_flag() {
        let config = FadeConfig { fade_chunk_tails: true, ..Default::default() };
        let mut asm = Assembler::start(mono(vec![1000; 100]), config);
        asm.append_chunk_with_fade_in(&[1000; 200]);
        let out = asm.finish().samples;
        assert_eq!(out[80], 500);
        assert_eq!(out[99 + 1], 0);
        assert_eq!(out[100 + 180], 500);
        assert!(out[299] < 50);
    }
}
