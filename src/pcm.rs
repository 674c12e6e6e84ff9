//! 16-bit PCM buffers and their WAV container framing.
//!
//! Synthesizers usually hand back a complete WAV file; [`PcmBuffer::from_wav_bytes`]
//! strips the container, and [`PcmBuffer::to_wav_bytes`] / [`PcmBuffer::write_wav`]
//! put the stitched recording back into one. Only 16-bit integer PCM is
//! accepted: there is no resampling or sample-format conversion.

use std::{
    io::{Cursor, Read},
    path::Path,
};

use crate::error::{Result, StitchError};

const BITS_PER_SAMPLE: u16 = 16;

/// Layout of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    /// 16-bit format with the given rate and channel count.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self { sample_rate, channels, bits_per_sample: BITS_PER_SAMPLE }
    }

    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1)
    }

    /// Bytes per sample (always 2 here).
    pub fn sample_width(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Frame count for `secs` seconds, rounded to the nearest frame.
    pub fn frames_for(&self, secs: f64) -> usize {
        let frames = (secs * self.sample_rate as f64).round();
        if frames > 0.0 {
            frames as usize
        } else {
            0
        }
    }

    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// An owned, interleaved 16-bit PCM waveform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    pub format: PcmFormat,
    pub samples: Vec<i16>,
}

impl PcmBuffer {
    pub fn new(format: PcmFormat, samples: Vec<i16>) -> Self {
        Self { format, samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.format.sample_rate as f64
    }

    // ── WAV decode ────────────────────────────────────────────────────────────

    /// Decode a 16-bit integer PCM WAV stream.
    pub fn from_wav_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = hound::WavReader::new(reader)?;
        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != BITS_PER_SAMPLE {
            return Err(StitchError::UnsupportedFormat(format!(
                "{:?} {}-bit",
                spec.sample_format, spec.bits_per_sample
            )));
        }
        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(PcmFormat::new(spec.sample_rate, spec.channels), samples))
    }

    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_wav_reader(Cursor::new(bytes))
    }

    // ── WAV encode ────────────────────────────────────────────────────────────

    /// Wrap the buffer in an in-memory RIFF WAV file.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(44 + self.samples.len() * 2));
        {
            let mut writer = hound::WavWriter::new(&mut cursor, self.format.wav_spec())?;
            for &s in &self.samples {
                writer.write_sample(s)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }

    /// Write the buffer to a WAV file at `path`.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let mut writer = hound::WavWriter::create(path, self.format.wav_spec())?;
        for &s in &self.samples {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
        tracing::debug!(
            frames = self.frames(),
            secs = self.duration_secs(),
            path = %path.display(),
            "wrote WAV"
        );
        Ok(())
    }
}
