//! Basic stitching example — segments text and assembles a WAV file.
//!
//! A real deployment plugs a neural TTS engine in as the synthesizer; here
//! each chunk is rendered as a short tone whose pitch depends on the chunk
//! text, which is enough to hear the pauses and fades.
//!
//! Usage:
//!   cargo run --example basic
//!   cargo run --example basic -- --pace typing --text "Hello from Rust"

use std::{f32::consts::TAU, path::Path};

use speech_stitch::{PcmBuffer, PcmFormat, Pace, StitchConfig, StitchRequest, Stitcher};

const SAMPLE_RATE: u32 = 22_050;

fn tone(text: &str, rate: f64) -> Result<PcmBuffer, std::io::Error> {
    let freq = 220.0 + (text.len() % 12) as f32 * 40.0;
    // length_scale semantics: larger rate, longer audio
    let frames = (0.12 * text.chars().count().max(1) as f32 * rate as f32 * SAMPLE_RATE as f32) as usize;
    let samples = (0..frames)
        .map(|i| ((TAU * freq * i as f32 / SAMPLE_RATE as f32).sin() * 8_000.0) as i16)
        .collect();
    Ok(PcmBuffer::new(PcmFormat::mono(SAMPLE_RATE), samples))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    // ── Parse simple CLI arguments ───────────────────────────────────────────
    let mut args = std::env::args().skip(1);

    let mut text   = "The well-known quick brown fox jumps over the lazy dog".to_string();
    let mut pace   = Pace::Writing;
    let mut rate   = 1.0f64;
    let mut output = "stitched.wav".to_string();
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--text"   => { if let Some(v) = args.next() { text   = v; } }
            "--pace"   => { if let Some(v) = args.next() { pace   = Pace::parse(&v); } }
            "--rate"   => { if let Some(v) = args.next() { rate   = v.parse().unwrap_or(1.0); } }
            "--output" => { if let Some(v) = args.next() { output = v; } }
            "--config" => { if let Some(v) = args.next() { config = Some(v); } }
            "--help"   => {
                println!(
                    "Usage: basic [--text TEXT] [--pace typing|writing] \
                     [--rate FLOAT] [--output FILE] [--config JSON]"
                );
                return Ok(());
            }
            _ => {}
        }
    }

    let config = match config {
        Some(path) => StitchConfig::from_json_file(Path::new(&path))?,
        None => StitchConfig::default(),
    };

    let request = StitchRequest::new(text).with_pace(pace).with_rate(rate);
    let audio = Stitcher::with_config(config)?.render(&request, &tone)?;
    audio.write_wav(Path::new(&output))?;

    println!("Saved {:.2} s to {}", audio.duration_secs(), output);
    Ok(())
}
