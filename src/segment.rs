//! Text segmenter — raw text → word sequence → prosody-sized chunks.
//!
//! Each [`Chunk`] becomes one synthesizer call. Chunks hold two words by
//! default, pull in a third when it is a short function word, and a short
//! word is never allowed to open any chunk but the first: it is appended to
//! the previous chunk instead, so every group starts on a content word.
//!
//! Hyphenated compounds are spoken with an explicit "dash" between their
//! first two parts (`well-known` → `well dash known`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, StitchError};

// ─────────────────────────────────────────────────────────────────────────────
// Short-word set
// ─────────────────────────────────────────────────────────────────────────────

/// Function words that may not start a chunk (compared lowercase).
pub const SHORT_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "so", "yet",
    "i", "me", "my", "you", "your", "he", "she", "it", "we", "they",
    "is", "am", "are", "was", "were", "be", "been", "being",
    "of", "in", "on", "at", "to", "for", "with", "by", "from", "up", "out",
    "do", "does", "did", "has", "have", "had", "can", "will", "would", "as",
    "if", "no", "not", "yes", "oh", "um",
];

/// Token spoken between the first two parts of a hyphenated compound.
pub const DASH: &str = "dash";

/// Tokens a chunk window looks at.
const WINDOW: usize = 3;

/// Case-insensitive membership test against [`SHORT_WORDS`].
pub fn is_short_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    SHORT_WORDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tokeniser
// ─────────────────────────────────────────────────────────────────────────────

/// Word runs (letters, digits, `_`, apostrophes, hyphens) or a single
/// punctuation mark.
static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w'-]+|[^\w\s]").unwrap());

/// True when `token` is made only of letters and hyphens, with at least one letter.
fn is_alpha_compound(token: &str) -> bool {
    let mut has_letter = false;
    for c in token.chars() {
        match c {
            '-' => {}
            c if c.is_alphabetic() => has_letter = true,
            _ => return false,
        }
    }
    has_letter
}

fn push_expanded(token: &str, words: &mut Vec<String>) {
    if token.contains('-') && is_alpha_compound(token) {
        let parts: Vec<&str> = token.split('-').filter(|p| !p.is_empty()).collect();
        if let [first, rest @ ..] = parts.as_slice() {
            if !rest.is_empty() {
                words.push((*first).to_string());
                words.push(DASH.to_string());
                words.extend(rest.iter().map(|p| (*p).to_string()));
                return;
            }
        }
    }
    words.push(token.to_string());
}

/// Split `text` into the word sequence, expanding hyphenated compounds.
///
/// Returns an empty vector for empty or whitespace-only input.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for m in RE_TOKEN.find_iter(text) {
        let token = m.as_str().trim();
        if token.is_empty() {
            continue;
        }
        push_expanded(token, &mut words);
    }
    words
}

/// Whether the last word ends with `.`, `!` or `?`.
pub fn ends_with_terminal(words: &[String]) -> bool {
    words.last().is_some_and(|w| w.ends_with(['.', '!', '?']))
}

// ─────────────────────────────────────────────────────────────────────────────
// Chunker
// ─────────────────────────────────────────────────────────────────────────────

/// A group of words synthesized in a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub tokens: Vec<String>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Text handed to the synthesizer: the tokens joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// Exactly two tokens, both longer than `min_chars` characters.
    pub fn is_long_pair(&self, min_chars: usize) -> bool {
        self.tokens.len() == 2 && self.tokens.iter().all(|t| t.chars().count() > min_chars)
    }
}

/// Fold state of the chunker: chunks emitted so far plus the scan cursor.
///
/// Each [`step`](Self::step) consumes one window of the word sequence, either
/// absorbing a short word into the last chunk or emitting a new chunk.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    chunks: Vec<Chunk>,
    cursor: usize,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Advance over `words` by one decision. Returns `false` once the cursor
    /// has reached the end.
    pub fn step(&mut self, words: &[String]) -> bool {
        if self.cursor >= words.len() {
            return false;
        }
        let end = (self.cursor + WINDOW).min(words.len());
        let window = &words[self.cursor..end];

        if let Some(last) = self.chunks.last_mut() {
            if is_short_word(&window[0]) {
                last.tokens.push(window[0].clone());
                self.cursor += 1;
                return true;
            }
        }

        let take = match window.len() {
            1 => 1,
            3 if is_short_word(&window[2]) => 3,
            _ => 2,
        };
        self.chunks.push(Chunk {
            index: self.chunks.len(),
            tokens: window[..take].to_vec(),
        });
        self.cursor += take;
        true
    }

    pub fn finish(self) -> Vec<Chunk> {
        self.chunks
    }
}

/// Partition the word sequence into chunks.
pub fn chunk(words: &[String]) -> Vec<Chunk> {
    let mut acc = ChunkAccumulator::new();
    while acc.step(words) {}
    acc.finish()
}

/// Tokenise and chunk `text`; empty input is [`StitchError::NoContent`].
pub fn segment(text: &str) -> Result<Vec<Chunk>> {
    let words = tokenize(text);
    if words.is_empty() {
        return Err(StitchError::NoContent);
    }
    Ok(chunk(&words))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
