use crate::steno_map::{RIGHT_BANK, RIGHT_BANK_START, STAR_KEYS, VOWELS};
use crate::types::{Chord, Outline, StenoKey, KEY_COUNT};
use thiserror::Error;

/// Separator between strokes of a multi-stroke outline.
pub const STROKE_SEPARATOR: char = '/';

/// A character in stroke notation that no remaining key can take.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot place '{ch}' at position {position} in stroke '{stroke}'")]
pub struct ParseError {
    pub ch: char,
    /// Character index within the stroke text.
    pub position: usize,
    pub stroke: String,
}

/// Parse one stroke (`"STKPW"`, `"RAOEUT"`, `"-T"`) into a chord.
///
/// Each character is matched against the keys at or after a cursor into steno
/// order, so a letter present on both banks resolves to the left key until
/// the cursor has moved past the vowels. `-` moves the cursor to the right
/// bank without producing a key.
pub fn parse_stroke(text: &str) -> Result<Chord, ParseError> {
    let mut chord = Chord::EMPTY;
    let mut pos = 0;

    for (i, ch) in text.chars().enumerate() {
        if ch == '-' {
            pos = pos.max(RIGHT_BANK_START);
            continue;
        }

        let found = StenoKey::ALL[pos.min(KEY_COUNT)..]
            .iter()
            .copied()
            .find(|key| key.letter() == ch);

        match found {
            Some(key) => {
                chord.insert(key);
                pos = key.index() + 1;
            }
            None => {
                return Err(ParseError {
                    ch,
                    position: i,
                    stroke: text.to_string(),
                })
            }
        }
    }

    Ok(chord)
}

/// Format a chord as stroke notation.
///
/// A `-` precedes the first right-bank key whenever no vowel or star sits
/// between it and the left side, which covers right-only chords (`"-T"`)
/// and number-plus-right chords (`"#-T"`).
pub fn format_stroke(chord: Chord) -> String {
    let needs_separator =
        chord.intersects(RIGHT_BANK) && !chord.intersects(VOWELS.union(STAR_KEYS));

    let mut out = String::with_capacity(chord.len() + 1);
    let mut separated = false;
    for key in chord.iter() {
        if needs_separator && !separated && RIGHT_BANK.contains(key) {
            out.push('-');
            separated = true;
        }
        out.push(key.letter());
    }
    out
}

/// Parse a `/`-separated outline such as `"PEUBG/KHUR"`.
pub fn parse_outline(text: &str) -> Result<Outline, ParseError> {
    text.split(STROKE_SEPARATOR).map(parse_stroke).collect()
}

pub fn format_outline(outline: &[Chord]) -> String {
    outline
        .iter()
        .map(|c| format_stroke(*c))
        .collect::<Vec<_>>()
        .join("/")
}
