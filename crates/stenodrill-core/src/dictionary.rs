use crate::parser::{self, ParseError};
use crate::types::Outline;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const WORDS_FILE: &str = "training.txt";
pub const PHRASES_FILE: &str = "training_phrases.txt";
pub const PHRASING_FILE: &str = "training_phrasing.txt";

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected tab-separated word<TAB>stroke, got: {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("line {line}: {source}")]
    Stroke {
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("line {line}: empty stroke in outline {outline:?}")]
    EmptyStroke { line: usize, outline: String },
    #[error("line {line}: word {word:?} not found in word dictionary")]
    UnknownWord { line: usize, word: String },
    #[error("entry {word:?} has no outlines")]
    NoOutlines { word: String },
    #[error("entry {word:?} has an empty outline")]
    EmptyOutline { word: String },
}

/// A practice target and every outline that writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    word: String,
    outlines: Vec<Outline>,
}

impl DictionaryEntry {
    /// Requires at least one outline, each with at least one non-empty stroke.
    pub fn new(word: impl Into<String>, outlines: Vec<Outline>) -> Result<Self, DictionaryError> {
        let word = word.into();
        if outlines.is_empty() {
            return Err(DictionaryError::NoOutlines { word });
        }
        if outlines
            .iter()
            .any(|o| o.is_empty() || o.iter().any(|c| c.is_empty()))
        {
            return Err(DictionaryError::EmptyOutline { word });
        }
        Ok(Self { word, outlines })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn outlines(&self) -> &[Outline] {
        &self.outlines
    }
}

/// Word to outlines, for resolving phrases.
pub type WordLookup = HashMap<String, Vec<Outline>>;

pub fn build_word_lookup(entries: &[DictionaryEntry]) -> WordLookup {
    entries
        .iter()
        .map(|e| (e.word.clone(), e.outlines.clone()))
        .collect()
}

/// Ordered set of practice entries.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    pub fn from_entries(entries: Vec<DictionaryEntry>) -> Self {
        Self { entries }
    }

    /// Load the word list, then the phrase list resolved against it, then the
    /// phrasing list. The last two are optional.
    pub fn load_default<P: AsRef<Path>>(dir: P) -> Result<Self, DictionaryError> {
        let dir = dir.as_ref();
        let mut entries = load_dictionary(dir.join(WORDS_FILE))?;

        let phrases = dir.join(PHRASES_FILE);
        if phrases.exists() {
            let lookup = build_word_lookup(&entries);
            entries.extend(load_phrases(phrases, &lookup)?);
        }

        let phrasing = dir.join(PHRASING_FILE);
        if phrasing.exists() {
            entries.extend(load_dictionary(phrasing)?);
        }

        info!("Dictionary: {} entries from {}", entries.len(), dir.display());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DictionaryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<Vec<DictionaryEntry>, DictionaryError> {
    let raw = read_file(path.as_ref())?;
    let text = decode_dictionary_bytes(&raw);
    parse_dictionary_content(text.as_ref())
}

pub fn load_phrases<P: AsRef<Path>>(
    path: P,
    lookup: &WordLookup,
) -> Result<Vec<DictionaryEntry>, DictionaryError> {
    let raw = read_file(path.as_ref())?;
    let text = decode_dictionary_bytes(&raw);
    parse_phrases_content(text.as_ref(), lookup)
}

fn read_file(path: &Path) -> Result<Vec<u8>, DictionaryError> {
    std::fs::read(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_dictionary_bytes(raw: &[u8]) -> Cow<'_, str> {
    if let Some((enc, bom_len)) = encoding_rs::Encoding::for_bom(raw) {
        debug!("Decoded using BOM: {}", enc.name());
        let (cow, _, had_errors) = enc.decode(&raw[bom_len..]);
        if had_errors {
            warn!("Decode had errors (replacement characters used)");
        }
        return cow;
    }

    let (cow, had_errors) = encoding_rs::UTF_8.decode_without_bom_handling(raw);
    if had_errors {
        warn!("Dictionary is not valid UTF-8 (replacement characters used)");
    }
    cow
}

/// Lines to parse, with 1-based line numbers. Skips blanks and `#` comments.
fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse `word<TAB>outline` lines. Repeated words collect alternatives in
/// first-seen order; repeated outlines for a word are dropped.
pub fn parse_dictionary_content(content: &str) -> Result<Vec<DictionaryEntry>, DictionaryError> {
    let mut order: Vec<String> = Vec::new();
    let mut outlines: HashMap<String, Vec<Outline>> = HashMap::new();

    for (line_no, line) in content_lines(content) {
        let mut parts = line.split('\t');
        let (word, stroke_text) = match (parts.next(), parts.next(), parts.next()) {
            (Some(word), Some(strokes), None) => (word, strokes),
            _ => {
                return Err(DictionaryError::MalformedLine {
                    line: line_no,
                    content: line.to_string(),
                })
            }
        };

        let outline = parser::parse_outline(stroke_text).map_err(|source| {
            DictionaryError::Stroke {
                line: line_no,
                source,
            }
        })?;
        if outline.iter().any(|c| c.is_empty()) {
            return Err(DictionaryError::EmptyStroke {
                line: line_no,
                outline: stroke_text.to_string(),
            });
        }

        let alts = outlines.entry(word.to_string()).or_insert_with(|| {
            order.push(word.to_string());
            Vec::new()
        });
        if !alts.contains(&outline) {
            alts.push(outline);
        }
    }

    order
        .into_iter()
        .map(|word| {
            let alts = outlines.remove(&word).unwrap_or_default();
            DictionaryEntry::new(word, alts)
        })
        .collect()
}

/// Parse one phrase per line. A phrase's outlines are every combination of
/// its words' outlines, concatenated in word order.
pub fn parse_phrases_content(
    content: &str,
    lookup: &WordLookup,
) -> Result<Vec<DictionaryEntry>, DictionaryError> {
    let mut entries = Vec::new();

    for (line_no, line) in content_lines(content) {
        let mut combos: Vec<Outline> = vec![Vec::new()];
        for word in line.split_whitespace() {
            let alts = lookup.get(word).ok_or_else(|| DictionaryError::UnknownWord {
                line: line_no,
                word: word.to_string(),
            })?;

            let mut next = Vec::with_capacity(combos.len() * alts.len());
            for prefix in &combos {
                for alt in alts {
                    let mut seq = prefix.clone();
                    seq.extend_from_slice(alt);
                    next.push(seq);
                }
            }
            combos = next;
        }

        let mut unique: Vec<Outline> = Vec::with_capacity(combos.len());
        for seq in combos {
            if !unique.contains(&seq) {
                unique.push(seq);
            }
        }

        entries.push(DictionaryEntry::new(line, unique)?);
    }

    Ok(entries)
}
