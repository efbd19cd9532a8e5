use crate::chord_engine::{ChordAccumulator, ChordNotification};
use crate::dictionary::DictionaryEntry;
use crate::evaluator::ChordEvaluator;
use crate::input::InputReceiver;
use crate::parser::format_outline;
use crate::steno_map::{EXTRA_KEYS, EXTRA_KEY_COUNT};
use crate::types::{Chord, KeyColor, KeyColors, KeyEdge, KeyEvent};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordOrder {
    /// Dictionary order, wrapping around at the end.
    Sequential,
    Random,
}

impl Default for WordOrder {
    fn default() -> Self {
        Self::Random
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    pub order: WordOrder,
    /// Fixed seed for `Random` order.
    pub seed: Option<u64>,
    /// Outlines shown in the hint before collapsing into "(+N more)".
    #[serde(default = "default_hint_alternatives")]
    pub hint_alternatives: usize,
}

fn default_hint_alternatives() -> usize {
    3
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            order: WordOrder::Random,
            seed: None,
            hint_alternatives: 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no dictionary entries to practice")]
    NoEntries,
}

/// What the presentation layer shows for the current word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordPrompt {
    pub word: String,
    pub total_strokes: usize,
    pub hint: String,
}

/// Colors for the steno keys plus the auxiliary indicator keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyboardColors {
    pub steno: KeyColors,
    pub extra: [(&'static str, KeyColor); EXTRA_KEY_COUNT],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Colors(KeyboardColors),
    /// Correct stroke inside a multi-stroke word; `position` strokes done.
    StrokeAccepted { position: usize, total: usize },
    WordCompleted { word: String, streak: u32 },
    WordLoaded(WordPrompt),
    /// Wrong chord; the word restarts from its first stroke.
    Missed { chord: Chord, expected: Vec<Chord> },
}

/// Drives one practice run: feeds key events through the accumulator and
/// judges each completed chord against the current word.
pub struct PracticeSession {
    entries: Vec<DictionaryEntry>,
    config: PracticeConfig,
    entry_idx: usize,
    accumulator: ChordAccumulator,
    evaluator: ChordEvaluator,
    extra_pressed: [bool; EXTRA_KEY_COUNT],
    streak: u32,
    rng: SmallRng,
}

impl PracticeSession {
    pub fn new(entries: Vec<DictionaryEntry>, config: PracticeConfig) -> Result<Self, SessionError> {
        if entries.is_empty() {
            return Err(SessionError::NoEntries);
        }

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let entry_idx = match config.order {
            WordOrder::Sequential => 0,
            WordOrder::Random => rng.gen_range(0..entries.len()),
        };
        let evaluator = ChordEvaluator::new(entries[entry_idx].outlines().to_vec());

        info!(
            "Practice session: {} entries, order={:?}",
            entries.len(),
            config.order
        );

        Ok(Self {
            entries,
            config,
            entry_idx,
            accumulator: ChordAccumulator::new(),
            evaluator,
            extra_pressed: [false; EXTRA_KEY_COUNT],
            streak: 0,
            rng,
        })
    }

    pub fn current_entry(&self) -> &DictionaryEntry {
        &self.entries[self.entry_idx]
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn stroke_position(&self) -> usize {
        self.evaluator.stroke_position()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn prompt(&self) -> WordPrompt {
        let entry = self.current_entry();
        let outlines = entry.outlines();
        let shown = self.config.hint_alternatives.max(1);

        let mut hint = outlines
            .iter()
            .take(shown)
            .map(|o| format_outline(o))
            .collect::<Vec<_>>()
            .join(" or ");
        if outlines.len() > shown {
            hint.push_str(&format!(" (+{} more)", outlines.len() - shown));
        }

        WordPrompt {
            word: entry.word().to_string(),
            total_strokes: self.evaluator.max_sequence_length(),
            hint,
        }
    }

    pub fn current_colors(&self) -> KeyboardColors {
        self.keyboard_colors(self.accumulator.chord(), self.accumulator.pressed())
    }

    /// Key event by identifier, as produced by any input source.
    pub fn process_key(&mut self, name: &str, edge: KeyEdge) -> Vec<SessionUpdate> {
        if let Some(slot) = EXTRA_KEYS.iter().position(|k| *k == name) {
            self.extra_pressed[slot] = edge == KeyEdge::Down;
            return vec![SessionUpdate::Colors(self.current_colors())];
        }

        let notifications = match edge {
            KeyEdge::Down => self.accumulator.key_down(name),
            KeyEdge::Up => self.accumulator.key_up(name),
        };
        self.handle_notifications(notifications)
    }

    pub fn process_event(&mut self, event: KeyEvent) -> Vec<SessionUpdate> {
        let notifications = self.accumulator.on_event(event);
        self.handle_notifications(notifications)
    }

    /// Process every event queued by input threads so far.
    pub fn drain_input(&mut self, input: &InputReceiver) -> Vec<SessionUpdate> {
        let mut output = Vec::new();
        for event in input.try_iter() {
            output.extend(self.process_key(&event.key, event.edge));
        }
        output
    }

    /// Give up on the current word. Breaks the streak.
    pub fn skip_word(&mut self) -> WordPrompt {
        self.streak = 0;
        self.load_next_word();
        self.prompt()
    }

    fn handle_notifications(&mut self, notifications: Vec<ChordNotification>) -> Vec<SessionUpdate> {
        let mut output = Vec::new();
        for n in notifications {
            match n {
                ChordNotification::StateChanged { chord, pressed } => {
                    output.push(SessionUpdate::Colors(self.keyboard_colors(chord, pressed)));
                }
                ChordNotification::Completed(chord) => {
                    output.extend(self.judge(chord));
                }
            }
        }
        output
    }

    fn judge(&mut self, chord: Chord) -> Vec<SessionUpdate> {
        if !self.evaluator.evaluate_chord(chord) {
            let expected = self.evaluator.current_targets();
            self.streak = 0;
            self.evaluator.reset();
            debug!("Missed {:?} with {}", self.current_entry().word(), chord);
            return vec![SessionUpdate::Missed { chord, expected }];
        }

        if !self.evaluator.advance() {
            return vec![SessionUpdate::StrokeAccepted {
                position: self.evaluator.stroke_position(),
                total: self.evaluator.max_sequence_length(),
            }];
        }

        self.streak += 1;
        let word = self.current_entry().word().to_string();
        debug!("Completed {:?}, streak {}", word, self.streak);

        self.load_next_word();
        vec![
            SessionUpdate::WordCompleted {
                word,
                streak: self.streak,
            },
            SessionUpdate::WordLoaded(self.prompt()),
        ]
    }

    fn load_next_word(&mut self) {
        self.entry_idx = match self.config.order {
            WordOrder::Sequential => (self.entry_idx + 1) % self.entries.len(),
            WordOrder::Random => self.rng.gen_range(0..self.entries.len()),
        };
        self.evaluator = ChordEvaluator::new(self.entries[self.entry_idx].outlines().to_vec());
        debug!("Loaded word {:?}", self.current_entry().word());
    }

    fn keyboard_colors(&self, chord: Chord, pressed: Chord) -> KeyboardColors {
        let mut extra = [("", KeyColor::Untouched); EXTRA_KEY_COUNT];
        for (slot, name) in EXTRA_KEYS.iter().enumerate() {
            let color = if self.extra_pressed[slot] {
                KeyColor::CorrectHeld
            } else {
                KeyColor::Untouched
            };
            extra[slot] = (*name, color);
        }

        KeyboardColors {
            steno: self.evaluator.key_colors(chord, pressed),
            extra,
        }
    }
}
