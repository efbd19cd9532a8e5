pub mod chord_engine;
pub mod dictionary;
pub mod engine;
pub mod evaluator;
pub mod input;
pub mod parser;
pub mod qwerty_map;
pub mod simulator;
pub mod steno_map;
pub mod types;

pub use chord_engine::{ChordAccumulator, ChordNotification};
pub use dictionary::{Dictionary, DictionaryEntry, DictionaryError};
pub use engine::{PracticeConfig, PracticeSession, SessionUpdate};
pub use evaluator::ChordEvaluator;
pub use parser::{format_stroke, parse_stroke, ParseError};
pub use types::{Chord, KeyColor, KeyColors, KeyEdge, KeyEvent, Outline, StenoKey};
