use crate::qwerty_map::qwerty_to_steno;
use crate::types::{KeyEvent, StenoKey};
use std::collections::HashSet;
use tracing::trace;

/// Result of feeding one keyboard event to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorOutput {
    /// Not a steno key; the caller should handle it normally.
    NotConsumed,
    /// A steno key but no steno transition (auto-repeat, shared key still held).
    Consumed,
    /// A steno transition to forward to the accumulator.
    Steno(KeyEvent),
}

/// Maps QWERTY key presses onto steno key events.
///
/// Keyboards auto-repeat held keys, so only the first press of a physical key
/// produces a key-down. Two physical keys can share a steno key (`q`/`a` for
/// `S-`); its key-up is sent only once both are released.
#[derive(Debug, Clone, Default)]
pub struct QwertySimulator {
    held: HashSet<String>,
}

impl QwertySimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, name: &str) -> SimulatorOutput {
        let Some(steno) = qwerty_to_steno(name) else {
            return SimulatorOutput::NotConsumed;
        };

        if !self.held.insert(name.to_ascii_lowercase()) {
            trace!("Key repeat for {:?} ignored", name);
            return SimulatorOutput::Consumed;
        }

        SimulatorOutput::Steno(KeyEvent::down(steno))
    }

    pub fn release(&mut self, name: &str) -> SimulatorOutput {
        let Some(steno) = qwerty_to_steno(name) else {
            return SimulatorOutput::NotConsumed;
        };

        if !self.held.remove(&name.to_ascii_lowercase()) {
            return SimulatorOutput::Consumed;
        }

        if self.is_steno_key_held(steno) {
            return SimulatorOutput::Consumed;
        }

        SimulatorOutput::Steno(KeyEvent::up(steno))
    }

    fn is_steno_key_held(&self, key: StenoKey) -> bool {
        self.held.iter().any(|k| qwerty_to_steno(k) == Some(key))
    }
}
