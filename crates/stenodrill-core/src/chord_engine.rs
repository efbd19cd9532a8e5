use crate::types::{Chord, KeyEdge, KeyEvent, StenoKey};
use tracing::{debug, trace};

/// Output of the accumulator for a single key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordNotification {
    /// Chord or held keys changed while a stroke is being built.
    StateChanged { chord: Chord, pressed: Chord },
    /// Every key was released; carries the union of keys touched.
    Completed(Chord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccState {
    #[default]
    Idle,
    Building,
}

/// Turns key-down/key-up events into completed chords.
///
/// The chord is the union of every key pressed between the first key-down
/// after a full release and the next full release. It only grows while
/// building; `pressed` is always a subset of it.
#[derive(Debug, Clone, Default)]
pub struct ChordAccumulator {
    state: AccState,
    chord: Chord,
    pressed: Chord,
}

impl ChordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(&mut self, event: KeyEvent) -> Vec<ChordNotification> {
        match event.edge {
            KeyEdge::Down => self.press(event.key),
            KeyEdge::Up => self.release(event.key),
        }
    }

    /// Key-down by identifier. Names outside the steno vocabulary are ignored.
    pub fn key_down(&mut self, name: &str) -> Vec<ChordNotification> {
        match StenoKey::from_name(name) {
            Some(key) => self.press(key),
            None => {
                trace!("Ignoring key-down for unknown key {:?}", name);
                Vec::new()
            }
        }
    }

    /// Key-up by identifier. Names outside the steno vocabulary are ignored.
    pub fn key_up(&mut self, name: &str) -> Vec<ChordNotification> {
        match StenoKey::from_name(name) {
            Some(key) => self.release(key),
            None => {
                trace!("Ignoring key-up for unknown key {:?}", name);
                Vec::new()
            }
        }
    }

    pub fn press(&mut self, key: StenoKey) -> Vec<ChordNotification> {
        if self.state == AccState::Idle {
            self.chord.clear();
            self.state = AccState::Building;
        }

        self.chord.insert(key);
        self.pressed.insert(key);

        vec![self.state_changed()]
    }

    pub fn release(&mut self, key: StenoKey) -> Vec<ChordNotification> {
        if self.state == AccState::Idle {
            trace!("Ignoring release of {} with no stroke in progress", key);
            return Vec::new();
        }

        self.pressed.remove(key);
        let mut output = vec![self.state_changed()];

        if self.pressed.is_empty() {
            let chord = self.chord;
            self.chord.clear();
            self.state = AccState::Idle;
            debug!("Chord complete: {}", chord);
            output.push(ChordNotification::Completed(chord));
        }

        output
    }

    pub fn chord(&self) -> Chord {
        self.chord
    }

    pub fn pressed(&self) -> Chord {
        self.pressed
    }

    pub fn state(&self) -> AccState {
        self.state
    }

    pub fn is_building(&self) -> bool {
        self.state == AccState::Building
    }

    fn state_changed(&self) -> ChordNotification {
        ChordNotification::StateChanged {
            chord: self.chord,
            pressed: self.pressed,
        }
    }
}
