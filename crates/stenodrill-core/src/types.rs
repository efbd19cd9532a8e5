use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::parser::{self, ParseError};
use crate::steno_map;

/// Number of keys on the steno machine.
pub const KEY_COUNT: usize = 23;

/// Canonical steno key, declared in steno order.
/// The discriminant is the key's bit position inside a [`Chord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StenoKey {
    #[serde(rename = "#")]
    Number = 0,
    #[serde(rename = "S-")]
    LeftS,
    #[serde(rename = "T-")]
    LeftT,
    #[serde(rename = "K-")]
    LeftK,
    #[serde(rename = "P-")]
    LeftP,
    #[serde(rename = "W-")]
    LeftW,
    #[serde(rename = "H-")]
    LeftH,
    #[serde(rename = "R-")]
    LeftR,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "O")]
    O,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "U")]
    U,
    #[serde(rename = "-F")]
    RightF,
    #[serde(rename = "-R")]
    RightR,
    #[serde(rename = "-P")]
    RightP,
    #[serde(rename = "-B")]
    RightB,
    #[serde(rename = "-L")]
    RightL,
    #[serde(rename = "-G")]
    RightG,
    #[serde(rename = "-T")]
    RightT,
    #[serde(rename = "-S")]
    RightS,
    #[serde(rename = "-D")]
    RightD,
    #[serde(rename = "-Z")]
    RightZ,
}

/// Positional zone of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    Number,
    Left,
    Vowel,
    Star,
    Right,
}

impl StenoKey {
    /// All keys in steno order.
    pub const ALL: [StenoKey; KEY_COUNT] = [
        StenoKey::Number,
        StenoKey::LeftS,
        StenoKey::LeftT,
        StenoKey::LeftK,
        StenoKey::LeftP,
        StenoKey::LeftW,
        StenoKey::LeftH,
        StenoKey::LeftR,
        StenoKey::A,
        StenoKey::O,
        StenoKey::Star,
        StenoKey::E,
        StenoKey::U,
        StenoKey::RightF,
        StenoKey::RightR,
        StenoKey::RightP,
        StenoKey::RightB,
        StenoKey::RightL,
        StenoKey::RightG,
        StenoKey::RightT,
        StenoKey::RightS,
        StenoKey::RightD,
        StenoKey::RightZ,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<StenoKey> {
        if index < KEY_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Look up a key by its canonical name (`"S-"`, `"A"`, `"-T"`).
    pub fn from_name(name: &str) -> Option<StenoKey> {
        steno_map::key_by_name(name)
    }

    /// Canonical name, with the positional hyphen.
    pub const fn name(self) -> &'static str {
        steno_map::STENO_ORDER[self as usize]
    }

    /// Character used for this key in stroke notation.
    pub const fn letter(self) -> char {
        match self {
            StenoKey::Number => '#',
            StenoKey::LeftS | StenoKey::RightS => 'S',
            StenoKey::LeftT | StenoKey::RightT => 'T',
            StenoKey::LeftK => 'K',
            StenoKey::LeftP | StenoKey::RightP => 'P',
            StenoKey::LeftW => 'W',
            StenoKey::LeftH => 'H',
            StenoKey::LeftR | StenoKey::RightR => 'R',
            StenoKey::A => 'A',
            StenoKey::O => 'O',
            StenoKey::Star => '*',
            StenoKey::E => 'E',
            StenoKey::U => 'U',
            StenoKey::RightF => 'F',
            StenoKey::RightB => 'B',
            StenoKey::RightL => 'L',
            StenoKey::RightG => 'G',
            StenoKey::RightD => 'D',
            StenoKey::RightZ => 'Z',
        }
    }

    pub const fn bank(self) -> Bank {
        match self {
            StenoKey::Number => Bank::Number,
            StenoKey::LeftS
            | StenoKey::LeftT
            | StenoKey::LeftK
            | StenoKey::LeftP
            | StenoKey::LeftW
            | StenoKey::LeftH
            | StenoKey::LeftR => Bank::Left,
            StenoKey::A | StenoKey::O | StenoKey::E | StenoKey::U => Bank::Vowel,
            StenoKey::Star => Bank::Star,
            _ => Bank::Right,
        }
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for StenoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of steno keys pressed together for one stroke.
///
/// Stored as a bitset indexed by [`StenoKey`] discriminant, so equality and
/// subset tests are single integer operations.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Chord(u32);

impl Chord {
    pub const EMPTY: Chord = Chord(0);
    const MASK: u32 = (1 << KEY_COUNT) - 1;

    pub const fn from_bits(bits: u32) -> Self {
        Chord(bits & Self::MASK)
    }

    /// Build a chord from a key list; usable in const context.
    pub const fn from_keys(keys: &[StenoKey]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < keys.len() {
            bits |= keys[i].bit();
            i += 1;
        }
        Chord(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, key: StenoKey) -> bool {
        self.0 & key.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, key: StenoKey) {
        self.0 |= key.bit();
    }

    #[inline]
    pub fn remove(&mut self, key: StenoKey) {
        self.0 &= !key.bit();
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    #[inline]
    pub const fn union(self, other: Chord) -> Chord {
        Chord(self.0 | other.0)
    }

    #[inline]
    pub const fn intersection(self, other: Chord) -> Chord {
        Chord(self.0 & other.0)
    }

    #[inline]
    pub const fn is_subset(self, other: Chord) -> bool {
        self.0 & !other.0 == 0
    }

    #[inline]
    pub const fn intersects(self, other: Chord) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Keys in steno order.
    pub fn iter(self) -> impl Iterator<Item = StenoKey> {
        StenoKey::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<StenoKey> for Chord {
    fn from_iter<I: IntoIterator<Item = StenoKey>>(iter: I) -> Self {
        let mut chord = Chord::EMPTY;
        for key in iter {
            chord.insert(key);
        }
        chord
    }
}

impl fmt::Debug for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chord({:?})", parser::format_stroke(*self))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&parser::format_stroke(*self))
    }
}

impl FromStr for Chord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_stroke(s)
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&parser::format_stroke(*self))
    }
}

impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parser::parse_stroke(&text).map_err(serde::de::Error::custom)
    }
}

/// Ordered multi-stroke sequence for one word.
pub type Outline = Vec<Chord>;

/// Key transition reported by an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEdge {
    Down,
    Up,
}

/// Raw input event for a canonical steno key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: StenoKey,
    pub edge: KeyEdge,
}

impl KeyEvent {
    pub const fn down(key: StenoKey) -> Self {
        Self {
            key,
            edge: KeyEdge::Down,
        }
    }

    pub const fn up(key: StenoKey) -> Self {
        Self {
            key,
            edge: KeyEdge::Up,
        }
    }
}

/// Five-state visual classification of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyColor {
    #[default]
    Untouched,
    CorrectHeld,
    CorrectReleased,
    WrongHeld,
    WrongReleased,
}

/// Color for every steno key, indexed in steno order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyColors([KeyColor; KEY_COUNT]);

impl KeyColors {
    pub fn get(&self, key: StenoKey) -> KeyColor {
        self.0[key.index()]
    }

    pub fn set(&mut self, key: StenoKey, color: KeyColor) {
        self.0[key.index()] = color;
    }

    pub fn iter(&self) -> impl Iterator<Item = (StenoKey, KeyColor)> + '_ {
        StenoKey::ALL
            .into_iter()
            .map(move |k| (k, self.0[k.index()]))
    }

    /// Keys currently shown in the given color.
    pub fn keys_with(&self, color: KeyColor) -> Chord {
        self.iter().filter(|(_, c)| *c == color).map(|(k, _)| k).collect()
    }
}

impl Serialize for KeyColors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(KEY_COUNT))?;
        for (key, color) in self.iter() {
            map.serialize_entry(key.name(), &color)?;
        }
        map.end()
    }
}
