use crate::types::{Chord, StenoKey};
use std::collections::HashMap;

/// Canonical key names in steno order.
/// Left-hand keys carry a trailing hyphen, right-hand keys a leading one.
pub const STENO_ORDER: [&str; 23] = [
    "#", // Number bar
    "S-", "T-", "K-", "P-", "W-", "H-", "R-", // Left bank
    "A", "O", // Left thumb
    "*", // Star
    "E", "U", // Right thumb
    "-F", "-R", "-P", "-B", "-L", "-G", "-T", "-S", "-D", "-Z", // Right bank
];

pub const NUMBER_KEYS: Chord = Chord::from_keys(&[StenoKey::Number]);

pub const LEFT_BANK: Chord = Chord::from_keys(&[
    StenoKey::LeftS,
    StenoKey::LeftT,
    StenoKey::LeftK,
    StenoKey::LeftP,
    StenoKey::LeftW,
    StenoKey::LeftH,
    StenoKey::LeftR,
]);

pub const VOWELS: Chord = Chord::from_keys(&[StenoKey::A, StenoKey::O, StenoKey::E, StenoKey::U]);

pub const STAR_KEYS: Chord = Chord::from_keys(&[StenoKey::Star]);

pub const RIGHT_BANK: Chord = Chord::from_keys(&[
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
]);

pub const ALL_KEYS: Chord = Chord::from_keys(&StenoKey::ALL);

/// First right-bank key; a `-` in stroke notation jumps here.
pub const RIGHT_BANK_START: usize = StenoKey::RightF.index();

/// Auxiliary keys beside S- (pinky drift indicators).
/// They travel the same event path as steno keys but never take part in a chord.
pub const EXTRA_KEY_COUNT: usize = 2;
pub const EXTRA_KEYS: [&str; EXTRA_KEY_COUNT] = ["_L1", "_L2"];

lazy_static::lazy_static! {
    static ref KEY_BY_NAME: HashMap<&'static str, StenoKey> = {
        let mut m = HashMap::new();
        for key in StenoKey::ALL {
            m.insert(key.name(), key);
        }
        m
    };
}

pub fn key_by_name(name: &str) -> Option<StenoKey> {
    KEY_BY_NAME.get(name).copied()
}

pub fn is_extra_key(name: &str) -> bool {
    EXTRA_KEYS.contains(&name)
}
