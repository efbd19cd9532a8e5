use crate::types::StenoKey;
use std::collections::HashMap;

lazy_static::lazy_static! {
    /// Plover-style QWERTY layout:
    ///   q  w  e  r  t    y  u  i  o  p
    ///   a  s  d  f  g    h  j  k  l  ;
    ///         c  v       n  m
    static ref QWERTY_TO_STENO: HashMap<&'static str, StenoKey> = {
        let mut m = HashMap::new();
        // Top row
        m.insert("q", StenoKey::LeftS); m.insert("w", StenoKey::LeftT);
        m.insert("e", StenoKey::LeftP); m.insert("r", StenoKey::LeftH);
        m.insert("y", StenoKey::RightF); m.insert("u", StenoKey::RightP);
        m.insert("i", StenoKey::RightL); m.insert("o", StenoKey::RightT);
        m.insert("p", StenoKey::RightD);

        // Home row
        m.insert("a", StenoKey::LeftS); m.insert("s", StenoKey::LeftK);
        m.insert("d", StenoKey::LeftW); m.insert("f", StenoKey::LeftR);
        m.insert("h", StenoKey::RightR); m.insert("j", StenoKey::RightB);
        m.insert("k", StenoKey::RightG); m.insert("l", StenoKey::RightS);
        m.insert("semicolon", StenoKey::RightZ);

        // Star spans both rows
        m.insert("t", StenoKey::Star); m.insert("g", StenoKey::Star);

        // Thumbs
        m.insert("c", StenoKey::A); m.insert("v", StenoKey::O);
        m.insert("n", StenoKey::E); m.insert("m", StenoKey::U);

        // Number bar
        m.insert("1", StenoKey::Number);

        m
    };
}

/// Steno key for a keyboard key name (`"q"`, `"semicolon"`). Case-insensitive.
pub fn qwerty_to_steno(name: &str) -> Option<StenoKey> {
    if let Some(key) = QWERTY_TO_STENO.get(name) {
        return Some(*key);
    }
    QWERTY_TO_STENO.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Keyboard key names mapped to `key`.
pub fn qwerty_keys_for(key: StenoKey) -> Vec<&'static str> {
    let mut names: Vec<_> = QWERTY_TO_STENO
        .iter()
        .filter(|(_, k)| **k == key)
        .map(|(name, _)| *name)
        .collect();
    names.sort_unstable();
    names
}
