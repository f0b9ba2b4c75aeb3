use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// First code point of the supported ideograph range.
pub const RANGE_START: char = '\u{4E00}';
/// Last code point of the supported ideograph range.
pub const RANGE_END: char = '\u{9FAF}';

/// A single character the stroke board can draw and quiz.
///
/// Only CJK unified ideographs in `U+4E00..=U+9FAF` are accepted; everything
/// else (kana, latin letters, half-finished input) is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kanji(char);

impl Kanji {
    pub fn new(c: char) -> Option<Self> {
        is_supported(c).then_some(Self(c))
    }

    /// Parse a persisted entry; it must hold exactly one supported character.
    pub fn from_entry(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => None,
        }
    }

    /// The last supported character of `text`, if its last character is one.
    pub fn last_in(text: &str) -> Option<Self> {
        text.chars().next_back().and_then(Self::new)
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

pub fn is_supported(c: char) -> bool {
    (RANGE_START..=RANGE_END).contains(&c)
}

impl fmt::Display for Kanji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Kanji {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Kanji {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Kanji::from_entry(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("not a supported kanji: {s:?}")))
    }
}
