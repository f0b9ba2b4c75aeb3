//! Readings and gloss shown next to the active character.

use serde::Deserialize;
use std::collections::HashMap;

use crate::character::Kanji;
use crate::curriculum::read_data_file;
use crate::error::{CurriculumError, LookupError};

/// Marker shown for any field the lookup could not provide.
pub const NOT_AVAILABLE: &str = "なし";

const OVERRIDES_FILE: &str = "overrides.json";

/// Resolved metadata for one character.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KanjiInfo {
    pub kun: String,
    pub on: String,
    pub meaning: String,
    #[serde(default, rename = "strokes")]
    pub stroke_count: Option<u32>,
}

impl KanjiInfo {
    /// Every field replaced by the "not available" marker.
    pub fn unavailable() -> Self {
        Self {
            kun: NOT_AVAILABLE.to_string(),
            on: NOT_AVAILABLE.to_string(),
            meaning: NOT_AVAILABLE.to_string(),
            stroke_count: None,
        }
    }

    /// Adopt the first reading and gloss of a lookup result, or the marker.
    pub fn from_lookup(result: Result<RemoteKanji, LookupError>) -> Self {
        match result {
            Ok(remote) => Self {
                kun: first_or_marker(remote.kun_readings),
                on: first_or_marker(remote.on_readings),
                meaning: first_or_marker(remote.meanings),
                stroke_count: remote.stroke_count,
            },
            Err(_) => Self::unavailable(),
        }
    }
}

fn first_or_marker(values: Vec<String>) -> String {
    values
        .into_iter()
        .next()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// What the info card currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataView {
    /// A remote lookup for the active character is in flight.
    Pending,
    Ready(KanjiInfo),
}

impl MetadataView {
    pub fn info(&self) -> Option<&KanjiInfo> {
        match self {
            MetadataView::Pending => None,
            MetadataView::Ready(info) => Some(info),
        }
    }
}

/// Lookup response body; only the first element of each list is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteKanji {
    #[serde(default)]
    pub kun_readings: Vec<String>,
    #[serde(default)]
    pub on_readings: Vec<String>,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub stroke_count: Option<u32>,
}

/// Curated metadata that bypasses the remote lookup.
#[derive(Debug, Clone, Default)]
pub struct MetadataOverrides {
    entries: HashMap<Kanji, KanjiInfo>,
}

impl MetadataOverrides {
    pub fn embedded() -> Result<Self, CurriculumError> {
        let raw: HashMap<String, KanjiInfo> = read_data_file(OVERRIDES_FILE)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, info)| Kanji::from_entry(&key).map(|k| (k, info)))
            .collect();
        Ok(Self { entries })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Kanji, KanjiInfo)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, kanji: Kanji) -> Option<&KanjiInfo> {
        self.entries.get(&kanji)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_overrides_load() {
        let overrides = MetadataOverrides::embedded().unwrap();
        assert!(overrides.get(Kanji::new('犬').unwrap()).is_none());

        let ei = overrides.get(Kanji::new('永').unwrap()).unwrap();
        assert_eq!(ei.on, "エイ");
        assert_eq!(ei.stroke_count, Some(5));
    }

    #[test]
    fn lookup_takes_first_entries() {
        let remote: RemoteKanji = serde_json::from_str(
            r#"{
                "kanji": "雨",
                "grade": 1,
                "stroke_count": 8,
                "meanings": ["rain"],
                "kun_readings": ["あめ", "あま-"],
                "on_readings": ["ウ"],
                "name_readings": []
            }"#,
        )
        .unwrap();

        let info = KanjiInfo::from_lookup(Ok(remote));
        assert_eq!(info.kun, "あめ");
        assert_eq!(info.on, "ウ");
        assert_eq!(info.meaning, "rain");
        assert_eq!(info.stroke_count, Some(8));
    }

    #[test]
    fn missing_fields_become_marker() {
        let remote: RemoteKanji =
            serde_json::from_str(r#"{"on_readings": ["サン"], "kun_readings": []}"#).unwrap();

        let info = KanjiInfo::from_lookup(Ok(remote));
        assert_eq!(info.kun, NOT_AVAILABLE);
        assert_eq!(info.on, "サン");
        assert_eq!(info.meaning, NOT_AVAILABLE);
        assert_eq!(info.stroke_count, None);
    }

    #[test]
    fn blank_first_entry_is_not_skipped() {
        let remote = RemoteKanji {
            kun_readings: vec![" ".into(), "あめ".into()],
            on_readings: vec!["ウ".into()],
            meanings: vec!["".into(), "rain".into()],
            stroke_count: None,
        };

        let info = KanjiInfo::from_lookup(Ok(remote));
        assert_eq!(info.kun, NOT_AVAILABLE);
        assert_eq!(info.on, "ウ");
        assert_eq!(info.meaning, NOT_AVAILABLE);
    }

    #[test]
    fn failed_lookup_is_all_marker() {
        let info = KanjiInfo::from_lookup(Err(LookupError::Status(404)));
        assert_eq!(info, KanjiInfo::unavailable());
    }
}
