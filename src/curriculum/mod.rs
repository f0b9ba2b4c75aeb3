use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

use crate::character::Kanji;
use crate::error::CurriculumError;

static CURRICULUM_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/curriculum");

const GRADES_FILE: &str = "grades.json";

/// A named, ordered study grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurriculumSet {
    pub name: String,
    pub label: String,
    pub characters: Vec<Kanji>,
}

#[derive(Debug, Deserialize)]
struct RawSet {
    name: String,
    label: String,
    characters: String,
}

#[derive(Debug, Deserialize)]
struct RawCurriculum {
    sets: Vec<RawSet>,
}

/// Static curriculum index: set name → ordered characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    sets: Vec<CurriculumSet>,
}

impl Curriculum {
    /// Load the grade tables compiled into the binary.
    pub fn embedded() -> Result<Self, CurriculumError> {
        let raw: RawCurriculum = read_data_file(GRADES_FILE)?;
        let sets = raw
            .sets
            .into_iter()
            .map(|s| CurriculumSet {
                characters: s.characters.chars().filter_map(Kanji::new).collect(),
                name: s.name,
                label: s.label,
            })
            .collect();
        Ok(Self { sets })
    }

    pub fn from_sets(sets: Vec<CurriculumSet>) -> Self {
        Self { sets }
    }

    /// Characters of the named set; an unknown name is simply an empty set.
    pub fn get(&self, name: &str) -> &[Kanji] {
        self.find(name)
            .map(|s| s.characters.as_slice())
            .unwrap_or(&[])
    }

    pub fn find(&self, name: &str) -> Option<&CurriculumSet> {
        self.sets.iter().find(|s| s.name == name)
    }

    pub fn sets(&self) -> &[CurriculumSet] {
        &self.sets
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|s| s.name.as_str())
    }
}

/// Deserialize one of the JSON tables embedded next to this module.
pub(crate) fn read_data_file<T: for<'de> Deserialize<'de>>(
    file_name: &str,
) -> Result<T, CurriculumError> {
    let file = CURRICULUM_DIR
        .get_file(file_name)
        .ok_or_else(|| CurriculumError::Missing(file_name.to_string()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| CurriculumError::Encoding(file_name.to_string()))?;

    from_str(file_as_str).map_err(|source| CurriculumError::Malformed {
        file: file_name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn k(c: char) -> Kanji {
        Kanji::new(c).unwrap()
    }

    #[test]
    fn embedded_grades_load() {
        let curriculum = Curriculum::embedded().expect("embedded curriculum");

        assert_eq!(curriculum.names().collect::<Vec<_>>(), ["小1", "小2", "小3"]);
        assert_eq!(curriculum.get("小1").len(), 80);
        assert_eq!(curriculum.get("小2").len(), 160);
        assert_eq!(curriculum.get("小3").len(), 200);
        assert_eq!(curriculum.get("小1").first(), Some(&k('一')));
    }

    #[test]
    fn unknown_set_is_empty() {
        let curriculum = Curriculum::embedded().unwrap();
        assert!(curriculum.get("小9").is_empty());
        assert!(curriculum.get("").is_empty());
    }

    #[test]
    fn labels_are_carried() {
        let curriculum = Curriculum::embedded().unwrap();
        assert_eq!(curriculum.find("小2").map(|s| s.label.as_str()), Some("Grade 2"));
    }

    #[test]
    fn missing_data_file_is_an_error() {
        let result = read_data_file::<RawCurriculum>("nonexistent.json");
        assert_matches!(result, Err(CurriculumError::Missing(name)) if name == "nonexistent.json");
    }
}
