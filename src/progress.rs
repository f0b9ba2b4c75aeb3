//! Mastery bookkeeping: the persisted mastered/incorrect sets and the views
//! derived from them.

use itertools::Itertools;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::character::Kanji;
use crate::curriculum::Curriculum;
use crate::storage::KeyValueStore;

pub const MASTERED_KEY: &str = "kanji_mastered_list";
pub const INCORRECT_KEY: &str = "kanji_wrong_list";

/// Selector name for the incorrect-characters drill.
pub const INCORRECT_SET_NAME: &str = "wrong";
pub const INCORRECT_SET_LABEL: &str = "弱点克服";

/// Which characters the learner is currently working through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SetSelector {
    Named(String),
    Incorrect,
}

impl SetSelector {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl fmt::Display for SetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetSelector::Named(name) => write!(f, "{name}"),
            SetSelector::Incorrect => write!(f, "{INCORRECT_SET_NAME}"),
        }
    }
}

impl FromStr for SetSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == INCORRECT_SET_NAME {
            SetSelector::Incorrect
        } else {
            SetSelector::named(s)
        })
    }
}

/// Which parts of the progress state a reset clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResetScope {
    Mastered,
    Incorrect,
    All,
}

/// Per-character classification used for colouring the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Fresh,
    Mastered,
    Incorrect,
}

/// Completion ratio of an active list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub mastered: usize,
    pub total: usize,
    pub percent: u8,
}

/// The mutable root: two insertion-ordered, duplicate-free, disjoint lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    mastered: Vec<Kanji>,
    incorrect: Vec<Kanji>,
}

impl ProgressState {
    /// Build a state from raw lists, collapsing duplicates and repairing overlap.
    pub fn from_lists(mastered: Vec<Kanji>, incorrect: Vec<Kanji>) -> Self {
        let mastered: Vec<Kanji> = mastered.into_iter().unique().collect();
        let incorrect = incorrect
            .into_iter()
            .unique()
            .filter(|k| !mastered.contains(k))
            .collect();
        Self {
            mastered,
            incorrect,
        }
    }

    pub fn mastered(&self) -> &[Kanji] {
        &self.mastered
    }

    pub fn incorrect(&self) -> &[Kanji] {
        &self.incorrect
    }

    pub fn is_mastered(&self, kanji: Kanji) -> bool {
        self.mastered.contains(&kanji)
    }

    pub fn is_incorrect(&self, kanji: Kanji) -> bool {
        self.incorrect.contains(&kanji)
    }

    pub fn status(&self, kanji: Kanji) -> Status {
        if self.is_incorrect(kanji) {
            Status::Incorrect
        } else if self.is_mastered(kanji) {
            Status::Mastered
        } else {
            Status::Fresh
        }
    }

    /// Returns true if `kanji` was newly flagged. Mastered characters are
    /// never flagged: there is no path back out of `mastered`.
    fn mark_incorrect(&mut self, kanji: Kanji) -> bool {
        if self.is_incorrect(kanji) || self.is_mastered(kanji) {
            return false;
        }
        self.incorrect.push(kanji);
        true
    }

    /// Returns (removed from incorrect, added to mastered).
    fn mark_completed(&mut self, kanji: Kanji) -> (bool, bool) {
        let before = self.incorrect.len();
        self.incorrect.retain(|k| *k != kanji);
        let removed = self.incorrect.len() != before;

        let added = !self.is_mastered(kanji);
        if added {
            self.mastered.push(kanji);
        }
        (removed, added)
    }
}

/// Active characters for a selector, first occurrence wins.
pub fn active_list(
    curriculum: &Curriculum,
    state: &ProgressState,
    selector: &SetSelector,
) -> Vec<Kanji> {
    let source = match selector {
        SetSelector::Incorrect => state.incorrect(),
        SetSelector::Named(name) => curriculum.get(name),
    };
    source.iter().copied().unique().collect()
}

/// Share of `active` that is mastered, rounded half up to a whole percent.
pub fn compute_progress(active: &[Kanji], state: &ProgressState) -> Progress {
    let total = active.len();
    let mastered = active.iter().filter(|k| state.is_mastered(**k)).count();
    let percent = if total == 0 {
        0
    } else {
        ((200 * mastered + total) / (2 * total)) as u8
    };
    Progress {
        mastered,
        total,
        percent,
    }
}

/// Curriculum plus persisted progress, flushed to `S` on every mutation.
#[derive(Debug)]
pub struct ProgressStore<S: KeyValueStore> {
    curriculum: Curriculum,
    state: ProgressState,
    backend: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Load progress from `backend`. Missing or unreadable entries start empty.
    pub fn load(curriculum: Curriculum, backend: S) -> Self {
        let mastered = read_list(&backend, MASTERED_KEY);
        let incorrect = read_list(&backend, INCORRECT_KEY);
        let state = ProgressState::from_lists(mastered, incorrect);
        debug!(
            mastered = state.mastered.len(),
            incorrect = state.incorrect.len(),
            "progress loaded"
        );
        Self {
            curriculum,
            state,
            backend,
        }
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn get_set(&self, name: &str) -> &[Kanji] {
        self.curriculum.get(name)
    }

    pub fn incorrect_list(&self) -> &[Kanji] {
        self.state.incorrect()
    }

    pub fn is_mastered(&self, kanji: Kanji) -> bool {
        self.state.is_mastered(kanji)
    }

    pub fn is_incorrect(&self, kanji: Kanji) -> bool {
        self.state.is_incorrect(kanji)
    }

    pub fn record_mistake(&mut self, kanji: Kanji) {
        if self.state.mark_incorrect(kanji) {
            self.flush(INCORRECT_KEY);
        }
    }

    pub fn record_completion(&mut self, kanji: Kanji) {
        let (removed, added) = self.state.mark_completed(kanji);
        if removed {
            self.flush(INCORRECT_KEY);
        }
        if added {
            self.flush(MASTERED_KEY);
        }
    }

    pub fn reset(&mut self, scope: ResetScope) {
        if matches!(scope, ResetScope::Mastered | ResetScope::All) {
            self.state.mastered.clear();
            self.flush(MASTERED_KEY);
        }
        if matches!(scope, ResetScope::Incorrect | ResetScope::All) {
            self.state.incorrect.clear();
            self.flush(INCORRECT_KEY);
        }
    }

    pub fn active_list(&self, selector: &SetSelector) -> Vec<Kanji> {
        active_list(&self.curriculum, &self.state, selector)
    }

    pub fn compute_progress(&self, selector: &SetSelector) -> Progress {
        compute_progress(&self.active_list(selector), &self.state)
    }

    fn flush(&mut self, key: &str) {
        let list = match key {
            MASTERED_KEY => &self.state.mastered,
            _ => &self.state.incorrect,
        };
        let value = match serde_json::to_string(list) {
            Ok(value) => value,
            Err(e) => {
                warn!("could not encode {key}: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.set(key, &value) {
            warn!("could not persist {key}: {e}");
        }
    }
}

fn read_list<S: KeyValueStore>(backend: &S, key: &str) -> Vec<Kanji> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("could not read {key}, starting empty: {e}");
            return Vec::new();
        }
    };

    let entries: Vec<String> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("malformed {key}, starting empty: {e}");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| {
            let kanji = Kanji::from_entry(entry);
            if kanji.is_none() {
                warn!("skipping unsupported entry {entry:?} in {key}");
            }
            kanji
        })
        .collect()
}
