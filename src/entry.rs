use crate::character::Kanji;

/// Free-text character entry with input-method composition awareness.
///
/// Intermediate keystrokes of a composed input must not select anything; only
/// plain changes outside composition and composition commits are tested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterEntry {
    text: String,
    composing: bool,
}

impl CharacterEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            composing: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Field content changed. Yields the last character when it is selectable.
    pub fn on_change(&mut self, text: &str) -> Option<Kanji> {
        self.text = text.to_string();
        if self.composing {
            return None;
        }
        Kanji::last_in(&self.text)
    }

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    /// Composition committed `data`. A valid last character replaces the field.
    pub fn composition_end(&mut self, data: &str) -> Option<Kanji> {
        self.composing = false;
        let kanji = Kanji::last_in(data)?;
        self.text = kanji.to_string();
        Some(kanji)
    }

    /// Append one typed character.
    pub fn push(&mut self, c: char) -> Option<Kanji> {
        let mut text = self.text.clone();
        text.push(c);
        self.on_change(&text)
    }

    pub fn backspace(&mut self) -> Option<Kanji> {
        let mut text = self.text.clone();
        text.pop();
        self.on_change(&text)
    }

    /// Show `kanji` in the field after a selection made elsewhere.
    pub fn sync(&mut self, kanji: Kanji) {
        self.text = kanji.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_change_selects_last_char() {
        let mut entry = CharacterEntry::new();
        assert_eq!(entry.on_change("山").map(Kanji::as_char), Some('山'));
        assert_eq!(entry.on_change("山川").map(Kanji::as_char), Some('川'));
        assert_eq!(entry.text(), "山川");
    }

    #[test]
    fn non_kanji_is_ignored() {
        let mut entry = CharacterEntry::new();
        assert_eq!(entry.on_change("a"), None);
        assert_eq!(entry.on_change("やま"), None);
        assert_eq!(entry.text(), "やま");
    }

    #[test]
    fn composition_suppresses_intermediate_changes() {
        let mut entry = CharacterEntry::new();
        entry.composition_start();
        assert!(entry.is_composing());

        // The IME may show a kanji candidate mid-composition.
        assert_eq!(entry.on_change("y"), None);
        assert_eq!(entry.on_change("やま"), None);
        assert_eq!(entry.on_change("山"), None);

        assert_eq!(entry.composition_end("山").map(Kanji::as_char), Some('山'));
        assert!(!entry.is_composing());
        assert_eq!(entry.text(), "山");
    }

    #[test]
    fn composition_commit_uses_last_char() {
        let mut entry = CharacterEntry::new();
        entry.composition_start();
        assert_eq!(entry.composition_end("火山").map(Kanji::as_char), Some('山'));
        assert_eq!(entry.text(), "山");
    }

    #[test]
    fn invalid_commit_leaves_text() {
        let mut entry = CharacterEntry::with_text("永");
        entry.composition_start();
        entry.on_change("やま");
        assert_eq!(entry.composition_end("やま"), None);
        assert_eq!(entry.text(), "やま");
        assert!(!entry.is_composing());
    }

    #[test]
    fn push_and_backspace() {
        let mut entry = CharacterEntry::with_text("永");
        assert_eq!(entry.push('x'), None);
        assert_eq!(entry.backspace().map(Kanji::as_char), Some('永'));
        assert_eq!(entry.backspace(), None);
        assert_eq!(entry.text(), "");
    }
}
