//! Terminal front end state: routes keys and runtime events into the session.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::board::TerminalBoard;
use crate::celebration::CelebrationAnimation;
use crate::character::Kanji;
use crate::entry::CharacterEntry;
use crate::lookup::MetadataSource;
use crate::progress::SetSelector;
use crate::runtime::AppEvent;
use crate::session::{Phase, SessionController};
use crate::storage::KeyValueStore;

/// Characters per grid row.
pub const GRID_COLUMNS: usize = 10;

pub type Session<S, M> = SessionController<S, TerminalBoard, M, CelebrationAnimation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Grid,
    Entry,
}

pub struct App<S: KeyValueStore, M: MetadataSource> {
    pub session: Session<S, M>,
    pub entry: CharacterEntry,
    pub focus: Focus,
    pub cursor: usize,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl<S: KeyValueStore, M: MetadataSource> App<S, M> {
    pub fn new(session: Session<S, M>) -> Self {
        let mut entry = CharacterEntry::new();
        entry.sync(session.active());
        Self {
            session,
            entry,
            focus: Focus::Grid,
            cursor: 0,
            notice: None,
            should_quit: false,
        }
    }

    /// Selectors in tab order: every curriculum set, then the incorrect set.
    pub fn selectors(&self) -> Vec<SetSelector> {
        self.session
            .store()
            .curriculum()
            .names()
            .map(SetSelector::named)
            .chain(std::iter::once(SetSelector::Incorrect))
            .collect()
    }

    pub fn selected_tab(&self) -> usize {
        let current = self.session.selector();
        self.selectors()
            .iter()
            .position(|s| s == current)
            .unwrap_or(0)
    }

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize(w, h) => self.session.celebration_mut().resize(w, h),
            AppEvent::Paste(text) => self.on_paste(&text),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Metadata(response) => self.session.on_metadata(response),
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(event) = self.session.widget_mut().on_tick() {
            self.session.on_widget_event(event);
        }
        self.session.celebration_mut().update();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.session.phase() == Phase::Rewarding {
            self.on_reward_key(key.code);
            return;
        }

        match self.focus {
            Focus::Entry => self.on_entry_key(key.code),
            Focus::Grid => self.on_grid_key(key),
        }
    }

    fn on_reward_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc => {
                self.notice = None;
                if let Err(e) = self.session.dismiss_reward() {
                    debug!("{e}");
                }
            }
            KeyCode::Char('o') => {
                if let Some(reward) = self.session.reward() {
                    if !reward.image.open() {
                        self.notice = Some(format!("画像: {}", reward.image));
                    }
                }
            }
            _ => {}
        }
    }

    fn on_entry_key(&mut self, code: KeyCode) {
        let selected = match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Grid;
                None
            }
            KeyCode::Backspace => self.entry.backspace(),
            KeyCode::Char(c) => self.entry.push(c),
            _ => None,
        };
        if let Some(kanji) = selected {
            self.session.select_kanji(kanji);
        }
    }

    fn on_paste(&mut self, text: &str) {
        if self.session.phase() == Phase::Rewarding {
            return;
        }
        self.entry.composition_start();
        if let Some(kanji) = self.entry.composition_end(text) {
            self.session.select_kanji(kanji);
            self.focus = Focus::Entry;
        }
    }

    fn on_grid_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.cycle_set(1),
            KeyCode::BackTab => {
                let len = self.selectors().len();
                self.cycle_set(len.saturating_sub(1));
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(selector) = self.selectors().get(index).cloned() {
                    self.show_set(selector);
                }
            }
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-(GRID_COLUMNS as isize)),
            KeyCode::Down => self.move_cursor(GRID_COLUMNS as isize),
            KeyCode::Enter => {
                if let Some(kanji) = self.kanji_at_cursor() {
                    self.select(kanji);
                }
            }
            KeyCode::Char('/') => self.focus = Focus::Entry,
            KeyCode::Char('d') => {
                if let Err(e) = self.session.show_demo() {
                    debug!("{e}");
                }
            }
            KeyCode::Char('s') => {
                if let Err(e) = self.session.start_quiz() {
                    debug!("{e}");
                }
            }
            code => {
                if let Some(event) = self.session.widget_mut().on_key(code) {
                    self.session.on_widget_event(event);
                }
            }
        }
    }

    pub fn select(&mut self, kanji: Kanji) {
        self.session.select_kanji(kanji);
        self.entry.sync(kanji);
    }

    pub fn show_set(&mut self, selector: SetSelector) {
        self.session.select_set(selector);
        self.cursor = 0;
    }

    /// The cell under the cursor, clamped to the current length of the set.
    pub fn kanji_at_cursor(&self) -> Option<Kanji> {
        let list = self.session.store().active_list(self.session.selector());
        list.get(self.cursor.min(list.len().saturating_sub(1)))
            .copied()
    }

    fn cycle_set(&mut self, step: usize) {
        let selectors = self.selectors();
        let next = (self.selected_tab() + step) % selectors.len();
        self.show_set(selectors[next].clone());
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.session.store().active_list(self.session.selector()).len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        // the incorrect set shrinks as characters are completed
        self.cursor = self.cursor.min(len - 1);
        let target = self.cursor as isize + delta;
        if (0..len as isize).contains(&target) {
            self.cursor = target as usize;
        }
    }
}
