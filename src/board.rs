//! Terminal implementation of the stroke widget.
//!
//! A terminal cannot judge brush strokes, so the quiz is self-checked: the
//! learner writes on paper with the character hidden, then reports each wrong
//! stroke and the finished character from the keyboard. The demonstration is a
//! timed brush animation driven by ticks.

use crossterm::event::KeyCode;

use crate::character::Kanji;
use crate::session::Generation;
use crate::widget::{StrokeWidget, WidgetEvent, WidgetEventKind, WidgetOptions};

/// Ticks a demonstration lasts.
pub const DEMO_FRAMES: u32 = 15;

pub const MISTAKE_KEY: char = 'x';
pub const COMPLETE_KEY: char = 'c';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardMode {
    Still,
    Animating { frame: u32 },
    Quizzing { misses: u32 },
    Solved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardInstance {
    pub generation: Generation,
    pub kanji: Kanji,
    pub options: WidgetOptions,
    pub mode: BoardMode,
}

impl BoardInstance {
    fn event(&self, kind: WidgetEventKind) -> WidgetEvent {
        WidgetEvent {
            generation: self.generation,
            kind,
        }
    }

    /// Whether the character is drawn (fully or as a hint) in the current mode.
    pub fn shows_character(&self) -> bool {
        match self.mode {
            BoardMode::Still | BoardMode::Solved => true,
            BoardMode::Animating { frame } => frame >= DEMO_FRAMES / 2,
            BoardMode::Quizzing { misses } => {
                self.options.show_outline && misses >= self.options.hint_after_misses
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TerminalBoard {
    instance: Option<BoardInstance>,
}

impl TerminalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance(&self) -> Option<&BoardInstance> {
        self.instance.as_ref()
    }

    /// Advance the demonstration by one frame.
    pub fn on_tick(&mut self) -> Option<WidgetEvent> {
        let instance = self.instance.as_mut()?;
        match instance.mode {
            BoardMode::Animating { frame } if frame + 1 >= DEMO_FRAMES => {
                instance.mode = BoardMode::Still;
                Some(instance.event(WidgetEventKind::AnimationEnd))
            }
            BoardMode::Animating { frame } => {
                instance.mode = BoardMode::Animating { frame: frame + 1 };
                None
            }
            _ => None,
        }
    }

    /// Self-check input while quizzing; other keys and modes are ignored.
    pub fn on_key(&mut self, code: KeyCode) -> Option<WidgetEvent> {
        let instance = self.instance.as_mut()?;
        let BoardMode::Quizzing { misses } = instance.mode else {
            return None;
        };
        match code {
            KeyCode::Char(MISTAKE_KEY) => {
                instance.mode = BoardMode::Quizzing { misses: misses + 1 };
                Some(instance.event(WidgetEventKind::Mistake))
            }
            KeyCode::Char(COMPLETE_KEY) => {
                instance.mode = BoardMode::Solved;
                Some(instance.event(WidgetEventKind::Complete))
            }
            _ => None,
        }
    }
}

impl StrokeWidget for TerminalBoard {
    fn create(&mut self, generation: Generation, kanji: Kanji, options: &WidgetOptions) {
        self.instance = Some(BoardInstance {
            generation,
            kanji,
            options: *options,
            mode: BoardMode::Still,
        });
    }

    fn animate(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.mode = BoardMode::Animating { frame: 0 };
        }
    }

    fn quiz(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.mode = BoardMode::Quizzing { misses: 0 };
        }
    }
}
