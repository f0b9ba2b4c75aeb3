use ratatui::style::Color;

use crate::character::Kanji;
use crate::session::Generation;

/// Presentation options handed to the widget on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetOptions {
    pub stroke_color: Color,
    pub outline_color: Color,
    pub show_outline: bool,
    /// Reveal the outline as a hint once this many strokes were missed.
    pub hint_after_misses: u32,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            stroke_color: Color::Rgb(0xBC, 0x00, 0x2D),
            outline_color: Color::Rgb(0xF8, 0xF8, 0xF8),
            show_outline: true,
            hint_after_misses: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEventKind {
    /// The learner drew a stroke wrong.
    Mistake,
    /// All strokes reproduced.
    Complete,
    /// The demonstration finished playing.
    AnimationEnd,
}

/// Event reported by a widget instance, tagged with the load it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetEvent {
    pub generation: Generation,
    pub kind: WidgetEventKind,
}

/// Stroke rendering and judging surface.
///
/// `create` replaces whatever instance was shown before; events produced by a
/// torn-down instance carry its old generation.
pub trait StrokeWidget {
    fn create(&mut self, generation: Generation, kanji: Kanji, options: &WidgetOptions);
    fn animate(&mut self);
    fn quiz(&mut self);
}
