use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::app::GRID_COLUMNS;
use crate::character::Kanji;
use crate::progress::Status;

pub const EMPTY_SET: &str = "まだありません";

/// Columns one grid cell occupies, glyph included.
const CELL_WIDTH: usize = 3;

fn status_style(status: Status) -> Style {
    match status {
        Status::Mastered => Style::default().fg(Color::Green),
        Status::Incorrect => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Status::Fresh => Style::default(),
    }
}

/// Grid rows for the active list, colour-coded by status.
pub fn grid_lines(
    entries: &[(Kanji, Status)],
    cursor: Option<usize>,
    active: Kanji,
) -> Vec<Line<'static>> {
    entries
        .chunks(GRID_COLUMNS)
        .enumerate()
        .map(|(row, chunk)| {
            let spans = chunk
                .iter()
                .enumerate()
                .flat_map(|(col, (kanji, status))| {
                    let index = row * GRID_COLUMNS + col;
                    let mut style = status_style(*status);
                    if *kanji == active {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    if cursor == Some(index) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let glyph = kanji.as_char();
                    let pad = CELL_WIDTH.saturating_sub(glyph.width().unwrap_or(1));
                    [
                        Span::styled(glyph.to_string(), style),
                        Span::raw(" ".repeat(pad)),
                    ]
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}
