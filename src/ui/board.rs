use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::board::{BoardMode, TerminalBoard, DEMO_FRAMES};

const GUIDE_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Draw the practice square: a dotted centre guide, the character when the
/// current mode reveals it, and a status row along the bottom.
pub fn render_board(board: &TerminalBoard, area: Rect, buf: &mut Buffer) {
    let title = match board.instance().map(|i| i.mode) {
        None => " 書き順 ",
        Some(BoardMode::Still) => " 書き順 ",
        Some(BoardMode::Animating { .. }) => " お手本 ",
        Some(BoardMode::Quizzing { .. }) => " テスト ",
        Some(BoardMode::Solved) => " 完成 ",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width < 4 || inner.height < 3 {
        return;
    }

    let mid_x = inner.x + inner.width / 2;
    let mid_y = inner.y + (inner.height - 1) / 2;
    for x in inner.x..inner.x + inner.width {
        buf.set_string(x, mid_y, "┄", GUIDE_STYLE);
    }
    for y in inner.y..inner.y + inner.height - 1 {
        buf.set_string(mid_x, y, "┆", GUIDE_STYLE);
    }

    let Some(instance) = board.instance() else {
        return;
    };

    let glyph = instance.kanji.as_char();
    if instance.shows_character() {
        let style = match instance.mode {
            BoardMode::Quizzing { .. } => Style::default()
                .fg(instance.options.outline_color)
                .add_modifier(Modifier::DIM),
            _ => Style::default()
                .fg(instance.options.stroke_color)
                .add_modifier(Modifier::BOLD),
        };
        let width = glyph.width().unwrap_or(2) as u16;
        buf.set_string(
            mid_x.saturating_sub(width / 2),
            mid_y,
            glyph.to_string(),
            style,
        );
    }

    let status_y = inner.y + inner.height - 1;
    let stroke_style = Style::default().fg(instance.options.stroke_color);
    match instance.mode {
        BoardMode::Animating { frame } => {
            let filled = (u32::from(inner.width) * (frame + 1) / DEMO_FRAMES) as usize;
            buf.set_string(inner.x, status_y, "━".repeat(filled), stroke_style);
        }
        BoardMode::Quizzing { misses } => {
            buf.set_string(inner.x, status_y, format!("ミス {misses}"), stroke_style);
        }
        BoardMode::Solved => {
            buf.set_string(inner.x, status_y, "◎", stroke_style);
        }
        BoardMode::Still => {}
    }
}
