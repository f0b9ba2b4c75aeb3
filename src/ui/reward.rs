use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::metadata::{MetadataView, NOT_AVAILABLE};
use crate::session::Reward;

const OVERLAY_WIDTH: u16 = 44;
const OVERLAY_HEIGHT: u16 = 10;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Modal shown after a completed quiz, until dismissed.
pub fn render_reward(
    reward: &Reward,
    info: &MetadataView,
    notice: Option<&str>,
    area: Rect,
    buf: &mut Buffer,
) {
    let overlay = centered(area, OVERLAY_WIDTH, OVERLAY_HEIGHT);
    Clear.render(overlay, buf);

    let gloss = info
        .info()
        .map(|i| i.meaning.as_str())
        .unwrap_or(NOT_AVAILABLE);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}: {}", reward.kanji, gloss),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("ミス {}", reward.mistakes), dim)),
        Line::from(""),
        Line::from(Span::styled(reward.image.location(), dim)),
    ];
    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[enter] 次へ   [o] 画像",
        Style::default().fg(Color::Green),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" お見事！ ")
                .title_alignment(Alignment::Center),
        )
        .render(overlay, buf);
}
