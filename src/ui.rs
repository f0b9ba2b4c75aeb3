pub mod board;
pub mod grid;
pub mod reward;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Widget},
};

use crate::app::{App, Focus};
use crate::celebration::CelebrationAnimation;
use crate::lookup::MetadataSource;
use crate::metadata::MetadataView;
use crate::progress::{SetSelector, INCORRECT_SET_LABEL};
use crate::session::Phase;
use crate::storage::KeyValueStore;

const HORIZONTAL_MARGIN: u16 = 1;
const BOARD_WIDTH: u16 = 26;
const BOARD_HEIGHT: u16 = 11;

impl<S: KeyValueStore, M: MetadataSource> Widget for &App<S, M> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let view = session.view();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(BOARD_HEIGHT),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let progress = view.progress;
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" 筆順 "))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(u16::from(progress.percent.min(100)))
            .label(format!(
                "{} 進行度  {} / {}",
                view.title, progress.mastered, progress.total
            ))
            .render(chunks[0], buf);

        let titles = self
            .selectors()
            .iter()
            .map(|selector| match selector {
                SetSelector::Incorrect => INCORRECT_SET_LABEL.to_string(),
                SetSelector::Named(name) => name.clone(),
            })
            .collect::<Vec<_>>();
        Tabs::new(titles)
            .select(self.selected_tab())
            .highlight_style(bold_style.fg(Color::Yellow))
            .render(chunks[1], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Min(10)])
            .split(chunks[2]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(BOARD_HEIGHT), Constraint::Min(0)])
            .split(body[0]);

        board::render_board(session.widget(), left[0], buf);
        info_card(session.active().as_char(), session.info()).render(left[1], buf);

        let grid_block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", view.title));
        let grid_area = grid_block.inner(body[1]);
        grid_block.render(body[1], buf);
        let cursor = (self.focus == Focus::Grid).then_some(self.cursor);
        let lines = if view.entries.is_empty() {
            vec![Line::from(Span::styled(grid::EMPTY_SET, italic_style))]
        } else {
            grid::grid_lines(&view.entries, cursor, session.active())
        };
        Paragraph::new(lines).render(grid_area, buf);

        let entry_style = if self.focus == Focus::Entry {
            bold_style.fg(Color::Yellow)
        } else {
            dim_style
        };
        Paragraph::new(Line::from(vec![
            Span::styled("漢字: ", entry_style),
            Span::styled(self.entry.text().to_string(), entry_style),
            Span::styled(
                if self.focus == Focus::Entry { "▏" } else { "" },
                entry_style,
            ),
        ]))
        .render(chunks[3], buf);

        Paragraph::new(Span::styled(legend(self.focus, session.phase()), italic_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        if let Some(reward) = session.reward() {
            reward::render_reward(reward, session.info(), self.notice.as_deref(), area, buf);
        }

        let celebration = session.celebration();
        if celebration.is_active {
            render_celebration_particles(celebration, area, buf);
        }
    }
}

fn info_card(character: char, info: &MetadataView) -> Paragraph<'static> {
    let label_style = Style::default().fg(Color::Cyan);
    let block = Block::default().borders(Borders::ALL).title(" 字 ");

    let lines = match info.info() {
        None => vec![
            Line::from(Span::styled(
                character.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "読み込み中…",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ],
        Some(info) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    character.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![Span::styled("訓: ", label_style), Span::raw(info.kun.clone())]),
                Line::from(vec![Span::styled("音: ", label_style), Span::raw(info.on.clone())]),
                Line::from(vec![
                    Span::styled("意味: ", label_style),
                    Span::raw(info.meaning.clone()),
                ]),
            ];
            if let Some(strokes) = info.stroke_count {
                lines.push(Line::from(vec![
                    Span::styled("画数: ", label_style),
                    Span::raw(strokes.to_string()),
                ]));
            }
            lines
        }
    };
    Paragraph::new(lines).block(block)
}

fn legend(focus: Focus, phase: Phase) -> &'static str {
    match (focus, phase) {
        (_, Phase::Rewarding) => "(enter) 次へ / (o) 画像を開く",
        (Focus::Entry, _) => "漢字を入力 / (esc) 戻る",
        (Focus::Grid, Phase::Quizzing) => {
            "(x) 書き間違い / (c) 書けた / (d) お手本 / (esc) 終了"
        }
        (Focus::Grid, _) => {
            "(d) お手本 / (s) テスト / (tab) 学年 / (enter) 選ぶ / (/) 入力 / (esc) 終了"
        }
    }
}

/// Render celebration particles on top of everything else
fn render_celebration_particles(celebration: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];
            let alpha = 1.0 - (particle.age / particle.max_age);

            let style = if particle.is_text {
                if alpha > 0.4 {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                }
            } else if alpha > 0.7 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if alpha > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}
