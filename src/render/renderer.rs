use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Phase, Position, Snapshot};

/// Green channel of the head; each following segment keeps 95% of the previous one
const HEAD_GREEN: u8 = 255;
const BODY_FADE: f64 = 0.95;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.phase {
            Phase::NotStarted => frame.render_widget(self.render_title(), game_area),
            Phase::Running => frame.render_widget(self.render_grid(snapshot), game_area),
            Phase::GameOver => {
                // frozen board on top, result panel below it
                let board_height = (snapshot.grid.rows as u16).saturating_add(2);
                let areas = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(board_height), Constraint::Min(0)])
                    .split(game_area);
                frame.render_widget(self.render_grid(snapshot), areas[0]);
                frame.render_widget(self.render_game_over(snapshot), areas[1]);
            }
        }

        frame.render_widget(self.render_controls(snapshot.phase), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let head = snapshot.head();
        let segments: HashMap<Position, Color> = snapshot
            .snake
            .iter()
            .copied()
            .zip(segment_colors())
            .collect();

        let mut lines = Vec::with_capacity(snapshot.grid.rows as usize);

        for y in 0..snapshot.grid.rows {
            let mut spans = Vec::with_capacity(snapshot.grid.cols as usize);

            for x in 0..snapshot.grid.cols {
                let pos = Position::new(x, y);

                let cell = match segments.get(&pos) {
                    Some(&color) if head == Some(pos) => Span::styled(
                        "■ ",
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Some(&color) => Span::styled("□ ", Style::default().fg(color)),
                    None if snapshot.food == Some(pos) => Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("Your Score: ", Style::default().fg(Color::Green)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Highest Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_title(&self) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Feed The Snake",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("■□□□", Style::default().fg(Color::Green)),
                Span::raw("   "),
                Span::styled("●", Style::default().fg(Color::Red)),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press Space Bar to Begin Game",
                Style::default().fg(Color::Gray),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Game Over!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Your Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Highest Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.high_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space Bar",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to Play Again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
        ];
        if phase != Phase::Running {
            spans.push(Span::styled("Space", Style::default().fg(Color::Green)));
            spans.push(Span::raw(" to play | "));
        }
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Segment colors from the head backwards, each green rounded from the one before
fn segment_colors() -> impl Iterator<Item = Color> {
    let greens = std::iter::successors(Some(HEAD_GREEN), |&green| {
        Some((green as f64 * BODY_FADE + 0.5).floor() as u8)
    });

    greens.enumerate().map(|(index, green)| {
        if index == 0 {
            Color::Rgb(0, green, 0)
        } else {
            Color::Rgb(100, green, 50)
        }
    })
}
