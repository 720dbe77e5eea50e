use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameOverReason, GameState, Phase, Position};
use crate::metrics::GameMetrics;
use crate::session::{GameOverSummary, Session};
use crate::storage::ScoreStore;

/// Draws a session snapshot. Never writes back into the game.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: ScoreStore>(
        &self,
        frame: &mut Frame,
        session: &Session<S>,
        metrics: &GameMetrics,
    ) {
        let state = session.state();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(session, metrics), chunks[0]);

        let board_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match (state.phase, session.summary()) {
            (Phase::GameOver(_), Some(summary)) => {
                frame.render_widget(self.render_game_over(summary), board_area);
            }
            _ => frame.render_widget(self.render_grid(state), board_area),
        }

        frame.render_widget(self.render_controls(state.phase), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let n = state.grid_size as i32;
        let lines: Vec<Line> = (0..n)
            .map(|y| {
                (0..n)
                    .map(|x| Self::cell(state, Position::new(x, y)))
                    .collect::<Vec<_>>()
                    .into()
            })
            .collect();

        let title = match state.phase {
            Phase::Idle => " Snake - press Space to start ",
            _ => " Snake ",
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn cell(state: &GameState, pos: Position) -> Span<'static> {
        if pos == state.snake.head() {
            Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else if state.snake.occupies(pos) {
            Span::styled("□ ", Style::default().fg(Color::Green))
        } else if state.food == Some(pos) {
            Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(". ", Style::default().fg(Color::DarkGray))
        }
    }

    fn render_stats<S: ScoreStore>(
        &self,
        session: &Session<S>,
        metrics: &GameMetrics,
    ) -> Paragraph<'static> {
        let state = session.state();
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("High: ", label),
            Span::styled(session.high_score().to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(
                format!(
                    "{} ({} ms)",
                    session.config().difficulty.label(),
                    state.tick_interval_ms
                ),
                value,
            ),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, summary: &GameOverSummary) -> Paragraph<'static> {
        let (title, message) = game_over_text(summary);
        let title_color = if summary.is_new_record() {
            Color::Green
        } else {
            Color::Red
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(title_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    summary.final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
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
                .border_style(Style::default().fg(title_color)),
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
            spans.push(Span::raw(" to start | "));
        }
        spans.extend([
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

/// Heading and detail line of the game-over panel
pub fn game_over_text(summary: &GameOverSummary) -> (&'static str, String) {
    if summary.reason == GameOverReason::BoardFull {
        return (
            "YOU WIN",
            format!("The board is full! High score: {}", summary.high_score.current),
        );
    }

    let previous = summary.high_score.previous;
    if summary.is_new_record() {
        (
            "NEW RECORD",
            format!("You beat your previous best of {previous}!"),
        )
    } else if summary.final_score > 0 {
        ("GAME OVER", format!("Previous best: {previous}"))
    } else if previous > 0 {
        ("GAME OVER", format!("Try again! Previous best: {previous}"))
    } else {
        ("GAME OVER", "Try again!".to_string())
    }
}
