use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameStatus, HookFrame, Position, Snapshot};
use crate::metrics::GameMetrics;

/// Sampling step along the hook line, in cells
const HOOK_LINE_STEP: f64 = 0.25;

/// Draws snapshots produced by the game engine
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame.
    ///
    /// `hook` holds the reel-in frames played so far; the line runs from the
    /// first to the last of them.
    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        hook: &[HookFrame],
        metrics: &GameMetrics,
        paused: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.is_running() {
            frame.render_widget(self.render_grid(snapshot, hook), game_area);
        } else {
            frame.render_widget(self.render_game_over(snapshot), game_area);
        }

        frame.render_widget(self.render_controls(paused), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, hook: &[HookFrame]) -> Paragraph<'_> {
        let head = snapshot.head();
        let hook_head = hook.last().map(HookFrame::cell);
        let hook_line = match (hook.first(), hook.last()) {
            (Some(start), Some(end)) => hook_line_cells(start, end),
            _ => Vec::new(),
        };

        let mut lines = Vec::with_capacity(snapshot.grid_height);

        for y in 0..snapshot.grid_height {
            let mut spans = Vec::with_capacity(snapshot.grid_width);

            for x in 0..snapshot.grid_width {
                let pos = Position::new(x as i32, y as i32);
                let in_reach = head
                    .map(|h| h.distance_to(pos) <= f64::from(snapshot.radius))
                    .unwrap_or(false);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if Some(pos) == hook_head {
                    Span::styled(
                        "◆ ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.targets.contains(&pos) {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if hook_line.contains(&pos) {
                    Span::styled("• ", Style::default().fg(Color::Blue))
                } else if in_reach {
                    Span::styled("· ", Style::default().fg(Color::Blue))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
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
                    .title(" Hook Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Hook: ", label),
            Span::styled(
                format!("{}/{}", snapshot.radius, snapshot.max_radius),
                value,
            ),
            Span::raw("    "),
            Span::styled("Ticks: ", label),
            Span::styled(snapshot.ticks.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let reason = match snapshot.status {
            GameStatus::Terminated(reason) => reason.as_str(),
            GameStatus::Running => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![Span::styled(
                format!("The snake {}", reason),
                Style::default().fg(Color::Gray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
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

    fn render_controls(&self, paused: bool) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Cyan)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ];
        if paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells crossed by the straight hook line from `start` to `end`
pub fn hook_line_cells(start: &HookFrame, end: &HookFrame) -> Vec<Position> {
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let samples = (dx.hypot(dy) / HOOK_LINE_STEP).ceil() as usize;

    let mut cells: Vec<Position> = Vec::with_capacity(samples + 1);
    for i in 0..=samples {
        let t = if samples == 0 {
            0.0
        } else {
            i as f64 / samples as f64
        };
        let cell = Position::new(
            (start.x + dx * t).round() as i32,
            (start.y + dy * t).round() as i32,
        );
        if cells.last() != Some(&cell) {
            cells.push(cell);
        }
    }
    cells
}
