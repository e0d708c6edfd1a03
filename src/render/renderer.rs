use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::SessionStats;

const OVERLAY_WIDTH: u16 = 36;
const OVERLAY_HEIGHT: u16 = 9;
/// Header and footer rows around the board
const CHROME_ROWS: u16 = 6;

/// Draws a read-only view of the engine state
pub struct Renderer {
    cell_width: u16,
}

impl Renderer {
    /// `cell_width` is the number of terminal columns one grid cell takes
    pub fn new(cell_width: u16) -> Self {
        Self {
            cell_width: cell_width.max(1),
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, stats: &SessionStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, stats), chunks[0]);

        // Never draw a clipped board: hidden rows could hide the food
        let area = chunks[1];
        match self.board_size(state) {
            Some((width, height)) if width <= area.width && height <= area.height => {
                let board_area = centered_rect(width, height, area);
                frame.render_widget(self.render_grid(state), board_area);
            }
            board => {
                let screen = frame.area();
                frame.render_widget(self.render_too_small(state, board, screen), area);
                frame.render_widget(self.render_controls(), chunks[2]);
                return;
            }
        }

        // Game over keeps the board visible underneath
        if !state.is_running() {
            let overlay_area = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area);
            frame.render_widget(Clear, overlay_area);
            frame.render_widget(self.render_game_over(state), overlay_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// Columns and rows of the bordered board, if it is addressable at all
    fn board_size(&self, state: &GameState) -> Option<(u16, u16)> {
        let width = u16::try_from(state.grid_width())
            .ok()?
            .checked_mul(self.cell_width)?
            .checked_add(2)?;
        let height = u16::try_from(state.grid_height()).ok()?.checked_add(2)?;
        Some((width, height))
    }

    fn render_too_small(
        &self,
        state: &GameState,
        board: Option<(u16, u16)>,
        screen: Rect,
    ) -> Paragraph<'static> {
        let need = match board {
            Some((width, height)) => {
                format!("{}x{}", width, height.saturating_add(CHROME_ROWS))
            }
            None => "more room than a terminal has".to_string(),
        };

        let mut text = vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "need {need}, have {}x{}",
                screen.width, screen.height
            )),
        ];
        if !state.is_running() {
            text.push(Line::from(Span::styled(
                format!("GAME OVER - Final Score: {}", state.score()),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn cell(&self, symbol: &str, style: Style) -> Span<'static> {
        let pad = " ".repeat(self.cell_width as usize - 1);
        Span::styled(format!("{symbol}{pad}"), style)
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let head = state.snake().head();
        let mut lines = Vec::with_capacity(state.grid_height());

        for y in 0..state.grid_height() {
            let mut spans = Vec::with_capacity(state.grid_width());

            for x in 0..state.grid_width() {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    // Snake head - distinct color
                    self.cell(
                        "■",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    self.cell("■", Style::default().fg(Color::Green))
                } else if state.food() == Some(pos) {
                    self.cell(
                        "O",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    self.cell(".", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let border_color = if state.is_running() {
            Color::White
        } else {
            Color::DarkGray
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border_color))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, stats: &SessionStats) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                state.score().to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(stats.best_score().max(state.score()).to_string(), value),
            Span::raw("    "),
            Span::styled("Ticks: ", label),
            Span::styled(state.ticks().to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(stats.clock_label(), value),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score().to_string(),
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
                Span::styled(" or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(2)
    }
}

/// A `width` x `height` rectangle centred in `area`, clamped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, RunState, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn sample_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(1, 1)),
            Direction::Right,
            10,
            10,
        )
    }

    fn draw(state: &GameState) -> String {
        draw_sized(state, 60, 26)
    }

    fn draw_sized(state: &GameState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let renderer = Renderer::default();
        let stats = SessionStats::new();

        terminal
            .draw(|frame| renderer.render(frame, state, &stats))
            .unwrap();

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_snake_food_and_score() {
        let screen = draw(&sample_state());

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Snake"));
        assert_eq!(screen.matches('■').count(), 3);
        assert_eq!(screen.matches('O').count(), 1);
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_game_over_overlay_shows_final_score() {
        let mut state = sample_state();
        state.score = 7;
        state.run_state = RunState::GameOver;

        let screen = draw(&state);

        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Final Score: 7"));
        assert!(screen.contains("Press R or Space to restart"));
    }

    #[test]
    fn test_renders_without_food() {
        let mut state = sample_state();
        state.food = None;

        let screen = draw(&state);
        assert_eq!(screen.matches('O').count(), 0);
    }

    #[test]
    fn test_default_grid_on_small_terminal_asks_for_room() {
        let state = GameState::new(
            Snake::new(Position::new(16, 15), Direction::Right, 3),
            Some(Position::new(5, 25)),
            Direction::Right,
            30,
            30,
        );

        let screen = draw_sized(&state, 80, 24);

        assert!(screen.contains("Terminal too small"));
        assert!(screen.contains("need 62x38, have 80x24"));
        assert_eq!(screen.matches('■').count(), 0);

        // The same state fits once the terminal is tall enough
        let screen = draw_sized(&state, 80, 38);
        assert!(!screen.contains("Terminal too small"));
        assert_eq!(screen.matches('O').count(), 1);
        assert_eq!(screen.matches('■').count(), 3);
    }

    #[test]
    fn test_small_terminal_still_reports_final_score() {
        let mut state = sample_state();
        state.score = 4;
        state.run_state = RunState::GameOver;

        let screen = draw_sized(&state, 40, 12);

        assert!(screen.contains("Terminal too small"));
        assert!(screen.contains("Final Score: 4"));
    }

    #[test]
    fn test_cell_width_pads_symbol() {
        let renderer = Renderer::new(3);
        let span = renderer.cell(".", Style::default());
        assert_eq!(span.content, ".  ");

        // Zero is clamped to a single column
        let renderer = Renderer::new(0);
        assert_eq!(renderer.cell(".", Style::default()).content, ".");
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(40, 40, area), area);
    }
}
