use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameState, Phase, Position};
use crate::metrics::GameMetrics;

pub const BACKGROUND_COLOR: Color = Color::Rgb(0xe8, 0xf5, 0xe9);
pub const BODY_COLOR: Color = Color::Rgb(0x4c, 0xaf, 0x50);
pub const HEAD_COLOR: Color = Color::Rgb(0x38, 0x8e, 0x3c);
pub const FOOD_COLOR: Color = Color::Rgb(0xff, 0x57, 0x22);

/// Terminal columns per grid cell, so cells come out roughly square
pub const CELL_WIDTH: u16 = 2;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        let board_area = centered_rect(
            board_extent(state.grid_width, CELL_WIDTH),
            board_extent(state.grid_height, 1),
            chunks[1],
        );
        frame.render_widget(self.render_grid(state), board_area);

        // Panels go on top of the board, which stays visible around them
        match state.phase {
            Phase::Idle => {
                let hint_area = centered_rect(34, 3, board_area);
                frame.render_widget(Clear, hint_area);
                frame.render_widget(self.render_start_hint(), hint_area);
            }
            Phase::Over => {
                let panel_area = centered_rect(30, 7, board_area);
                frame.render_widget(Clear, panel_area);
                frame.render_widget(self.render_game_over(state), panel_area);
            }
            Phase::Running => {}
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let background = Style::default().bg(BACKGROUND_COLOR);
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    Span::styled("██", background.fg(HEAD_COLOR))
                } else if state.snake.contains(pos) {
                    Span::styled("██", background.fg(BODY_COLOR))
                } else if pos == state.food {
                    Span::styled(
                        "● ",
                        background.fg(FOOD_COLOR).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("  ", background)
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("High: ", label),
            Span::styled(state.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}/{}", state.speed, state.speed_ceiling), value),
            Span::raw("    "),
            Span::styled("Food: ", label),
            Span::styled(metrics.food_eaten.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_start_hint(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Space",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" or an arrow key", Style::default().fg(Color::Gray)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .style(Style::default().bg(Color::Black)),
        )
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let headline = if state.board_full {
            "BOARD CLEARED"
        } else {
            "GAME OVER"
        };

        let text = vec![
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" restart  ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw("/"),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw("/drag to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" start | "),
            Span::styled("+/-", Style::default().fg(Color::Cyan)),
            Span::raw(" max speed | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal cells needed for `cells` grid cells of `scale` columns plus borders
fn board_extent(cells: usize, scale: u16) -> u16 {
    u16::try_from(cells)
        .unwrap_or(u16::MAX)
        .saturating_mul(scale)
        .saturating_add(2)
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Snake;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn draw(state: &GameState) -> Buffer {
        draw_with(state, &GameMetrics::new())
    }

    fn draw_with(state: &GameState, metrics: &GameMetrics) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        let renderer = Renderer::new();

        terminal
            .draw(|frame| renderer.render(frame, state, metrics))
            .unwrap();

        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn state(phase: Phase) -> GameState {
        let mut state = GameState::new(
            Snake::from_segments(vec![Position::new(10, 10), Position::new(9, 10)]),
            Position::new(3, 4),
            20,
            20,
        );
        state.phase = phase;
        state.score = 30;
        state.high_score = 120;
        state.speed = 8;
        state.speed_ceiling = 12;
        state
    }

    #[test]
    fn test_running_board() {
        let buffer = draw(&state(Phase::Running));
        let screen = text(&buffer);

        assert!(screen.contains("Score: 30"));
        assert!(screen.contains("High: 120"));
        assert!(screen.contains("Speed: 8/12"));
        assert!(screen.contains('●'));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_header_shows_game_metrics() {
        let mut metrics = GameMetrics::new();
        metrics.food_eaten = 3;
        metrics.games_played = 2;
        metrics.run_time = std::time::Duration::from_secs(65);

        let screen = text(&draw_with(&state(Phase::Running), &metrics));

        assert!(screen.contains("Food: 3"));
        assert!(screen.contains("Time: 01:05"));
        assert!(screen.contains("Games: 2"));
    }

    #[test]
    fn test_head_is_distinct() {
        let buffer = draw(&state(Phase::Running));

        let head_cells = buffer.content.iter().filter(|c| c.fg == HEAD_COLOR).count();
        let body_cells = buffer.content.iter().filter(|c| c.fg == BODY_COLOR).count();

        assert_eq!(head_cells, CELL_WIDTH as usize);
        assert_eq!(body_cells, CELL_WIDTH as usize);
    }

    #[test]
    fn test_idle_shows_start_hint() {
        let screen = text(&draw(&state(Phase::Idle)));
        assert!(screen.contains("or an arrow key"));
    }

    #[test]
    fn test_game_over_panel() {
        let screen = text(&draw(&state(Phase::Over)));

        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Final score: 30"));
    }

    #[test]
    fn test_board_cleared_panel() {
        let mut state = state(Phase::Over);
        state.board_full = true;

        let screen = text(&draw(&state));
        assert!(screen.contains("BOARD CLEARED"));
    }

    #[test]
    fn test_board_extent_saturates() {
        assert_eq!(board_extent(20, CELL_WIDTH), 42);
        assert_eq!(board_extent(40000, CELL_WIDTH), u16::MAX);
        assert_eq!(board_extent(usize::MAX, 1), u16::MAX);
    }

    #[test]
    fn test_oversized_grid_is_clipped_not_panicking() {
        let mut state = state(Phase::Running);
        state.grid_width = 40000;

        let screen = text(&draw(&state));
        assert!(screen.contains("Score: 30"));
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(centered_rect(4, 1, area), Rect::new(3, 2, 4, 1));
        assert_eq!(centered_rect(40, 40, area), area);
    }
}
