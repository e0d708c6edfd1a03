use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};

use crate::game::{GameConfig, GameEngine, Intent, TickResult};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Redraw cadence for the session clock when nothing else changes
const CLOCK_REFRESH: Duration = Duration::from_millis(250);

/// What handling one input did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unchanged,
    Changed,
    /// A new session started; the tick timer must be re-armed
    Restarted,
}

/// Keyboard-driven play in the terminal
pub struct HumanMode {
    engine: GameEngine,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let renderer = Renderer::new(config.cell_width);
        let engine = GameEngine::new(config).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            stats: SessionStats::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        // Restore on every path, including a failed screen setup
        let played = self.play_in_alternate_screen().await;
        let restored = restore_terminal();

        info!(
            "Quit after {} games, best score {}",
            self.stats.games_played(),
            self.stats.best_score()
        );
        settle(played, restored)
    }

    async fn play_in_alternate_screen(&mut self) -> Result<()> {
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        self.run_game_loop(&mut terminal).await
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // First move happens one full period after start
        let tick_period = self.engine.config().tick_interval();
        let mut tick_timer = interval_at(Instant::now() + tick_period, tick_period);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut clock_timer = interval(CLOCK_REFRESH);

        self.draw(terminal)?;

        loop {
            let mut dirty = false;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => match self.handle_event(event) {
                            Outcome::Unchanged => {}
                            Outcome::Changed => dirty = true,
                            Outcome::Restarted => {
                                tick_timer.reset();
                                dirty = true;
                            }
                        },
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, only scheduled while the session runs
                _ = tick_timer.tick(), if self.engine.run_state().is_running() => {
                    dirty = self.update_game();
                }

                // Keep the clock moving
                _ = clock_timer.tick() => {
                    dirty = true;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            if dirty {
                self.draw(terminal)?;
            }
        }

        Ok(())
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        terminal
            .draw(|frame| {
                self.renderer.render(frame, self.engine.state(), &self.stats);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Outcome {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = self.input_handler.handle_key_event(key);
                self.handle_action(action)
            }
            Event::Resize(..) => Outcome::Changed,
            _ => Outcome::Unchanged,
        }
    }

    fn handle_action(&mut self, action: KeyAction) -> Outcome {
        match action {
            KeyAction::Intent(Intent::Restart) => {
                if self.engine.request_restart() {
                    self.stats.record_start();
                    Outcome::Restarted
                } else {
                    Outcome::Unchanged
                }
            }
            KeyAction::Intent(intent) => {
                self.engine.apply(intent);
                // Pending direction is not drawn
                Outcome::Unchanged
            }
            KeyAction::Quit => {
                self.should_quit = true;
                Outcome::Unchanged
            }
            KeyAction::None => Outcome::Unchanged,
        }
    }

    /// Run one tick; returns whether the screen needs a redraw
    fn update_game(&mut self) -> bool {
        match self.engine.tick() {
            TickResult::GameOver { final_score, .. } => {
                self.stats.record_game_over(final_score);
                true
            }
            result => result.changed_state(),
        }
    }
}

/// Undo raw mode and the alternate screen; attempts both even if one fails
fn restore_terminal() -> Result<()> {
    let raw_mode = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(stderr(), LeaveAlternateScreen, Show)
        .context("Failed to leave alternate screen");
    raw_mode.and(screen)
}

/// A failed game outranks a failed terminal restore
fn settle(played: Result<()>, restored: Result<()>) -> Result<()> {
    played.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, RunState};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::small().with_seed(1)).unwrap()
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    /// Steer up until the snake leaves the grid
    fn crash(mode: &mut HumanMode) {
        mode.handle_action(KeyAction::Intent(Intent::Turn(Direction::Up)));
        for _ in 0..20 {
            mode.update_game();
        }
        assert_eq!(mode.engine.run_state(), RunState::GameOver);
    }

    #[test]
    fn test_game_error_wins_over_restore_error() {
        let err = settle(
            Err(anyhow::anyhow!("Failed to draw frame")),
            Err(anyhow::anyhow!("Failed to disable raw mode")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to draw frame");

        let restore_failed = Err(anyhow::anyhow!("Failed to disable raw mode"));
        let err = settle(Ok(()), restore_failed).unwrap_err();
        assert_eq!(err.to_string(), "Failed to disable raw mode");

        assert!(settle(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.engine.state().is_running());
        assert_eq!(mode.engine.state().score(), 0);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(HumanMode::new(GameConfig::new(1, 1)).is_err());
    }

    #[test]
    fn test_direction_keys_buffer_intent() {
        let mut mode = mode();

        let outcome = mode.handle_event(key(KeyCode::Up, KeyEventKind::Press));
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(mode.engine.state().pending_direction(), Direction::Up);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = mode();

        mode.handle_event(key(KeyCode::Char('q'), KeyEventKind::Release));
        assert!(!mode.should_quit);

        mode.handle_event(key(KeyCode::Char('q'), KeyEventKind::Press));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut mode = mode();
        mode.update_game();
        let before = mode.engine.state().clone();

        let outcome = mode.handle_action(KeyAction::Intent(Intent::Restart));

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(mode.engine.state(), &before);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut mode = mode();
        crash(&mut mode);
        assert_eq!(mode.stats.games_played(), 1);

        // Ticks after game over change nothing
        assert!(!mode.update_game());

        let outcome = mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(outcome, Outcome::Restarted);
        assert!(mode.engine.state().is_running());
        assert_eq!(mode.engine.state().score(), 0);
    }
}
