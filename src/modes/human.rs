use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::session::Session;
use crate::storage::ScoreStore;

/// Render at ~30 FPS, independent of the game speed
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    session: Session<Box<dyn ScoreStore>>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Self {
        Self {
            session: Session::new(config, store),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Pending until a game is running; the session owns the period
                result = self.session.next_tick() => {
                    if result.terminated {
                        self.metrics.on_game_over(self.session.state().score);
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        tracing::info!(
            games_played = self.metrics.games_played,
            best = self.metrics.best_this_run,
            "leaving"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Move(direction) => {
                self.session.request_direction(direction);
            }
            KeyAction::Start => {
                if self.session.start() {
                    self.metrics.on_game_start();
                }
            }
            KeyAction::Restart => {
                self.session.restart();
                self.metrics.on_game_start();
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Phase};
    use crate::storage::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::default(), Box::new(MemoryStore::new()))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.session.state().phase, Phase::Idle);
        assert_eq!(mode.session.state().score, 0);
        assert!(!mode.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_space_starts_game() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char(' ')));
        assert!(mode.session.state().is_alive());
        assert!(mode.session.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_movement_keys_buffer_heading() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Up));
        assert_eq!(mode.session.state().snake.pending_direction, Direction::Up);

        // Reversal of the current heading is dropped
        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.session.state().snake.pending_direction, Direction::Up);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_game() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char(' ')));
        mode.session.on_tick();
        mode.handle_event(key(KeyCode::Char('r')));

        assert_eq!(mode.session.state().steps, 0);
        assert!(mode.session.state().is_alive());
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = mode();
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        mode.handle_event(Event::Key(release));
        assert!(!mode.should_quit);

        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
