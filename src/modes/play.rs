use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval, sleep};
use tracing::{debug, info};

use crate::game::{Command, GameEngine, Phase};
use crate::input::{InputHandler, KeyAction, SwipeTracker, TurnQueue};
use crate::metrics::{GameEnd, GameMetrics};
use crate::render::Renderer;

/// Interactive game in the terminal
///
/// Input events are translated into [`Command`]s. Turns made while the snake
/// is moving wait in a [`TurnQueue`] and are handed to the engine one per
/// tick. The tick timer is re-armed after every tick with the engine's
/// current interval, so speed changes apply from the next cycle on.
pub struct PlayMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    turns: TurnQueue,
    should_quit: bool,
    rearm_tick: bool,
}

impl PlayMode {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipe: SwipeTracker::new(),
            turns: TurnQueue::new(),
            should_quit: false,
            rearm_tick: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let tick_timer = sleep(self.engine.state().tick_interval());
        tokio::pin!(tick_timer);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick, only armed while the snake is moving
                () = &mut tick_timer, if self.engine.state().is_running() => {
                    self.update_game();
                    let next = Instant::now() + self.engine.state().tick_interval();
                    tick_timer.as_mut().reset(next);
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.engine.state().is_running() {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.rearm_tick {
                self.rearm_tick = false;
                let next = Instant::now() + self.engine.state().tick_interval();
                tick_timer.as_mut().reset(next);
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            games = self.metrics.games_played,
            best = self.metrics.session_best,
            wall = self.metrics.wall_deaths,
            self_collisions = self.metrics.self_deaths,
            abandoned = self.metrics.abandoned,
            "session ended"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::GameCommand(command) => self.dispatch(command),
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::None => {}
                }
            }
            Event::Mouse(mouse) => {
                if let Some(direction) = self.swipe.handle_mouse_event(mouse) {
                    self.dispatch(Command::Turn(direction));
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => match self.engine.state().phase {
                Phase::Idle => {
                    if self.engine.set_direction(direction) {
                        self.on_game_started();
                    }
                }
                Phase::Running => {
                    self.turns.push(direction);
                }
                Phase::Over => {}
            },
            Command::Start => {
                if self.engine.start() {
                    self.on_game_started();
                }
            }
            Command::Restart => self.reset_game(),
            Command::RaiseSpeedCeiling | Command::LowerSpeedCeiling => {
                self.engine.apply(command);
            }
        }
    }

    fn on_game_started(&mut self) {
        self.turns.clear();
        self.metrics.on_game_start();
        self.rearm_tick = true;
    }

    fn update_game(&mut self) {
        // At most one accepted turn per tick; rejected ones are dropped
        while let Some(direction) = self.turns.pop() {
            if self.engine.set_direction(direction) {
                break;
            }
            debug!(?direction, "turn rejected");
        }

        let result = self.engine.tick();
        self.metrics.on_tick(&result);

        let state = self.engine.state();
        if result.speed_changed {
            info!(speed = state.speed, score = state.score, "speed increased");
        }

        if result.game_over {
            let end = match result.collision {
                Some(collision) => GameEnd::Collision(collision),
                None => GameEnd::BoardFull,
            };
            info!(
                score = state.score,
                ticks = self.metrics.ticks_survived,
                food = self.metrics.food_eaten,
                ?end,
                "game summary"
            );
            self.metrics.on_game_end(state.score, end);
            self.turns.clear();
        }
    }

    fn reset_game(&mut self) {
        // A restart mid-game still ends that game
        if self.engine.state().is_running() {
            self.metrics
                .on_game_end(self.engine.state().score, GameEnd::Abandoned);
        }

        self.engine.reset();
        self.metrics.reset_run();
        self.turns.clear();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
