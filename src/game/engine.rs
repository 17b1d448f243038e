use anyhow::{Result, anyhow};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info, warn};

use super::{
    action::{Command, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Phase, Position, Snake},
};
use crate::storage::{HIGH_SCORE_KEY, ScoreStore};

/// Random draws before falling back to scanning for free cells
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether a score milestone raised the speed
    pub speed_changed: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// Whether the game is over after this tick
    pub game_over: bool,
}

/// The game engine that handles all game logic
///
/// Owns the [`GameState`] and is the only thing that mutates it. The high
/// score is read from the store once here and written back whenever a tick
/// beats it.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    store: Box<dyn ScoreStore>,
    state: GameState,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    ///
    /// Fails if the configuration does not pass [`GameConfig::validate`].
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self> {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(
        config: GameConfig,
        store: Box<dyn ScoreStore>,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, store: Box<dyn ScoreStore>, rng: StdRng) -> Result<Self> {
        config
            .validate()
            .map_err(|msg| anyhow!("invalid game config: {msg}"))?;

        let start = config.start_position();
        let mut state = GameState::new(
            Snake::new(start),
            start,
            config.grid_width,
            config.grid_height,
        );
        state.high_score = store.get(HIGH_SCORE_KEY).unwrap_or(0);
        state.speed_ceiling = config.max_speed;

        let mut engine = Self {
            config,
            rng,
            store,
            state,
        };
        engine.reset();
        Ok(engine)
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to the idle phase with a fresh board
    ///
    /// High score and the user speed ceiling carry over.
    pub fn reset(&mut self) {
        let start = self.config.start_position();
        let speed = self
            .config
            .initial_speed
            .clamp(self.config.min_speed, self.state.speed_ceiling);

        let state = &mut self.state;
        state.snake = Snake::new(start);
        state.velocity = None;
        state.heading = None;
        state.phase = Phase::Idle;
        state.score = 0;
        state.speed = speed;
        state.ticks = 0;
        state.collision = None;
        state.board_full = false;

        // A validated config always leaves at least one free cell here
        self.state.food = sample_free_cell(&mut self.rng, &self.state).unwrap_or(start);
        debug!(food = ?self.state.food, speed, "board reset");
    }

    /// Request a new direction
    ///
    /// Ignored once the game is over, or when it would reverse the snake onto
    /// itself. An idle game starts moving in the requested direction.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.is_over() {
            return false;
        }

        // Neither the last move nor the pending turn may be reversed
        let reverses = [self.state.heading, self.state.velocity]
            .into_iter()
            .flatten()
            .any(|current| current.is_opposite(direction));
        if reverses {
            return false;
        }

        self.state.velocity = Some(direction);

        if self.state.is_idle() {
            self.state.phase = Phase::Running;
            info!(?direction, "game started");
        }

        true
    }

    /// Start an idle game, heading right unless a direction is already set
    pub fn start(&mut self) -> bool {
        if !self.state.is_idle() {
            return false;
        }

        let direction = *self.state.velocity.get_or_insert(Direction::Right);
        self.state.phase = Phase::Running;
        info!(?direction, "game started");
        true
    }

    /// Change the user speed ceiling, clamped to the configured bounds
    ///
    /// The current speed drops immediately if it is above the new ceiling.
    /// Returns the ceiling actually applied.
    pub fn set_speed_ceiling(&mut self, ceiling: u32) -> u32 {
        let ceiling = ceiling.clamp(self.config.min_speed, self.config.max_speed);
        self.state.speed_ceiling = ceiling;

        if self.state.speed > ceiling {
            self.state.speed = ceiling;
        }

        debug!(ceiling, speed = self.state.speed, "speed ceiling changed");
        ceiling
    }

    /// Apply a command immediately. Returns whether it changed anything.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Turn(direction) => self.set_direction(direction),
            Command::Start => self.start(),
            Command::Restart => {
                self.reset();
                true
            }
            Command::RaiseSpeedCeiling => {
                let before = self.state.speed_ceiling;
                self.set_speed_ceiling(before.saturating_add(1)) != before
            }
            Command::LowerSpeedCeiling => {
                let before = self.state.speed_ceiling;
                self.set_speed_ceiling(before.saturating_sub(1)) != before
            }
        }
    }

    /// Advance the simulation by one cell
    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult::default();

        if !self.state.is_running() {
            result.game_over = self.state.is_over();
            return result;
        }

        let Some(direction) = self.state.velocity else {
            return result;
        };

        let new_head = self.state.snake.head().moved_in_direction(direction);
        self.state.snake.push_head(new_head);
        self.state.heading = Some(direction);
        self.state.ticks += 1;

        if new_head == self.state.food {
            result.ate_food = true;
            self.on_food_eaten(&mut result);

            match sample_free_cell(&mut self.rng, &self.state) {
                Some(food) => self.state.food = food,
                None => {
                    self.state.phase = Phase::Over;
                    self.state.board_full = true;
                    result.game_over = true;
                    info!(score = self.state.score, "board full, game over");
                    return result;
                }
            }
        } else {
            self.state.snake.pop_tail();
        }

        if let Some(collision) = self.check_collision(new_head) {
            self.state.phase = Phase::Over;
            self.state.collision = Some(collision);
            result.collision = Some(collision);
            result.game_over = true;
            info!(score = self.state.score, ?collision, "game over");
        }

        result
    }

    fn on_food_eaten(&mut self, result: &mut TickResult) {
        let previous = self.state.score;
        self.state.score = previous.saturating_add(self.config.food_reward);
        debug!(score = self.state.score, "food eaten");

        if self.state.score > self.state.high_score {
            self.state.high_score = self.state.score;
            if let Err(err) = self.store.set(HIGH_SCORE_KEY, self.state.high_score) {
                warn!(error = %err, "failed to persist high score");
            }
        }

        let milestone = self.config.speed_milestone;
        if previous / milestone < self.state.score / milestone
            && self.state.speed < self.state.speed_ceiling
        {
            self.state.speed += 1;
            result.speed_changed = true;
            debug!(speed = self.state.speed, "milestone reached");
        }
    }

    /// Check if the new head position causes a collision
    ///
    /// Runs after the tail has moved, so following the tail is not a hit.
    fn check_collision(&self, head: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// Pick a uniformly random cell not covered by the snake
///
/// Rejection-samples first, then falls back to choosing among the remaining
/// free cells so a nearly full board can't stall. `None` means the board is full.
fn sample_free_cell<R: Rng>(rng: &mut R, state: &GameState) -> Option<Position> {
    let (width, height) = (state.grid_width, state.grid_height);

    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let x = rng.gen_range(0..width) as i32;
        let y = rng.gen_range(0..height) as i32;
        let pos = Position::new(x, y);

        if !state.is_occupied_by_snake(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Position::new(x as i32, y as i32)))
        .filter(|pos| !state.is_occupied_by_snake(*pos))
        .collect();

    free.choose(rng).copied()
}
