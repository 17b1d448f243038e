use std::time::{Duration, Instant};

use crate::game::{CollisionType, TickResult};

/// How a game stopped counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Collision(CollisionType),
    BoardFull,
    /// Restarted while the snake was still moving
    Abandoned,
}

/// Numbers for the current game and the session so far
///
/// The run clock starts when a game starts and freezes when it ends, so the
/// header keeps showing how long the last game lasted until the next one.
#[derive(Debug, Default)]
pub struct GameMetrics {
    run_started: Option<Instant>,
    pub run_time: Duration,
    pub food_eaten: u32,
    pub ticks_survived: u32,

    pub games_played: u32,
    pub session_best: u32,
    pub wall_deaths: u32,
    pub self_deaths: u32,
    pub abandoned: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_game_start(&mut self) {
        self.reset_run();
        self.run_started = Some(Instant::now());
    }

    /// Zero the per-game numbers and stop the clock
    pub fn reset_run(&mut self) {
        self.run_started = None;
        self.run_time = Duration::ZERO;
        self.food_eaten = 0;
        self.ticks_survived = 0;
    }

    /// Advance the run clock; a no-op between games
    pub fn update(&mut self) {
        if let Some(started) = self.run_started {
            self.run_time = started.elapsed();
        }
    }

    pub fn on_tick(&mut self, result: &TickResult) {
        self.ticks_survived += 1;
        if result.ate_food {
            self.food_eaten += 1;
        }
    }

    pub fn on_game_end(&mut self, final_score: u32, end: GameEnd) {
        self.update();
        self.run_started = None;
        self.games_played += 1;
        self.session_best = self.session_best.max(final_score);

        match end {
            GameEnd::Collision(CollisionType::Wall) => self.wall_deaths += 1,
            GameEnd::Collision(CollisionType::SelfCollision) => self.self_deaths += 1,
            GameEnd::Abandoned => self.abandoned += 1,
            GameEnd::BoardFull => {}
        }
    }

    /// Run time as `mm:ss`
    pub fn format_time(&self) -> String {
        let secs = self.run_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
