use std::time::Duration;

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    pub body: Vec<Position>,
}

impl Snake {
    /// Create a one-cell snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Create a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>) -> Self {
        assert!(!body.is_empty(), "snake needs at least one segment");
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend a new head
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the tail segment, keeping at least the head
    pub fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a well-formed snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Coarse lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a start command or the first directional input
    Idle,
    /// Ticks advance the snake
    Running,
    /// Terminal until reset
    Over,
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
///
/// The engine owns and mutates this. Everything else (renderer, host loop)
/// only sees it through a shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Direction applied on the next tick; `None` until the game starts
    pub velocity: Option<Direction>,
    /// Direction of the most recent move; `None` until the first tick
    pub heading: Option<Direction>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub phase: Phase,
    pub score: u32,
    pub high_score: u32,
    /// Current ticks per second
    pub speed: u32,
    /// User-adjustable upper bound for `speed`
    pub speed_ceiling: u32,
    pub ticks: u32,
    /// How the last game ended, if it hit something
    pub collision: Option<CollisionType>,
    /// Set when the game ended because no free cell was left for food
    pub board_full: bool,
}

impl GameState {
    /// Create a new idle game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            velocity: None,
            heading: None,
            grid_width,
            grid_height,
            phase: Phase::Idle,
            score: 0,
            high_score: 0,
            speed: 1,
            speed_ceiling: 1,
            ticks: 0,
            collision: None,
            board_full: false,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Delay between ticks at the current speed
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.speed.max(1)))
    }
}
