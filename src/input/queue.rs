use std::collections::VecDeque;

use crate::game::Direction;

/// Most turns buffered between ticks
pub const MAX_PENDING_TURNS: usize = 3;

/// Directional inputs waiting for the next tick
///
/// The host loop pushes turns as they arrive and pops them once per tick, so
/// a quick "up, left" reaches the engine as two separate moves.
#[derive(Debug, Default)]
pub struct TurnQueue {
    pending: VecDeque<Direction>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a turn. Repeats of the last buffered turn and overflow are dropped.
    pub fn push(&mut self, direction: Direction) -> bool {
        if self.pending.back() == Some(&direction) || self.pending.len() >= MAX_PENDING_TURNS {
            return false;
        }

        self.pending.push_back(direction);
        true
    }

    pub fn pop(&mut self) -> Option<Direction> {
        self.pending.pop_front()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = TurnQueue::new();
        queue.push(Direction::Up);
        queue.push(Direction::Left);

        assert_eq!(queue.pop(), Some(Direction::Up));
        assert_eq!(queue.pop(), Some(Direction::Left));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_drops_repeats_and_overflow() {
        let mut queue = TurnQueue::new();

        assert!(queue.push(Direction::Up));
        assert!(!queue.push(Direction::Up));
        assert!(queue.push(Direction::Left));
        assert!(queue.push(Direction::Down));
        assert!(!queue.push(Direction::Right));

        assert_eq!(queue.len(), MAX_PENDING_TURNS);
    }

    #[test]
    fn test_clear() {
        let mut queue = TurnQueue::new();
        queue.push(Direction::Up);
        queue.clear();
        assert!(queue.is_empty());
    }
}
