//! Swipe gestures from mouse drags
//!
//! A press records where the drag began; once the pointer has moved at least
//! one grid cell the dominant axis of the delta picks the direction and the
//! origin is cleared, so a single long drag yields one turn. Deltas are
//! measured in grid cells, so horizontal moves count [`CELL_WIDTH`] columns
//! per cell.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;
use crate::render::renderer::CELL_WIDTH;

/// Classify a drag delta by its dominant axis
///
/// Horizontal wins only on a strictly larger |dx|; ties go vertical. A zero
/// delta on the chosen axis yields nothing.
pub fn classify_swipe(dx: i32, dy: i32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > 0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if dy > 0 {
        Some(Direction::Down)
    } else if dy < 0 {
        Some(Direction::Up)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (start_col, start_row) = self.origin?;
                let columns = i32::from(event.column) - i32::from(start_col);
                let dx = columns / i32::from(CELL_WIDTH);
                let dy = i32::from(event.row) - i32::from(start_row);

                let direction = classify_swipe(dx, dy)?;
                self.origin = None;
                Some(direction)
            }
            MouseEventKind::Up(_) => {
                self.origin = None;
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_classify_dominant_axis() {
        assert_eq!(classify_swipe(5, 1), Some(Direction::Right));
        assert_eq!(classify_swipe(-5, 2), Some(Direction::Left));
        assert_eq!(classify_swipe(1, 4), Some(Direction::Down));
        assert_eq!(classify_swipe(0, -3), Some(Direction::Up));
    }

    #[test]
    fn test_classify_ties_and_zero() {
        assert_eq!(classify_swipe(2, 2), Some(Direction::Down));
        assert_eq!(classify_swipe(-2, -2), Some(Direction::Up));
        assert_eq!(classify_swipe(0, 0), None);
    }

    #[test]
    fn test_drag_emits_once() {
        let mut tracker = SwipeTracker::new();

        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10)),
            None
        );
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 14, 11)),
            Some(Direction::Right)
        );
        // Origin was consumed; the rest of the drag is ignored
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 14, 20)),
            None
        );
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut tracker = SwipeTracker::new();
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 3, 3)),
            None
        );
    }

    #[test]
    fn test_release_clears_origin() {
        let mut tracker = SwipeTracker::new();
        tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));
        tracker.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 5));

        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 1)),
            None
        );
    }

    #[test]
    fn test_stationary_drag_keeps_origin() {
        let mut tracker = SwipeTracker::new();
        tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));

        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5)),
            None
        );
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 2)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_horizontal_drag_measured_in_cells() {
        let mut tracker = SwipeTracker::new();
        tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));

        // One column is half a cell
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 11, 10)),
            None
        );
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 10)),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_equal_visual_distance_is_a_tie() {
        let mut tracker = SwipeTracker::new();
        tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));

        // Two columns and one row cover the same on-screen distance
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 11)),
            Some(Direction::Down)
        );
    }
}
