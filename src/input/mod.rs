pub mod handler;
pub mod queue;
pub mod swipe;

pub use handler::{InputHandler, KeyAction};
pub use queue::TurnQueue;
pub use swipe::{SwipeTracker, classify_swipe};
