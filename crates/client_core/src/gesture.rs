//! Classification of completed drags over the dish card.

use serde::{Deserialize, Serialize};

/// Horizontal distance a drag has to exceed, in either direction.
pub const SWIPE_THRESHOLD: f64 = 200.0;

/// A finished pan gesture. Only the horizontal displacement is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragGesture {
    pub dx: f64,
    pub dy: f64,
}

impl DragGesture {
    pub fn horizontal(dx: f64) -> Self {
        Self { dx, dy: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureIntent {
    /// Right to left.
    Favorite,
    /// Left to right.
    Comment,
    None,
}

pub fn classify(gesture: DragGesture) -> GestureIntent {
    if gesture.dx < -SWIPE_THRESHOLD {
        GestureIntent::Favorite
    } else if gesture.dx > SWIPE_THRESHOLD {
        GestureIntent::Comment
    } else {
        GestureIntent::None
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
