//! Pixel geometry for draggable surfaces.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the left edge.
    pub x: i32,
    /// Vertical offset from the top edge.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Size {
    /// Create a size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Clamp one axis to `[0, viewport - element]`.
///
/// An element larger than the viewport pins to 0.
pub fn clamp_axis(value: i32, viewport: i32, element: i32) -> i32 {
    let max = viewport.saturating_sub(element).max(0);
    value.clamp(0, max)
}

/// Clamp `position` so an element of `element` size stays inside `viewport`.
pub fn clamp_to_viewport(position: Position, viewport: Size, element: Size) -> Position {
    Position::new(
        clamp_axis(position.x, viewport.width, element.width),
        clamp_axis(position.y, viewport.height, element.height),
    )
}
