//! Planar positions and the map area structures may be placed in.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Continuous 2D position of a structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two positions
    pub fn distance(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Rectangular placement area anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }

    /// Uniformly sample a position inside the bounds
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = if self.width > 0.0 {
            rng.gen_range(0.0..self.width)
        } else {
            0.0
        };
        let y = if self.height > 0.0 {
            rng.gen_range(0.0..self.height)
        } else {
            0.0
        };
        Position::new(x, y)
    }
}
