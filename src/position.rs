use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point in world space. Agents move continuously between tiles, so
/// positions are fractional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Position {
        Position { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Position) -> f32 {
        let d = other - self;

        (d.x * d.x + d.y * d.y).sqrt()
    }

    /// Step from this position toward `target` by at most `max_step`.
    /// Returns the target itself when it is within reach.
    pub fn step_toward(self, target: Position, max_step: f32) -> Position {
        let distance = self.distance_to(target);

        if distance <= max_step || distance <= f32::EPSILON {
            return target;
        }

        let scale = max_step / distance;
        let d = target - self;

        self.offset(d.x * scale, d.y * scale)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A discrete world cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Tile {
        Tile { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_toward_stops_at_target() {
        let start = Position::new(0.0, 0.0);
        let target = Position::new(3.0, 4.0);

        assert_eq!(start.step_toward(target, 10.0), target);

        let halfway = start.step_toward(target, 2.5);
        assert!((halfway.x - 1.5).abs() < 1e-5);
        assert!((halfway.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((Position::new(1.0, 1.0).distance_to(Position::new(4.0, 5.0)) - 5.0).abs() < 1e-5);
    }
}
