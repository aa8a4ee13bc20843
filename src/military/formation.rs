use crate::position::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Geometric layout used to place squad members around the anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    /// Every member stacks on the anchor.
    Dot,
    /// A ray leaving the anchor, one spacing step per member.
    Line,
    /// A line through the anchor, members alternating sides.
    #[default]
    CenteredLine,
    /// Grid centered on the anchor, spacing gives the extents.
    Rectangle,
    /// Ellipse around the anchor, spacing gives the radii.
    Circle,
}

impl Formation {
    pub const ALL: [Formation; 5] = [
        Formation::Dot,
        Formation::Line,
        Formation::CenteredLine,
        Formation::Rectangle,
        Formation::Circle,
    ];

    /// The next formation in cycling order, wrapping around.
    pub fn next(self) -> Formation {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);

        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Formation::Dot => "Dot",
            Formation::Line => "Line",
            Formation::CenteredLine => "CenteredLine",
            Formation::Rectangle => "Rectangle",
            Formation::Circle => "Circle",
        };

        f.write_str(name)
    }
}

/// Compute one target position per member, in member order.
///
/// The result always has exactly `count` entries. Degenerate parameters
/// (a zero rectangle extent, a zero `max_size` circle) collapse to `Dot`.
pub fn compute_positions(
    formation: Formation,
    spacing_x: i32,
    spacing_y: i32,
    max_size: usize,
    anchor: Position,
    count: usize,
) -> Vec<Position> {
    match formation {
        Formation::Dot => dot(anchor, count),
        Formation::Line => line(spacing_x, spacing_y, anchor, count),
        Formation::CenteredLine => centered_line(spacing_x, spacing_y, anchor, count),
        Formation::Rectangle => rectangle(spacing_x, spacing_y, anchor, count),
        Formation::Circle => circle(spacing_x, spacing_y, max_size, anchor, count),
    }
}

fn dot(anchor: Position, count: usize) -> Vec<Position> {
    vec![anchor; count]
}

fn line(spacing_x: i32, spacing_y: i32, anchor: Position, count: usize) -> Vec<Position> {
    (1..=count)
        .map(|i| anchor.offset(spacing_x as f32 * i as f32, spacing_y as f32 * i as f32))
        .collect()
}

fn centered_line(spacing_x: i32, spacing_y: i32, anchor: Position, count: usize) -> Vec<Position> {
    let mut positions = Vec::with_capacity(count);
    let mut n: i32 = 1;

    for i in 0..count {
        positions.push(anchor.offset(spacing_x as f32 * n as f32, spacing_y as f32 * n as f32));

        // Offsets run 1, -1, 2, -2, 3, ...
        n = if i % 2 == 0 { -n } else { -n + 1 };
    }

    positions
}

fn rectangle(spacing_x: i32, spacing_y: i32, anchor: Position, count: usize) -> Vec<Position> {
    let lx = spacing_x.unsigned_abs() as usize;
    let ly = spacing_y.unsigned_abs() as usize;

    if lx == 0 || ly == 0 {
        return dot(anchor, count);
    }

    let mx = lx as f32 / 2.0;
    let my = ly as f32 / 2.0;
    let start = Position::new(anchor.x - mx, anchor.y + my);

    // Columns outer, rows inner. Squads larger than the grid wrap back to
    // the first cell.
    (0..count)
        .map(|index| {
            let cell = index % lx.saturating_mul(ly);
            let x = (cell / ly) as f32;
            let y = (cell % ly) as f32;

            start.offset(x * mx, -(y * my))
        })
        .collect()
}

fn circle(spacing_x: i32, spacing_y: i32, max_size: usize, anchor: Position, count: usize) -> Vec<Position> {
    if max_size == 0 {
        return dot(anchor, count);
    }

    // Step by capacity, not by count, so a partial squad leaves gaps.
    let section = 2.0 * PI / max_size as f64;

    (0..count)
        .map(|i| {
            let radian = section * i as f64;
            let x = spacing_x as f64 * radian.cos() + anchor.x as f64;
            let y = spacing_y as f64 * radian.sin() + anchor.y as f64;

            Position::new(x as f32, y as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Position, expected: (f32, f32)) {
        assert!(
            (actual.x - expected.0).abs() < 1e-4 && (actual.y - expected.1).abs() < 1e-4,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn dot_stacks_on_anchor() {
        let anchor = Position::new(7.5, -2.0);
        let positions = compute_positions(Formation::Dot, 3, 4, 8, anchor, 5);

        assert_eq!(positions.len(), 5);
        assert!(positions.iter().all(|p| *p == anchor));
    }

    #[test]
    fn line_extends_from_anchor() {
        let positions = compute_positions(Formation::Line, 1, 0, 8, Position::new(0.0, 0.0), 3);

        assert_eq!(
            positions,
            vec![Position::new(1.0, 0.0), Position::new(2.0, 0.0), Position::new(3.0, 0.0)]
        );
    }

    #[test]
    fn line_follows_diagonal_spacing() {
        let positions = compute_positions(Formation::Line, 2, -1, 8, Position::new(10.0, 10.0), 2);

        assert_eq!(positions, vec![Position::new(12.0, 9.0), Position::new(14.0, 8.0)]);
    }

    #[test]
    fn centered_line_zig_zags() {
        let positions = compute_positions(Formation::CenteredLine, 1, 0, 8, Position::new(0.0, 0.0), 6);
        let xs: Vec<f32> = positions.iter().map(|p| p.x).collect();

        assert_eq!(xs, vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        assert!(positions.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn rectangle_fills_grid_columns_first() {
        let positions = compute_positions(Formation::Rectangle, 2, 2, 8, Position::new(10.0, 10.0), 4);

        assert_close(positions[0], (9.0, 11.0));
        assert_close(positions[1], (9.0, 10.0));
        assert_close(positions[2], (10.0, 11.0));
        assert_close(positions[3], (10.0, 10.0));
    }

    #[test]
    fn rectangle_uses_absolute_extents() {
        let positive = compute_positions(Formation::Rectangle, 2, 2, 8, Position::new(0.0, 0.0), 4);
        let negative = compute_positions(Formation::Rectangle, -2, -2, 8, Position::new(0.0, 0.0), 4);

        assert_eq!(positive, negative);
    }

    #[test]
    fn rectangle_wraps_when_grid_is_smaller_than_squad() {
        let positions = compute_positions(Formation::Rectangle, 1, 2, 8, Position::new(0.0, 0.0), 5);

        assert_eq!(positions.len(), 5);
        assert_eq!(positions[2], positions[0]);
        assert_eq!(positions[3], positions[1]);
        assert_eq!(positions[4], positions[0]);
    }

    #[test]
    fn rectangle_with_zero_extent_collapses_to_dot() {
        let anchor = Position::new(3.0, 3.0);
        let positions = compute_positions(Formation::Rectangle, 4, 0, 8, anchor, 3);

        assert_eq!(positions, vec![anchor; 3]);
    }

    #[test]
    fn circle_steps_by_capacity() {
        let positions = compute_positions(Formation::Circle, 5, 5, 4, Position::new(0.0, 0.0), 2);

        assert_eq!(positions.len(), 2);
        assert_close(positions[0], (5.0, 0.0));
        assert_close(positions[1], (0.0, 5.0));
    }

    #[test]
    fn circle_supports_ellipses() {
        let positions = compute_positions(Formation::Circle, 4, 2, 4, Position::new(1.0, 1.0), 4);

        assert_close(positions[0], (5.0, 1.0));
        assert_close(positions[1], (1.0, 3.0));
        assert_close(positions[2], (-3.0, 1.0));
        assert_close(positions[3], (1.0, -1.0));
    }

    #[test]
    fn circle_with_zero_capacity_collapses_to_dot() {
        let anchor = Position::new(2.0, 2.0);

        assert_eq!(compute_positions(Formation::Circle, 5, 5, 0, anchor, 2), vec![anchor; 2]);
    }

    #[test]
    fn empty_squad_has_no_positions() {
        for formation in Formation::ALL {
            assert!(compute_positions(formation, 1, 1, 8, Position::default(), 0).is_empty());
        }
    }

    #[test]
    fn extreme_spacing_stays_finite() {
        for formation in Formation::ALL {
            for (spacing_x, spacing_y) in [(i32::MAX, i32::MAX), (i32::MIN, 0), (1_500_000_000, -1_500_000_000)] {
                let positions = compute_positions(formation, spacing_x, spacing_y, 8, Position::default(), 8);

                assert_eq!(positions.len(), 8);
                assert!(positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()), "{} overflowed", formation);
            }
        }
    }

    #[test]
    fn line_widens_large_spacing() {
        let positions = compute_positions(Formation::Line, 1_500_000_000, 0, 8, Position::default(), 2);

        assert_eq!(positions[1].x, 3_000_000_000.0);
    }

    #[test]
    fn formations_cycle_in_order() {
        assert_eq!(Formation::Dot.next(), Formation::Line);
        assert_eq!(Formation::Circle.next(), Formation::Dot);
    }
}
