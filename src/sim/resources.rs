use crate::host::*;
use crate::position::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Rectangular world of `width` by `height` tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapBounds {
    pub width: u32,
    pub height: u32,
}

impl SquadWorld for MapBounds {
    fn clamp_to_bounds(&self, x: f32, y: f32) -> Position {
        let max_x = self.width.saturating_sub(1) as f32;
        let max_y = self.height.saturating_sub(1) as f32;

        Position::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    fn tile_at(&self, position: Position) -> Tile {
        let clamped = self.clamp_to_bounds(position.x, position.y);

        Tile::new(clamped.x.floor() as i32, clamped.y.floor() as i32)
    }

    fn distance(&self, from: Tile, to: Tile) -> f32 {
        let dx = (to.x - from.x) as f32;
        let dy = (to.y - from.y) as f32;

        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SimClock {
    elapsed_seconds: f64,
    delta_seconds: f64,
}

impl SimClock {
    pub fn advance(&mut self, delta_seconds: f64) {
        self.delta_seconds = delta_seconds;
        self.elapsed_seconds += delta_seconds;
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn delta_seconds(&self) -> f64 {
        self.delta_seconds
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub urgent: bool,
    pub placement: Placement,
}

/// Records every message shown to the user, oldest first.
#[derive(Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn last_message(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.message.as_str())
    }
}

impl Notifier for NotificationLog {
    fn show(&mut self, message: &str, urgent: bool, placement: Placement) {
        if urgent {
            warn!("[{:?}] {}", placement, message);
        } else {
            info!("[{:?}] {}", placement, message);
        }

        self.entries.push(Notification {
            message: message.to_owned(),
            urgent,
            placement,
        });
    }
}
