//! Contracts the squad core consumes from its host. The core only computes
//! where members should go and which group action fires; executing moves,
//! resolving tiles and showing feedback is left to these collaborators.

use crate::position::*;
use serde::{Deserialize, Serialize};
use specs::Entity;

/// Tile distance at or below which a move order may be settled immediately.
pub const SETTLE_TILE_DISTANCE: f32 = 2.0;

pub trait SquadWorld {
    /// Clamp a raw point into the valid world area.
    fn clamp_to_bounds(&self, x: f32, y: f32) -> Position;

    fn tile_at(&self, position: Position) -> Tile;

    fn distance(&self, from: Tile, to: Tile) -> f32;
}

/// Read-only agent lookups, keyed by entity handle. Unknown or deleted
/// handles behave like dead agents.
pub trait AgentQuery {
    fn is_alive(&self, agent: Entity) -> bool;

    fn current_position(&self, agent: Entity) -> Option<Position>;

    /// Where the agent is currently heading, if it is moving.
    fn pending_target_position(&self, agent: Entity) -> Option<Position>;

    fn identity_name(&self, agent: Entity) -> String;
}

/// Commands the squad core issues to agents.
pub trait AgentControl: AgentQuery {
    fn move_toward(&mut self, agent: Entity, order: MoveOrder);

    /// Short-lived idle posture so the agent's default behavior does not
    /// override a squad move.
    fn set_idle_posture(&mut self, agent: Entity);

    fn stop_movement(&mut self, agent: Entity);

    fn cancel_autonomous_behavior(&mut self, agent: Entity);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Top,
    Center,
    Bottom,
}

pub trait Notifier {
    fn show(&mut self, message: &str, urgent: bool, placement: Placement);
}

/// A resolved movement instruction for a single agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOrder {
    /// Target point, already clamped into world bounds.
    pub position: Position,
    /// Tile containing `position`.
    pub tile: Tile,
    /// True when the agent is close enough to adopt `tile` right away.
    pub settle: bool,
}

impl MoveOrder {
    pub fn resolve(world: &dyn SquadWorld, from: Option<Position>, target: Position) -> MoveOrder {
        let position = world.clamp_to_bounds(target.x, target.y);
        let tile = world.tile_at(position);

        let settle = from
            .map(|from| world.distance(world.tile_at(from), tile) <= SETTLE_TILE_DISTANCE)
            .unwrap_or(false);

        MoveOrder { position, tile, settle }
    }
}

/// Borrowed collaborators handed to squad operations for one call.
pub struct HostContext<'h> {
    pub world: &'h dyn SquadWorld,
    pub agents: &'h mut dyn AgentControl,
    pub notifier: &'h mut dyn Notifier,
}

impl<'h> HostContext<'h> {
    pub fn new(world: &'h dyn SquadWorld, agents: &'h mut dyn AgentControl, notifier: &'h mut dyn Notifier) -> HostContext<'h> {
        HostContext { world, agents, notifier }
    }

    pub fn notify(&mut self, message: &str) {
        self.notifier.show(message, false, Placement::Top);
    }

    /// Clamp, snap and issue a move for `agent`, then pin it with an idle posture.
    pub fn send_to(&mut self, agent: Entity, target: Position) {
        let from = self.agents.current_position(agent);
        let order = MoveOrder::resolve(self.world, from, target);

        self.agents.move_toward(agent, order);
        self.agents.set_idle_posture(agent);
    }

    pub fn halt(&mut self, agent: Entity) {
        self.agents.stop_movement(agent);
        self.agents.cancel_autonomous_behavior(agent);
    }
}
