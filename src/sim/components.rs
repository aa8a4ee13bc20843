use crate::host::*;
use crate::position::*;
use serde::{Deserialize, Serialize};
use specs::prelude::*;
use specs::world::EntitiesRes;
use specs::Component;

/// What an agent does when no squad order is driving it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Posture {
    /// Free to run its own behavior.
    Autonomous,
    /// Pinned by a squad move until the timer runs out.
    Idle { remaining_seconds: f64 },
    /// Own behavior cancelled until a new order arrives.
    Halted,
}

#[derive(Component, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[storage(VecStorage)]
pub struct AgentBody {
    pub name: String,
    pub position: Position,
    pub tile: Tile,
    pub target: Option<Position>,
    pub speed: f32,
    pub hits: u32,
    pub posture: Posture,
}

impl AgentBody {
    pub fn new(name: &str, position: Position, tile: Tile, speed: f32) -> AgentBody {
        AgentBody {
            name: name.to_owned(),
            position,
            tile,
            target: None,
            speed,
            hits: 100,
            posture: Posture::Autonomous,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hits > 0
    }
}

fn live_body<'s>(entities: &EntitiesRes, agent: Entity, body: Option<&'s AgentBody>) -> Option<&'s AgentBody> {
    if !entities.is_alive(agent) {
        return None;
    }

    body.filter(|body| body.is_alive())
}

fn body_name(agent: Entity, body: Option<&AgentBody>) -> String {
    body.map(|body| body.name.clone())
        .unwrap_or_else(|| format!("agent {}", agent.id()))
}

/// Read-only view of agent bodies for reporting.
pub struct AgentView<'a, 'b> {
    entities: &'b Entities<'a>,
    bodies: &'b ReadStorage<'a, AgentBody>,
}

impl<'a, 'b> AgentView<'a, 'b> {
    pub fn new(entities: &'b Entities<'a>, bodies: &'b ReadStorage<'a, AgentBody>) -> AgentView<'a, 'b> {
        AgentView { entities, bodies }
    }
}

impl<'a, 'b> AgentQuery for AgentView<'a, 'b> {
    fn is_alive(&self, agent: Entity) -> bool {
        live_body(self.entities, agent, self.bodies.get(agent)).is_some()
    }

    fn current_position(&self, agent: Entity) -> Option<Position> {
        live_body(self.entities, agent, self.bodies.get(agent)).map(|body| body.position)
    }

    fn pending_target_position(&self, agent: Entity) -> Option<Position> {
        live_body(self.entities, agent, self.bodies.get(agent)).and_then(|body| body.target)
    }

    fn identity_name(&self, agent: Entity) -> String {
        body_name(agent, self.bodies.get(agent))
    }
}

/// Exposes agent bodies to the squad core through `AgentControl`.
pub struct AgentAccess<'a, 'b> {
    entities: &'b Entities<'a>,
    bodies: &'b mut WriteStorage<'a, AgentBody>,
    idle_posture_seconds: f64,
}

impl<'a, 'b> AgentAccess<'a, 'b> {
    pub fn new(entities: &'b Entities<'a>, bodies: &'b mut WriteStorage<'a, AgentBody>, idle_posture_seconds: f64) -> AgentAccess<'a, 'b> {
        AgentAccess {
            entities,
            bodies,
            idle_posture_seconds,
        }
    }

    fn live_body_mut(&mut self, agent: Entity) -> Option<&mut AgentBody> {
        if !self.entities.is_alive(agent) {
            return None;
        }

        self.bodies.get_mut(agent).filter(|body| body.is_alive())
    }
}

impl<'a, 'b> AgentQuery for AgentAccess<'a, 'b> {
    fn is_alive(&self, agent: Entity) -> bool {
        live_body(self.entities, agent, self.bodies.get(agent)).is_some()
    }

    fn current_position(&self, agent: Entity) -> Option<Position> {
        live_body(self.entities, agent, self.bodies.get(agent)).map(|body| body.position)
    }

    fn pending_target_position(&self, agent: Entity) -> Option<Position> {
        live_body(self.entities, agent, self.bodies.get(agent)).and_then(|body| body.target)
    }

    fn identity_name(&self, agent: Entity) -> String {
        body_name(agent, self.bodies.get(agent))
    }
}

impl<'a, 'b> AgentControl for AgentAccess<'a, 'b> {
    fn move_toward(&mut self, agent: Entity, order: MoveOrder) {
        if let Some(body) = self.live_body_mut(agent) {
            body.target = Some(order.position);

            if order.settle {
                body.tile = order.tile;
            }
        }
    }

    fn set_idle_posture(&mut self, agent: Entity) {
        let remaining_seconds = self.idle_posture_seconds;

        if let Some(body) = self.live_body_mut(agent) {
            body.posture = Posture::Idle { remaining_seconds };
        }
    }

    fn stop_movement(&mut self, agent: Entity) {
        if let Some(body) = self.live_body_mut(agent) {
            body.target = None;
        }
    }

    fn cancel_autonomous_behavior(&mut self, agent: Entity) {
        if let Some(body) = self.live_body_mut(agent) {
            body.posture = Posture::Halted;
        }
    }
}
