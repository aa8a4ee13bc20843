use super::registry::*;
use crate::config::SquadConfig;
use crate::host::*;
use crate::position::*;
use crate::sim::resources::*;
use specs::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct FakeAgent {
    pub name: String,
    pub position: Position,
    pub target: Option<Position>,
    pub alive: bool,
    pub orders: Vec<MoveOrder>,
    pub idle_postures: u32,
    pub stops: u32,
    pub cancels: u32,
}

/// In-memory agents that record every command they receive.
#[derive(Default)]
pub struct FakeAgents {
    agents: HashMap<Entity, FakeAgent>,
}

impl FakeAgents {
    pub fn get(&self, agent: Entity) -> &FakeAgent {
        &self.agents[&agent]
    }

    pub fn get_mut(&mut self, agent: Entity) -> &mut FakeAgent {
        self.agents.get_mut(&agent).expect("unknown fake agent")
    }

    pub fn total_orders(&self) -> usize {
        self.agents.values().map(|agent| agent.orders.len()).sum()
    }
}

impl AgentQuery for FakeAgents {
    fn is_alive(&self, agent: Entity) -> bool {
        self.agents.get(&agent).map(|a| a.alive).unwrap_or(false)
    }

    fn current_position(&self, agent: Entity) -> Option<Position> {
        self.agents.get(&agent).filter(|a| a.alive).map(|a| a.position)
    }

    fn pending_target_position(&self, agent: Entity) -> Option<Position> {
        self.agents.get(&agent).filter(|a| a.alive).and_then(|a| a.target)
    }

    fn identity_name(&self, agent: Entity) -> String {
        self.agents
            .get(&agent)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "unknown".to_owned())
    }
}

impl AgentControl for FakeAgents {

    fn move_toward(&mut self, agent: Entity, order: MoveOrder) {
        if let Some(a) = self.agents.get_mut(&agent) {
            a.orders.push(order);
        }
    }

    fn set_idle_posture(&mut self, agent: Entity) {
        if let Some(a) = self.agents.get_mut(&agent) {
            a.idle_postures += 1;
        }
    }

    fn stop_movement(&mut self, agent: Entity) {
        if let Some(a) = self.agents.get_mut(&agent) {
            a.stops += 1;
        }
    }

    fn cancel_autonomous_behavior(&mut self, agent: Entity) {
        if let Some(a) = self.agents.get_mut(&agent) {
            a.cancels += 1;
        }
    }
}

pub struct Fixture {
    world: World,
    pub agents: FakeAgents,
    pub bounds: MapBounds,
    pub log: NotificationLog,
    pub registry: SquadRegistry,
    pub config: SquadConfig,
}

impl Fixture {
    pub fn new() -> Fixture {
        Fixture {
            world: World::new(),
            agents: FakeAgents::default(),
            bounds: MapBounds { width: 100, height: 100 },
            log: NotificationLog::default(),
            registry: SquadRegistry::new(),
            config: SquadConfig::default(),
        }
    }

    pub fn spawn(&mut self, name: &str, x: f32, y: f32) -> Entity {
        let entity = self.world.create_entity().build();

        self.agents.agents.insert(
            entity,
            FakeAgent {
                name: name.to_owned(),
                position: Position::new(x, y),
                target: None,
                alive: true,
                orders: Vec::new(),
                idle_postures: 0,
                stops: 0,
                cancels: 0,
            },
        );

        entity
    }

    pub fn kill(&mut self, agent: Entity) {
        self.agents.get_mut(agent).alive = false;
    }

    pub fn run<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut SquadRegistry, &mut HostContext<'_>) -> R,
    {
        let mut host = HostContext::new(&self.bounds, &mut self.agents, &mut self.log);

        f(&mut self.registry, &mut host)
    }

    /// Create a squad led by `leader` with the fixture's config.
    pub fn squad_led_by(&mut self, leader: Entity) -> SquadId {
        let config = self.config.clone();

        self.run(|registry, host| {
            let id = registry.create(&config);
            registry.set_leader(id, Some(leader), host).unwrap();
            id
        })
    }

    pub fn hire_all(&mut self, id: SquadId, agents: &[Entity]) {
        for agent in agents {
            self.run(|registry, host| registry.hire(id, Some(*agent), host)).unwrap();
        }
    }

    pub fn tick(&mut self, now: f64) {
        self.run(|registry, host| registry.update_all(now, host));
    }

    pub fn last_message(&self) -> Option<&str> {
        self.log.last_message()
    }
}
