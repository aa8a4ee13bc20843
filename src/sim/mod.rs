//! Reference host: a `specs` world of agents driven by the squad core.

pub mod components;
pub mod movementsystem;
pub mod resources;
pub mod squadsystem;

use self::components::*;
use self::movementsystem::*;
use self::resources::*;
use self::squadsystem::*;
use crate::config::Settings;
use crate::host::*;
use crate::input::*;
use crate::military::registry::*;
use crate::military::rejection::*;
use crate::military::squad::*;
use crate::position::*;
use log::*;
use specs::prelude::*;
use std::cmp::Ordering;

pub struct Sandbox {
    world: World,
    dispatcher: Dispatcher<'static, 'static>,
    controller: SquadController,
    settings: Settings,
}

impl Sandbox {
    pub fn new(settings: Settings) -> Sandbox {
        info!(
            "Initializing sandbox {}x{}",
            settings.world.width, settings.world.height
        );

        let mut world = World::new();

        world.register::<AgentBody>();
        world.insert(SquadRegistry::new());
        world.insert(MapBounds {
            width: settings.world.width,
            height: settings.world.height,
        });
        world.insert(SimClock::default());
        world.insert(NotificationLog::default());

        let mut dispatcher = DispatcherBuilder::new()
            .with(
                SquadUpdateSystem {
                    idle_posture_seconds: settings.world.idle_posture_seconds,
                },
                "squad_update",
                &[],
            )
            .with(MovementSystem, "movement", &["squad_update"])
            .build();

        dispatcher.setup(&mut world);

        Sandbox {
            world,
            dispatcher,
            controller: SquadController::new(settings.squad.clone()),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn spawn_agent(&mut self, name: &str, position: Position) -> Entity {
        let speed = self.settings.world.agent_speed;

        self.spawn_agent_with_speed(name, position, speed)
    }

    pub fn spawn_agent_with_speed(&mut self, name: &str, position: Position, speed: f32) -> Entity {
        let (position, tile) = {
            let bounds = self.world.read_resource::<MapBounds>();
            let position = bounds.clamp_to_bounds(position.x, position.y);

            (position, bounds.tile_at(position))
        };

        debug!("Spawning {} at ({}, {})", name, position.x, position.y);

        self.world
            .create_entity()
            .with(AgentBody::new(name, position, tile, speed))
            .build()
    }

    /// Drop an agent's hits to zero. The body stays in the world.
    pub fn kill(&mut self, agent: Entity) {
        if let Some(body) = self.world.write_storage::<AgentBody>().get_mut(agent) {
            info!("{} died", body.name);

            body.hits = 0;
            body.target = None;
        }
    }

    /// Delete an agent entity outright.
    pub fn remove(&mut self, agent: Entity) {
        if let Err(err) = self.world.delete_entity(agent) {
            warn!("Failed to remove agent: {}", err);
        }

        self.world.maintain();
    }

    pub fn agent(&self, agent: Entity) -> Option<AgentBody> {
        self.world.read_storage::<AgentBody>().get(agent).cloned()
    }

    pub fn agent_named(&self, name: &str) -> Option<Entity> {
        let entities = self.world.entities();
        let bodies = self.world.read_storage::<AgentBody>();

        let found = (&entities, &bodies)
            .join()
            .find(|(_, body)| body.name == name)
            .map(|(entity, _)| entity);

        found
    }

    /// The live agent closest to `cursor`, within the selection radius.
    pub fn agent_near(&self, cursor: Position) -> Option<Entity> {
        let entities = self.world.entities();
        let bodies = self.world.read_storage::<AgentBody>();
        let radius = self.settings.world.selection_radius;

        let nearest = (&entities, &bodies)
            .join()
            .filter(|(_, body)| body.is_alive())
            .map(|(entity, body)| (entity, body.position.distance_to(cursor)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(entity, _)| entity);

        nearest
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.world.read_resource::<SimClock>().elapsed_seconds()
    }

    /// Advance simulated time and run one frame of squad and movement updates.
    pub fn tick(&mut self, delta_seconds: f64) {
        self.world.write_resource::<SimClock>().advance(delta_seconds);

        self.dispatcher.dispatch(&self.world);
        self.world.maintain();
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), Rejection> {
        let selection = if event.command.needs_selection() {
            self.agent_near(event.cursor)
        } else {
            None
        };

        debug!("Input {:?} at ({}, {})", event.command, event.cursor.x, event.cursor.y);

        let entities = self.world.entities();
        let mut bodies = self.world.write_storage::<AgentBody>();
        let mut registry = self.world.write_resource::<SquadRegistry>();
        let bounds = self.world.read_resource::<MapBounds>();
        let mut notifications = self.world.write_resource::<NotificationLog>();

        let mut agents = AgentAccess::new(&entities, &mut bodies, self.settings.world.idle_posture_seconds);
        let mut host = HostContext::new(&*bounds, &mut agents, &mut *notifications);

        self.controller.handle(event.command, selection, &mut *registry, &mut host)
    }

    /// Drain an input source and apply each event in order. Rejections are
    /// already reported through the notification log.
    pub fn poll_input(&mut self, source: &mut dyn InputSource) {
        for event in source.poll() {
            let _ = self.handle_input(event);
        }
    }

    pub fn controlled_squad(&self) -> Option<SquadId> {
        self.controller.squad()
    }

    /// Run `f` against a registered squad.
    pub fn with_squad<R, F>(&mut self, id: SquadId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Squad) -> R,
    {
        let mut registry = self.world.write_resource::<SquadRegistry>();
        let result = registry.get_mut(id).map(f);

        result
    }

    pub fn is_in_any_squad(&self, agent: Entity) -> bool {
        self.world.read_resource::<SquadRegistry>().is_in_any_squad(agent)
    }

    pub fn snapshots(&self) -> Vec<SquadSnapshot> {
        let entities = self.world.entities();
        let bodies = self.world.read_storage::<AgentBody>();
        let registry = self.world.read_resource::<SquadRegistry>();
        let agents = AgentView::new(&entities, &bodies);

        let snapshots: Vec<SquadSnapshot> = registry.iter().map(|squad| squad.snapshot(&agents)).collect();

        snapshots
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.world.read_resource::<NotificationLog>().entries().to_vec()
    }

    pub fn last_notification(&self) -> Option<String> {
        self.world
            .read_resource::<NotificationLog>()
            .last_message()
            .map(|message| message.to_owned())
    }
}
