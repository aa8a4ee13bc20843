use super::components::*;
use super::resources::*;
use crate::host::*;
use crate::military::registry::*;
use specs::prelude::*;

/// Runs the per-tick reconciliation of every registered squad.
pub struct SquadUpdateSystem {
    pub idle_posture_seconds: f64,
}

impl<'a> System<'a> for SquadUpdateSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, AgentBody>,
        WriteExpect<'a, SquadRegistry>,
        ReadExpect<'a, MapBounds>,
        Read<'a, SimClock>,
        Write<'a, NotificationLog>,
    );

    fn run(&mut self, (entities, mut bodies, mut registry, bounds, clock, mut notifications): Self::SystemData) {
        let mut agents = AgentAccess::new(&entities, &mut bodies, self.idle_posture_seconds);
        let mut host = HostContext::new(&*bounds, &mut agents, &mut *notifications);

        registry.update_all(clock.elapsed_seconds(), &mut host);
    }
}
