use super::rejection::*;
use super::squad::*;
use crate::config::SquadConfig;
use crate::host::*;
use log::*;
use serde::{Deserialize, Serialize};
use specs::Entity;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquadId(u32);

impl fmt::Display for SquadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<SquadId> for u32 {
    fn from(id: SquadId) -> u32 {
        id.0
    }
}

/// Every live squad, in registration order.
///
/// Cross-squad invariants live here: an agent leads or belongs to at most
/// one registered squad, so membership changes go through the registry.
#[derive(Default)]
pub struct SquadRegistry {
    squads: Vec<Squad>,
    next_id: u32,
}

impl SquadRegistry {
    pub fn new() -> SquadRegistry {
        SquadRegistry::default()
    }

    /// Register a new, leaderless squad.
    pub fn create(&mut self, config: &SquadConfig) -> SquadId {
        let id = SquadId(self.next_id);

        self.next_id += 1;
        self.squads.push(Squad::new(id, config));

        debug!("Registered squad {}", id);

        id
    }

    /// Unregister a squad. Its agents become free to join other squads.
    pub fn dispose(&mut self, id: SquadId) -> Option<Squad> {
        let index = self.squads.iter().position(|squad| squad.id() == id)?;

        debug!("Disposed squad {}", id);

        Some(self.squads.remove(index))
    }

    pub fn get(&self, id: SquadId) -> Option<&Squad> {
        self.squads.iter().find(|squad| squad.id() == id)
    }

    pub fn get_mut(&mut self, id: SquadId) -> Option<&mut Squad> {
        self.squads.iter_mut().find(|squad| squad.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Squad> {
        self.squads.iter()
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    pub fn is_in_any_squad(&self, agent: Entity) -> bool {
        self.squad_of(agent).is_some()
    }

    /// The squad the agent leads or belongs to.
    pub fn squad_of(&self, agent: Entity) -> Option<SquadId> {
        self.squads.iter().find(|squad| squad.contains(agent)).map(|squad| squad.id())
    }

    fn assigned_outside(&self, id: SquadId, agent: Option<Entity>) -> bool {
        agent
            .map(|agent| self.squads.iter().any(|squad| squad.id() != id && squad.contains(agent)))
            .unwrap_or(false)
    }

    fn squad_mut(&mut self, id: SquadId) -> Result<&mut Squad, Rejection> {
        self.get_mut(id).ok_or(Rejection::UnknownSquad(id))
    }

    pub fn hire(&mut self, id: SquadId, agent: Option<Entity>, host: &mut HostContext<'_>) -> Result<(), Rejection> {
        let assigned_elsewhere = self.assigned_outside(id, agent);

        self.squad_mut(id)?.hire(agent, assigned_elsewhere, host)
    }

    pub fn fire(&mut self, id: SquadId, agent: Option<Entity>, host: &mut HostContext<'_>) -> Result<(), Rejection> {
        self.squad_mut(id)?.fire(agent, host)
    }

    pub fn set_leader(&mut self, id: SquadId, agent: Option<Entity>, host: &mut HostContext<'_>) -> Result<(), Rejection> {
        let assigned_elsewhere = self.assigned_outside(id, agent);

        self.squad_mut(id)?.set_leader(agent, assigned_elsewhere, host)
    }

    /// Run one tick of every squad, in registration order.
    pub fn update_all(&mut self, now: f64, host: &mut HostContext<'_>) {
        for squad in self.squads.iter_mut() {
            squad.update(now, host);
        }
    }
}
