use super::action::*;
use super::formation::*;
use super::registry::SquadId;
use super::rejection::*;
use crate::config::SquadConfig;
use crate::host::*;
use crate::position::*;
use itertools::Itertools;
use log::*;
use serde::{Deserialize, Serialize};
use specs::Entity;
use std::fmt;

/// Squad-wide mode deciding what members do between scheduled actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Members move to their formation slot around the leader.
    #[default]
    Follow,
    /// Members halt and drop their own behavior.
    Wait,
    /// Members act on their own; only scheduled actions are issued.
    Roam,
}

impl Behavior {
    pub const ALL: [Behavior; 3] = [Behavior::Follow, Behavior::Wait, Behavior::Roam];

    pub fn next(self) -> Behavior {
        let index = Self::ALL.iter().position(|b| *b == self).unwrap_or(0);

        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Behavior::Follow => "Follow",
            Behavior::Wait => "Wait",
            Behavior::Roam => "Roam",
        };

        f.write_str(name)
    }
}

/// Serializable view of a squad for reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SquadSnapshot {
    pub id: u32,
    pub leader: Option<String>,
    pub members: Vec<String>,
    pub formation: Formation,
    pub behavior: Behavior,
    pub spacing: (i32, i32),
    pub max_size: usize,
    pub scheduled_action: Option<String>,
    pub queued_action: Option<String>,
    pub targets: Vec<Position>,
}

/// A leader with an ordered list of followers.
///
/// Membership across squads is enforced by `SquadRegistry`, which owns every
/// squad; the mutators here assume the cross-squad checks have been made.
pub struct Squad {
    id: SquadId,
    leader: Option<Entity>,
    members: Vec<Entity>,
    pub max_size: usize,
    pub spacing_x: i32,
    pub spacing_y: i32,
    formation: Formation,
    behavior: Behavior,
    wait_anchor: Option<Position>,
    scheduled_action: Option<SquadAction>,
    queued_action: Option<SquadAction>,
    action_interval_seconds: f64,
    last_action_fired_at: Option<f64>,
}

impl Squad {
    pub(crate) fn new(id: SquadId, config: &SquadConfig) -> Squad {
        Squad {
            id,
            leader: None,
            members: Vec::new(),
            max_size: config.max_size,
            spacing_x: config.spacing_x,
            spacing_y: config.spacing_y,
            formation: config.formation,
            behavior: config.behavior,
            wait_anchor: None,
            scheduled_action: None,
            queued_action: None,
            action_interval_seconds: config.action_interval_seconds,
            last_action_fired_at: None,
        }
    }

    pub fn id(&self) -> SquadId {
        self.id
    }

    pub fn leader(&self) -> Option<Entity> {
        self.leader
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn formation(&self) -> Formation {
        self.formation
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn wait_anchor(&self) -> Option<Position> {
        self.wait_anchor
    }

    pub fn scheduled_action(&self) -> Option<SquadAction> {
        self.scheduled_action
    }

    pub fn queued_action(&self) -> Option<SquadAction> {
        self.queued_action
    }

    pub fn action_interval_seconds(&self) -> f64 {
        self.action_interval_seconds
    }

    pub fn is_member(&self, agent: Entity) -> bool {
        self.members.contains(&agent)
    }

    /// Leader or member of this squad.
    pub fn contains(&self, agent: Entity) -> bool {
        self.leader == Some(agent) || self.is_member(agent)
    }

    // ─── Membership ────────────────────────────────────────────────────────

    pub(crate) fn hire(&mut self, agent: Option<Entity>, assigned_elsewhere: bool, host: &mut HostContext<'_>) -> Result<(), Rejection> {
        let agent = match self.check_hire(agent, assigned_elsewhere, &*host.agents) {
            Ok(agent) => agent,
            Err(rejection) => {
                host.notify(&rejection.to_string());

                return Err(rejection);
            }
        };

        let name = host.agents.identity_name(agent);

        self.members.push(agent);

        info!("Squad {} hired {} ({}/{})", self.id, name, self.members.len(), self.max_size);
        host.notify(&format!("Hired {}", name));

        Ok(())
    }

    fn check_hire<A: AgentQuery + ?Sized>(&self, agent: Option<Entity>, assigned_elsewhere: bool, agents: &A) -> Result<Entity, Rejection> {
        if self.leader.is_none() {
            return Err(Rejection::NoLeader);
        }

        let agent = agent.ok_or(Rejection::NoSelection("hire"))?;

        if self.leader == Some(agent) {
            return Err(Rejection::IsLeader(agents.identity_name(agent)));
        }

        if self.is_member(agent) {
            return Err(Rejection::AlreadyHired(agents.identity_name(agent)));
        }

        if assigned_elsewhere {
            return Err(Rejection::InAnotherSquad(agents.identity_name(agent)));
        }

        if self.members.len() >= self.max_size {
            return Err(Rejection::SquadFull(self.max_size));
        }

        Ok(agent)
    }

    pub(crate) fn fire(&mut self, agent: Option<Entity>, host: &mut HostContext<'_>) -> Result<(), Rejection> {
        let agent = match self.check_fire(agent, &*host.agents) {
            Ok(agent) => agent,
            Err(rejection) => {
                host.notify(&rejection.to_string());

                return Err(rejection);
            }
        };

        let name = host.agents.identity_name(agent);

        self.members.retain(|member| *member != agent);

        info!("Squad {} fired {} ({}/{})", self.id, name, self.members.len(), self.max_size);
        host.notify(&format!("Fired {}", name));

        Ok(())
    }

    fn check_fire<A: AgentQuery + ?Sized>(&self, agent: Option<Entity>, agents: &A) -> Result<Entity, Rejection> {
        if self.leader.is_none() {
            return Err(Rejection::NoLeader);
        }

        let agent = agent.ok_or(Rejection::NoSelection("fire"))?;

        if self.leader == Some(agent) {
            return Err(Rejection::IsLeader(agents.identity_name(agent)));
        }

        if !self.is_member(agent) {
            return Err(Rejection::NotHired(agents.identity_name(agent)));
        }

        Ok(agent)
    }

    /// Assign, promote or clear the leader.
    ///
    /// `None` empties the squad. A current member is promoted and the old
    /// leader, if still alive, steps down into the member list. An agent
    /// owned by another squad is refused.
    pub(crate) fn set_leader(&mut self, agent: Option<Entity>, assigned_elsewhere: bool, host: &mut HostContext<'_>) -> Result<(), Rejection> {
        let agent = match agent {
            Some(agent) => agent,
            None => {
                if self.leader.is_some() || !self.members.is_empty() {
                    info!("Squad {} cleared", self.id);
                }

                self.leader = None;
                self.members.clear();
                self.wait_anchor = None;

                return Ok(());
            }
        };

        if assigned_elsewhere {
            let rejection = Rejection::InAnotherSquad(host.agents.identity_name(agent));

            host.notify(&rejection.to_string());

            return Err(rejection);
        }

        if self.leader == Some(agent) {
            return Ok(());
        }

        if let Some(index) = self.members.iter().position(|member| *member == agent) {
            self.members.remove(index);

            if let Some(previous) = self.leader.take() {
                if host.agents.is_alive(previous) {
                    self.members.push(previous);
                }
            }
        }

        self.leader = Some(agent);

        if self.behavior == Behavior::Wait && self.wait_anchor.is_none() {
            self.wait_anchor = self.leader_anchor(&*host.agents);
        }

        let name = host.agents.identity_name(agent);

        info!("Squad {} now led by {}", self.id, name);
        host.notify(&format!("{} now leads the squad", name));

        Ok(())
    }

    // ─── Configuration ─────────────────────────────────────────────────────

    pub fn set_formation(&mut self, formation: Formation) {
        self.formation = formation;
    }

    pub fn cycle_formation(&mut self, host: &mut HostContext<'_>) -> Result<Formation, Rejection> {
        if self.leader.is_none() {
            return Err(Rejection::NoLeader);
        }

        self.formation = self.formation.next();

        host.notify(&format!("Changed formation to {}", self.formation));

        Ok(self.formation)
    }

    /// Switch behavior. Entering `Wait` caches the current anchor so the
    /// formation stays put while the leader wanders off.
    pub fn set_behavior<A: AgentQuery + ?Sized>(&mut self, behavior: Behavior, agents: &A) {
        if behavior == Behavior::Wait && self.behavior != Behavior::Wait {
            self.wait_anchor = self.leader_anchor(agents);
        } else if behavior != Behavior::Wait {
            self.wait_anchor = None;
        }

        self.behavior = behavior;
    }

    pub fn cycle_behavior(&mut self, host: &mut HostContext<'_>) -> Result<Behavior, Rejection> {
        if self.leader.is_none() {
            return Err(Rejection::NoLeader);
        }

        self.set_behavior(self.behavior.next(), &*host.agents);

        host.notify(&format!("Changed squad behavior to {}", self.behavior));

        Ok(self.behavior)
    }

    pub fn adjust_spacing(&mut self, dx: i32, dy: i32) {
        self.spacing_x = self.spacing_x.saturating_add(dx);
        self.spacing_y = self.spacing_y.saturating_add(dy);

        debug!("Squad {} spacing now ({}, {})", self.id, self.spacing_x, self.spacing_y);
    }

    // ─── Scheduled actions ─────────────────────────────────────────────────

    /// Replace the current action. The interval applies from the last firing.
    pub fn set_action(&mut self, action: SquadAction, interval_seconds: f64) {
        self.scheduled_action = Some(action);
        self.action_interval_seconds = interval_seconds;
    }

    /// Set the single follow-up action, overwriting any already queued.
    pub fn queue_next(&mut self, action: SquadAction) {
        self.queued_action = Some(action);
    }

    /// Drop the current and queued actions; per-member dispatch resumes on
    /// the next tick.
    pub fn clear_action(&mut self) {
        self.scheduled_action = None;
        self.queued_action = None;
    }

    fn action_due(&self, now: f64) -> bool {
        match self.last_action_fired_at {
            None => true,
            Some(last) => last + self.action_interval_seconds < now,
        }
    }

    fn fire_scheduled_action(&mut self, now: f64, host: &mut HostContext<'_>) {
        let action = match self.scheduled_action {
            Some(action) if self.action_due(now) => action,
            _ => return,
        };

        debug!("Squad {} firing {} for {} members", self.id, action, self.members.len());

        let anchor = self.anchor(&*host.agents);

        if action.execute(anchor, &self.members, host) == ActionOutcome::ReleaseMembers {
            info!("Squad {} released {}", self.id, self.member_names(&*host.agents));

            self.members.clear();
        }

        self.scheduled_action = self.queued_action.take();
        self.last_action_fired_at = Some(now);
    }

    // ─── Formation ─────────────────────────────────────────────────────────

    fn leader_anchor<A: AgentQuery + ?Sized>(&self, agents: &A) -> Option<Position> {
        let leader = self.leader?;

        agents
            .pending_target_position(leader)
            .or_else(|| agents.current_position(leader))
    }

    /// The point formations are laid out around.
    pub fn anchor<A: AgentQuery + ?Sized>(&self, agents: &A) -> Option<Position> {
        if self.behavior == Behavior::Wait {
            if let Some(anchor) = self.wait_anchor {
                return Some(anchor);
            }
        }

        self.leader_anchor(agents)
    }

    /// Target position of each member in member order; empty when there is
    /// no leader or no member.
    pub fn formation_positions<A: AgentQuery + ?Sized>(&self, agents: &A) -> Vec<Position> {
        if self.members.is_empty() {
            return Vec::new();
        }

        match self.anchor(agents) {
            Some(anchor) => compute_positions(
                self.formation,
                self.spacing_x,
                self.spacing_y,
                self.max_size,
                anchor,
                self.members.len(),
            ),
            None => Vec::new(),
        }
    }

    // ─── Update ────────────────────────────────────────────────────────────

    /// Per-tick reconciliation. `now` is simulated time in seconds.
    pub fn update(&mut self, now: f64, host: &mut HostContext<'_>) {
        let leader = match self.leader {
            Some(leader) => leader,
            None => return,
        };

        if !host.agents.is_alive(leader) {
            self.replace_dead_leader(host);

            return;
        }

        self.prune_dead(&*host.agents);

        if self.scheduled_action.is_none() {
            match self.behavior {
                Behavior::Follow => self.follow(host),
                Behavior::Wait => {
                    for member in self.members.iter() {
                        host.halt(*member);
                    }
                }
                Behavior::Roam => {}
            }
        }

        self.fire_scheduled_action(now, host);
    }

    fn replace_dead_leader(&mut self, host: &mut HostContext<'_>) {
        self.prune_dead(&*host.agents);

        let successor = self.members.first().copied();

        match successor {
            Some(successor) => {
                info!(
                    "Squad {} leader died, promoting {}",
                    self.id,
                    host.agents.identity_name(successor)
                );
            }
            None => info!("Squad {} leader died with no members left", self.id),
        }

        if let Err(rejection) = self.set_leader(successor, false, host) {
            warn!("Squad {} failed to promote a new leader: {}", self.id, rejection);
        }
    }

    fn prune_dead<A: AgentQuery + ?Sized>(&mut self, agents: &A) {
        let before = self.members.len();

        self.members.retain(|member| agents.is_alive(*member));

        if self.members.len() != before {
            debug!("Squad {} pruned {} dead members", self.id, before - self.members.len());
        }
    }

    fn follow(&mut self, host: &mut HostContext<'_>) {
        let positions = self.formation_positions(&*host.agents);

        for (member, target) in self.members.iter().zip(positions) {
            host.send_to(*member, target);
        }
    }

    // ─── Reporting ─────────────────────────────────────────────────────────

    fn member_names<A: AgentQuery + ?Sized>(&self, agents: &A) -> String {
        self.members.iter().map(|member| agents.identity_name(*member)).join(", ")
    }

    pub fn snapshot<A: AgentQuery + ?Sized>(&self, agents: &A) -> SquadSnapshot {
        SquadSnapshot {
            id: self.id.into(),
            leader: self.leader.map(|leader| agents.identity_name(leader)),
            members: self.members.iter().map(|member| agents.identity_name(*member)).collect(),
            formation: self.formation,
            behavior: self.behavior,
            spacing: (self.spacing_x, self.spacing_y),
            max_size: self.max_size,
            scheduled_action: self.scheduled_action.map(|action| action.to_string()),
            queued_action: self.queued_action.map(|action| action.to_string()),
            targets: self.formation_positions(agents),
        }
    }
}
