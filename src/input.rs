use crate::config::SquadConfig;
use crate::host::*;
use crate::military::registry::*;
use crate::military::rejection::*;
use crate::position::*;
use log::*;
use serde::{Deserialize, Serialize};
use specs::Entity;

/// User commands, one per squad operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadCommand {
    SelectLeader,
    HireNearest,
    FireNearest,
    IncreaseSpacingX,
    DecreaseSpacingX,
    IncreaseSpacingY,
    DecreaseSpacingY,
    CycleFormation,
    CycleBehavior,
}

impl SquadCommand {
    /// Default key bindings.
    pub fn from_key(key: char) -> Option<SquadCommand> {
        let command = match key.to_ascii_uppercase() {
            'P' => SquadCommand::SelectLeader,
            'Y' => SquadCommand::HireNearest,
            'H' => SquadCommand::FireNearest,
            'G' => SquadCommand::IncreaseSpacingX,
            'J' => SquadCommand::DecreaseSpacingX,
            'L' => SquadCommand::IncreaseSpacingY,
            'B' => SquadCommand::DecreaseSpacingY,
            'Z' => SquadCommand::CycleFormation,
            'V' => SquadCommand::CycleBehavior,
            _ => return None,
        };

        Some(command)
    }

    /// Whether the host must resolve the agent under the cursor first.
    pub fn needs_selection(&self) -> bool {
        matches!(
            self,
            SquadCommand::SelectLeader | SquadCommand::HireNearest | SquadCommand::FireNearest
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub command: SquadCommand,
    pub cursor: Position,
}

/// Source of user input, polled once per frame.
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Maps user commands onto the squad the user currently controls.
pub struct SquadController {
    squad: Option<SquadId>,
    config: SquadConfig,
}

impl SquadController {
    pub fn new(config: SquadConfig) -> SquadController {
        SquadController { squad: None, config }
    }

    pub fn squad(&self) -> Option<SquadId> {
        self.squad
    }

    /// Apply one command. `selection` is the agent the host resolved under
    /// the cursor, if any.
    pub fn handle(
        &mut self,
        command: SquadCommand,
        selection: Option<Entity>,
        registry: &mut SquadRegistry,
        host: &mut HostContext<'_>,
    ) -> Result<(), Rejection> {
        if command == SquadCommand::SelectLeader {
            return self.select_leader(selection, registry, host);
        }

        let id = match self.squad.filter(|id| registry.get(*id).is_some()) {
            Some(id) => id,
            None => {
                self.squad = None;

                host.notify(&Rejection::NoSquad.to_string());

                return Err(Rejection::NoSquad);
            }
        };

        match command {
            SquadCommand::SelectLeader => Ok(()),
            SquadCommand::HireNearest => registry.hire(id, selection, host),
            SquadCommand::FireNearest => registry.fire(id, selection, host),
            SquadCommand::IncreaseSpacingX => Self::adjust(registry, id, 1, 0),
            SquadCommand::DecreaseSpacingX => Self::adjust(registry, id, -1, 0),
            SquadCommand::IncreaseSpacingY => Self::adjust(registry, id, 0, 1),
            SquadCommand::DecreaseSpacingY => Self::adjust(registry, id, 0, -1),
            SquadCommand::CycleFormation => registry
                .get_mut(id)
                .ok_or(Rejection::UnknownSquad(id))?
                .cycle_formation(host)
                .map(|_| ()),
            SquadCommand::CycleBehavior => registry
                .get_mut(id)
                .ok_or(Rejection::UnknownSquad(id))?
                .cycle_behavior(host)
                .map(|_| ()),
        }
    }

    fn adjust(registry: &mut SquadRegistry, id: SquadId, dx: i32, dy: i32) -> Result<(), Rejection> {
        registry.get_mut(id).ok_or(Rejection::UnknownSquad(id))?.adjust_spacing(dx, dy);

        Ok(())
    }

    /// Take control of the selected agent's new squad, or release the
    /// controlled squad when there is one.
    fn select_leader(&mut self, selection: Option<Entity>, registry: &mut SquadRegistry, host: &mut HostContext<'_>) -> Result<(), Rejection> {
        if let Some(id) = self.squad.take() {
            if registry.set_leader(id, None, host).is_ok() {
                registry.dispose(id);

                info!("Released squad {}", id);
                host.notify("Released squad");
            }

            return Ok(());
        }

        if selection.is_none() {
            let rejection = Rejection::NoSelection("lead");

            host.notify(&rejection.to_string());

            return Err(rejection);
        }

        let id = registry.create(&self.config);

        match registry.set_leader(id, selection, host) {
            Ok(()) => {
                self.squad = Some(id);

                Ok(())
            }
            Err(rejection) => {
                registry.dispose(id);

                Err(rejection)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::military::formation::Formation;
    use crate::military::squad::Behavior;
    use crate::military::testing::*;

    fn handle(fx: &mut Fixture, controller: &mut SquadController, command: SquadCommand, selection: Option<Entity>) -> Result<(), Rejection> {
        fx.run(|registry, host| controller.handle(command, selection, registry, host))
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(SquadCommand::from_key('p'), Some(SquadCommand::SelectLeader));
        assert_eq!(SquadCommand::from_key('Y'), Some(SquadCommand::HireNearest));
        assert_eq!(SquadCommand::from_key('h'), Some(SquadCommand::FireNearest));
        assert_eq!(SquadCommand::from_key('G'), Some(SquadCommand::IncreaseSpacingX));
        assert_eq!(SquadCommand::from_key('J'), Some(SquadCommand::DecreaseSpacingX));
        assert_eq!(SquadCommand::from_key('L'), Some(SquadCommand::IncreaseSpacingY));
        assert_eq!(SquadCommand::from_key('B'), Some(SquadCommand::DecreaseSpacingY));
        assert_eq!(SquadCommand::from_key('z'), Some(SquadCommand::CycleFormation));
        assert_eq!(SquadCommand::from_key('V'), Some(SquadCommand::CycleBehavior));
        assert_eq!(SquadCommand::from_key('Q'), None);
    }

    #[test]
    fn commands_without_a_squad_are_rejected() {
        let mut fx = Fixture::new();
        let mut controller = SquadController::new(fx.config.clone());

        let result = handle(&mut fx, &mut controller, SquadCommand::CycleFormation, None);

        assert_eq!(result, Err(Rejection::NoSquad));
        assert_eq!(fx.last_message(), Some("No squad selected"));
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn select_leader_needs_a_selection() {
        let mut fx = Fixture::new();
        let mut controller = SquadController::new(fx.config.clone());

        let result = handle(&mut fx, &mut controller, SquadCommand::SelectLeader, None);

        assert_eq!(result, Err(Rejection::NoSelection("lead")));
        assert_eq!(controller.squad(), None);
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn controller_drives_its_squad() {
        let mut fx = Fixture::new();
        let mut controller = SquadController::new(fx.config.clone());
        let leader = fx.spawn("Ada", 10.0, 10.0);
        let recruit = fx.spawn("Bo", 12.0, 10.0);

        handle(&mut fx, &mut controller, SquadCommand::SelectLeader, Some(leader)).unwrap();
        let id = controller.squad().unwrap();

        handle(&mut fx, &mut controller, SquadCommand::HireNearest, Some(recruit)).unwrap();
        assert_eq!(fx.last_message(), Some("Hired Bo"));

        handle(&mut fx, &mut controller, SquadCommand::IncreaseSpacingX, None).unwrap();
        handle(&mut fx, &mut controller, SquadCommand::IncreaseSpacingY, None).unwrap();
        handle(&mut fx, &mut controller, SquadCommand::IncreaseSpacingY, None).unwrap();
        handle(&mut fx, &mut controller, SquadCommand::DecreaseSpacingY, None).unwrap();
        handle(&mut fx, &mut controller, SquadCommand::CycleFormation, None).unwrap();
        handle(&mut fx, &mut controller, SquadCommand::CycleBehavior, None).unwrap();

        let squad = fx.registry.get(id).unwrap();
        assert_eq!((squad.spacing_x, squad.spacing_y), (2, 1));
        assert_eq!(squad.formation(), Formation::Rectangle);
        assert_eq!(squad.behavior(), Behavior::Wait);
        assert_eq!(squad.members(), &[recruit]);

        handle(&mut fx, &mut controller, SquadCommand::FireNearest, Some(recruit)).unwrap();
        assert_eq!(fx.last_message(), Some("Fired Bo"));
    }

    #[test]
    fn selecting_again_releases_the_squad() {
        let mut fx = Fixture::new();
        let mut controller = SquadController::new(fx.config.clone());
        let leader = fx.spawn("Ada", 10.0, 10.0);
        let recruit = fx.spawn("Bo", 12.0, 10.0);

        handle(&mut fx, &mut controller, SquadCommand::SelectLeader, Some(leader)).unwrap();
        handle(&mut fx, &mut controller, SquadCommand::HireNearest, Some(recruit)).unwrap();
        handle(&mut fx, &mut controller, SquadCommand::SelectLeader, Some(recruit)).unwrap();

        assert_eq!(controller.squad(), None);
        assert_eq!(fx.last_message(), Some("Released squad"));
        assert!(fx.registry.is_empty());
        assert!(!fx.registry.is_in_any_squad(leader));
        assert!(!fx.registry.is_in_any_squad(recruit));
    }

    #[test]
    fn cannot_lead_an_agent_from_another_squad() {
        let mut fx = Fixture::new();
        let mut first = SquadController::new(fx.config.clone());
        let mut second = SquadController::new(fx.config.clone());
        let leader = fx.spawn("Ada", 10.0, 10.0);

        handle(&mut fx, &mut first, SquadCommand::SelectLeader, Some(leader)).unwrap();

        let result = handle(&mut fx, &mut second, SquadCommand::SelectLeader, Some(leader));

        assert_eq!(result, Err(Rejection::InAnotherSquad("Ada".to_owned())));
        assert_eq!(second.squad(), None);
        assert_eq!(fx.registry.len(), 1);
    }
}
