use crate::host::*;
use crate::position::*;
use log::*;
use specs::Entity;
use std::fmt;

/// Group-level action run over the live member list when its interval
/// elapses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SquadAction {
    /// Pull every member onto the squad anchor.
    Regroup,
    /// Stop all members in place.
    HoldPosition,
    /// Send every member to a fixed point.
    MoveTo { position: Position },
    /// Converge on another agent's current position.
    Attack { target: Entity },
    /// Release every member from the squad.
    Disband,
}

/// What the squad must do to its own state after an action ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Continue,
    ReleaseMembers,
}

impl SquadAction {
    pub(crate) fn execute(&self, anchor: Option<Position>, members: &[Entity], host: &mut HostContext<'_>) -> ActionOutcome {
        match *self {
            SquadAction::Regroup => {
                if let Some(anchor) = anchor {
                    for member in members {
                        host.send_to(*member, anchor);
                    }
                } else {
                    warn!("Regroup skipped - squad has no anchor");
                }
            }
            SquadAction::HoldPosition => {
                for member in members {
                    host.halt(*member);
                }
            }
            SquadAction::MoveTo { position } => {
                for member in members {
                    host.send_to(*member, position);
                }
            }
            SquadAction::Attack { target } => {
                let target_position = if host.agents.is_alive(target) {
                    host.agents.current_position(target)
                } else {
                    None
                };

                match target_position {
                    Some(position) => {
                        for member in members {
                            host.send_to(*member, position);
                        }
                    }
                    None => warn!("Attack skipped - target {:?} is gone", target),
                }
            }
            SquadAction::Disband => {
                for member in members {
                    let name = host.agents.identity_name(*member);

                    host.notify(&format!("Fired {}", name));
                }

                host.notify("Squad disbanded");

                return ActionOutcome::ReleaseMembers;
            }
        }

        ActionOutcome::Continue
    }
}

impl fmt::Display for SquadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquadAction::Regroup => write!(f, "Regroup"),
            SquadAction::HoldPosition => write!(f, "HoldPosition"),
            SquadAction::MoveTo { position } => write!(f, "MoveTo({}, {})", position.x, position.y),
            SquadAction::Attack { target } => write!(f, "Attack({})", target.id()),
            SquadAction::Disband => write!(f, "Disband"),
        }
    }
}
