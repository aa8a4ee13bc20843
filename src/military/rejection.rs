use super::registry::SquadId;
use thiserror::Error;

/// A user action the squad refused. The display text doubles as the
/// notification shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No squad selected")]
    NoSquad,
    #[error("Squad {0} does not exist")]
    UnknownSquad(SquadId),
    #[error("Squad has no leader")]
    NoLeader,
    #[error("Select a unit to {0}")]
    NoSelection(&'static str),
    #[error("{0} leads this squad")]
    IsLeader(String),
    #[error("{0} is already hired")]
    AlreadyHired(String),
    #[error("{0} is in another squad")]
    InAnotherSquad(String),
    #[error("Max squad size of {0} reached")]
    SquadFull(usize),
    #[error("{0} is not hired")]
    NotHired(String),
}
