pub mod action;
pub mod formation;
pub mod registry;
pub mod rejection;
pub mod squad;

#[cfg(test)]
pub(crate) mod testing;
