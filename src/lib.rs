#![warn(clippy::all)]

pub mod config;
pub mod host;
pub mod input;
pub mod logging;
pub mod military;
pub mod position;
pub mod sim;
