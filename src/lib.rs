//! Voxcopy - region capture and saved copies for block-building servers

pub mod core;
pub mod math;
pub mod world;
pub mod copy;
pub mod edit;
pub mod selection;
pub mod session;
pub mod store;
pub mod commands;
