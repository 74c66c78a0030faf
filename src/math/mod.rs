//! Block-coordinate geometry

pub mod cuboid;

pub use cuboid::Cuboid;
