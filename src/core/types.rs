//! Core type aliases and re-exports

pub use glam::IVec3;

/// Block type identifier as stored in levels and copy buffers
pub type BlockId = u8;

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
