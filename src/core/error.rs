//! Error types for region capture and saved copies

use thiserror::Error;

use crate::core::types::IVec3;

/// Main error type for the crate.
///
/// The `Display` text of every variant is the message shown to the player.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Mark at ({x}, {y}, {z}) is outside the level")]
    MarkOutOfBounds { x: i32, y: i32, z: i32 },

    #[error("\"{0}\" is not a valid name for a saved copy")]
    InvalidName(String),

    #[error("Saved copy is corrupt: header declares {expected} blocks but {actual} were stored")]
    VoxelCountMismatch { expected: usize, actual: usize },

    #[error("Saved copy is corrupt: {0}")]
    CorruptBuffer(String),

    #[error("Region of {width}x{height}x{length} is too large to save")]
    RegionTooLarge { width: i32, height: i32, length: i32 },

    #[error("You have not copied anything yet")]
    NoCurrentBuffer,

    #[error("You tried to copy {used} blocks. You cannot copy more than {limit} blocks.")]
    QuotaExceeded { used: u64, limit: u64 },

    #[error("You can only save a maximum of {limit} copies. /copy delete some.")]
    SaveLimitReached { limit: usize },

    #[error("No such copy exists: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure classes, used by callers that react to a class rather than a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input; nothing beyond the offending step was touched.
    Validation,
    /// Rank or save-slot limit; the operation was rolled back entirely.
    QuotaExceeded,
    /// The named copy does not exist.
    NotFound,
    /// Disk failure during save/load.
    Io,
}

impl Error {
    pub(crate) fn out_of_bounds(pos: IVec3) -> Self {
        Error::MarkOutOfBounds { x: pos.x, y: pos.y, z: pos.z }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MarkOutOfBounds { .. }
            | Error::InvalidName(_)
            | Error::VoxelCountMismatch { .. }
            | Error::CorruptBuffer(_)
            | Error::RegionTooLarge { .. }
            | Error::NoCurrentBuffer => ErrorKind::Validation,
            Error::QuotaExceeded { .. } | Error::SaveLimitReached { .. } => ErrorKind::QuotaExceeded,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}
