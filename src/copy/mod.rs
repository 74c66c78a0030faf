//! Copy buffers: capturing a cuboid of blocks, and the on-disk codec.

pub mod buffer;
pub mod capture;
pub mod codec;

pub use buffer::{CopyBuffer, Corner};
pub use capture::{capture, capture_within_quota, CaptureOptions};
pub use codec::BufferFormat;
