//! Integer axis-aligned cuboid of block coordinates

use crate::core::types::IVec3;

/// Inclusive cuboid of block coordinates defined by min and max corners
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cuboid {
    pub min: IVec3,
    pub max: IVec3,
}

impl Cuboid {
    /// Create a cuboid spanning two opposite corners, in either order
    pub fn from_corners(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a cuboid from its min corner and a strictly positive size
    pub fn from_min_size(min: IVec3, size: IVec3) -> Self {
        Self {
            min,
            max: min + size - IVec3::ONE,
        }
    }

    /// Number of blocks along each axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Total number of blocks, computed in 64 bits
    pub fn volume(&self) -> u64 {
        let s = self.size();
        s.x as u64 * s.y as u64 * s.z as u64
    }

    /// Check if a block coordinate lies inside the cuboid
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Iterate every block coordinate, Y outermost, then Z, X innermost.
    ///
    /// This is the storage order of copy buffers and levels.
    pub fn iter_yzx(&self) -> impl Iterator<Item = IVec3> + use<> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| {
                (min.x..=max.x).map(move |x| IVec3::new(x, y, z))
            })
        })
    }
}
