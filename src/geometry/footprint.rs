//! Lazy iteration over the world tiles a placed piece occupies.

use crate::geometry::{CoordsXYZ, Direction, TileCoords, rotate_offset};
use crate::track::catalog::TrackBlock;

/// One occupied tile of a placed piece, in world terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootprintTile {
    pub tile: TileCoords,
    pub base_z: i32,
    pub clearance_z: i32,
}

/// Iterator over the footprint of a piece at a given origin and rotation.
///
/// Cheap to construct and restartable, so callers can run a clearance pass
/// and then a second pass that writes elements without recomputing offsets.
#[derive(Debug, Clone)]
pub struct FootprintTiles<'a> {
    blocks: &'a [TrackBlock],
    origin: CoordsXYZ,
    direction: Direction,
    next: usize,
}

impl<'a> FootprintTiles<'a> {
    pub fn new(blocks: &'a [TrackBlock], origin: CoordsXYZ, direction: Direction) -> Self {
        Self { blocks, origin, direction, next: 0 }
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Iterator for FootprintTiles<'_> {
    type Item = FootprintTile;

    fn next(&mut self) -> Option<FootprintTile> {
        let block = self.blocks.get(self.next)?;
        self.next += 1;
        let world = self.origin.xy().add(rotate_offset(block.offset, self.direction));
        Some(FootprintTile {
            tile: world.to_tile(),
            base_z: self.origin.z + block.z,
            clearance_z: self.origin.z + block.z + block.clearance,
        })
    }
}
