//! Coordinate spaces and rotations for track placement.
//!
//! Three spaces are in play: screen coordinates (pixels, owned by the
//! viewport collaborator), world coordinates (32 units per tile, 8 units per
//! vertical step) and piece-local coordinates (a track piece described as if
//! it were entered travelling along +X with direction 0).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::COORDS_XY_STEP;

pub mod footprint;
pub mod placement;

pub use footprint::FootprintTiles;
pub use placement::{PlacementInput, PlacementModifiers, ScreenCoords, ViewportProbe};

/// A position in world units on the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub struct CoordsXY {
    pub x: i32,
    pub y: i32,
}

impl CoordsXY {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn add(self, other: CoordsXY) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub const fn sub(self, other: CoordsXY) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Snap to the south-west corner of the containing tile.
    pub fn to_tile_start(self) -> Self {
        Self::new(self.x & !(COORDS_XY_STEP - 1), self.y & !(COORDS_XY_STEP - 1))
    }

    pub fn to_tile(self) -> TileCoords {
        TileCoords::new(self.x.div_euclid(COORDS_XY_STEP), self.y.div_euclid(COORDS_XY_STEP))
    }

    pub const fn with_z(self, z: i32) -> CoordsXYZ {
        CoordsXYZ { x: self.x, y: self.y, z }
    }
}

/// A full world position including height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub struct CoordsXYZ {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CoordsXYZ {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn xy(self) -> CoordsXY {
        CoordsXY::new(self.x, self.y)
    }
}

/// A tile index (world coordinates divided by [`COORDS_XY_STEP`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub struct TileCoords {
    pub x: i32,
    pub y: i32,
}

impl TileCoords {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn to_world(self) -> CoordsXY {
        CoordsXY::new(self.x * COORDS_XY_STEP, self.y * COORDS_XY_STEP)
    }
}

/// One of the four cardinal facings. Direction 0 faces +X, each increment
/// rotates 90 degrees counter-clockwise (1 faces +Y, 2 faces -X, 3 faces -Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub struct Direction(u8);

impl Direction {
    pub const fn new(value: u8) -> Self {
        Self(value & 3)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Rotate counter-clockwise by `quarter_turns` steps.
    pub const fn rotated(self, quarter_turns: i8) -> Self {
        Self((self.0 as i8 + quarter_turns).rem_euclid(4) as u8)
    }

    pub const fn reversed(self) -> Self {
        Self((self.0 + 2) & 3)
    }

    /// World-unit offset of the adjacent tile in this direction.
    pub const fn delta(self) -> CoordsXY {
        rotate_offset(CoordsXY::new(COORDS_XY_STEP, 0), self)
    }
}

/// A piece facing: cardinal direction plus the diagonal bit. Diagonal pieces
/// sit across tile corners; their successors attach on the diagonal lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub struct PieceDirection {
    pub direction: Direction,
    pub diagonal: bool,
}

impl PieceDirection {
    pub const fn new(direction: Direction) -> Self {
        Self { direction, diagonal: false }
    }

    pub const fn diagonal(direction: Direction) -> Self {
        Self { direction, diagonal: true }
    }

    pub const fn rotated(self, quarter_turns: i8) -> Self {
        Self { direction: self.direction.rotated(quarter_turns), diagonal: self.diagonal }
    }

    pub const fn reversed(self) -> Self {
        Self { direction: self.direction.reversed(), diagonal: self.diagonal }
    }
}

/// Rotate a piece-local offset into world space for the given direction.
///
/// Direction 0 is the identity; each step is a 90 degree counter-clockwise
/// rotation, matching [`Direction::delta`].
pub const fn rotate_offset(local: CoordsXY, direction: Direction) -> CoordsXY {
    match direction.0 {
        0 => local,
        1 => CoordsXY::new(-local.y, local.x),
        2 => CoordsXY::new(-local.x, -local.y),
        _ => CoordsXY::new(local.y, -local.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_offset_round_trips_for_all_directions() {
        let samples = [
            CoordsXY::new(0, 0),
            CoordsXY::new(32, 0),
            CoordsXY::new(-64, 32),
            CoordsXY::new(17, -5),
        ];
        for d in 0..4u8 {
            let dir = Direction::new(d);
            let inverse = Direction::new((4 - d) % 4);
            for sample in samples {
                let rotated = rotate_offset(sample, dir);
                assert_eq!(rotate_offset(rotated, inverse), sample, "direction {d}");
            }
        }
    }

    #[test]
    fn direction_delta_matches_rotation_of_unit_step() {
        assert_eq!(Direction::new(0).delta(), CoordsXY::new(32, 0));
        assert_eq!(Direction::new(1).delta(), CoordsXY::new(0, 32));
        assert_eq!(Direction::new(2).delta(), CoordsXY::new(-32, 0));
        assert_eq!(Direction::new(3).delta(), CoordsXY::new(0, -32));
    }

    #[test]
    fn reversed_is_involutive() {
        for d in 0..4u8 {
            let dir = Direction::new(d);
            assert_eq!(dir.reversed().reversed(), dir);
        }
    }

    #[test]
    fn tile_snapping() {
        let pos = CoordsXY::new(47, 95);
        assert_eq!(pos.to_tile_start(), CoordsXY::new(32, 64));
        assert_eq!(pos.to_tile(), TileCoords::new(1, 2));
        assert_eq!(TileCoords::new(1, 2).to_world(), CoordsXY::new(32, 64));
    }
}
