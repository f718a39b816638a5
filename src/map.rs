//! The world tile map: surface heights, water, and placed track elements.
//!
//! The map stores one record per occupied tile per piece. Multi-tile pieces
//! write a record on every footprint tile, all pointing back at the shared
//! piece origin so selection and demolition can recover the whole piece from
//! any of its tiles.

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use crate::constants::{LAND_HEIGHT_STEP, MINIMUM_TRACK_Z};
use crate::geometry::footprint::FootprintTile;
use crate::geometry::{CoordsXYZ, PieceDirection, TileCoords};
use crate::track::TrackElement;

#[derive(Debug, Clone, Copy)]
pub struct TileSurface {
    pub surface_z: i32,
    pub water_z: Option<i32>,
}

/// One footprint tile of a placed track piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTileElement {
    pub ride: Entity,
    pub element: TrackElement,
    /// Origin of the owning piece, shared across all of its tiles.
    pub origin: CoordsXYZ,
    pub direction: PieceDirection,
    pub base_z: i32,
    pub clearance_z: i32,
    pub is_ghost: bool,
    pub has_lift: bool,
    /// Brake speed for speed-setting elements, seat rotation otherwise.
    pub properties: u16,
    /// Built maze quadrants, for maze tiles only.
    pub maze_quadrants: u16,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("tile {0:?} is outside the map")]
    OutOfBounds(TileCoords),
    #[error("track at {0:?} would collide with an existing element")]
    Obstructed(TileCoords),
    #[error("track at {0:?} would be underground")]
    Underground(TileCoords),
    #[error("track at {0:?} would be below the minimum height")]
    TooLow(TileCoords),
}

#[derive(Resource)]
pub struct TrackMap {
    width: i32,
    height: i32,
    surfaces: Vec<TileSurface>,
    elements: HashMap<TileCoords, Vec<TrackTileElement>>,
}

impl TrackMap {
    /// A level map with every tile at one land step above the floor.
    pub fn flat(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            surfaces: vec![
                TileSurface { surface_z: LAND_HEIGHT_STEP, water_z: None };
                (width * height) as usize
            ],
            elements: HashMap::new(),
        }
    }

    pub fn in_bounds(&self, tile: TileCoords) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    fn surface_index(&self, tile: TileCoords) -> Option<usize> {
        self.in_bounds(tile).then(|| (tile.y * self.width + tile.x) as usize)
    }

    /// Effective support height of a tile. Water counts as the surface, so
    /// height-copying from a flooded tile tracks the water line.
    pub fn surface_z(&self, tile: TileCoords) -> i32 {
        self.surface_index(tile)
            .map(|i| {
                let surface = self.surfaces[i];
                surface.water_z.map_or(surface.surface_z, |w| w.max(surface.surface_z))
            })
            .unwrap_or(MINIMUM_TRACK_Z)
    }

    pub fn set_surface_z(&mut self, tile: TileCoords, z: i32) {
        if let Some(i) = self.surface_index(tile) {
            self.surfaces[i].surface_z = z;
        }
    }

    pub fn set_water_z(&mut self, tile: TileCoords, z: Option<i32>) {
        if let Some(i) = self.surface_index(tile) {
            self.surfaces[i].water_z = z;
        }
    }

    pub fn elements_at(&self, tile: TileCoords) -> &[TrackTileElement] {
        self.elements.get(&tile).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Highest clearance over a tile, surface included. Ghosts are counted
    /// only when `include_ghosts` is set.
    pub fn highest_z_at(&self, tile: TileCoords, include_ghosts: bool) -> i32 {
        let track = self
            .elements_at(tile)
            .iter()
            .filter(|e| include_ghosts || !e.is_ghost)
            .map(|e| e.clearance_z)
            .max()
            .unwrap_or(i32::MIN);
        track.max(self.surface_z(tile))
    }

    /// Check a footprint against bounds, terrain and existing track.
    pub fn can_place(
        &self,
        footprint: impl Iterator<Item = FootprintTile>,
        ignore_ghosts: bool,
    ) -> Result<(), MapError> {
        for tile in footprint {
            if !self.in_bounds(tile.tile) {
                return Err(MapError::OutOfBounds(tile.tile));
            }
            if tile.base_z < MINIMUM_TRACK_Z {
                return Err(MapError::TooLow(tile.tile));
            }
            let surface_only = self
                .surface_index(tile.tile)
                .map(|i| self.surfaces[i].surface_z)
                .unwrap_or(MINIMUM_TRACK_Z);
            if tile.base_z < surface_only {
                return Err(MapError::Underground(tile.tile));
            }
            let collides = self.elements_at(tile.tile).iter().any(|e| {
                if ignore_ghosts && e.is_ghost {
                    return false;
                }
                tile.base_z < e.clearance_z && tile.clearance_z > e.base_z
            });
            if collides {
                return Err(MapError::Obstructed(tile.tile));
            }
        }
        Ok(())
    }

    /// Write one footprint tile record. Callers validate with [`can_place`]
    /// first; this only refuses out-of-bounds tiles.
    ///
    /// [`can_place`]: TrackMap::can_place
    pub fn insert(&mut self, tile: TileCoords, record: TrackTileElement) -> Result<(), MapError> {
        if !self.in_bounds(tile) {
            return Err(MapError::OutOfBounds(tile));
        }
        self.elements.entry(tile).or_default().push(record);
        Ok(())
    }

    /// Remove every tile record of the piece with the given origin and
    /// element. Returns whether anything was removed.
    pub fn remove_piece(
        &mut self,
        ride: Entity,
        element: TrackElement,
        origin: CoordsXYZ,
    ) -> bool {
        let mut removed = false;
        self.elements.retain(|_, records| {
            let before = records.len();
            records.retain(|e| {
                !(e.ride == ride && e.element == element && e.origin == origin)
            });
            removed |= records.len() != before;
            !records.is_empty()
        });
        removed
    }

    /// Remove all ghost records belonging to a ride. Returns the origins of
    /// the pieces that were swept, deduplicated.
    pub fn remove_ghosts(&mut self, ride: Entity) -> Vec<(TrackElement, CoordsXYZ)> {
        let mut swept = Vec::new();
        self.elements.retain(|_, records| {
            records.retain(|e| {
                if e.ride == ride && e.is_ghost {
                    let key = (e.element, e.origin);
                    if !swept.contains(&key) {
                        swept.push(key);
                    }
                    false
                } else {
                    true
                }
            });
            !records.is_empty()
        });
        swept
    }

    /// The track element of `ride` whose vertical span covers `z` at `tile`.
    pub fn track_element_at(
        &self,
        ride: Entity,
        tile: TileCoords,
        z: i32,
    ) -> Option<&TrackTileElement> {
        self.elements_at(tile)
            .iter()
            .filter(|e| e.ride == ride && !e.is_ghost)
            .find(|e| z >= e.base_z && z < e.clearance_z.max(e.base_z + 1))
    }

    /// Update the stored properties word of a committed piece on every tile
    /// it occupies. Returns whether the piece was found.
    pub fn set_piece_properties(
        &mut self,
        ride: Entity,
        element: TrackElement,
        origin: CoordsXYZ,
        properties: u16,
    ) -> bool {
        let mut found = false;
        for records in self.elements.values_mut() {
            for record in records.iter_mut() {
                if record.ride == ride
                    && record.element == element
                    && record.origin == origin
                    && !record.is_ghost
                {
                    record.properties = properties;
                    found = true;
                }
            }
        }
        found
    }

    /// Union new maze quadrants into the maze record at `tile`, creating the
    /// record when the tile is still empty.
    pub fn add_maze_quadrants(
        &mut self,
        tile: TileCoords,
        template: TrackTileElement,
        quadrants: u16,
    ) -> Result<(), MapError> {
        if !self.in_bounds(tile) {
            return Err(MapError::OutOfBounds(tile));
        }
        let records = self.elements.entry(tile).or_default();
        if let Some(existing) = records
            .iter_mut()
            .find(|e| e.ride == template.ride && e.element == TrackElement::Maze)
        {
            existing.maze_quadrants |= quadrants;
        } else {
            records.push(TrackTileElement { maze_quadrants: quadrants, ..template });
        }
        Ok(())
    }

    pub fn maze_quadrants(&self, ride: Entity, tile: TileCoords) -> u16 {
        self.elements_at(tile)
            .iter()
            .find(|e| e.ride == ride && e.element == TrackElement::Maze)
            .map(|e| e.maze_quadrants)
            .unwrap_or(0)
    }

    /// Clear maze quadrants at `tile`, dropping the record once empty.
    /// Returns the quadrants that remain.
    pub fn remove_maze_quadrants(
        &mut self,
        ride: Entity,
        tile: TileCoords,
        quadrants: u16,
    ) -> u16 {
        let mut remaining = 0;
        if let Some(records) = self.elements.get_mut(&tile) {
            if let Some(existing) = records
                .iter_mut()
                .find(|e| e.ride == ride && e.element == TrackElement::Maze)
            {
                existing.maze_quadrants &= !quadrants;
                remaining = existing.maze_quadrants;
            }
            if remaining == 0 {
                records.retain(|e| !(e.ride == ride && e.element == TrackElement::Maze));
                if records.is_empty() {
                    self.elements.remove(&tile);
                }
            }
        }
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;

    fn record(ride: Entity, base_z: i32, clearance_z: i32, ghost: bool) -> TrackTileElement {
        TrackTileElement {
            ride,
            element: TrackElement::Flat,
            origin: CoordsXYZ::new(0, 0, base_z),
            direction: PieceDirection::new(Direction::new(0)),
            base_z,
            clearance_z,
            is_ghost: ghost,
            has_lift: false,
            properties: 0,
            maze_quadrants: 0,
        }
    }

    fn tile_at(base_z: i32, clearance: i32) -> FootprintTile {
        FootprintTile {
            tile: TileCoords::new(2, 2),
            base_z,
            clearance_z: base_z + clearance,
        }
    }

    #[test]
    fn water_raises_the_effective_surface() {
        let mut map = TrackMap::flat(8, 8);
        assert_eq!(map.surface_z(TileCoords::new(1, 1)), LAND_HEIGHT_STEP);
        map.set_water_z(TileCoords::new(1, 1), Some(48));
        assert_eq!(map.surface_z(TileCoords::new(1, 1)), 48);
    }

    #[test]
    fn overlapping_spans_collide() {
        let mut map = TrackMap::flat(8, 8);
        let ride = World::new().spawn_empty().id();
        map.insert(TileCoords::new(2, 2), record(ride, 32, 56, false)).unwrap();

        assert_eq!(
            map.can_place([tile_at(40, 24)].into_iter(), false),
            Err(MapError::Obstructed(TileCoords::new(2, 2)))
        );
        assert_eq!(map.can_place([tile_at(56, 24)].into_iter(), false), Ok(()));
    }

    #[test]
    fn ghosts_are_transparent_when_ignored() {
        let mut map = TrackMap::flat(8, 8);
        let ride = World::new().spawn_empty().id();
        map.insert(TileCoords::new(2, 2), record(ride, 32, 56, true)).unwrap();

        assert_eq!(map.can_place([tile_at(40, 24)].into_iter(), true), Ok(()));
        assert!(map.can_place([tile_at(40, 24)].into_iter(), false).is_err());
    }

    #[test]
    fn remove_ghosts_sweeps_only_ghosts() {
        let mut map = TrackMap::flat(8, 8);
        let ride = World::new().spawn_empty().id();
        map.insert(TileCoords::new(2, 2), record(ride, 32, 56, true)).unwrap();
        map.insert(TileCoords::new(3, 2), record(ride, 32, 56, false)).unwrap();

        let swept = map.remove_ghosts(ride);
        assert_eq!(swept.len(), 1);
        assert!(map.elements_at(TileCoords::new(2, 2)).is_empty());
        assert_eq!(map.elements_at(TileCoords::new(3, 2)).len(), 1);
    }

    #[test]
    fn multi_tile_pieces_are_removed_whole() {
        let mut map = TrackMap::flat(8, 8);
        let ride = World::new().spawn_empty().id();
        let piece = record(ride, 16, 40, false);
        map.insert(TileCoords::new(2, 2), piece.clone()).unwrap();
        map.insert(TileCoords::new(3, 2), piece.clone()).unwrap();

        assert!(map.remove_piece(ride, piece.element, piece.origin));
        assert!(map.elements_at(TileCoords::new(2, 2)).is_empty());
        assert!(map.elements_at(TileCoords::new(3, 2)).is_empty());
    }

    #[test]
    fn maze_quadrants_accumulate() {
        let mut map = TrackMap::flat(8, 8);
        let ride = World::new().spawn_empty().id();
        let mut template = record(ride, 16, 32, false);
        template.element = TrackElement::Maze;

        map.add_maze_quadrants(TileCoords::new(4, 4), template.clone(), 0b0001).unwrap();
        map.add_maze_quadrants(TileCoords::new(4, 4), template, 0b0100).unwrap();
        assert_eq!(map.maze_quadrants(ride, TileCoords::new(4, 4)), 0b0101);
        assert_eq!(map.elements_at(TileCoords::new(4, 4)).len(), 1);
    }
}
