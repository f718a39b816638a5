//! Speculative ghost placement with bounded height search.
//!
//! At most one track ghost and one entrance ghost exist at any time. Ghost
//! placement is free, synchronous, and rolled back wholesale when the cursor
//! moves or the session closes.

use bevy::prelude::*;

use crate::constants::{MINIMUM_TRACK_Z, Money};
use crate::construction::commit::{ParkTreasury, PlaceRequest, PlacementError, execute_place};
use crate::geometry::TileCoords;
use crate::map::TrackMap;
use crate::track::TrackPieceCatalog;

/// Bounded retry policy for finding a placeable height. Attempts walk
/// downward from the requested height in fixed steps, stopping at the
/// minimum track height.
#[derive(Debug, Clone, Copy)]
pub struct ZSearchPolicy {
    pub max_attempts: u32,
    pub step: i32,
}

impl Default for ZSearchPolicy {
    fn default() -> Self {
        Self { max_attempts: 41, step: 8 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostPiece {
    pub request: PlaceRequest,
    pub cost: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostEntrance {
    pub tile: TileCoords,
    pub is_exit: bool,
}

#[derive(Resource, Debug, Default)]
pub struct GhostState {
    pub track: Option<GhostPiece>,
    pub entrance: Option<GhostEntrance>,
}

impl GhostState {
    pub fn track_cost(&self) -> Option<Money> {
        self.track.map(|g| g.cost)
    }
}

/// Place a track ghost, searching downward for a height that fits. Any
/// previous ghost is removed first, so the at-most-one invariant holds no
/// matter how often this is called.
pub fn place_track_ghost(
    ghost: &mut GhostState,
    map: &mut TrackMap,
    catalog: &TrackPieceCatalog,
    request: PlaceRequest,
    policy: ZSearchPolicy,
) -> Result<Money, PlacementError> {
    remove_track_ghost(ghost, map);

    let mut request = PlaceRequest { is_ghost: true, ..request };
    request.origin.z = request.origin.z.max(MINIMUM_TRACK_Z);
    let mut last_error = None;

    // Ghost money never moves; the treasury here is a scratch value.
    let mut scratch = ParkTreasury::new(0);

    for _ in 0..policy.max_attempts {
        match execute_place(map, catalog, &mut scratch, &request) {
            Ok(cost) => {
                ghost.track = Some(GhostPiece { request, cost });
                return Ok(cost);
            }
            Err(err) if err.is_retryable() => {
                last_error = Some(err);
                if request.origin.z - policy.step < MINIMUM_TRACK_Z {
                    break;
                }
                request.origin.z -= policy.step;
            }
            Err(err) => return Err(err),
        }
    }
    Err(last_error.unwrap_or(PlacementError::NothingToRemove))
}

/// Remove the track ghost if one exists. Safe to call repeatedly; a ghost
/// already cleared externally degrades to a no-op.
pub fn remove_track_ghost(ghost: &mut GhostState, map: &mut TrackMap) {
    if let Some(piece) = ghost.track.take() {
        map.remove_piece(piece.request.ride, piece.request.element, piece.request.origin);
    }
}

pub fn set_entrance_ghost(ghost: &mut GhostState, tile: TileCoords, is_exit: bool) {
    ghost.entrance = Some(GhostEntrance { tile, is_exit });
}

pub fn clear_entrance_ghost(ghost: &mut GhostState) {
    ghost.entrance = None;
}

/// Sweep every ghost belonging to `ride`, both tracked and stray.
pub fn sweep_ride_ghosts(ghost: &mut GhostState, map: &mut TrackMap, ride: Entity) {
    ghost.track = None;
    ghost.entrance = None;
    map.remove_ghosts(ride);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::commit::ParkTreasury;
    use crate::geometry::{CoordsXYZ, Direction, PieceDirection};
    use crate::track::TrackElement;

    fn request(ride: Entity, z: i32) -> PlaceRequest {
        PlaceRequest {
            ride,
            element: TrackElement::Flat,
            origin: CoordsXYZ::new(64, 64, z),
            direction: PieceDirection::new(Direction::new(0)),
            is_ghost: false,
            has_lift: false,
            properties: 0,
        }
    }

    fn setup() -> (GhostState, TrackMap, TrackPieceCatalog, Entity) {
        let ride = World::new().spawn_empty().id();
        (GhostState::default(), TrackMap::flat(16, 16), TrackPieceCatalog::standard(), ride)
    }

    #[test]
    fn at_most_one_ghost_exists() {
        let (mut ghost, mut map, catalog, ride) = setup();
        let policy = ZSearchPolicy::default();

        for x in [64, 96, 128] {
            let mut req = request(ride, 16);
            req.origin.x = x;
            place_track_ghost(&mut ghost, &mut map, &catalog, req, policy).unwrap();
        }

        let ghost_tiles: usize = (0..16)
            .flat_map(|x| (0..16).map(move |y| TileCoords::new(x, y)))
            .map(|t| map.elements_at(t).iter().filter(|e| e.is_ghost).count())
            .sum();
        assert_eq!(ghost_tiles, 1);
    }

    #[test]
    fn ghost_removal_is_idempotent() {
        let (mut ghost, mut map, catalog, ride) = setup();
        place_track_ghost(&mut ghost, &mut map, &catalog, request(ride, 16), ZSearchPolicy::default())
            .unwrap();

        remove_track_ghost(&mut ghost, &mut map);
        let after_first: Vec<_> = map.elements_at(TileCoords::new(2, 2)).to_vec();
        remove_track_ghost(&mut ghost, &mut map);
        assert_eq!(map.elements_at(TileCoords::new(2, 2)), after_first.as_slice());
        assert!(after_first.is_empty());
    }

    #[test]
    fn height_search_steps_down_past_obstructions() {
        let (mut ghost, mut map, catalog, ride) = setup();
        let mut treasury = ParkTreasury::default();
        // Solid track spanning z 40..64 on the target tile.
        execute_place(&mut map, &catalog, &mut treasury, &request(ride, 40)).unwrap();

        let cost = place_track_ghost(
            &mut ghost,
            &mut map,
            &catalog,
            request(ride, 56),
            ZSearchPolicy::default(),
        )
        .unwrap();
        assert!(cost > 0);
        assert_eq!(ghost.track.unwrap().request.origin.z, 16);
    }

    #[test]
    fn exhausted_search_reports_the_last_failure() {
        let (mut ghost, mut map, catalog, ride) = setup();
        let mut treasury = ParkTreasury::default();
        // Fill every usable height band over the tile.
        for z in [16, 104, 192] {
            let mut req = request(ride, z);
            req.element = TrackElement::Up60;
            execute_place(&mut map, &catalog, &mut treasury, &req).unwrap();
        }

        let result = place_track_ghost(
            &mut ghost,
            &mut map,
            &catalog,
            request(ride, 96),
            ZSearchPolicy { max_attempts: 12, step: 8 },
        );
        assert!(matches!(result, Err(ref e) if e.is_retryable()));
        assert!(ghost.track.is_none());
    }

    #[test]
    fn sweep_clears_both_ghost_kinds() {
        let (mut ghost, mut map, catalog, ride) = setup();
        place_track_ghost(&mut ghost, &mut map, &catalog, request(ride, 16), ZSearchPolicy::default())
            .unwrap();
        set_entrance_ghost(&mut ghost, TileCoords::new(3, 3), false);

        sweep_ride_ghosts(&mut ghost, &mut map, ride);
        assert!(ghost.track.is_none());
        assert!(ghost.entrance.is_none());
        assert!(map.elements_at(TileCoords::new(2, 2)).is_empty());
    }
}
