//! Maze build mode.
//!
//! Mazes are not built piece-by-piece: the first confirm stakes out one
//! fully hedged tile, then the session switches to quadrant painting. Each
//! tile stores a quadrant bitmask instead of a directed track element.

use bevy::prelude::*;

use crate::constants::MINIMUM_TRACK_Z;
use crate::construction::commit::ParkTreasury;
use crate::construction::cursor::{ConstructionCursor, ConstructionState};
use crate::construction::ghost::ZSearchPolicy;
use crate::construction::messages::{ConfirmConstruct, PaintMazeQuadrant};
use crate::geometry::footprint::FootprintTile;
use crate::geometry::{CoordsXYZ, Direction, PieceDirection, TileCoords};
use crate::logging::TerminalLogEvent;
use crate::map::{TrackMap, TrackTileElement};
use crate::track::{Ride, TrackElement, TrackPieceCatalog};

/// All four quadrants hedged.
pub const MAZE_FULL_TILE: u16 = 0b1111;

const MAZE_CLEARANCE: i32 = 24;

fn maze_template(ride: Entity, tile: TileCoords, base_z: i32) -> TrackTileElement {
    let world = tile.to_world();
    TrackTileElement {
        ride,
        element: TrackElement::Maze,
        origin: CoordsXYZ::new(world.x, world.y, base_z),
        direction: PieceDirection::new(Direction::new(0)),
        base_z,
        clearance_z: base_z + MAZE_CLEARANCE,
        is_ghost: false,
        has_lift: false,
        properties: 0,
        maze_quadrants: 0,
    }
}

/// Pick a legal base height for a maze tile, walking downward like the
/// track ghost search.
fn find_maze_z(map: &TrackMap, tile: TileCoords, from_z: i32) -> Option<i32> {
    let policy = ZSearchPolicy::default();
    let mut z = from_z.max(MINIMUM_TRACK_Z);
    for _ in 0..policy.max_attempts {
        let probe = FootprintTile { tile, base_z: z, clearance_z: z + MAZE_CLEARANCE };
        if map.can_place(std::iter::once(probe), false).is_ok() {
            return Some(z);
        }
        if z - policy.step < MINIMUM_TRACK_Z {
            break;
        }
        z -= policy.step;
    }
    None
}

/// The first confirm on a maze ride: stake out one hedged tile under the
/// cursor and enter paint mode.
pub fn handle_maze_confirm(
    mut messages: MessageReader<ConfirmConstruct>,
    mut cursor: ResMut<ConstructionCursor>,
    mut rides: Query<&mut Ride>,
    catalog: Res<TrackPieceCatalog>,
    mut map: ResMut<TrackMap>,
    mut treasury: ResMut<ParkTreasury>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for _ in messages.read() {
        if !matches!(cursor.state, ConstructionState::Placing) {
            continue;
        }
        let Some(ride_entity) = cursor.ride else {
            continue;
        };
        let Ok(mut ride) = rides.get_mut(ride_entity) else {
            continue;
        };
        if !ride.ride_type.is_maze() {
            continue;
        }
        let Ok(definition) = catalog.lookup(TrackElement::Maze) else {
            continue;
        };

        let tile = cursor.position.xy().to_tile();
        let Some(base_z) = find_maze_z(&map, tile, cursor.position.z) else {
            log_writer.write(TerminalLogEvent::new("Cannot start a maze here"));
            continue;
        };
        if let Err(err) = treasury.debit(definition.base_price) {
            log_writer.write(TerminalLogEvent::new(format!("Cannot start maze: {err}")));
            continue;
        }
        let template = maze_template(ride_entity, tile, base_z);
        if map.add_maze_quadrants(tile, template, MAZE_FULL_TILE).is_err() {
            treasury.credit(definition.base_price);
            log_writer.write(TerminalLogEvent::new("Cannot start a maze here"));
            continue;
        }

        ride.num_pieces += 1;
        cursor.position = CoordsXYZ::new(cursor.position.x, cursor.position.y, base_z);
        cursor.state = ConstructionState::MazeBuild;
        log_writer.write(TerminalLogEvent::new("Maze started"));
    }
}

/// Quadrant painting once the maze is staked out. Painting the first
/// quadrant of a tile pays the tile price; erasing the last refunds it in
/// part, the same fraction as track demolition.
pub fn handle_paint_maze(
    mut messages: MessageReader<PaintMazeQuadrant>,
    cursor: Res<ConstructionCursor>,
    mut rides: Query<&mut Ride>,
    catalog: Res<TrackPieceCatalog>,
    mut map: ResMut<TrackMap>,
    mut treasury: ResMut<ParkTreasury>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for message in messages.read() {
        if !matches!(cursor.state, ConstructionState::MazeBuild) {
            continue;
        }
        if message.quadrant >= 4 {
            continue;
        }
        let Some(ride_entity) = cursor.ride else {
            continue;
        };
        let Ok(mut ride) = rides.get_mut(ride_entity) else {
            continue;
        };
        if !ride.ride_type.is_maze() {
            continue;
        }
        let Ok(definition) = catalog.lookup(TrackElement::Maze) else {
            continue;
        };
        let bit = 1u16 << message.quadrant;
        let existing = map.maze_quadrants(ride_entity, message.tile);

        if message.erase {
            if existing & bit == 0 {
                continue;
            }
            let remaining = map.remove_maze_quadrants(ride_entity, message.tile, bit);
            if remaining == 0 {
                treasury.credit(definition.base_price * 7 / 10);
                ride.num_pieces = ride.num_pieces.saturating_sub(1);
            }
        } else {
            if existing & bit != 0 {
                continue;
            }
            if existing == 0 {
                // New tile: must be placeable next to the existing maze and
                // paid for.
                if !adjacent_to_maze(&map, ride_entity, message.tile) {
                    log_writer
                        .write(TerminalLogEvent::new("Maze tiles must touch the maze"));
                    continue;
                }
                let Some(base_z) = find_maze_z(&map, message.tile, cursor.position.z) else {
                    log_writer.write(TerminalLogEvent::new("Cannot extend the maze here"));
                    continue;
                };
                if let Err(err) = treasury.debit(definition.base_price) {
                    log_writer.write(TerminalLogEvent::new(format!("{err}")));
                    continue;
                }
                let template = maze_template(ride_entity, message.tile, base_z);
                if map.add_maze_quadrants(message.tile, template, bit).is_err() {
                    treasury.credit(definition.base_price);
                    continue;
                }
                ride.num_pieces += 1;
            } else {
                let template = maze_template(ride_entity, message.tile, 0);
                let _ = map.add_maze_quadrants(message.tile, template, bit);
            }
        }
    }
}

/// Whether `tile` shares an edge with any existing tile of the maze.
pub fn adjacent_to_maze(map: &TrackMap, ride: Entity, tile: TileCoords) -> bool {
    [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .iter()
        .any(|(dx, dy)| map.maze_quadrants(ride, TileCoords::new(tile.x + dx, tile.y + dy)) != 0)
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::test_utils::{
        create_test_ride, create_test_world, register_message, send_message,
    };
    use crate::track::RideType;

    fn maze_world() -> (World, Entity) {
        let mut world = create_test_world();
        register_message::<ConfirmConstruct>(&mut world);
        register_message::<PaintMazeQuadrant>(&mut world);
        register_message::<TerminalLogEvent>(&mut world);
        let ride = create_test_ride(&mut world, RideType::Maze);
        {
            let mut cursor = world.resource_mut::<ConstructionCursor>();
            cursor.ride = Some(ride);
            cursor.state = ConstructionState::Placing;
            cursor.position = CoordsXYZ::new(320, 320, 16);
        }
        (world, ride)
    }

    fn start_maze(world: &mut World) {
        send_message(world, ConfirmConstruct);
        let _ = world.run_system_once(handle_maze_confirm);
    }

    #[test]
    fn confirm_stakes_out_a_full_tile() {
        let (mut world, ride) = maze_world();
        let before = world.resource::<ParkTreasury>().balance();
        start_maze(&mut world);

        let cursor = world.resource::<ConstructionCursor>();
        assert_eq!(cursor.state, ConstructionState::MazeBuild);
        let tile = TileCoords::new(10, 10);
        assert_eq!(world.resource::<TrackMap>().maze_quadrants(ride, tile), MAZE_FULL_TILE);
        assert!(world.resource::<ParkTreasury>().balance() < before);
        assert_eq!(world.get::<Ride>(ride).unwrap().num_pieces, 1);
    }

    #[test]
    fn painting_extends_only_adjacent_tiles() {
        let (mut world, ride) = maze_world();
        start_maze(&mut world);

        send_message(
            &mut world,
            PaintMazeQuadrant { tile: TileCoords::new(11, 10), quadrant: 2, erase: false },
        );
        send_message(
            &mut world,
            PaintMazeQuadrant { tile: TileCoords::new(20, 20), quadrant: 0, erase: false },
        );
        let _ = world.run_system_once(handle_paint_maze);

        let map = world.resource::<TrackMap>();
        assert_eq!(map.maze_quadrants(ride, TileCoords::new(11, 10)), 0b0100);
        assert_eq!(map.maze_quadrants(ride, TileCoords::new(20, 20)), 0);
    }

    #[test]
    fn erasing_the_last_quadrant_frees_the_tile() {
        let (mut world, ride) = maze_world();
        start_maze(&mut world);
        send_message(
            &mut world,
            PaintMazeQuadrant { tile: TileCoords::new(11, 10), quadrant: 1, erase: false },
        );
        let _ = world.run_system_once(handle_paint_maze);
        let spent = world.resource::<ParkTreasury>().balance();
        assert_eq!(world.get::<Ride>(ride).unwrap().num_pieces, 2);

        send_message(
            &mut world,
            PaintMazeQuadrant { tile: TileCoords::new(11, 10), quadrant: 1, erase: true },
        );
        let _ = world.run_system_once(handle_paint_maze);

        let map = world.resource::<TrackMap>();
        assert_eq!(map.maze_quadrants(ride, TileCoords::new(11, 10)), 0);
        assert!(map.elements_at(TileCoords::new(11, 10)).is_empty());
        assert!(world.resource::<ParkTreasury>().balance() > spent);
        assert_eq!(world.get::<Ride>(ride).unwrap().num_pieces, 1);
    }

    #[test]
    fn repainting_a_quadrant_is_free() {
        let (mut world, ride) = maze_world();
        start_maze(&mut world);
        let before = world.resource::<ParkTreasury>().balance();
        send_message(
            &mut world,
            PaintMazeQuadrant { tile: TileCoords::new(10, 10), quadrant: 0, erase: false },
        );
        let _ = world.run_system_once(handle_paint_maze);
        assert_eq!(world.resource::<ParkTreasury>().balance(), before);
        let map = world.resource::<TrackMap>();
        assert_eq!(map.maze_quadrants(ride, TileCoords::new(10, 10)), MAZE_FULL_TILE);
    }
}
