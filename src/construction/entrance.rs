//! Entrance and exit placement.
//!
//! An orthogonal sub-session: the cursor remembers the state it came from
//! and returns to it once the doorway lands. Doorways must touch a station
//! tile (or, for mazes, any hedged tile).

use bevy::prelude::*;

use crate::construction::cursor::{ConstructionCursor, ConstructionState};
use crate::construction::ghost::{GhostState, clear_entrance_ghost, set_entrance_ghost};
use crate::construction::maze::adjacent_to_maze;
use crate::construction::messages::{BeginEntrancePlacement, PlaceAt, PlaceEntranceAt};
use crate::geometry::TileCoords;
use crate::logging::TerminalLogEvent;
use crate::map::TrackMap;
use crate::track::Ride;

/// Tiles covered by a station platform.
fn station_tiles(ride: &Ride) -> Vec<TileCoords> {
    let mut tiles = Vec::new();
    for station in &ride.stations {
        let (Some(start), Some(direction)) = (station.start, station.direction) else {
            continue;
        };
        let mut world = start.xy();
        for _ in 0..station.length.max(1) {
            tiles.push(world.to_tile());
            world = world.add(direction.delta());
        }
    }
    tiles
}

fn touches_station(ride: &Ride, tile: TileCoords) -> bool {
    let tiles = station_tiles(ride);
    [(1, 0), (-1, 0), (0, 1), (0, -1)].iter().any(|(dx, dy)| {
        tiles.contains(&TileCoords::new(tile.x + dx, tile.y + dy))
    })
}

pub fn handle_begin_entrance(
    mut messages: MessageReader<BeginEntrancePlacement>,
    mut cursor: ResMut<ConstructionCursor>,
    rides: Query<&Ride>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for message in messages.read() {
        if !cursor.is_active() {
            continue;
        }
        let Some(ride) = cursor.ride.and_then(|e| rides.get(e).ok()) else {
            continue;
        };
        let anchored = !ride.stations.is_empty()
            || matches!(cursor.state, ConstructionState::MazeBuild);
        if !anchored {
            log_writer.write(TerminalLogEvent::new("Build a station first"));
            continue;
        }
        if matches!(cursor.state, ConstructionState::EntranceExit { .. }) {
            continue;
        }
        let previous = std::mem::replace(&mut cursor.state, ConstructionState::Idle);
        cursor.state = ConstructionState::EntranceExit {
            previous: Box::new(previous),
            is_exit: message.is_exit,
        };
    }
}

/// Hovering while placing a doorway previews it in the entrance ghost slot.
pub fn handle_entrance_hover(
    mut messages: MessageReader<PlaceAt>,
    cursor: Res<ConstructionCursor>,
    mut ghost: ResMut<GhostState>,
) {
    for message in messages.read() {
        let ConstructionState::EntranceExit { is_exit, .. } = &cursor.state else {
            continue;
        };
        set_entrance_ghost(&mut ghost, message.world.to_tile(), *is_exit);
    }
}

pub fn handle_place_entrance(
    mut messages: MessageReader<PlaceEntranceAt>,
    mut cursor: ResMut<ConstructionCursor>,
    mut rides: Query<&mut Ride>,
    map: Res<TrackMap>,
    mut ghost: ResMut<GhostState>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for message in messages.read() {
        let ConstructionState::EntranceExit { previous, is_exit } = &cursor.state else {
            continue;
        };
        let is_exit = *is_exit;
        let Some(ride_entity) = cursor.ride else {
            continue;
        };
        let Ok(mut ride) = rides.get_mut(ride_entity) else {
            continue;
        };

        let touches = if ride.ride_type.is_maze() {
            adjacent_to_maze(&map, ride_entity, message.tile)
        } else {
            touches_station(&ride, message.tile)
        };
        if !touches {
            log_writer.write(TerminalLogEvent::new("Doorway must touch the station"));
            continue;
        }

        if ride.ride_type.is_maze() && ride.stations.is_empty() {
            ride.stations.push(crate::track::Station::default());
        }
        let Some(station) = ride.stations.first_mut() else {
            continue;
        };
        if is_exit {
            station.exit = Some(message.tile);
        } else {
            station.entrance = Some(message.tile);
        }

        clear_entrance_ghost(&mut ghost);
        let previous = previous.clone();
        cursor.state = *previous;
        if ride.has_complete_station() {
            log_writer.write(TerminalLogEvent::new("Entrance and exit placed"));
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::geometry::{CoordsXY, CoordsXYZ, Direction};
    use crate::test_utils::{
        create_test_ride, create_test_world, drain_messages, register_message, send_message,
    };
    use crate::track::{RideType, Station};

    fn world_with_station() -> (World, Entity) {
        let mut world = create_test_world();
        register_message::<BeginEntrancePlacement>(&mut world);
        register_message::<PlaceEntranceAt>(&mut world);
        register_message::<PlaceAt>(&mut world);
        register_message::<TerminalLogEvent>(&mut world);
        let ride = create_test_ride(&mut world, RideType::WoodenCoaster);
        world.get_mut::<Ride>(ride).unwrap().stations.push(Station {
            start: Some(CoordsXYZ::new(320, 320, 16)),
            direction: Some(Direction::new(0)),
            length: 3,
            entrance: None,
            exit: None,
        });
        {
            let mut cursor = world.resource_mut::<ConstructionCursor>();
            cursor.ride = Some(ride);
            cursor.state = ConstructionState::Front;
        }
        (world, ride)
    }

    fn begin_entrance(world: &mut World, is_exit: bool) {
        send_message(world, BeginEntrancePlacement { is_exit });
        let _ = world.run_system_once(handle_begin_entrance);
    }

    #[test]
    fn begin_remembers_the_previous_state() {
        let (mut world, _ride) = world_with_station();
        begin_entrance(&mut world, false);
        let cursor = world.resource::<ConstructionCursor>();
        match &cursor.state {
            ConstructionState::EntranceExit { previous, is_exit } => {
                assert_eq!(**previous, ConstructionState::Front);
                assert!(!is_exit);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn placing_next_to_the_station_restores_state() {
        let (mut world, ride) = world_with_station();
        begin_entrance(&mut world, false);

        // One tile beside the middle platform tile.
        send_message(&mut world, PlaceEntranceAt { tile: TileCoords::new(11, 11) });
        let _ = world.run_system_once(handle_place_entrance);

        let station = &world.get::<Ride>(ride).unwrap().stations[0];
        assert_eq!(station.entrance, Some(TileCoords::new(11, 11)));
        assert_eq!(world.resource::<ConstructionCursor>().state, ConstructionState::Front);
    }

    #[test]
    fn placing_away_from_the_station_is_rejected() {
        let (mut world, ride) = world_with_station();
        begin_entrance(&mut world, true);

        send_message(&mut world, PlaceEntranceAt { tile: TileCoords::new(20, 20) });
        let _ = world.run_system_once(handle_place_entrance);

        let station = &world.get::<Ride>(ride).unwrap().stations[0];
        assert_eq!(station.exit, None);
        assert!(matches!(
            world.resource::<ConstructionCursor>().state,
            ConstructionState::EntranceExit { .. }
        ));
    }

    #[test]
    fn hover_previews_in_the_entrance_slot() {
        let (mut world, _ride) = world_with_station();
        begin_entrance(&mut world, true);

        send_message(&mut world, PlaceAt { world: CoordsXY::new(352, 352), z: None });
        let _ = world.run_system_once(handle_entrance_hover);

        let ghost = world.resource::<GhostState>();
        let preview = ghost.entrance.expect("entrance ghost");
        assert_eq!(preview.tile, TileCoords::new(11, 11));
        assert!(preview.is_exit);
    }

    #[test]
    fn completing_both_doorways_marks_the_station() {
        let (mut world, ride) = world_with_station();
        begin_entrance(&mut world, false);
        send_message(&mut world, PlaceEntranceAt { tile: TileCoords::new(10, 11) });
        let _ = world.run_system_once(handle_place_entrance);

        // Consumed requests must not replay into the exit phase.
        drain_messages::<BeginEntrancePlacement>(&mut world);
        drain_messages::<PlaceEntranceAt>(&mut world);
        begin_entrance(&mut world, true);
        send_message(&mut world, PlaceEntranceAt { tile: TileCoords::new(12, 11) });
        let _ = world.run_system_once(handle_place_entrance);

        assert!(world.get::<Ride>(ride).unwrap().has_complete_station());
    }
}
