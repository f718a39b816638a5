use bevy::prelude::*;

use trackwright::LogicPlugins;
use trackwright::construction::{BeginConstruction, ConfirmConstruct, PlaceAt};
use trackwright::geometry::CoordsXY;
use trackwright::map::TrackMap;
use trackwright::track::{Ride, RideType, TrackPieceCatalog};

/// A headless app over a flat 64x64 map, without the log writer that would
/// install a global tracing subscriber.
pub fn test_app() -> App {
    let mut app = App::new();
    app.insert_resource(TrackMap::flat(64, 64))
        .insert_resource(TrackPieceCatalog::standard())
        .add_plugins(LogicPlugins);
    app
}

pub fn spawn_ride(app: &mut App, ride_type: RideType) -> Entity {
    app.world_mut().spawn(Ride::new(ride_type)).id()
}

/// Open a session and park the cursor at a world position. Runs one update
/// per message, the same cadence a UI would produce.
pub fn open_session_at(app: &mut App, ride: Entity, x: i32, y: i32) {
    app.world_mut().write_message(BeginConstruction { ride });
    app.update();
    app.world_mut().write_message(PlaceAt { world: CoordsXY::new(x, y), z: None });
    app.update();
}

pub fn confirm(app: &mut App) {
    app.world_mut().write_message(ConfirmConstruct);
    app.update();
}
