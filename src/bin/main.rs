//! Headless construction demo.
//!
//! Builds a short wooden coaster layout by feeding the same messages a UI
//! would, then prints the terminal log. Useful as a smoke test and as an
//! example of driving the construction core.

use bevy::prelude::*;

use trackwright::construction::{
    BeginConstruction, CloseConstruction, ConfirmConstruct, PlaceAt, SelectBank, SelectCurve,
    SelectSlope,
};
use trackwright::geometry::CoordsXY;
use trackwright::logging::TerminalLog;
use trackwright::track::{CurveSelection, Ride, RideType, TrackBank, TrackCurve, TrackSlope};

fn main() {
    let mut app = trackwright::app();
    app.finish();
    app.cleanup();

    let ride = app.world_mut().spawn(Ride::new(RideType::WoodenCoaster)).id();

    // One update per message, so every confirm sees the ghost the previous
    // selection produced.
    app.world_mut().write_message(BeginConstruction { ride });
    app.update();
    app.world_mut().write_message(PlaceAt { world: CoordsXY::new(2048, 2048), z: None });
    app.update();
    app.world_mut().write_message(ConfirmConstruct);
    app.update();

    // A climb, back to level, then a banked turn and out of it again.
    let script: &[&dyn Fn(&mut World)] = &[
        &|w| {
            w.write_message(SelectSlope { slope: TrackSlope::Up25 });
        },
        &|w| {
            w.write_message(SelectSlope { slope: TrackSlope::None });
        },
        &|w| {
            w.write_message(SelectBank { bank: TrackBank::Left });
        },
        &|w| {
            w.write_message(SelectCurve { curve: CurveSelection::Curve(TrackCurve::Left) });
        },
        &|w| {
            w.write_message(SelectCurve { curve: CurveSelection::Curve(TrackCurve::Straight) });
            w.write_message(SelectBank { bank: TrackBank::None });
        },
    ];
    for select in script {
        select(app.world_mut());
        app.update();
        app.world_mut().write_message(ConfirmConstruct);
        app.update();
    }

    app.world_mut().write_message(CloseConstruction);
    app.update();

    let world = app.world();
    let log = world.resource::<TerminalLog>();
    for line in &log.messages {
        println!("{line}");
    }
    let ride_state = world.get::<Ride>(ride).unwrap();
    println!("pieces built: {}", ride_state.num_pieces);
}
