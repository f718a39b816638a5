//! End-to-end construction flows driven purely through messages.

mod common;

use common::{confirm, open_session_at, spawn_ride, test_app};
use trackwright::construction::{
    CloseConstruction, ConstructionCursor, ConstructionState, DemolishCurrent, ParkTreasury,
    SelectBank, SelectCurve, SelectNextSection, SelectSlope,
};
use trackwright::geometry::{CoordsXY, CoordsXYZ};
use trackwright::logging::TerminalLog;
use trackwright::map::TrackMap;
use trackwright::track::{
    CurveSelection, Ride, RideType, TrackBank, TrackCurve, TrackElement, TrackSlope,
};

#[test]
fn builds_a_hill_and_returns_to_level() {
    let mut app = test_app();
    let ride = spawn_ride(&mut app, RideType::WoodenCoaster);
    open_session_at(&mut app, ride, 640, 640);
    confirm(&mut app);

    app.world_mut().write_message(SelectSlope { slope: TrackSlope::Up25 });
    app.update();
    confirm(&mut app);
    confirm(&mut app);

    app.world_mut().write_message(SelectSlope { slope: TrackSlope::None });
    app.update();
    confirm(&mut app);

    // Flat, flat-to-up, up, up-to-flat.
    assert_eq!(app.world().get::<Ride>(ride).unwrap().num_pieces, 4);
    let cursor = app.world().resource::<ConstructionCursor>();
    assert_eq!(cursor.state, ConstructionState::Front);
    // 16 + 8 (transition) + 16 (slope) + 8 (transition).
    assert_eq!(cursor.position, CoordsXYZ::new(768, 640, 48));

    let map = app.world().resource::<TrackMap>();
    let base = CoordsXY::new(640, 640).to_tile();
    let first = map.track_element_at(ride, base, 16).expect("first piece");
    assert_eq!(first.element, TrackElement::Flat);
    assert!(!first.is_ghost);
}

#[test]
fn bank_chains_into_a_banked_turn() {
    let mut app = test_app();
    let ride = spawn_ride(&mut app, RideType::WoodenCoaster);
    open_session_at(&mut app, ride, 640, 640);
    confirm(&mut app);

    app.world_mut().write_message(SelectBank { bank: TrackBank::Left });
    app.update();
    confirm(&mut app);

    // The bank carries forward, so the turn resolves banked.
    app.world_mut()
        .write_message(SelectCurve { curve: CurveSelection::Curve(TrackCurve::Left) });
    app.update();
    confirm(&mut app);

    let map = app.world().resource::<TrackMap>();
    let turn_origin = CoordsXY::new(704, 640).to_tile();
    let turn = map.track_element_at(ride, turn_origin, 16).expect("turn piece");
    assert_eq!(turn.element, TrackElement::BankedLeftQuarterTurn5Tiles);
}

#[test]
fn demolish_then_rebuild_in_place() {
    let mut app = test_app();
    let ride = spawn_ride(&mut app, RideType::WoodenCoaster);
    open_session_at(&mut app, ride, 640, 640);
    confirm(&mut app);
    confirm(&mut app);

    app.world_mut().write_message(DemolishCurrent);
    app.update();

    // The surviving neighbour becomes the selected section.
    assert_eq!(app.world().get::<Ride>(ride).unwrap().num_pieces, 1);
    let cursor = app.world().resource::<ConstructionCursor>();
    assert_eq!(cursor.state, ConstructionState::Selected);
    let selected = cursor.selected.expect("surviving piece");
    assert_eq!(selected.origin, CoordsXYZ::new(640, 640, 16));

    app.world_mut().write_message(SelectNextSection);
    app.update();
    let cursor = app.world().resource::<ConstructionCursor>();
    assert_eq!(cursor.state, ConstructionState::Front);
    assert_eq!(cursor.position, CoordsXYZ::new(672, 640, 16));

    confirm(&mut app);
    assert_eq!(app.world().get::<Ride>(ride).unwrap().num_pieces, 2);
}

#[test]
fn close_sweeps_the_preview_and_logs() {
    let mut app = test_app();
    let ride = spawn_ride(&mut app, RideType::WoodenCoaster);
    open_session_at(&mut app, ride, 640, 640);

    app.world_mut().write_message(CloseConstruction);
    app.update();

    let map = app.world().resource::<TrackMap>();
    assert!(map.elements_at(CoordsXY::new(640, 640).to_tile()).is_empty());
    assert!(!app.world().resource::<ConstructionCursor>().is_active());

    let log = app.world().resource::<TerminalLog>();
    assert!(log.messages.iter().any(|m| m.contains("closed")));
}

#[test]
fn ghosts_never_touch_the_treasury() {
    let mut app = test_app();
    let ride = spawn_ride(&mut app, RideType::WoodenCoaster);
    let before = app.world().resource::<ParkTreasury>().balance();

    open_session_at(&mut app, ride, 640, 640);
    // Move the preview around a few times.
    for x in [672, 704, 736] {
        app.world_mut().write_message(trackwright::construction::PlaceAt {
            world: CoordsXY::new(x, 640),
            z: None,
        });
        app.update();
    }
    assert_eq!(app.world().resource::<ParkTreasury>().balance(), before);

    confirm(&mut app);
    assert!(app.world().resource::<ParkTreasury>().balance() < before);
}
