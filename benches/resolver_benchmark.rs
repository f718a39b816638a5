use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trackwright::construction::{resolve, ConstructionCursor, ConstructionState};
use trackwright::construction::possible::compute_possible;
use trackwright::track::{
    CurveSelection, RideType, TrackBank, TrackCurve, TrackPieceCatalog, TrackSlope,
};

fn cursor_states() -> Vec<ConstructionCursor> {
    let mut cursors = Vec::new();
    for &slope in &[TrackSlope::None, TrackSlope::Up25, TrackSlope::Down25] {
        for &bank in &[TrackBank::None, TrackBank::Left, TrackBank::Right] {
            for &curve in &[TrackCurve::Straight, TrackCurve::Left, TrackCurve::RightSmall] {
                cursors.push(ConstructionCursor {
                    state: ConstructionState::Front,
                    curve: CurveSelection::Curve(curve),
                    slope,
                    bank,
                    previous_slope: TrackSlope::None,
                    previous_bank: TrackBank::None,
                    ..Default::default()
                });
            }
        }
    }
    cursors
}

fn bench_resolve(c: &mut Criterion) {
    let catalog = TrackPieceCatalog::standard();
    let cursors = cursor_states();

    c.bench_function("resolve_selection_grid", |b| {
        b.iter(|| {
            for cursor in &cursors {
                let _ = black_box(resolve(
                    black_box(cursor),
                    RideType::CorkscrewCoaster,
                    &catalog,
                ));
            }
        })
    });
}

fn bench_possible(c: &mut Criterion) {
    let catalog = TrackPieceCatalog::standard();
    let cursor = ConstructionCursor {
        state: ConstructionState::Front,
        previous_slope: TrackSlope::Up25,
        ..Default::default()
    };

    c.bench_function("possible_configurations", |b| {
        b.iter(|| {
            black_box(compute_possible(
                black_box(&cursor),
                RideType::WoodenCoaster,
                &catalog,
            ))
        })
    });
}

criterion_group!(benches, bench_resolve, bench_possible);
criterion_main!(benches);
