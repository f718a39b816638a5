//! Logic Layer: the construction session systems.
//!
//! Message handlers mutate the [`ConstructionCursor`]; a change-detecting
//! system then refreshes the ghost preview and the possible-configuration
//! set, so every path through the session keeps preview and legality in
//! sync.

use bevy::prelude::*;

use crate::constants::ARROW_PULSE_INTERVAL;
use crate::construction::commit::{
    ParkTreasury, PlaceRequest, TrackCommitService, execute_remove,
};
use crate::construction::cursor::{ConstructionCursor, ConstructionState, SelectedPiece};
use crate::construction::ghost::{
    GhostState, ZSearchPolicy, place_track_ghost, remove_track_ghost, sweep_ride_ghosts,
};
use crate::construction::messages::*;
use crate::construction::possible::{PossibleConfigurations, compute_possible};
use crate::construction::resolver::resolve;
use crate::geometry::{CoordsXYZ, PieceDirection, rotate_offset};
use crate::logging::TerminalLogEvent;
use crate::map::TrackMap;
use crate::track::{
    CurveSelection, Ride, RideStatus, Station, TrackBank, TrackElement, TrackGroup,
    TrackPieceCatalog, TrackPieceDefinition, TrackSlope,
};

/// Where the next piece sits given the cursor, for forward building.
///
/// The cursor points at the entry attachment; the piece base is the entry
/// height minus the piece's own entry rise.
pub fn piece_origin_front(
    cursor_position: CoordsXYZ,
    direction: PieceDirection,
    def: &TrackPieceDefinition,
) -> (CoordsXYZ, PieceDirection) {
    let base_z = cursor_position.z - def.coords.z_begin;
    (CoordsXYZ::new(cursor_position.x, cursor_position.y, base_z), direction)
}

/// Where the next piece sits for backward building: its exit must land on
/// the cursor with the cursor's travel direction.
pub fn piece_origin_back(
    cursor_position: CoordsXYZ,
    direction: PieceDirection,
    def: &TrackPieceDefinition,
) -> (CoordsXYZ, PieceDirection) {
    let piece_direction = direction.rotated(-def.coords.rotation_delta);
    let offset = rotate_offset(def.coords.end_offset, piece_direction.direction);
    let base_z = cursor_position.z - def.coords.z_end;
    let origin = CoordsXYZ::new(
        cursor_position.x - offset.x,
        cursor_position.y - offset.y,
        base_z,
    );
    let mut piece_direction = piece_direction;
    piece_direction.diagonal = direction.diagonal != (def.starts_diagonal != def.ends_diagonal);
    (origin, piece_direction)
}

/// The open end after committing a piece at `origin`, building forward.
pub fn advance_front(
    origin: CoordsXYZ,
    piece_direction: PieceDirection,
    def: &TrackPieceDefinition,
) -> (CoordsXYZ, PieceDirection) {
    let offset = rotate_offset(def.coords.end_offset, piece_direction.direction);
    let position = CoordsXYZ::new(
        origin.x + offset.x,
        origin.y + offset.y,
        origin.z + def.coords.z_end,
    );
    let mut direction = piece_direction.rotated(def.coords.rotation_delta);
    direction.diagonal = piece_direction.diagonal != (def.starts_diagonal != def.ends_diagonal);
    (position, direction)
}

/// The open end after committing a piece built backward: its entry.
pub fn advance_back(
    origin: CoordsXYZ,
    piece_direction: PieceDirection,
    def: &TrackPieceDefinition,
) -> (CoordsXYZ, PieceDirection) {
    let position = CoordsXYZ::new(origin.x, origin.y, origin.z + def.coords.z_begin);
    (position, piece_direction)
}

fn log(writer: &mut MessageWriter<TerminalLogEvent>, message: impl Into<String>) {
    writer.write(TerminalLogEvent::new(message));
}

pub fn handle_session_lifecycle(
    mut begin: MessageReader<BeginConstruction>,
    mut close: MessageReader<CloseConstruction>,
    mut cursor: ResMut<ConstructionCursor>,
    mut ghost: ResMut<GhostState>,
    mut map: ResMut<TrackMap>,
    mut service: ResMut<TrackCommitService>,
    rides: Query<&Ride>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for message in begin.read() {
        let Ok(ride) = rides.get(message.ride) else {
            continue;
        };
        if let Some(previous) = cursor.ride {
            sweep_ride_ghosts(&mut ghost, &mut map, previous);
        }
        cursor.clear();
        cursor.ride = Some(message.ride);
        cursor.state = ConstructionState::Placing;
        log(
            &mut log_writer,
            format!("Construction started ({:?})", ride.ride_type),
        );
    }

    for _ in close.read() {
        if let Some(ride) = cursor.ride {
            sweep_ride_ghosts(&mut ghost, &mut map, ride);
        }
        service.reject();
        cursor.clear();
        log(&mut log_writer, "Construction closed");
    }
}

pub fn handle_selection_messages(
    mut curves: MessageReader<SelectCurve>,
    mut slopes: MessageReader<SelectSlope>,
    mut banks: MessageReader<SelectBank>,
    mut lifts: MessageReader<ToggleLiftHill>,
    mut alternatives: MessageReader<ToggleAlternative>,
    mut brake_speeds: MessageReader<SetBrakeSpeed>,
    mut seat_rotations: MessageReader<SetSeatRotation>,
    mut rotations: MessageReader<RotatePlacement>,
    mut cursor: ResMut<ConstructionCursor>,
    mut map: ResMut<TrackMap>,
    rides: Query<&Ride>,
) {
    if !cursor.is_active() {
        curves.clear();
        slopes.clear();
        banks.clear();
        lifts.clear();
        alternatives.clear();
        brake_speeds.clear();
        seat_rotations.clear();
        rotations.clear();
        return;
    }
    let ride = cursor.ride.and_then(|e| rides.get(e).ok());

    for message in curves.read() {
        cursor.curve = message.curve;
    }
    for message in slopes.read() {
        apply_slope_selection(&mut cursor, ride, message.slope);
    }
    for message in banks.read() {
        cursor.bank = message.bank;
    }
    for _ in lifts.read() {
        cursor.lift_hill = !cursor.lift_hill;
    }
    for _ in alternatives.read() {
        cursor.alternative = !cursor.alternative;
    }
    for message in brake_speeds.read() {
        let max = ride.map(|r| r.ride_type.descriptor().max_brake_speed).unwrap_or(u8::MAX);
        cursor.brake_speed = message.speed.min(max);
        // A selected brake or booster takes the new speed immediately.
        if let Some(piece) = selected_piece(&cursor).filter(|p| p.element.has_speed_setting()) {
            if let Some(ride_entity) = cursor.ride {
                map.set_piece_properties(
                    ride_entity,
                    piece.element,
                    piece.origin,
                    cursor.brake_speed as u16,
                );
            }
        }
    }
    for message in seat_rotations.read() {
        cursor.seat_rotation = message.rotation.min(15);
        if let Some(piece) = selected_piece(&cursor).filter(|p| !p.element.has_speed_setting()) {
            if let Some(ride_entity) = cursor.ride {
                map.set_piece_properties(
                    ride_entity,
                    piece.element,
                    piece.origin,
                    (cursor.seat_rotation as u16) << 12,
                );
            }
        }
    }
    for _ in rotations.read() {
        if matches!(cursor.state, ConstructionState::Placing) {
            cursor.direction = cursor.direction.rotated(1);
        }
    }
}

fn selected_piece(cursor: &ConstructionCursor) -> Option<SelectedPiece> {
    match cursor.state {
        ConstructionState::Selected => cursor.selected,
        _ => None,
    }
}

/// Steep slope buttons double as helix buttons while the open end is banked,
/// for rides that have the small helices at all.
fn apply_slope_selection(
    cursor: &mut ConstructionCursor,
    ride: Option<&Ride>,
    slope: TrackSlope,
) {
    let helix_capable = ride.is_some_and(|r| r.supports(TrackGroup::HelixSmall));
    let banked = cursor.previous_bank != TrackBank::None;
    if helix_capable && banked {
        let helix = match (slope, cursor.previous_bank) {
            (TrackSlope::Up60, TrackBank::Left) => Some(TrackElement::LeftHalfBankedHelixUpSmall),
            (TrackSlope::Up60, TrackBank::Right) => {
                Some(TrackElement::RightHalfBankedHelixUpSmall)
            }
            (TrackSlope::Down60, TrackBank::Left) => {
                Some(TrackElement::LeftHalfBankedHelixDownSmall)
            }
            (TrackSlope::Down60, TrackBank::Right) => {
                Some(TrackElement::RightHalfBankedHelixDownSmall)
            }
            _ => None,
        };
        if let Some(helix) = helix {
            cursor.curve = CurveSelection::Special(helix);
            cursor.slope = TrackSlope::None;
            return;
        }
    }
    cursor.slope = slope;
    if let CurveSelection::Special(_) = cursor.curve {
        cursor.curve = CurveSelection::default();
    }
}

pub fn handle_place_at(
    mut messages: MessageReader<PlaceAt>,
    mut cursor: ResMut<ConstructionCursor>,
    map: Res<TrackMap>,
) {
    for message in messages.read() {
        if !matches!(cursor.state, ConstructionState::Placing | ConstructionState::MazeBuild) {
            continue;
        }
        let tile = message.world.to_tile();
        let z = message.z.unwrap_or_else(|| map.surface_z(tile));
        cursor.position = CoordsXYZ::new(message.world.x, message.world.y, z);
    }
}

/// Re-resolve and refresh the ghost preview whenever the cursor changed.
pub fn refresh_ghost_preview(
    cursor: Res<ConstructionCursor>,
    rides: Query<&Ride>,
    catalog: Res<TrackPieceCatalog>,
    mut map: ResMut<TrackMap>,
    mut ghost: ResMut<GhostState>,
) {
    if !cursor.is_changed() {
        return;
    }
    let preview_state = matches!(
        cursor.state,
        ConstructionState::Placing | ConstructionState::Front | ConstructionState::Back
    );
    let Some(ride_entity) = cursor.ride.filter(|_| preview_state) else {
        remove_track_ghost(&mut ghost, &mut map);
        return;
    };
    let Ok(ride) = rides.get(ride_entity) else {
        remove_track_ghost(&mut ghost, &mut map);
        return;
    };
    if !ride.ride_type.descriptor().has_track {
        return;
    }

    match resolve(&cursor, ride.ride_type, &catalog) {
        Ok(resolved) => {
            let Ok(def) = catalog.lookup(resolved.element) else {
                return;
            };
            let (origin, direction) = if cursor.building_back() {
                piece_origin_back(cursor.position, cursor.direction, def)
            } else {
                piece_origin_front(cursor.position, cursor.direction, def)
            };
            let request = PlaceRequest {
                ride: ride_entity,
                element: resolved.element,
                origin,
                direction,
                is_ghost: true,
                has_lift: resolved.lift_hill,
                properties: resolved.properties,
            };
            // Height search only applies to free placement; attached ends
            // have exactly one legal height.
            let policy = if matches!(cursor.state, ConstructionState::Placing) {
                ZSearchPolicy::default()
            } else {
                ZSearchPolicy { max_attempts: 1, step: 8 }
            };
            let _ = place_track_ghost(&mut ghost, &mut map, &catalog, request, policy);
        }
        Err(_) => remove_track_ghost(&mut ghost, &mut map),
    }
}

pub fn update_possible_configurations(
    cursor: Res<ConstructionCursor>,
    rides: Query<&Ride>,
    catalog: Res<TrackPieceCatalog>,
    mut possible: ResMut<PossibleConfigurations>,
) {
    if !cursor.is_changed() {
        return;
    }
    let Some(ride) = cursor.ride.and_then(|e| rides.get(e).ok()) else {
        possible.elements.clear();
        return;
    };
    *possible = compute_possible(&cursor, ride.ride_type, &catalog);
}

pub fn handle_confirm_construct(
    mut messages: MessageReader<ConfirmConstruct>,
    mut cursor: ResMut<ConstructionCursor>,
    mut rides: Query<&mut Ride>,
    catalog: Res<TrackPieceCatalog>,
    mut map: ResMut<TrackMap>,
    mut ghost: ResMut<GhostState>,
    mut treasury: ResMut<ParkTreasury>,
    mut service: ResMut<TrackCommitService>,
    mut confirmed: MessageWriter<PlacementConfirmed>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for _ in messages.read() {
        let Some(ride_entity) = cursor.ride else {
            continue;
        };
        let Ok(mut ride) = rides.get_mut(ride_entity) else {
            continue;
        };

        if !ride.ride_type.descriptor().has_track {
            open_flat_ride(&mut ride, &cursor, &mut log_writer);
            continue;
        }
        if ride.ride_type.is_maze() {
            continue;
        }

        // Commit exactly what the ghost previews; without a ghost there is
        // nothing placeable under the cursor.
        let Some(preview) = ghost.track else {
            log(&mut log_writer, "Cannot build this here");
            continue;
        };
        remove_track_ghost(&mut ghost, &mut map);
        let request = PlaceRequest { is_ghost: false, ..preview.request };

        match service.submit(&mut map, &catalog, &mut treasury, request) {
            Ok(Some(cost)) => {
                apply_committed_piece(&mut cursor, &mut ride, &catalog, &request);
                confirmed.write(PlacementConfirmed {
                    ride: ride_entity,
                    element: request.element,
                    origin: request.origin,
                    direction: request.direction,
                });
                log(
                    &mut log_writer,
                    format!("Built {:?} for {}", request.element, cost),
                );
            }
            Ok(None) => {
                log(&mut log_writer, "Placement sent, awaiting confirmation");
            }
            Err(err) => {
                log(&mut log_writer, format!("Cannot build here: {err}"));
            }
        }
    }
}

fn open_flat_ride(
    ride: &mut Ride,
    cursor: &ConstructionCursor,
    log_writer: &mut MessageWriter<TerminalLogEvent>,
) {
    // A shop occupies one tile; a repeated confirm must not stack stations.
    if !ride.stations.is_empty() {
        return;
    }
    let tile = cursor.position.xy().to_tile();
    ride.stations.push(Station {
        start: Some(cursor.position),
        direction: Some(cursor.direction.direction),
        length: 1,
        entrance: Some(tile),
        exit: Some(tile),
    });
    if ride.ride_type.descriptor().auto_open_on_complete {
        ride.status = RideStatus::Open;
    }
    log(log_writer, format!("{:?} opened", ride.ride_type));
}

/// Move the cursor past a committed piece and seed the next selections.
fn apply_committed_piece(
    cursor: &mut ConstructionCursor,
    ride: &mut Ride,
    catalog: &TrackPieceCatalog,
    request: &PlaceRequest,
) {
    let Ok(def) = catalog.lookup(request.element) else {
        return;
    };
    ride.num_pieces += 1;

    if request.element.is_station() {
        ride.stations.push(Station {
            start: Some(request.origin),
            direction: Some(request.direction.direction),
            length: 1,
            entrance: None,
            exit: None,
        });
    }

    if cursor.building_back() {
        let (position, direction) = advance_back(request.origin, request.direction, def);
        cursor.position = position;
        cursor.direction = direction;
        cursor.previous_slope = def.slope_start;
        cursor.previous_bank = def.bank_start;
    } else {
        let (position, direction) = advance_front(request.origin, request.direction, def);
        cursor.position = position;
        cursor.direction = direction;
        cursor.previous_slope = def.slope_end;
        cursor.previous_bank = def.bank_end;
        if matches!(cursor.state, ConstructionState::Placing) {
            cursor.state = ConstructionState::Front;
        }
    }

    cursor.curve = TrackPieceCatalog::default_next_selection(request.element);
    cursor.slope = cursor.previous_slope;
    cursor.bank = cursor.previous_bank;
    if def.forces_lift_hill {
        cursor.lift_hill = true;
    } else if cursor.previous_slope.is_downhill() {
        cursor.lift_hill = false;
    }
}

/// Resolve the parked remote commit once the authority answers. Confirmation
/// applies the piece and advances the session exactly as a local commit
/// would; rejection drops it.
pub fn handle_commit_resolution(
    mut confirmations: MessageReader<CommitConfirmed>,
    mut rejections: MessageReader<CommitRejected>,
    mut cursor: ResMut<ConstructionCursor>,
    mut rides: Query<&mut Ride>,
    catalog: Res<TrackPieceCatalog>,
    mut map: ResMut<TrackMap>,
    mut treasury: ResMut<ParkTreasury>,
    mut service: ResMut<TrackCommitService>,
    mut confirmed: MessageWriter<PlacementConfirmed>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for _ in confirmations.read() {
        match service.confirm(&mut map, &catalog, &mut treasury) {
            Ok((cost, request)) => {
                if let Ok(mut ride) = rides.get_mut(request.ride) {
                    if cursor.ride == Some(request.ride) {
                        apply_committed_piece(&mut cursor, &mut ride, &catalog, &request);
                    } else {
                        // The session moved on; the piece still counts.
                        ride.num_pieces += 1;
                    }
                }
                confirmed.write(PlacementConfirmed {
                    ride: request.ride,
                    element: request.element,
                    origin: request.origin,
                    direction: request.direction,
                });
                log(
                    &mut log_writer,
                    format!("Built {:?} for {}", request.element, cost),
                );
            }
            Err(err) => {
                log(&mut log_writer, format!("Cannot build here: {err}"));
            }
        }
    }

    for _ in rejections.read() {
        if service.reject().is_some() {
            log(&mut log_writer, "Placement turned down");
        }
    }
}

pub fn handle_demolish(
    mut messages: MessageReader<DemolishCurrent>,
    mut cursor: ResMut<ConstructionCursor>,
    mut rides: Query<&mut Ride>,
    catalog: Res<TrackPieceCatalog>,
    mut map: ResMut<TrackMap>,
    mut ghost: ResMut<GhostState>,
    mut treasury: ResMut<ParkTreasury>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    for _ in messages.read() {
        let Some(ride_entity) = cursor.ride else {
            continue;
        };
        let building_back = matches!(cursor.state, ConstructionState::Back);
        let target = match (&cursor.state, cursor.selected) {
            (ConstructionState::Selected, Some(piece)) => Some(piece),
            (ConstructionState::Front, _) => piece_behind_cursor(&cursor, &map, ride_entity),
            (ConstructionState::Back, _) => piece_ahead_of_cursor(&cursor, &map, ride_entity),
            _ => None,
        };
        let Some(piece) = target else {
            log(&mut log_writer, "Nothing to demolish");
            continue;
        };

        remove_track_ghost(&mut ghost, &mut map);
        match execute_remove(
            &mut map,
            &catalog,
            &mut treasury,
            ride_entity,
            piece.element,
            piece.origin,
            false,
        ) {
            Ok(refund) => {
                if let Ok(mut ride) = rides.get_mut(ride_entity) {
                    ride.num_pieces = ride.num_pieces.saturating_sub(1);
                    if piece.element.is_station() {
                        ride.stations.retain(|s| s.start != Some(piece.origin));
                    }
                }
                retarget_after_demolish(
                    &mut cursor,
                    &catalog,
                    &map,
                    ride_entity,
                    piece,
                    building_back,
                );
                log(&mut log_writer, format!("Removed {:?}, refunded {}", piece.element, refund));
            }
            Err(err) => log(&mut log_writer, format!("Cannot remove: {err}")),
        }
    }
}

/// The piece whose exit sits at the cursor, when building forward.
fn piece_behind_cursor(
    cursor: &ConstructionCursor,
    map: &TrackMap,
    ride: Entity,
) -> Option<SelectedPiece> {
    let probe = cursor.position.xy().sub(cursor.direction.direction.delta());
    let record = map
        .track_element_at(ride, probe.to_tile(), cursor.position.z)
        .or_else(|| {
            // Tall pieces register clearance above the connection height.
            map.track_element_at(ride, probe.to_tile(), cursor.position.z - 8)
        })?;
    Some(SelectedPiece {
        element: record.element,
        origin: record.origin,
        direction: record.direction,
    })
}

/// The piece whose entry sits at the cursor, when building backward.
fn piece_ahead_of_cursor(
    cursor: &ConstructionCursor,
    map: &TrackMap,
    ride: Entity,
) -> Option<SelectedPiece> {
    let probe = cursor.position.xy().to_tile();
    let record = map
        .track_element_at(ride, probe, cursor.position.z)
        .or_else(|| map.track_element_at(ride, probe, cursor.position.z - 8))?;
    Some(SelectedPiece {
        element: record.element,
        origin: record.origin,
        direction: record.direction,
    })
}

/// After removing a piece, anchor the selection on the surviving neighbour;
/// with no survivor the session drops back to free placement. Backward
/// building walks forward onto the next piece instead.
fn retarget_after_demolish(
    cursor: &mut ConstructionCursor,
    catalog: &TrackPieceCatalog,
    map: &TrackMap,
    ride: Entity,
    removed: SelectedPiece,
    walk_forward: bool,
) {
    let Ok(def) = catalog.lookup(removed.element) else {
        return;
    };
    if walk_forward {
        let (position, direction) = advance_front(removed.origin, removed.direction, def);
        cursor.position = position;
        cursor.direction = direction;
        if let Some(next) = map.track_element_at(ride, position.xy().to_tile(), position.z) {
            if let Ok(next_def) = catalog.lookup(next.element) {
                cursor.selected = Some(SelectedPiece {
                    element: next.element,
                    origin: next.origin,
                    direction: next.direction,
                });
                cursor.state = ConstructionState::Selected;
                cursor.previous_slope = next_def.slope_start;
                cursor.previous_bank = next_def.bank_start;
                cursor.slope = next_def.slope_start;
                cursor.bank = next_def.bank_start;
                cursor.curve = CurveSelection::default();
                return;
            }
        }
    } else {
        let (position, direction) = advance_back(removed.origin, removed.direction, def);
        cursor.position = position;
        cursor.direction = direction;

        let behind = cursor.position.xy().sub(direction.direction.delta());
        if let Some(previous) = map.track_element_at(ride, behind.to_tile(), position.z) {
            if let Ok(prev_def) = catalog.lookup(previous.element) {
                cursor.selected = Some(SelectedPiece {
                    element: previous.element,
                    origin: previous.origin,
                    direction: previous.direction,
                });
                cursor.state = ConstructionState::Selected;
                cursor.previous_slope = prev_def.slope_end;
                cursor.previous_bank = prev_def.bank_end;
                cursor.slope = prev_def.slope_end;
                cursor.bank = prev_def.bank_end;
                cursor.curve = CurveSelection::default();
                return;
            }
        }
    }
    cursor.selected = None;
    cursor.previous_slope = TrackSlope::None;
    cursor.previous_bank = TrackBank::None;
    cursor.reset_selections();
    cursor.state = ConstructionState::Placing;
}

pub fn handle_section_navigation(
    mut next: MessageReader<SelectNextSection>,
    mut previous: MessageReader<SelectPreviousSection>,
    mut cursor: ResMut<ConstructionCursor>,
    catalog: Res<TrackPieceCatalog>,
    map: Res<TrackMap>,
) {
    let Some(ride) = cursor.ride else {
        next.clear();
        previous.clear();
        return;
    };

    for _ in next.read() {
        match (&cursor.state, cursor.selected) {
            (ConstructionState::Selected, Some(piece)) => {
                let Ok(def) = catalog.lookup(piece.element) else {
                    continue;
                };
                let (exit, exit_dir) = advance_front(piece.origin, piece.direction, def);
                match map.track_element_at(ride, exit.xy().to_tile(), exit.z) {
                    Some(record) => {
                        cursor.selected = Some(SelectedPiece {
                            element: record.element,
                            origin: record.origin,
                            direction: record.direction,
                        });
                    }
                    None => {
                        cursor.state = ConstructionState::Front;
                        cursor.selected = None;
                        cursor.position = exit;
                        cursor.direction = exit_dir;
                        cursor.previous_slope = def.slope_end;
                        cursor.previous_bank = def.bank_end;
                        cursor.slope = def.slope_end;
                        cursor.bank = def.bank_end;
                    }
                }
            }
            (ConstructionState::Back, _) => {
                if let Some(record) =
                    map.track_element_at(ride, cursor.position.xy().to_tile(), cursor.position.z)
                {
                    cursor.selected = Some(SelectedPiece {
                        element: record.element,
                        origin: record.origin,
                        direction: record.direction,
                    });
                    cursor.state = ConstructionState::Selected;
                }
            }
            _ => {}
        }
    }

    for _ in previous.read() {
        match (&cursor.state, cursor.selected) {
            (ConstructionState::Selected, Some(piece)) => {
                let Ok(def) = catalog.lookup(piece.element) else {
                    continue;
                };
                let (entry, entry_dir) = advance_back(piece.origin, piece.direction, def);
                let behind = entry.xy().sub(entry_dir.direction.delta());
                match map.track_element_at(ride, behind.to_tile(), entry.z) {
                    Some(record) => {
                        cursor.selected = Some(SelectedPiece {
                            element: record.element,
                            origin: record.origin,
                            direction: record.direction,
                        });
                    }
                    None => {
                        cursor.state = ConstructionState::Back;
                        cursor.selected = None;
                        cursor.position = entry;
                        cursor.direction = entry_dir;
                        cursor.previous_slope = def.slope_start;
                        cursor.previous_bank = def.bank_start;
                        cursor.slope = def.slope_start;
                        cursor.bank = def.bank_start;
                    }
                }
            }
            (ConstructionState::Front, _) => {
                if let Some(piece) = piece_behind_cursor(&cursor, &map, ride) {
                    cursor.selected = Some(piece);
                    cursor.state = ConstructionState::Selected;
                }
            }
            _ => {}
        }
    }
}

/// Per-tick upkeep: marker arrow pulse and deferred cursor re-validation.
pub fn tick_construction(
    mut cursor: ResMut<ConstructionCursor>,
    map: Res<TrackMap>,
    mut log_writer: MessageWriter<TerminalLogEvent>,
) {
    if !cursor.is_active() {
        return;
    }

    let timer = cursor.arrow_timer + 1;
    if timer >= ARROW_PULSE_INTERVAL {
        cursor.arrow_timer = 0;
        cursor.arrow_visible = !cursor.arrow_visible;
    } else {
        // Bypass change detection for the bare counter so the ghost is not
        // re-placed every tick.
        cursor.bypass_change_detection().arrow_timer = timer;
    }

    if cursor.needs_revalidation {
        cursor.needs_revalidation = false;
        if let (ConstructionState::Selected, Some(piece), Some(ride)) =
            (&cursor.state, cursor.selected, cursor.ride)
        {
            let found = map
                .track_element_at(ride, piece.origin.xy().to_tile(), piece.origin.z)
                .is_some_and(|record| record.origin == piece.origin);
            if !found {
                cursor.selected = None;
                cursor.state = ConstructionState::Placing;
                cursor.reset_selections();
                log(&mut log_writer, "Selected track no longer exists");
            }
        }
    }
}
