//! Static per-piece data: geometry, capability group, pricing and footprint.
//!
//! The catalog is the single source of truth for what a track element IS.
//! Everything else (resolution, ghost placement, committing) reads it through
//! [`TrackPieceCatalog::lookup`].

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use crate::constants::Money;
use crate::geometry::CoordsXY;
use crate::track::curve::{CurveSelection, TrackBank, TrackCurve, TrackSlope};
use crate::track::descriptors::descriptor_for;
use crate::track::element::TrackElement;
use crate::track::groups::TrackGroup;

/// How a piece moves the build cursor when it is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceCoordinates {
    /// Height of the entry connection above the piece base.
    pub z_begin: i32,
    /// Height of the exit connection above the piece base.
    pub z_end: i32,
    /// Offset from the piece origin to the next piece's attachment tile,
    /// expressed for direction 0.
    pub end_offset: CoordsXY,
    /// Quarter turns applied to the build direction on exit.
    pub rotation_delta: i8,
}

/// One tile of a piece's footprint, relative to the piece origin at
/// direction 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackBlock {
    pub offset: CoordsXY,
    pub z: i32,
    pub clearance: i32,
}

#[derive(Debug, Clone)]
pub struct TrackPieceDefinition {
    pub element: TrackElement,
    pub group: TrackGroup,
    pub slope_start: TrackSlope,
    pub slope_end: TrackSlope,
    pub bank_start: TrackBank,
    pub bank_end: TrackBank,
    pub starts_diagonal: bool,
    pub ends_diagonal: bool,
    pub allows_lift_hill: bool,
    pub forces_lift_hill: bool,
    pub base_price: Money,
    pub coords: PieceCoordinates,
    pub blocks: Vec<TrackBlock>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no definition for track element {0:?}")]
    Missing(TrackElement),
}

/// All piece definitions, keyed by element.
#[derive(Resource)]
pub struct TrackPieceCatalog {
    pieces: HashMap<TrackElement, TrackPieceDefinition>,
}

impl Default for TrackPieceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TrackPieceCatalog {
    pub fn standard() -> Self {
        let pieces = TrackElement::all()
            .map(|element| (element, definition(element)))
            .collect();
        Self { pieces }
    }

    pub fn lookup(&self, element: TrackElement) -> Result<&TrackPieceDefinition, CatalogError> {
        self.pieces.get(&element).ok_or(CatalogError::Missing(element))
    }

    /// The curve selection to seed after `element` is placed. Turns keep
    /// chaining the same curve, helices keep offering themselves, everything
    /// else falls back to straight.
    pub fn default_next_selection(element: TrackElement) -> CurveSelection {
        if element.is_helix() {
            return CurveSelection::Special(element);
        }
        // The only way onward from the inversion is the matching descent.
        if element == TrackElement::HalfLoopUp {
            return CurveSelection::Special(TrackElement::HalfLoopDown);
        }
        match descriptor_for(element).map(|d| d.curve) {
            Some(CurveSelection::Curve(curve)) if curve != TrackCurve::Straight => {
                CurveSelection::Curve(curve)
            }
            _ => CurveSelection::Curve(TrackCurve::Straight),
        }
    }
}

fn coords(z_begin: i32, z_end: i32, end_offset: CoordsXY, rotation_delta: i8) -> PieceCoordinates {
    PieceCoordinates { z_begin, z_end, end_offset, rotation_delta }
}

fn blocks(offsets: &[(i32, i32)], clearance: i32) -> Vec<TrackBlock> {
    offsets
        .iter()
        .map(|&(x, y)| TrackBlock { offset: CoordsXY::new(x, y), z: 0, clearance })
        .collect()
}

fn mirror_y(blocks: Vec<TrackBlock>) -> Vec<TrackBlock> {
    blocks
        .into_iter()
        .map(|b| TrackBlock { offset: CoordsXY::new(b.offset.x, -b.offset.y), ..b })
        .collect()
}

const ONE_TILE: &[(i32, i32)] = &[(0, 0)];
const ROW_4: &[(i32, i32)] = &[(0, 0), (32, 0), (64, 0), (96, 0)];
const SMALL_TURN_LEFT: &[(i32, i32)] = &[(0, 0), (32, 0), (32, 32)];
const WIDE_TURN_LEFT: &[(i32, i32)] = &[(0, 0), (32, 0), (64, 0), (64, 32), (64, 64)];
const EIGHTH_LEFT: &[(i32, i32)] = &[(0, 0), (32, 0), (32, 32), (64, 32)];
const DIAG_SQUARE: &[(i32, i32)] = &[(0, 0), (32, 0), (0, 32), (32, 32)];
const SBEND_LEFT: &[(i32, i32)] = &[(0, 0), (32, 0), (32, 32), (64, 32)];
const LOOP_ROW: &[(i32, i32)] = &[(0, 0), (32, 0), (64, 0)];

const FLAT_CLEARANCE: i32 = 24;
const GENTLE_CLEARANCE: i32 = 40;
const STEEP_CLEARANCE: i32 = 88;
const LOOP_CLEARANCE: i32 = 120;

/// Per-tile airspace bands for the half loops. The climb owns the low band
/// of each shared tile and the descent the band above it, so a chained
/// up/down pair occupies the same tiles without colliding.
const HALF_LOOP_UP_BANDS: &[((i32, i32), i32, i32)] =
    &[((0, 0), 0, 56), ((32, 0), 0, 104), ((64, 0), 104, 64)];
const HALF_LOOP_DOWN_BANDS: &[((i32, i32), i32, i32)] =
    &[((0, 0), 104, 64), ((32, 0), 56, 80), ((32, 32), 0, 56)];

fn banded_blocks(bands: &[((i32, i32), i32, i32)]) -> Vec<TrackBlock> {
    bands
        .iter()
        .map(|&((x, y), z, clearance)| TrackBlock { offset: CoordsXY::new(x, y), z, clearance })
        .collect()
}

struct Shape {
    slope_start: TrackSlope,
    slope_end: TrackSlope,
    bank_start: TrackBank,
    bank_end: TrackBank,
    starts_diagonal: bool,
    ends_diagonal: bool,
    allows_lift_hill: bool,
    forces_lift_hill: bool,
    base_price: Money,
    coords: PieceCoordinates,
    blocks: Vec<TrackBlock>,
}

impl Shape {
    fn into_definition(self, element: TrackElement, group: TrackGroup) -> TrackPieceDefinition {
        TrackPieceDefinition {
            element,
            group,
            slope_start: self.slope_start,
            slope_end: self.slope_end,
            bank_start: self.bank_start,
            bank_end: self.bank_end,
            starts_diagonal: self.starts_diagonal,
            ends_diagonal: self.ends_diagonal,
            allows_lift_hill: self.allows_lift_hill,
            forces_lift_hill: self.forces_lift_hill,
            base_price: self.base_price,
            coords: self.coords,
            blocks: self.blocks,
        }
    }
}

/// A single straight tile with the given slope profile.
fn straight(z_begin: i32, z_end: i32, slope_start: TrackSlope, slope_end: TrackSlope, price: Money) -> Shape {
    let clearance = if slope_start == TrackSlope::Up60
        || slope_end == TrackSlope::Up60
        || slope_start == TrackSlope::Down60
        || slope_end == TrackSlope::Down60
    {
        STEEP_CLEARANCE
    } else if slope_start == TrackSlope::None && slope_end == TrackSlope::None {
        FLAT_CLEARANCE
    } else {
        GENTLE_CLEARANCE
    };
    Shape {
        slope_start,
        slope_end,
        bank_start: TrackBank::None,
        bank_end: TrackBank::None,
        starts_diagonal: false,
        ends_diagonal: false,
        allows_lift_hill: true,
        forces_lift_hill: false,
        base_price: price,
        coords: coords(z_begin, z_end, CoordsXY::new(32, 0), 0),
        blocks: blocks(ONE_TILE, clearance),
    }
}

/// A single flat banked tile.
fn banked(bank_start: TrackBank, bank_end: TrackBank, price: Money) -> Shape {
    Shape {
        bank_start,
        bank_end,
        allows_lift_hill: false,
        ..straight(0, 0, TrackSlope::None, TrackSlope::None, price)
    }
}

/// A banked piece that also changes slope.
fn banked_sloped(
    z_begin: i32,
    z_end: i32,
    slope_start: TrackSlope,
    slope_end: TrackSlope,
    bank_start: TrackBank,
    bank_end: TrackBank,
    price: Money,
) -> Shape {
    Shape {
        bank_start,
        bank_end,
        allows_lift_hill: false,
        ..straight(z_begin, z_end, slope_start, slope_end, price)
    }
}

fn turn(
    footprint: &[(i32, i32)],
    end_offset: CoordsXY,
    rotation_delta: i8,
    z_begin: i32,
    z_end: i32,
    slope: TrackSlope,
    bank: TrackBank,
    mirrored: bool,
    price: Money,
) -> Shape {
    let clearance = if slope == TrackSlope::None { FLAT_CLEARANCE } else { GENTLE_CLEARANCE };
    let mut shape = Shape {
        slope_start: slope,
        slope_end: slope,
        bank_start: bank,
        bank_end: bank,
        starts_diagonal: false,
        ends_diagonal: false,
        allows_lift_hill: false,
        forces_lift_hill: false,
        base_price: price,
        coords: coords(z_begin, z_end, end_offset, rotation_delta),
        blocks: blocks(footprint, clearance),
    };
    if mirrored {
        shape.blocks = mirror_y(shape.blocks);
        shape.coords.end_offset = CoordsXY::new(end_offset.x, -end_offset.y);
        shape.coords.rotation_delta = -rotation_delta;
    }
    shape
}

fn diag(z_begin: i32, z_end: i32, slope_start: TrackSlope, slope_end: TrackSlope, price: Money) -> Shape {
    let steep = matches!(slope_start, TrackSlope::Up60 | TrackSlope::Down60)
        || matches!(slope_end, TrackSlope::Up60 | TrackSlope::Down60);
    let clearance = if slope_start == TrackSlope::None && slope_end == TrackSlope::None {
        FLAT_CLEARANCE
    } else if steep {
        STEEP_CLEARANCE
    } else {
        GENTLE_CLEARANCE
    };
    Shape {
        slope_start,
        slope_end,
        bank_start: TrackBank::None,
        bank_end: TrackBank::None,
        starts_diagonal: true,
        ends_diagonal: true,
        allows_lift_hill: !steep,
        forces_lift_hill: false,
        base_price: price,
        coords: coords(z_begin, z_end, CoordsXY::new(32, 32), 0),
        blocks: blocks(DIAG_SQUARE, clearance),
    }
}

fn definition(element: TrackElement) -> TrackPieceDefinition {
    use TrackBank::{Left, None as Unbanked, Right};
    use TrackElement as El;
    use TrackGroup as G;
    use TrackSlope as S;

    if let Some(base) = covered_base(element) {
        let base_def = definition(base);
        return TrackPieceDefinition {
            element,
            base_price: base_def.base_price + 25,
            ..base_def
        };
    }

    match element {
        El::Flat => straight(0, 0, S::None, S::None, 65).into_definition(element, G::Straight),
        El::EndStation | El::BeginStation | El::MiddleStation => {
            let mut shape = straight(0, 0, S::None, S::None, 100);
            shape.allows_lift_hill = false;
            shape.into_definition(element, G::StationEnd)
        }

        El::Up25 => straight(0, 16, S::Up25, S::Up25, 105).into_definition(element, G::Slope),
        El::Up60 => straight(0, 64, S::Up60, S::Up60, 165).into_definition(element, G::SlopeSteep),
        El::FlatToUp25 => straight(0, 8, S::None, S::Up25, 85).into_definition(element, G::Slope),
        El::Up25ToUp60 => {
            straight(0, 24, S::Up25, S::Up60, 125).into_definition(element, G::SlopeSteep)
        }
        El::Up60ToUp25 => {
            straight(0, 24, S::Up60, S::Up25, 125).into_definition(element, G::SlopeSteep)
        }
        El::Up25ToFlat => straight(0, 8, S::Up25, S::None, 85).into_definition(element, G::Slope),
        El::Down25 => straight(16, 0, S::Down25, S::Down25, 105).into_definition(element, G::Slope),
        El::Down60 => {
            straight(64, 0, S::Down60, S::Down60, 165).into_definition(element, G::SlopeSteep)
        }
        El::FlatToDown25 => {
            straight(8, 0, S::None, S::Down25, 85).into_definition(element, G::Slope)
        }
        El::Down25ToDown60 => {
            straight(24, 0, S::Down25, S::Down60, 125).into_definition(element, G::SlopeSteep)
        }
        El::Down60ToDown25 => {
            straight(24, 0, S::Down60, S::Down25, 125).into_definition(element, G::SlopeSteep)
        }
        El::Down25ToFlat => {
            straight(8, 0, S::Down25, S::None, 85).into_definition(element, G::Slope)
        }
        El::FlatToUp60 => {
            straight(0, 24, S::None, S::Up60, 145).into_definition(element, G::SlopeSteep)
        }
        El::Up60ToFlat => {
            straight(0, 24, S::Up60, S::None, 145).into_definition(element, G::SlopeSteep)
        }
        El::FlatToDown60 => {
            straight(24, 0, S::None, S::Down60, 145).into_definition(element, G::SlopeSteep)
        }
        El::Down60ToFlat => {
            straight(24, 0, S::Down60, S::None, 145).into_definition(element, G::SlopeSteep)
        }

        El::FlatToUp60LongBase => {
            let mut shape = straight(0, 48, S::None, S::Up60, 400);
            shape.coords.end_offset = CoordsXY::new(128, 0);
            shape.blocks = blocks(ROW_4, STEEP_CLEARANCE);
            shape.into_definition(element, G::SlopeSteepLong)
        }
        El::Up60ToFlatLongBase => {
            let mut shape = straight(0, 48, S::Up60, S::None, 400);
            shape.coords.end_offset = CoordsXY::new(128, 0);
            shape.blocks = blocks(ROW_4, STEEP_CLEARANCE);
            shape.into_definition(element, G::SlopeSteepLong)
        }
        El::FlatToDown60LongBase => {
            let mut shape = straight(48, 0, S::None, S::Down60, 400);
            shape.coords.end_offset = CoordsXY::new(128, 0);
            shape.blocks = blocks(ROW_4, STEEP_CLEARANCE);
            shape.into_definition(element, G::SlopeSteepLong)
        }
        El::Down60ToFlatLongBase => {
            let mut shape = straight(48, 0, S::Down60, S::None, 400);
            shape.coords.end_offset = CoordsXY::new(128, 0);
            shape.blocks = blocks(ROW_4, STEEP_CLEARANCE);
            shape.into_definition(element, G::SlopeSteepLong)
        }

        El::FlatToLeftBank => banked(Unbanked, Left, 75).into_definition(element, G::Banking),
        El::FlatToRightBank => banked(Unbanked, Right, 75).into_definition(element, G::Banking),
        El::LeftBankToFlat => banked(Left, Unbanked, 75).into_definition(element, G::Banking),
        El::RightBankToFlat => banked(Right, Unbanked, 75).into_definition(element, G::Banking),
        El::LeftBank => banked(Left, Left, 75).into_definition(element, G::Banking),
        El::RightBank => banked(Right, Right, 75).into_definition(element, G::Banking),
        El::LeftBankToUp25 => banked_sloped(0, 8, S::None, S::Up25, Left, Unbanked, 95)
            .into_definition(element, G::Banking),
        El::RightBankToUp25 => banked_sloped(0, 8, S::None, S::Up25, Right, Unbanked, 95)
            .into_definition(element, G::Banking),
        El::Up25ToLeftBank => banked_sloped(0, 8, S::Up25, S::None, Unbanked, Left, 95)
            .into_definition(element, G::Banking),
        El::Up25ToRightBank => banked_sloped(0, 8, S::Up25, S::None, Unbanked, Right, 95)
            .into_definition(element, G::Banking),
        El::LeftBankToDown25 => banked_sloped(8, 0, S::None, S::Down25, Left, Unbanked, 95)
            .into_definition(element, G::Banking),
        El::RightBankToDown25 => banked_sloped(8, 0, S::None, S::Down25, Right, Unbanked, 95)
            .into_definition(element, G::Banking),
        El::Down25ToLeftBank => banked_sloped(8, 0, S::Down25, S::None, Unbanked, Left, 95)
            .into_definition(element, G::Banking),
        El::Down25ToRightBank => banked_sloped(8, 0, S::Down25, S::None, Unbanked, Right, 95)
            .into_definition(element, G::Banking),

        El::LeftQuarterTurn5Tiles => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 0, 0, S::None, Unbanked, false, 280)
                .into_definition(element, G::Curve)
        }
        El::RightQuarterTurn5Tiles => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 0, 0, S::None, Unbanked, true, 280)
                .into_definition(element, G::Curve)
        }
        El::BankedLeftQuarterTurn5Tiles => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 0, 0, S::None, Left, false, 310)
                .into_definition(element, G::CurveBanked)
        }
        El::BankedRightQuarterTurn5Tiles => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 0, 0, S::None, Right, true, 310)
                .into_definition(element, G::CurveBanked)
        }
        El::LeftQuarterTurn5TilesUp25 => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 0, 64, S::Up25, Unbanked, false, 390)
                .into_definition(element, G::SlopeCurve)
        }
        El::RightQuarterTurn5TilesUp25 => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 0, 64, S::Up25, Unbanked, true, 390)
                .into_definition(element, G::SlopeCurve)
        }
        El::LeftQuarterTurn5TilesDown25 => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 64, 0, S::Down25, Unbanked, false, 390)
                .into_definition(element, G::SlopeCurve)
        }
        El::RightQuarterTurn5TilesDown25 => {
            turn(WIDE_TURN_LEFT, CoordsXY::new(64, 96), 1, 64, 0, S::Down25, Unbanked, true, 390)
                .into_definition(element, G::SlopeCurve)
        }

        El::LeftQuarterTurn3Tiles => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 0, S::None, Unbanked, false, 185)
                .into_definition(element, G::CurveSmall)
        }
        El::RightQuarterTurn3Tiles => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 0, S::None, Unbanked, true, 185)
                .into_definition(element, G::CurveSmall)
        }
        El::LeftBankedQuarterTurn3Tiles => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 0, S::None, Left, false, 215)
                .into_definition(element, G::CurveBanked)
        }
        El::RightBankedQuarterTurn3Tiles => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 0, S::None, Right, true, 215)
                .into_definition(element, G::CurveBanked)
        }
        El::LeftQuarterTurn3TilesUp25 => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 32, S::Up25, Unbanked, false, 270)
                .into_definition(element, G::SlopeCurveBanked)
        }
        El::RightQuarterTurn3TilesUp25 => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 32, S::Up25, Unbanked, true, 270)
                .into_definition(element, G::SlopeCurveBanked)
        }
        El::LeftQuarterTurn3TilesDown25 => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 32, 0, S::Down25, Unbanked, false, 270)
                .into_definition(element, G::SlopeCurveBanked)
        }
        El::RightQuarterTurn3TilesDown25 => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 32, 0, S::Down25, Unbanked, true, 270)
                .into_definition(element, G::SlopeCurveBanked)
        }
        El::LeftQuarterTurn1Tile => {
            turn(ONE_TILE, CoordsXY::new(0, 32), 1, 0, 0, S::None, Unbanked, false, 110)
                .into_definition(element, G::CurveVerySmall)
        }
        El::RightQuarterTurn1Tile => {
            turn(ONE_TILE, CoordsXY::new(0, 32), 1, 0, 0, S::None, Unbanked, true, 110)
                .into_definition(element, G::CurveVerySmall)
        }

        El::SBendLeft => {
            turn(SBEND_LEFT, CoordsXY::new(96, 32), 0, 0, 0, S::None, Unbanked, false, 250)
                .into_definition(element, G::SBend)
        }
        El::SBendRight => {
            turn(SBEND_LEFT, CoordsXY::new(96, 32), 0, 0, 0, S::None, Unbanked, true, 250)
                .into_definition(element, G::SBend)
        }
        El::LeftVerticalLoop | El::RightVerticalLoop => {
            let mut shape =
                turn(LOOP_ROW, CoordsXY::new(96, 0), 0, 0, 0, S::None, Unbanked, false, 1200);
            shape.slope_start = S::Up25;
            shape.slope_end = S::Down25;
            shape.blocks = blocks(LOOP_ROW, LOOP_CLEARANCE);
            shape.into_definition(element, G::VerticalLoop)
        }
        El::HalfLoopUp => {
            // Climbs to the crest and leaves the train inverted, facing
            // back the way it came.
            let mut shape =
                turn(LOOP_ROW, CoordsXY::new(32, 0), 2, 0, 152, S::Up25, Unbanked, false, 950);
            shape.slope_end = S::None;
            shape.bank_end = TrackBank::UpsideDown;
            shape.blocks = banded_blocks(HALF_LOOP_UP_BANDS);
            shape.into_definition(element, G::HalfLoop)
        }
        El::HalfLoopDown => {
            // Rolls out of the inversion one tile to the side of the climb.
            let mut shape =
                turn(LOOP_ROW, CoordsXY::new(64, 32), 0, 152, 0, S::Down25, Unbanked, false, 950);
            shape.slope_start = S::None;
            shape.bank_start = TrackBank::UpsideDown;
            shape.blocks = banded_blocks(HALF_LOOP_DOWN_BANDS);
            shape.into_definition(element, G::HalfLoop)
        }

        El::LeftHalfBankedHelixUpSmall => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 8, S::None, Left, false, 500)
                .into_definition(element, G::HelixSmall)
        }
        El::RightHalfBankedHelixUpSmall => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 8, S::None, Right, true, 500)
                .into_definition(element, G::HelixSmall)
        }
        El::LeftHalfBankedHelixDownSmall => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 8, 0, S::None, Left, false, 500)
                .into_definition(element, G::HelixSmall)
        }
        El::RightHalfBankedHelixDownSmall => {
            turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 8, 0, S::None, Right, true, 500)
                .into_definition(element, G::HelixSmall)
        }

        El::Brakes => {
            let mut shape = straight(0, 0, S::None, S::None, 75);
            shape.allows_lift_hill = false;
            shape.into_definition(element, G::Brakes)
        }
        El::Booster => {
            let mut shape = straight(0, 0, S::None, S::None, 120);
            shape.allows_lift_hill = false;
            shape.into_definition(element, G::Booster)
        }
        El::LeftCurvedLiftHill => {
            let mut shape =
                turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 64, S::None, Unbanked, false, 700);
            shape.forces_lift_hill = true;
            shape.blocks = blocks(SMALL_TURN_LEFT, STEEP_CLEARANCE);
            shape.into_definition(element, G::LiftHillCurve)
        }
        El::RightCurvedLiftHill => {
            let mut shape =
                turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 64, S::None, Unbanked, true, 700);
            shape.forces_lift_hill = true;
            shape.blocks = mirror_y(blocks(SMALL_TURN_LEFT, STEEP_CLEARANCE));
            shape.into_definition(element, G::LiftHillCurve)
        }

        El::LeftEighthToDiag => {
            let mut shape =
                turn(EIGHTH_LEFT, CoordsXY::new(64, 64), 0, 0, 0, S::None, Unbanked, false, 330);
            shape.ends_diagonal = true;
            shape.into_definition(element, G::CurveLarge)
        }
        El::RightEighthToDiag => {
            let mut shape =
                turn(EIGHTH_LEFT, CoordsXY::new(64, 64), 0, 0, 0, S::None, Unbanked, true, 330);
            shape.ends_diagonal = true;
            shape.into_definition(element, G::CurveLarge)
        }
        El::LeftEighthToOrthogonal => {
            let mut shape =
                turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 0, S::None, Unbanked, false, 330);
            shape.starts_diagonal = true;
            shape.into_definition(element, G::CurveLarge)
        }
        El::RightEighthToOrthogonal => {
            let mut shape =
                turn(SMALL_TURN_LEFT, CoordsXY::new(32, 64), 1, 0, 0, S::None, Unbanked, true, 330);
            shape.starts_diagonal = true;
            shape.into_definition(element, G::CurveLarge)
        }

        El::DiagFlat => diag(0, 0, S::None, S::None, 150).into_definition(element, G::Diagonal),
        El::DiagUp25 => diag(0, 16, S::Up25, S::Up25, 170).into_definition(element, G::Diagonal),
        El::DiagFlatToUp25 => {
            diag(0, 8, S::None, S::Up25, 160).into_definition(element, G::Diagonal)
        }
        El::DiagUp25ToFlat => {
            diag(0, 8, S::Up25, S::None, 160).into_definition(element, G::Diagonal)
        }
        El::DiagDown25 => {
            diag(16, 0, S::Down25, S::Down25, 170).into_definition(element, G::Diagonal)
        }
        El::DiagFlatToDown25 => {
            diag(8, 0, S::None, S::Down25, 160).into_definition(element, G::Diagonal)
        }
        El::DiagDown25ToFlat => {
            diag(8, 0, S::Down25, S::None, 160).into_definition(element, G::Diagonal)
        }
        El::DiagFlatToUp60 => {
            diag(0, 24, S::None, S::Up60, 220).into_definition(element, G::Diagonal)
        }
        El::DiagUp60ToFlat => {
            diag(0, 24, S::Up60, S::None, 220).into_definition(element, G::Diagonal)
        }
        El::DiagFlatToDown60 => {
            diag(24, 0, S::None, S::Down60, 220).into_definition(element, G::Diagonal)
        }
        El::DiagDown60ToFlat => {
            diag(24, 0, S::Down60, S::None, 220).into_definition(element, G::Diagonal)
        }

        El::Maze => {
            let mut shape = straight(0, 0, S::None, S::None, 50);
            shape.allows_lift_hill = false;
            shape.coords.end_offset = CoordsXY::new(0, 0);
            shape.into_definition(element, G::Maze)
        }

        // Covered variants are handled by delegation above.
        _ => unreachable!("covered variant {element:?} not mapped to a base element"),
    }
}

/// Base element for a covered variant, if `element` is one.
fn covered_base(element: TrackElement) -> Option<TrackElement> {
    use TrackElement as El;
    Some(match element {
        El::FlatCovered => El::Flat,
        El::Up25Covered => El::Up25,
        El::Down25Covered => El::Down25,
        El::FlatToUp25Covered => El::FlatToUp25,
        El::Up25ToFlatCovered => El::Up25ToFlat,
        El::FlatToDown25Covered => El::FlatToDown25,
        El::Down25ToFlatCovered => El::Down25ToFlat,
        El::LeftQuarterTurn5TilesCovered => El::LeftQuarterTurn5Tiles,
        El::RightQuarterTurn5TilesCovered => El::RightQuarterTurn5Tiles,
        El::SBendLeftCovered => El::SBendLeft,
        El::SBendRightCovered => El::SBendRight,
        El::LeftQuarterTurn3TilesCovered => El::LeftQuarterTurn3Tiles,
        El::RightQuarterTurn3TilesCovered => El::RightQuarterTurn3Tiles,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_element_has_a_definition() {
        let catalog = TrackPieceCatalog::standard();
        for element in TrackElement::all() {
            let def = catalog.lookup(element).unwrap();
            assert_eq!(def.element, element);
            assert!(!def.blocks.is_empty(), "{element:?} has no footprint");
        }
    }

    #[test]
    fn covered_variants_mirror_their_base_geometry() {
        let catalog = TrackPieceCatalog::standard();
        for element in TrackElement::all().filter(|e| e.is_covered_variant()) {
            let base = covered_base(element).unwrap();
            let covered = catalog.lookup(element).unwrap();
            let plain = catalog.lookup(base).unwrap();
            assert_eq!(covered.coords, plain.coords, "{element:?}");
            assert_eq!(covered.group, plain.group, "{element:?}");
            assert!(covered.base_price > plain.base_price, "{element:?}");
        }
    }

    #[test]
    fn up_and_down_slopes_are_height_symmetric() {
        let catalog = TrackPieceCatalog::standard();
        let up = catalog.lookup(TrackElement::Up25).unwrap();
        let down = catalog.lookup(TrackElement::Down25).unwrap();
        assert_eq!(up.coords.z_end - up.coords.z_begin, 16);
        assert_eq!(down.coords.z_end - down.coords.z_begin, -16);
    }

    #[test]
    fn turns_chain_their_own_curve() {
        assert_eq!(
            TrackPieceCatalog::default_next_selection(TrackElement::LeftQuarterTurn3Tiles),
            CurveSelection::Curve(TrackCurve::LeftSmall)
        );
        assert_eq!(
            TrackPieceCatalog::default_next_selection(TrackElement::LeftHalfBankedHelixUpSmall),
            CurveSelection::Special(TrackElement::LeftHalfBankedHelixUpSmall)
        );
        assert_eq!(
            TrackPieceCatalog::default_next_selection(TrackElement::Up25),
            CurveSelection::Curve(TrackCurve::Straight)
        );
        assert_eq!(
            TrackPieceCatalog::default_next_selection(TrackElement::HalfLoopUp),
            CurveSelection::Special(TrackElement::HalfLoopDown)
        );
    }

    #[test]
    fn mirrored_turns_negate_rotation_and_offset() {
        let catalog = TrackPieceCatalog::standard();
        let left = catalog.lookup(TrackElement::LeftQuarterTurn3Tiles).unwrap();
        let right = catalog.lookup(TrackElement::RightQuarterTurn3Tiles).unwrap();
        assert_eq!(left.coords.rotation_delta, 1);
        assert_eq!(right.coords.rotation_delta, -1);
        assert_eq!(left.coords.end_offset.y, -right.coords.end_offset.y);
    }

    #[test]
    fn curved_lift_hills_force_the_chain() {
        let catalog = TrackPieceCatalog::standard();
        let def = catalog.lookup(TrackElement::LeftCurvedLiftHill).unwrap();
        assert!(def.forces_lift_hill);
        assert_eq!(def.group, TrackGroup::LiftHillCurve);
    }
}
