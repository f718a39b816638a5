//! Concrete track element identities.
//!
//! Internally everything is the tagged enum; the raw `u16` id exists only for
//! the serialization boundary so persisted worlds keep stable numbers.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Every concrete track piece the construction core knows about.
///
/// The covered variants are the water coaster's enclosed-tube pieces; they
/// are only reachable through the alternate-pieces substitution, never by
/// direct selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect,
)]
#[repr(u16)]
#[serde(into = "u16", try_from = "u16")]
pub enum TrackElement {
    Flat = 0,
    EndStation,
    BeginStation,
    MiddleStation,

    Up25,
    Up60,
    FlatToUp25,
    Up25ToUp60,
    Up60ToUp25,
    Up25ToFlat,
    Down25,
    Down60,
    FlatToDown25,
    Down25ToDown60,
    Down60ToDown25,
    Down25ToFlat,
    FlatToUp60,
    Up60ToFlat,
    FlatToDown60,
    Down60ToFlat,
    FlatToUp60LongBase,
    Up60ToFlatLongBase,
    FlatToDown60LongBase,
    Down60ToFlatLongBase,

    FlatToLeftBank,
    FlatToRightBank,
    LeftBankToFlat,
    RightBankToFlat,
    LeftBank,
    RightBank,
    LeftBankToUp25,
    RightBankToUp25,
    Up25ToLeftBank,
    Up25ToRightBank,
    LeftBankToDown25,
    RightBankToDown25,
    Down25ToLeftBank,
    Down25ToRightBank,

    LeftQuarterTurn5Tiles,
    RightQuarterTurn5Tiles,
    BankedLeftQuarterTurn5Tiles,
    BankedRightQuarterTurn5Tiles,
    LeftQuarterTurn5TilesUp25,
    RightQuarterTurn5TilesUp25,
    LeftQuarterTurn5TilesDown25,
    RightQuarterTurn5TilesDown25,

    LeftQuarterTurn3Tiles,
    RightQuarterTurn3Tiles,
    LeftBankedQuarterTurn3Tiles,
    RightBankedQuarterTurn3Tiles,
    LeftQuarterTurn3TilesUp25,
    RightQuarterTurn3TilesUp25,
    LeftQuarterTurn3TilesDown25,
    RightQuarterTurn3TilesDown25,
    LeftQuarterTurn1Tile,
    RightQuarterTurn1Tile,

    SBendLeft,
    SBendRight,
    LeftVerticalLoop,
    RightVerticalLoop,
    HalfLoopUp,
    HalfLoopDown,
    LeftHalfBankedHelixUpSmall,
    RightHalfBankedHelixUpSmall,
    LeftHalfBankedHelixDownSmall,
    RightHalfBankedHelixDownSmall,

    Brakes,
    Booster,
    LeftCurvedLiftHill,
    RightCurvedLiftHill,

    LeftEighthToDiag,
    RightEighthToDiag,
    LeftEighthToOrthogonal,
    RightEighthToOrthogonal,
    DiagFlat,
    DiagUp25,
    DiagFlatToUp25,
    DiagUp25ToFlat,
    DiagDown25,
    DiagFlatToDown25,
    DiagDown25ToFlat,
    DiagFlatToUp60,
    DiagUp60ToFlat,
    DiagFlatToDown60,
    DiagDown60ToFlat,

    FlatCovered,
    Up25Covered,
    Down25Covered,
    FlatToUp25Covered,
    Up25ToFlatCovered,
    FlatToDown25Covered,
    Down25ToFlatCovered,
    LeftQuarterTurn5TilesCovered,
    RightQuarterTurn5TilesCovered,
    SBendLeftCovered,
    SBendRightCovered,
    LeftQuarterTurn3TilesCovered,
    RightQuarterTurn3TilesCovered,

    Maze,
}

impl TrackElement {
    /// All elements, in id order. Iterated when recomputing the possible
    /// configuration set.
    pub fn all() -> impl Iterator<Item = TrackElement> {
        (0..=TrackElement::Maze as u16).filter_map(TrackElement::from_raw)
    }

    pub fn raw(self) -> u16 {
        self as u16
    }

    pub fn from_raw(raw: u16) -> Option<Self> {
        use TrackElement::*;
        const ORDER: &[TrackElement] = &[
            Flat, EndStation, BeginStation, MiddleStation, Up25, Up60, FlatToUp25, Up25ToUp60,
            Up60ToUp25, Up25ToFlat, Down25, Down60, FlatToDown25, Down25ToDown60, Down60ToDown25,
            Down25ToFlat, FlatToUp60, Up60ToFlat, FlatToDown60, Down60ToFlat, FlatToUp60LongBase,
            Up60ToFlatLongBase, FlatToDown60LongBase, Down60ToFlatLongBase, FlatToLeftBank,
            FlatToRightBank, LeftBankToFlat, RightBankToFlat, LeftBank, RightBank, LeftBankToUp25,
            RightBankToUp25, Up25ToLeftBank, Up25ToRightBank, LeftBankToDown25, RightBankToDown25,
            Down25ToLeftBank, Down25ToRightBank, LeftQuarterTurn5Tiles, RightQuarterTurn5Tiles,
            BankedLeftQuarterTurn5Tiles, BankedRightQuarterTurn5Tiles, LeftQuarterTurn5TilesUp25,
            RightQuarterTurn5TilesUp25, LeftQuarterTurn5TilesDown25, RightQuarterTurn5TilesDown25,
            LeftQuarterTurn3Tiles, RightQuarterTurn3Tiles, LeftBankedQuarterTurn3Tiles,
            RightBankedQuarterTurn3Tiles, LeftQuarterTurn3TilesUp25, RightQuarterTurn3TilesUp25,
            LeftQuarterTurn3TilesDown25, RightQuarterTurn3TilesDown25, LeftQuarterTurn1Tile,
            RightQuarterTurn1Tile, SBendLeft, SBendRight, LeftVerticalLoop, RightVerticalLoop,
            HalfLoopUp, HalfLoopDown,
            LeftHalfBankedHelixUpSmall, RightHalfBankedHelixUpSmall, LeftHalfBankedHelixDownSmall,
            RightHalfBankedHelixDownSmall, Brakes, Booster, LeftCurvedLiftHill, RightCurvedLiftHill,
            LeftEighthToDiag, RightEighthToDiag, LeftEighthToOrthogonal, RightEighthToOrthogonal,
            DiagFlat, DiagUp25, DiagFlatToUp25, DiagUp25ToFlat, DiagDown25, DiagFlatToDown25,
            DiagDown25ToFlat, DiagFlatToUp60, DiagUp60ToFlat, DiagFlatToDown60, DiagDown60ToFlat,
            FlatCovered, Up25Covered, Down25Covered, FlatToUp25Covered, Up25ToFlatCovered,
            FlatToDown25Covered, Down25ToFlatCovered, LeftQuarterTurn5TilesCovered,
            RightQuarterTurn5TilesCovered, SBendLeftCovered, SBendRightCovered,
            LeftQuarterTurn3TilesCovered, RightQuarterTurn3TilesCovered, Maze,
        ];
        ORDER.get(raw as usize).copied()
    }

    /// Brake and booster class elements carry a speed setting in their
    /// properties word instead of a seat rotation.
    pub fn has_speed_setting(self) -> bool {
        matches!(self, TrackElement::Brakes | TrackElement::Booster)
    }

    pub fn is_station(self) -> bool {
        matches!(
            self,
            TrackElement::EndStation | TrackElement::BeginStation | TrackElement::MiddleStation
        )
    }

    pub fn is_helix(self) -> bool {
        matches!(
            self,
            TrackElement::LeftHalfBankedHelixUpSmall
                | TrackElement::RightHalfBankedHelixUpSmall
                | TrackElement::LeftHalfBankedHelixDownSmall
                | TrackElement::RightHalfBankedHelixDownSmall
        )
    }

    pub fn is_covered_variant(self) -> bool {
        use TrackElement::*;
        matches!(
            self,
            FlatCovered
                | Up25Covered
                | Down25Covered
                | FlatToUp25Covered
                | Up25ToFlatCovered
                | FlatToDown25Covered
                | Down25ToFlatCovered
                | LeftQuarterTurn5TilesCovered
                | RightQuarterTurn5TilesCovered
                | SBendLeftCovered
                | SBendRightCovered
                | LeftQuarterTurn3TilesCovered
                | RightQuarterTurn3TilesCovered
        )
    }

    /// The enclosed-tube equivalent used when alternate pieces are selected.
    pub fn covered_variant(self) -> Option<TrackElement> {
        use TrackElement::*;
        match self {
            Flat => Some(FlatCovered),
            Up25 => Some(Up25Covered),
            Down25 => Some(Down25Covered),
            FlatToUp25 => Some(FlatToUp25Covered),
            Up25ToFlat => Some(Up25ToFlatCovered),
            FlatToDown25 => Some(FlatToDown25Covered),
            Down25ToFlat => Some(Down25ToFlatCovered),
            LeftQuarterTurn5Tiles => Some(LeftQuarterTurn5TilesCovered),
            RightQuarterTurn5Tiles => Some(RightQuarterTurn5TilesCovered),
            SBendLeft => Some(SBendLeftCovered),
            SBendRight => Some(SBendRightCovered),
            LeftQuarterTurn3Tiles => Some(LeftQuarterTurn3TilesCovered),
            RightQuarterTurn3Tiles => Some(RightQuarterTurn3TilesCovered),
            _ => None,
        }
    }
}

impl From<TrackElement> for u16 {
    fn from(element: TrackElement) -> u16 {
        element.raw()
    }
}

impl TryFrom<u16> for TrackElement {
    type Error = String;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        TrackElement::from_raw(raw).ok_or_else(|| format!("unknown track element id {raw}"))
    }
}
