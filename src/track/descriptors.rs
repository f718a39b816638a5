//! The ordered curve-resolution table.
//!
//! Each entry maps a selection key (curve, diagonal start, entry/exit slope,
//! entry/exit bank) to the concrete track element that realises it. The
//! resolver scans this table front to back; order therefore decides ties and
//! must stay stable.

use crate::track::curve::{CurveSelection, TrackBank, TrackCurve, TrackSlope};
use crate::track::element::TrackElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub curve: CurveSelection,
    pub starts_diagonal: bool,
    pub slope_start: TrackSlope,
    pub bank_start: TrackBank,
    pub slope_end: TrackSlope,
    pub bank_end: TrackBank,
    pub element: TrackElement,
}

const fn plain(
    curve: TrackCurve,
    slope_start: TrackSlope,
    bank_start: TrackBank,
    slope_end: TrackSlope,
    bank_end: TrackBank,
    element: TrackElement,
) -> TrackDescriptor {
    TrackDescriptor {
        curve: CurveSelection::Curve(curve),
        starts_diagonal: false,
        slope_start,
        bank_start,
        slope_end,
        bank_end,
        element,
    }
}

const fn diagonal(
    curve: TrackCurve,
    slope_start: TrackSlope,
    slope_end: TrackSlope,
    element: TrackElement,
) -> TrackDescriptor {
    TrackDescriptor {
        curve: CurveSelection::Curve(curve),
        starts_diagonal: true,
        slope_start,
        bank_start: TrackBank::None,
        slope_end,
        bank_end: TrackBank::None,
        element,
    }
}

const fn special(
    element: TrackElement,
    slope_start: TrackSlope,
    bank_start: TrackBank,
    slope_end: TrackSlope,
    bank_end: TrackBank,
) -> TrackDescriptor {
    TrackDescriptor {
        curve: CurveSelection::Special(element),
        starts_diagonal: false,
        slope_start,
        bank_start,
        slope_end,
        bank_end,
        element,
    }
}

use TrackBank::{Left as BL, None as BN, Right as BR, UpsideDown as BU};
use TrackCurve::*;
use TrackElement as El;
use TrackSlope::{Down25 as D25, Down60 as D60, None as SN, Up25 as U25, Up60 as U60};

pub const TRACK_DESCRIPTORS: &[TrackDescriptor] = &[
    // Straight, orthogonal
    plain(Straight, SN, BN, SN, BN, El::Flat),
    plain(Straight, U25, BN, U25, BN, El::Up25),
    plain(Straight, U60, BN, U60, BN, El::Up60),
    plain(Straight, SN, BN, U25, BN, El::FlatToUp25),
    plain(Straight, U25, BN, U60, BN, El::Up25ToUp60),
    plain(Straight, U60, BN, U25, BN, El::Up60ToUp25),
    plain(Straight, U25, BN, SN, BN, El::Up25ToFlat),
    plain(Straight, D25, BN, D25, BN, El::Down25),
    plain(Straight, D60, BN, D60, BN, El::Down60),
    plain(Straight, SN, BN, D25, BN, El::FlatToDown25),
    plain(Straight, D25, BN, D60, BN, El::Down25ToDown60),
    plain(Straight, D60, BN, D25, BN, El::Down60ToDown25),
    plain(Straight, D25, BN, SN, BN, El::Down25ToFlat),
    plain(Straight, SN, BN, U60, BN, El::FlatToUp60),
    plain(Straight, U60, BN, SN, BN, El::Up60ToFlat),
    plain(Straight, SN, BN, D60, BN, El::FlatToDown60),
    plain(Straight, D60, BN, SN, BN, El::Down60ToFlat),
    // Straight, bank transitions
    plain(Straight, SN, BN, SN, BL, El::FlatToLeftBank),
    plain(Straight, SN, BN, SN, BR, El::FlatToRightBank),
    plain(Straight, SN, BL, SN, BN, El::LeftBankToFlat),
    plain(Straight, SN, BR, SN, BN, El::RightBankToFlat),
    plain(Straight, SN, BL, SN, BL, El::LeftBank),
    plain(Straight, SN, BR, SN, BR, El::RightBank),
    plain(Straight, SN, BL, U25, BN, El::LeftBankToUp25),
    plain(Straight, SN, BR, U25, BN, El::RightBankToUp25),
    plain(Straight, U25, BN, SN, BL, El::Up25ToLeftBank),
    plain(Straight, U25, BN, SN, BR, El::Up25ToRightBank),
    plain(Straight, SN, BL, D25, BN, El::LeftBankToDown25),
    plain(Straight, SN, BR, D25, BN, El::RightBankToDown25),
    plain(Straight, D25, BN, SN, BL, El::Down25ToLeftBank),
    plain(Straight, D25, BN, SN, BR, El::Down25ToRightBank),
    // Straight, diagonal
    diagonal(Straight, SN, SN, El::DiagFlat),
    diagonal(Straight, U25, U25, El::DiagUp25),
    diagonal(Straight, SN, U25, El::DiagFlatToUp25),
    diagonal(Straight, U25, SN, El::DiagUp25ToFlat),
    diagonal(Straight, D25, D25, El::DiagDown25),
    diagonal(Straight, SN, D25, El::DiagFlatToDown25),
    diagonal(Straight, D25, SN, El::DiagDown25ToFlat),
    diagonal(Straight, SN, U60, El::DiagFlatToUp60),
    diagonal(Straight, U60, SN, El::DiagUp60ToFlat),
    diagonal(Straight, SN, D60, El::DiagFlatToDown60),
    diagonal(Straight, D60, SN, El::DiagDown60ToFlat),
    // Wide turns
    plain(Left, SN, BN, SN, BN, El::LeftQuarterTurn5Tiles),
    plain(Right, SN, BN, SN, BN, El::RightQuarterTurn5Tiles),
    plain(Left, SN, BL, SN, BL, El::BankedLeftQuarterTurn5Tiles),
    plain(Right, SN, BR, SN, BR, El::BankedRightQuarterTurn5Tiles),
    plain(Left, U25, BN, U25, BN, El::LeftQuarterTurn5TilesUp25),
    plain(Right, U25, BN, U25, BN, El::RightQuarterTurn5TilesUp25),
    plain(Left, D25, BN, D25, BN, El::LeftQuarterTurn5TilesDown25),
    plain(Right, D25, BN, D25, BN, El::RightQuarterTurn5TilesDown25),
    // Small turns
    plain(LeftSmall, SN, BN, SN, BN, El::LeftQuarterTurn3Tiles),
    plain(RightSmall, SN, BN, SN, BN, El::RightQuarterTurn3Tiles),
    plain(LeftSmall, SN, BL, SN, BL, El::LeftBankedQuarterTurn3Tiles),
    plain(RightSmall, SN, BR, SN, BR, El::RightBankedQuarterTurn3Tiles),
    plain(LeftSmall, U25, BN, U25, BN, El::LeftQuarterTurn3TilesUp25),
    plain(RightSmall, U25, BN, U25, BN, El::RightQuarterTurn3TilesUp25),
    plain(LeftSmall, D25, BN, D25, BN, El::LeftQuarterTurn3TilesDown25),
    plain(RightSmall, D25, BN, D25, BN, El::RightQuarterTurn3TilesDown25),
    // Very small turns
    plain(LeftVerySmall, SN, BN, SN, BN, El::LeftQuarterTurn1Tile),
    plain(RightVerySmall, SN, BN, SN, BN, El::RightQuarterTurn1Tile),
    // Large turns, orthogonal to diagonal and back
    plain(LeftLarge, SN, BN, SN, BN, El::LeftEighthToDiag),
    plain(RightLarge, SN, BN, SN, BN, El::RightEighthToDiag),
    diagonal(LeftLarge, SN, SN, El::LeftEighthToOrthogonal),
    diagonal(RightLarge, SN, SN, El::RightEighthToOrthogonal),
    // Special pieces
    special(El::EndStation, SN, BN, SN, BN),
    special(El::BeginStation, SN, BN, SN, BN),
    special(El::MiddleStation, SN, BN, SN, BN),
    special(El::SBendLeft, SN, BN, SN, BN),
    special(El::SBendRight, SN, BN, SN, BN),
    special(El::LeftVerticalLoop, U25, BN, D25, BN),
    special(El::RightVerticalLoop, U25, BN, D25, BN),
    special(El::HalfLoopUp, U25, BN, SN, BU),
    special(El::HalfLoopDown, SN, BU, D25, BN),
    special(El::LeftHalfBankedHelixUpSmall, SN, BL, SN, BL),
    special(El::RightHalfBankedHelixUpSmall, SN, BR, SN, BR),
    special(El::LeftHalfBankedHelixDownSmall, SN, BL, SN, BL),
    special(El::RightHalfBankedHelixDownSmall, SN, BR, SN, BR),
    special(El::Brakes, SN, BN, SN, BN),
    special(El::Booster, SN, BN, SN, BN),
    special(El::LeftCurvedLiftHill, SN, BN, SN, BN),
    special(El::RightCurvedLiftHill, SN, BN, SN, BN),
];

/// Scan the table for the first entry matching the full key.
pub fn find_element(
    curve: CurveSelection,
    starts_diagonal: bool,
    slope_start: TrackSlope,
    slope_end: TrackSlope,
    bank_start: TrackBank,
    bank_end: TrackBank,
) -> Option<TrackElement> {
    TRACK_DESCRIPTORS
        .iter()
        .find(|d| {
            d.curve == curve
                && d.starts_diagonal == starts_diagonal
                && d.slope_start == slope_start
                && d.slope_end == slope_end
                && d.bank_start == bank_start
                && d.bank_end == bank_end
        })
        .map(|d| d.element)
}

/// Reverse lookup used when seeding selections from an existing element.
pub fn descriptor_for(element: TrackElement) -> Option<&'static TrackDescriptor> {
    TRACK_DESCRIPTORS.iter().find(|d| d.element == element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        for (i, a) in TRACK_DESCRIPTORS.iter().enumerate() {
            for b in &TRACK_DESCRIPTORS[i + 1..] {
                let same_key = a.curve == b.curve
                    && a.starts_diagonal == b.starts_diagonal
                    && a.slope_start == b.slope_start
                    && a.slope_end == b.slope_end
                    && a.bank_start == b.bank_start
                    && a.bank_end == b.bank_end;
                assert!(!same_key, "{:?} and {:?} share a key", a.element, b.element);
            }
        }
    }

    #[test]
    fn flat_resolves_from_default_state() {
        let found = find_element(
            CurveSelection::Curve(TrackCurve::Straight),
            false,
            TrackSlope::None,
            TrackSlope::None,
            TrackBank::None,
            TrackBank::None,
        );
        assert_eq!(found, Some(TrackElement::Flat));
    }

    #[test]
    fn banked_turn_requires_matching_banks() {
        let found = find_element(
            CurveSelection::Curve(TrackCurve::Left),
            false,
            TrackSlope::None,
            TrackSlope::None,
            TrackBank::Left,
            TrackBank::Left,
        );
        assert_eq!(found, Some(TrackElement::BankedLeftQuarterTurn5Tiles));
        let mismatched = find_element(
            CurveSelection::Curve(TrackCurve::Left),
            false,
            TrackSlope::None,
            TrackSlope::None,
            TrackBank::Left,
            TrackBank::Right,
        );
        assert_eq!(mismatched, None);
    }

    #[test]
    fn diagonal_flag_selects_diag_pieces() {
        let found = find_element(
            CurveSelection::Curve(TrackCurve::Straight),
            true,
            TrackSlope::None,
            TrackSlope::None,
            TrackBank::None,
            TrackBank::None,
        );
        assert_eq!(found, Some(TrackElement::DiagFlat));
        let large = find_element(
            CurveSelection::Curve(TrackCurve::LeftLarge),
            true,
            TrackSlope::None,
            TrackSlope::None,
            TrackBank::None,
            TrackBank::None,
        );
        assert_eq!(large, Some(TrackElement::LeftEighthToOrthogonal));
    }

    #[test]
    fn every_element_has_reverse_lookup() {
        for d in TRACK_DESCRIPTORS {
            assert_eq!(descriptor_for(d.element).map(|x| x.element), Some(d.element));
        }
    }
}
