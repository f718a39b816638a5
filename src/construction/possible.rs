//! What the player may build next from the current open end.
//!
//! `PossibleConfigurations` is derived state, recomputed whenever the open
//! end changes. `compute_disabled_controls` turns it into a set of greyed-out
//! control ids, keeping legality separate from presentation.

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::construction::cursor::ConstructionCursor;
use crate::track::{
    CurveSelection, RideType, TrackBank, TrackCurve, TrackElement, TrackPieceCatalog, TrackSlope,
    descriptor_for,
};

/// Ordered list of elements that can attach to the open end right now.
#[derive(Resource, Debug, Clone, Default)]
pub struct PossibleConfigurations {
    pub elements: Vec<TrackElement>,
}

impl PossibleConfigurations {
    pub fn contains(&self, element: TrackElement) -> bool {
        self.elements.contains(&element)
    }
}

/// A selectable construction control, independent of how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ControlId {
    CurveLeftVerySmall,
    CurveLeftSmall,
    CurveLeft,
    CurveLeftLarge,
    CurveStraight,
    CurveRightLarge,
    CurveRight,
    CurveRightSmall,
    CurveRightVerySmall,
    SlopeDown60,
    SlopeDown25,
    SlopeLevel,
    SlopeUp25,
    SlopeUp60,
    BankLeft,
    BankNone,
    BankRight,
    LiftHill,
}

const CURVE_CONTROLS: &[(ControlId, TrackCurve)] = &[
    (ControlId::CurveLeftVerySmall, TrackCurve::LeftVerySmall),
    (ControlId::CurveLeftSmall, TrackCurve::LeftSmall),
    (ControlId::CurveLeft, TrackCurve::Left),
    (ControlId::CurveLeftLarge, TrackCurve::LeftLarge),
    (ControlId::CurveStraight, TrackCurve::Straight),
    (ControlId::CurveRightLarge, TrackCurve::RightLarge),
    (ControlId::CurveRight, TrackCurve::Right),
    (ControlId::CurveRightSmall, TrackCurve::RightSmall),
    (ControlId::CurveRightVerySmall, TrackCurve::RightVerySmall),
];

const SLOPE_CONTROLS: &[(ControlId, TrackSlope)] = &[
    (ControlId::SlopeDown60, TrackSlope::Down60),
    (ControlId::SlopeDown25, TrackSlope::Down25),
    (ControlId::SlopeLevel, TrackSlope::None),
    (ControlId::SlopeUp25, TrackSlope::Up25),
    (ControlId::SlopeUp60, TrackSlope::Up60),
];

const BANK_CONTROLS: &[(ControlId, TrackBank)] = &[
    (ControlId::BankLeft, TrackBank::Left),
    (ControlId::BankNone, TrackBank::None),
    (ControlId::BankRight, TrackBank::Right),
];

/// Recompute the element list for the current open end.
pub fn compute_possible(
    cursor: &ConstructionCursor,
    ride_type: RideType,
    catalog: &TrackPieceCatalog,
) -> PossibleConfigurations {
    let groups = ride_type.enabled_groups(cursor.alternative);
    let back = cursor.building_back();

    let elements = TrackElement::all()
        .filter(|element| !element.is_covered_variant())
        .filter(|&element| {
            let Ok(def) = catalog.lookup(element) else {
                return false;
            };
            if !groups.contains(def.group) {
                return false;
            }
            // Geometry on the side that joins the open end.
            let (slope, bank, diagonal) = if back {
                (def.slope_end, def.bank_end, def.ends_diagonal)
            } else {
                (def.slope_start, def.bank_start, def.starts_diagonal)
            };
            if diagonal != cursor.direction.diagonal {
                return false;
            }
            if slope != cursor.previous_slope {
                return false;
            }
            if bank != cursor.previous_bank {
                // Left helices may be entered straight off unbanked track.
                let helix_entry = element.is_helix()
                    && cursor.previous_bank == TrackBank::None
                    && bank == TrackBank::Left;
                if !helix_entry {
                    return false;
                }
            }
            true
        })
        .collect();

    PossibleConfigurations { elements }
}

/// Which controls have no legal outcome from the current cursor state.
pub fn compute_disabled_controls(
    cursor: &ConstructionCursor,
    possible: &PossibleConfigurations,
    catalog: &TrackPieceCatalog,
) -> BTreeSet<ControlId> {
    let back = cursor.building_back();
    let mut disabled = BTreeSet::new();

    let far_side = |element: TrackElement| {
        let def = catalog.lookup(element).ok()?;
        Some(if back {
            (def.slope_start, def.bank_start)
        } else {
            (def.slope_end, def.bank_end)
        })
    };
    let curve_of = |element: TrackElement| descriptor_for(element).map(|d| d.curve);

    for &(control, curve) in CURVE_CONTROLS {
        let reachable = possible
            .elements
            .iter()
            .any(|&e| curve_of(e) == Some(CurveSelection::Curve(curve)));
        if !reachable {
            disabled.insert(control);
        }
    }

    for &(control, slope) in SLOPE_CONTROLS {
        let reachable = possible.elements.iter().any(|&e| {
            curve_of(e) == Some(cursor.curve)
                && far_side(e).is_some_and(|(s, _)| s == slope)
        });
        if !reachable {
            disabled.insert(control);
        }
    }

    for &(control, bank) in BANK_CONTROLS {
        let reachable = possible.elements.iter().any(|&e| {
            curve_of(e) == Some(cursor.curve)
                && far_side(e).is_some_and(|(_, b)| b == bank)
        });
        if !reachable {
            disabled.insert(control);
        }
    }

    let lift_usable = possible.elements.iter().any(|&e| {
        curve_of(e) == Some(cursor.curve)
            && catalog
                .lookup(e)
                .is_ok_and(|def| def.allows_lift_hill || def.forces_lift_hill)
    });
    if !lift_usable {
        disabled.insert(ControlId::LiftHill);
    }

    disabled
}
