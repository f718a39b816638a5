//! Selection-to-element resolution.
//!
//! Turns the cursor's curve/slope/bank selections plus the open-end state
//! into one concrete track element, applying ride-type substitutions and the
//! lift-hill rules. Pure: same inputs, same answer.

use thiserror::Error;

use crate::construction::cursor::ConstructionCursor;
use crate::track::{
    CatalogError, CurveSelection, RideType, TrackBank, TrackCurve, TrackElement, TrackGroup,
    TrackPieceCatalog, TrackSlope, descriptor_for, find_element,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPlacement {
    pub element: TrackElement,
    pub lift_hill: bool,
    /// Brake speed for speed-setting elements, seat rotation otherwise.
    pub properties: u16,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no track piece matches the current selection")]
    NoMatch,
    #[error("{0:?} needs flat unbanked track at both ends")]
    RequiresLevel(TrackElement),
    #[error("vertical loops must continue a 25 degree slope")]
    LoopSlope,
    #[error("{0:?} pieces are not available on this ride type")]
    GroupUnavailable(TrackGroup),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Resolve the cursor's current selection for `ride_type`.
pub fn resolve(
    cursor: &ConstructionCursor,
    ride_type: RideType,
    catalog: &TrackPieceCatalog,
) -> Result<ResolvedPlacement, ResolveError> {
    let descriptor = ride_type.descriptor();
    let back = cursor.building_back();

    let mut element = match cursor.curve {
        CurveSelection::Special(special) => resolve_special(cursor, special, back)?,
        CurveSelection::Curve(curve) => resolve_plain(cursor, curve, back)?,
    };

    if descriptor.long_base_steep_transitions {
        element = match element {
            TrackElement::FlatToUp60 => TrackElement::FlatToUp60LongBase,
            TrackElement::Up60ToFlat => TrackElement::Up60ToFlatLongBase,
            TrackElement::FlatToDown60 => TrackElement::FlatToDown60LongBase,
            TrackElement::Down60ToFlat => TrackElement::Down60ToFlatLongBase,
            TrackElement::DiagFlatToUp60
            | TrackElement::DiagUp60ToFlat
            | TrackElement::DiagFlatToDown60
            | TrackElement::DiagDown60ToFlat => return Err(ResolveError::NoMatch),
            other => other,
        };
    }

    let mut covered_substituted = false;
    if descriptor.covered_pieces && cursor.alternative && covered_allowed(element, &descriptor) {
        if let Some(covered) = element.covered_variant() {
            element = covered;
            covered_substituted = true;
        }
    }

    let definition = catalog.lookup(element)?;
    if !ride_type.enabled_groups(cursor.alternative).contains(definition.group) {
        return Err(ResolveError::GroupUnavailable(definition.group));
    }

    let lift_hill = if definition.forces_lift_hill {
        true
    } else if covered_substituted || !definition.allows_lift_hill {
        false
    } else {
        cursor.lift_hill
    };

    let properties = if element.has_speed_setting() {
        cursor.brake_speed as u16
    } else {
        (cursor.seat_rotation as u16) << 12
    };

    Ok(ResolvedPlacement { element, lift_hill, properties })
}

/// The water channel exemption: two-variety rides that mostly run on the
/// surface only swap in covered pieces where the covered shapes exist.
fn covered_allowed(
    element: TrackElement,
    descriptor: &crate::track::RideTypeDescriptor,
) -> bool {
    if !descriptor.covered_exemption {
        return true;
    }
    matches!(
        element,
        TrackElement::Flat
            | TrackElement::LeftQuarterTurn5Tiles
            | TrackElement::RightQuarterTurn5Tiles
    )
}

fn resolve_plain(
    cursor: &ConstructionCursor,
    curve: TrackCurve,
    back: bool,
) -> Result<TrackElement, ResolveError> {
    // Building backward the new piece's exit joins the open end, so the
    // user's selection describes its entry instead.
    let (slope_start, slope_end, bank_start, bank_end) = if back {
        (cursor.slope, cursor.previous_slope, cursor.bank, cursor.previous_bank)
    } else {
        (cursor.previous_slope, cursor.slope, cursor.previous_bank, cursor.bank)
    };

    // Large curves cross between the orthogonal and diagonal lattices; seen
    // from the back end their diagonal flag is the opposite of the cursor's.
    let mut starts_diagonal = cursor.direction.diagonal;
    if back && curve.is_large() {
        starts_diagonal = !starts_diagonal;
    }

    find_element(
        CurveSelection::Curve(curve),
        starts_diagonal,
        slope_start,
        slope_end,
        bank_start,
        bank_end,
    )
    .ok_or(ResolveError::NoMatch)
}

fn resolve_special(
    cursor: &ConstructionCursor,
    special: TrackElement,
    back: bool,
) -> Result<TrackElement, ResolveError> {
    let descriptor = descriptor_for(special).ok_or(ResolveError::NoMatch)?;

    match special {
        TrackElement::SBendLeft
        | TrackElement::SBendRight
        | TrackElement::EndStation
        | TrackElement::BeginStation
        | TrackElement::MiddleStation => {
            let level = cursor.previous_slope == TrackSlope::None
                && cursor.previous_bank == TrackBank::None
                && cursor.slope == TrackSlope::None
                && cursor.bank == TrackBank::None;
            if !level {
                return Err(ResolveError::RequiresLevel(special));
            }
        }
        TrackElement::LeftVerticalLoop | TrackElement::RightVerticalLoop => {
            if cursor.previous_bank != TrackBank::None || cursor.bank != TrackBank::None {
                return Err(ResolveError::LoopSlope);
            }
            let required = if back { TrackSlope::Down25 } else { TrackSlope::Up25 };
            if cursor.previous_slope != required {
                return Err(ResolveError::LoopSlope);
            }
        }
        _ => {
            // Other specials connect on the side facing the open end; check
            // that side of their descriptor against the open-end state.
            let (slope, bank) = if back {
                (descriptor.slope_end, descriptor.bank_end)
            } else {
                (descriptor.slope_start, descriptor.bank_start)
            };
            if slope != cursor.previous_slope || bank != cursor.previous_bank {
                return Err(ResolveError::NoMatch);
            }
        }
    }

    Ok(special)
}
