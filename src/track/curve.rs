//! Slope, bank and curve vocabulary for track compatibility.
//!
//! These are the three axes the compatibility solver matches on: the
//! vertical angle and roll angle at each end of a piece, and the horizontal
//! curve class the player has selected.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::track::element::TrackElement;

/// Vertical angle at one end of a track piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect,
)]
pub enum TrackSlope {
    #[default]
    None,
    Up25,
    Up60,
    Down25,
    Down60,
}

impl TrackSlope {
    pub fn inverted(self) -> Self {
        match self {
            TrackSlope::None => TrackSlope::None,
            TrackSlope::Up25 => TrackSlope::Down25,
            TrackSlope::Up60 => TrackSlope::Down60,
            TrackSlope::Down25 => TrackSlope::Up25,
            TrackSlope::Down60 => TrackSlope::Up60,
        }
    }

    pub fn is_downhill(self) -> bool {
        matches!(self, TrackSlope::Down25 | TrackSlope::Down60)
    }

    pub fn is_uphill(self) -> bool {
        matches!(self, TrackSlope::Up25 | TrackSlope::Up60)
    }
}

/// Roll angle at one end of a track piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect,
)]
pub enum TrackBank {
    #[default]
    None,
    Left,
    Right,
    /// Mid-inversion roll; only ever reachable through special elements.
    UpsideDown,
}

/// The discrete curve tightness options, independent of slope and bank.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect,
)]
pub enum TrackCurve {
    #[default]
    Straight,
    LeftVerySmall,
    LeftSmall,
    Left,
    LeftLarge,
    RightLarge,
    Right,
    RightSmall,
    RightVerySmall,
}

impl TrackCurve {
    pub fn is_left(self) -> bool {
        matches!(
            self,
            TrackCurve::LeftVerySmall | TrackCurve::LeftSmall | TrackCurve::Left | TrackCurve::LeftLarge
        )
    }

    pub fn is_right(self) -> bool {
        matches!(
            self,
            TrackCurve::RightVerySmall
                | TrackCurve::RightSmall
                | TrackCurve::Right
                | TrackCurve::RightLarge
        )
    }

    pub fn is_large(self) -> bool {
        matches!(self, TrackCurve::LeftLarge | TrackCurve::RightLarge)
    }

    pub fn mirrored(self) -> Self {
        match self {
            TrackCurve::Straight => TrackCurve::Straight,
            TrackCurve::LeftVerySmall => TrackCurve::RightVerySmall,
            TrackCurve::LeftSmall => TrackCurve::RightSmall,
            TrackCurve::Left => TrackCurve::Right,
            TrackCurve::LeftLarge => TrackCurve::RightLarge,
            TrackCurve::RightLarge => TrackCurve::LeftLarge,
            TrackCurve::Right => TrackCurve::Left,
            TrackCurve::RightSmall => TrackCurve::LeftSmall,
            TrackCurve::RightVerySmall => TrackCurve::LeftVerySmall,
        }
    }
}

/// What the curve buttons currently select: either a plain curve resolved
/// through the descriptor table, or a special element chosen directly by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum CurveSelection {
    Curve(TrackCurve),
    Special(TrackElement),
}

impl Default for CurveSelection {
    fn default() -> Self {
        CurveSelection::Curve(TrackCurve::Straight)
    }
}
