//! Capability groups: which families of track pieces a ride type offers.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A family of track pieces enabled or disabled together per ride type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect,
)]
#[repr(u8)]
pub enum TrackGroup {
    Straight,
    StationEnd,
    LiftHill,
    LiftHillCurve,
    Banking,
    Slope,
    SlopeSteep,
    SlopeSteepLong,
    SlopeCurve,
    SlopeCurveBanked,
    CurveVerySmall,
    CurveSmall,
    Curve,
    CurveLarge,
    CurveBanked,
    Diagonal,
    SBend,
    VerticalLoop,
    HalfLoop,
    HelixSmall,
    Brakes,
    Booster,
    Maze,
}

/// A set of capability groups, packed into a bitmask so ride-type masks are
/// cheap to intersect and copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub struct TrackGroupSet(u64);

impl TrackGroupSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_groups(groups: &[TrackGroup]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < groups.len() {
            bits |= 1 << groups[i] as u64;
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(self, group: TrackGroup) -> bool {
        self.0 & (1 << group as u64) != 0
    }

    pub const fn with(self, group: TrackGroup) -> Self {
        Self(self.0 | (1 << group as u64))
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<TrackGroup> for TrackGroupSet {
    fn from_iter<I: IntoIterator<Item = TrackGroup>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, group| set.with(group))
    }
}
