//! Ride entities and per-ride-type capability descriptors.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::{CoordsXYZ, Direction, TileCoords};
use crate::track::groups::{TrackGroup, TrackGroupSet};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect,
)]
pub enum RideType {
    WoodenCoaster,
    CorkscrewCoaster,
    Hypercoaster,
    WaterCoaster,
    FlyingCoaster,
    Maze,
    GiftShop,
}

/// Static capabilities of a ride type. Looked up through
/// [`RideType::descriptor`], never stored per entity.
#[derive(Debug, Clone, Copy)]
pub struct RideTypeDescriptor {
    pub groups: TrackGroupSet,
    /// Offers covered counterparts of some pieces (the "two variety" flag).
    pub covered_pieces: bool,
    /// Covered substitution is skipped for most pieces of this type; water
    /// channel rides run covered sections only where the sprites exist.
    pub covered_exemption: bool,
    /// Supports switching to an alternative track style mid-build
    /// (inverted sections on a flying coaster).
    pub alternative_track: bool,
    /// Uses the long-base variants of the flat-to-steep transitions.
    pub long_base_steep_transitions: bool,
    /// Opens as soon as construction completes, no test run needed.
    pub auto_open_on_complete: bool,
    pub has_track: bool,
    pub max_brake_speed: u8,
}

impl RideType {
    pub const fn descriptor(self) -> RideTypeDescriptor {
        use TrackGroup::*;
        match self {
            RideType::WoodenCoaster => RideTypeDescriptor {
                groups: TrackGroupSet::from_groups(&[
                    Straight, StationEnd, LiftHill, Banking, Slope, SlopeSteep,
                    SlopeSteepLong, SlopeCurve, CurveVerySmall, CurveSmall, Curve,
                    CurveLarge, CurveBanked, Diagonal, SBend, Brakes,
                ]),
                covered_pieces: false,
                covered_exemption: false,
                alternative_track: false,
                long_base_steep_transitions: true,
                auto_open_on_complete: false,
                has_track: true,
                max_brake_speed: 30,
            },
            RideType::CorkscrewCoaster => RideTypeDescriptor {
                groups: TrackGroupSet::from_groups(&[
                    Straight, StationEnd, LiftHill, LiftHillCurve, Banking, Slope,
                    SlopeSteep, SlopeCurve, SlopeCurveBanked, CurveVerySmall,
                    CurveSmall, Curve, CurveLarge, CurveBanked, Diagonal, SBend,
                    VerticalLoop, HalfLoop, HelixSmall, Brakes, Booster,
                ]),
                covered_pieces: false,
                covered_exemption: false,
                alternative_track: false,
                long_base_steep_transitions: false,
                auto_open_on_complete: false,
                has_track: true,
                max_brake_speed: 30,
            },
            RideType::Hypercoaster => RideTypeDescriptor {
                groups: TrackGroupSet::from_groups(&[
                    Straight, StationEnd, LiftHill, Banking, Slope, SlopeSteep,
                    SlopeSteepLong, SlopeCurve, SlopeCurveBanked, CurveVerySmall,
                    CurveSmall, Curve, CurveLarge, CurveBanked, Diagonal, SBend,
                    HalfLoop, Brakes, Booster,
                ]),
                covered_pieces: false,
                covered_exemption: false,
                alternative_track: false,
                long_base_steep_transitions: true,
                auto_open_on_complete: false,
                has_track: true,
                max_brake_speed: 60,
            },
            RideType::WaterCoaster => RideTypeDescriptor {
                groups: TrackGroupSet::from_groups(&[
                    Straight, StationEnd, LiftHill, Slope, CurveVerySmall,
                    CurveSmall, Curve, SBend, Brakes, Booster,
                ]),
                covered_pieces: true,
                covered_exemption: true,
                alternative_track: false,
                long_base_steep_transitions: false,
                auto_open_on_complete: false,
                has_track: true,
                max_brake_speed: 30,
            },
            RideType::FlyingCoaster => RideTypeDescriptor {
                groups: TrackGroupSet::from_groups(&[
                    Straight, StationEnd, LiftHill, Banking, Slope, SlopeSteep,
                    SlopeCurve, SlopeCurveBanked, CurveVerySmall, CurveSmall,
                    Curve, CurveLarge, CurveBanked, Diagonal, SBend, Brakes,
                    Booster,
                ]),
                covered_pieces: false,
                covered_exemption: false,
                alternative_track: true,
                long_base_steep_transitions: false,
                auto_open_on_complete: false,
                has_track: true,
                max_brake_speed: 30,
            },
            RideType::Maze => RideTypeDescriptor {
                groups: TrackGroupSet::from_groups(&[Maze]),
                covered_pieces: false,
                covered_exemption: false,
                alternative_track: false,
                long_base_steep_transitions: false,
                auto_open_on_complete: false,
                has_track: true,
                max_brake_speed: 0,
            },
            RideType::GiftShop => RideTypeDescriptor {
                groups: TrackGroupSet::empty(),
                covered_pieces: false,
                covered_exemption: false,
                alternative_track: false,
                long_base_steep_transitions: false,
                auto_open_on_complete: true,
                has_track: false,
                max_brake_speed: 0,
            },
        }
    }

    /// The capability mask in effect for a track style. Rides with an
    /// alternative track style run a restricted mask while it is selected;
    /// everything else keeps its full mask.
    pub const fn enabled_groups(self, alternative: bool) -> TrackGroupSet {
        use TrackGroup::*;
        let descriptor = self.descriptor();
        if alternative && descriptor.alternative_track {
            // Inverted running: no banking and no banked or large curves.
            return TrackGroupSet::from_groups(&[
                Straight, StationEnd, LiftHill, Slope, SlopeSteep, CurveVerySmall,
                CurveSmall, Curve, SBend, Brakes, Booster,
            ]);
        }
        descriptor.groups
    }

    pub const fn is_maze(self) -> bool {
        matches!(self, RideType::Maze)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect, Default)]
pub enum RideStatus {
    #[default]
    Closed,
    Open,
}

/// One station platform on a ride.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Reflect)]
pub struct Station {
    pub start: Option<CoordsXYZ>,
    pub direction: Option<Direction>,
    pub length: u8,
    pub entrance: Option<TileCoords>,
    pub exit: Option<TileCoords>,
}

/// A ride under construction or in operation.
#[derive(Debug, Clone, Component, Serialize, Deserialize, Reflect)]
pub struct Ride {
    pub ride_type: RideType,
    pub status: RideStatus,
    pub stations: Vec<Station>,
    pub num_pieces: u32,
}

impl Ride {
    pub fn new(ride_type: RideType) -> Self {
        Self {
            ride_type,
            status: RideStatus::Closed,
            stations: Vec::new(),
            num_pieces: 0,
        }
    }

    pub fn supports(&self, group: TrackGroup) -> bool {
        self.ride_type.descriptor().groups.contains(group)
    }

    /// A ride is complete enough to open once at least one station has both
    /// an entrance and an exit placed.
    pub fn has_complete_station(&self) -> bool {
        self.stations
            .iter()
            .any(|s| s.start.is_some() && s.entrance.is_some() && s.exit.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wooden_coaster_lacks_banked_slope_curves() {
        let desc = RideType::WoodenCoaster.descriptor();
        assert!(desc.groups.contains(TrackGroup::SlopeCurve));
        assert!(!desc.groups.contains(TrackGroup::SlopeCurveBanked));
    }

    #[test]
    fn water_coaster_is_two_variety() {
        let desc = RideType::WaterCoaster.descriptor();
        assert!(desc.covered_pieces);
        assert!(desc.covered_exemption);
    }

    #[test]
    fn gift_shop_has_no_track() {
        let desc = RideType::GiftShop.descriptor();
        assert!(!desc.has_track);
        assert!(desc.auto_open_on_complete);
        assert!(desc.groups.is_empty());
    }

    #[test]
    fn inverted_running_restricts_the_mask() {
        let flying = RideType::FlyingCoaster;
        assert!(flying.enabled_groups(false).contains(TrackGroup::Banking));
        assert!(!flying.enabled_groups(true).contains(TrackGroup::Banking));
        // Two-variety rides without an alternative style keep their mask.
        let water = RideType::WaterCoaster;
        assert_eq!(water.enabled_groups(true), water.enabled_groups(false));
    }

    #[test]
    fn station_completeness() {
        let mut ride = Ride::new(RideType::WoodenCoaster);
        assert!(!ride.has_complete_station());
        ride.stations.push(Station {
            start: Some(CoordsXYZ::new(0, 0, 16)),
            direction: Some(Direction::new(0)),
            length: 3,
            entrance: Some(TileCoords::new(1, 0)),
            exit: Some(TileCoords::new(2, 0)),
        });
        assert!(ride.has_complete_station());
    }
}
