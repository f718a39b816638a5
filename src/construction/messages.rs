//! Input Layer: messages driving the construction session.
//!
//! UI or scripted callers write these; the session systems consume them and
//! mutate the cursor, ghosts and map. Notifications flow back out through
//! [`PlacementConfirmed`] and the terminal log.

use bevy::prelude::*;

use crate::geometry::{CoordsXY, CoordsXYZ, PieceDirection, TileCoords};
use crate::track::{CurveSelection, TrackBank, TrackElement, TrackSlope};

/// Open a construction session for a ride.
#[derive(Message, Debug, Clone, Copy)]
pub struct BeginConstruction {
    pub ride: Entity,
}

/// Close the session, sweeping any ghosts.
#[derive(Message, Debug, Clone, Copy)]
pub struct CloseConstruction;

#[derive(Message, Debug, Clone, Copy)]
pub struct SelectCurve {
    pub curve: CurveSelection,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SelectSlope {
    pub slope: TrackSlope,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SelectBank {
    pub bank: TrackBank,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ToggleLiftHill;

/// Toggle covered or inverted piece variants.
#[derive(Message, Debug, Clone, Copy)]
pub struct ToggleAlternative;

#[derive(Message, Debug, Clone, Copy)]
pub struct SetBrakeSpeed {
    pub speed: u8,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SetSeatRotation {
    pub rotation: u8,
}

/// Rotate the pending first piece a quarter turn.
#[derive(Message, Debug, Clone, Copy)]
pub struct RotatePlacement;

/// Cursor moved over the world while placing; `z` is set when a height
/// latch is engaged.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlaceAt {
    pub world: CoordsXY,
    pub z: Option<i32>,
}

/// Commit the currently previewed piece.
#[derive(Message, Debug, Clone, Copy)]
pub struct ConfirmConstruct;

/// Remove the piece behind the cursor (or the selected piece).
#[derive(Message, Debug, Clone, Copy)]
pub struct DemolishCurrent;

#[derive(Message, Debug, Clone, Copy)]
pub struct SelectNextSection;

#[derive(Message, Debug, Clone, Copy)]
pub struct SelectPreviousSection;

/// Switch the session to entrance or exit placement.
#[derive(Message, Debug, Clone, Copy)]
pub struct BeginEntrancePlacement {
    pub is_exit: bool,
}

/// Choose the tile for the pending entrance or exit.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlaceEntranceAt {
    pub tile: TileCoords,
}

/// Paint or erase one maze quadrant.
#[derive(Message, Debug, Clone, Copy)]
pub struct PaintMazeQuadrant {
    pub tile: TileCoords,
    pub quadrant: u8,
    pub erase: bool,
}

/// The authority accepted the pending remote commit.
#[derive(Message, Debug, Clone, Copy)]
pub struct CommitConfirmed;

/// The authority turned down the pending remote commit.
#[derive(Message, Debug, Clone, Copy)]
pub struct CommitRejected;

/// Notification that a piece was committed to the map.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlacementConfirmed {
    pub ride: Entity,
    pub element: TrackElement,
    pub origin: CoordsXYZ,
    pub direction: PieceDirection,
}
