//! The construction session cursor.
//!
//! All session state lives in one owned resource so resolver and placement
//! calls take it explicitly. Nothing in the core reads session state from
//! anywhere else.

use bevy::prelude::*;

use crate::geometry::{CoordsXYZ, Direction, PieceDirection};
use crate::track::{CurveSelection, TrackBank, TrackElement, TrackSlope};

/// Which end of the track the session is working on, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConstructionState {
    /// No session open.
    #[default]
    Idle,
    /// Waiting for the first piece position.
    Placing,
    /// Appending at the forward open end.
    Front,
    /// Prepending at the backward open end.
    Back,
    /// An existing piece is selected for inspection or demolition.
    Selected,
    /// Placing a station entrance or exit; returns to `previous` after.
    EntranceExit {
        previous: Box<ConstructionState>,
        is_exit: bool,
    },
    /// Painting maze quadrants.
    MazeBuild,
}

/// A piece already on the map that the cursor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedPiece {
    pub element: TrackElement,
    pub origin: CoordsXYZ,
    pub direction: PieceDirection,
}

#[derive(Resource, Debug, Clone)]
pub struct ConstructionCursor {
    pub ride: Option<Entity>,
    pub state: ConstructionState,
    /// Attachment point for the next piece: world position of its entry
    /// tile (or exit tile when building backward) and connection height.
    pub position: CoordsXYZ,
    pub direction: PieceDirection,
    /// Current selections on the open end.
    pub curve: CurveSelection,
    pub slope: TrackSlope,
    pub bank: TrackBank,
    /// Slope and bank of the track the new piece must connect to.
    pub previous_slope: TrackSlope,
    pub previous_bank: TrackBank,
    pub lift_hill: bool,
    /// Alternative piece style selected (covered or inverted variants).
    pub alternative: bool,
    pub brake_speed: u8,
    pub seat_rotation: u8,
    pub selected: Option<SelectedPiece>,
    /// Marker arrow blink state, toggled on a fixed tick interval.
    pub arrow_visible: bool,
    pub arrow_timer: i32,
    /// Set when external map mutation may have invalidated the cursor; the
    /// next action re-validates before acting.
    pub needs_revalidation: bool,
}

impl Default for ConstructionCursor {
    fn default() -> Self {
        Self {
            ride: None,
            state: ConstructionState::Idle,
            position: CoordsXYZ::new(0, 0, 0),
            direction: PieceDirection::new(Direction::new(0)),
            curve: CurveSelection::default(),
            slope: TrackSlope::None,
            bank: TrackBank::None,
            previous_slope: TrackSlope::None,
            previous_bank: TrackBank::None,
            lift_hill: false,
            alternative: false,
            brake_speed: 8,
            seat_rotation: 4,
            selected: None,
            arrow_visible: true,
            arrow_timer: 0,
            needs_revalidation: false,
        }
    }
}

impl ConstructionCursor {
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ConstructionState::Idle)
    }

    pub fn building_back(&self) -> bool {
        matches!(self.state, ConstructionState::Back)
    }

    /// Reset selections to the defaults for a fresh open end.
    pub fn reset_selections(&mut self) {
        self.curve = CurveSelection::default();
        self.slope = TrackSlope::None;
        self.bank = TrackBank::None;
        self.lift_hill = false;
    }

    /// Close the session, clearing everything but the configured defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
