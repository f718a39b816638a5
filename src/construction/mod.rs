//! The track construction core.
//!
//! Split in three layers: messages in, session logic in the middle, map and
//! treasury mutation at the bottom. [`ConstructionPlugin`] wires the whole
//! stack; everything runs headless.

pub mod commit;
pub mod cursor;
pub mod entrance;
pub mod ghost;
pub mod maze;
pub mod messages;
pub mod possible;
pub mod resolver;
pub mod session;

use bevy::prelude::*;

pub use commit::{
    CommitMode, ParkTreasury, PlaceRequest, PlacementError, TrackCommitService,
};
pub use cursor::{ConstructionCursor, ConstructionState, SelectedPiece};
pub use ghost::{GhostEntrance, GhostPiece, GhostState, ZSearchPolicy};
pub use messages::*;
pub use possible::{ControlId, PossibleConfigurations, compute_disabled_controls};
pub use resolver::{ResolveError, ResolvedPlacement, resolve};

/// Everything the construction session runs in `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructionSet;

pub struct ConstructionPlugin;

impl Plugin for ConstructionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ConstructionCursor::default())
            .insert_resource(crate::geometry::PlacementInput::default())
            .insert_resource(GhostState::default())
            .insert_resource(ParkTreasury::default())
            .insert_resource(TrackCommitService::default())
            .insert_resource(PossibleConfigurations::default());

        app.add_message::<BeginConstruction>()
            .add_message::<CloseConstruction>()
            .add_message::<SelectCurve>()
            .add_message::<SelectSlope>()
            .add_message::<SelectBank>()
            .add_message::<ToggleLiftHill>()
            .add_message::<ToggleAlternative>()
            .add_message::<SetBrakeSpeed>()
            .add_message::<SetSeatRotation>()
            .add_message::<RotatePlacement>()
            .add_message::<PlaceAt>()
            .add_message::<ConfirmConstruct>()
            .add_message::<DemolishCurrent>()
            .add_message::<SelectNextSection>()
            .add_message::<SelectPreviousSection>()
            .add_message::<BeginEntrancePlacement>()
            .add_message::<PlaceEntranceAt>()
            .add_message::<PaintMazeQuadrant>()
            .add_message::<CommitConfirmed>()
            .add_message::<CommitRejected>()
            .add_message::<PlacementConfirmed>();

        // Handlers run in a fixed order so a single frame can open a
        // session, move the cursor and still see a fresh preview.
        app.add_systems(
            Update,
            (
                session::handle_session_lifecycle,
                session::handle_selection_messages,
                session::handle_place_at,
                entrance::handle_begin_entrance,
                entrance::handle_entrance_hover,
                entrance::handle_place_entrance,
                maze::handle_maze_confirm,
                maze::handle_paint_maze,
                session::handle_confirm_construct,
                session::handle_commit_resolution,
                session::handle_demolish,
                session::handle_section_navigation,
                session::refresh_ghost_preview,
                session::update_possible_configurations,
                session::tick_construction,
            )
                .chain()
                .in_set(ConstructionSet),
        );
    }
}
