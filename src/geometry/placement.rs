//! Screen to world placement resolution.
//!
//! Track placement has three input modes. Normally the cursor follows the
//! terrain height under the mouse. Holding the copy-height modifier latches Z
//! to the surface that was under the cursor when the modifier went down, so
//! the player can pan around at a fixed height. Holding the height-adjust
//! modifier freezes X/Y and converts vertical mouse travel into Z steps of 8
//! units. The two latches are mutually exclusive; whichever engages first
//! wins until its modifier is released.

use bevy::prelude::*;

use crate::constants::{COORDS_Z_STEP, LAND_HEIGHT_STEP, MINIMUM_TRACK_Z};
use crate::geometry::CoordsXY;
use crate::map::TrackMap;

/// A position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenCoords {
    pub x: i32,
    pub y: i32,
}

impl ScreenCoords {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Modifier keys relevant to placement, sampled each frame by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementModifiers {
    pub copy_height_held: bool,
    pub shift_adjust_held: bool,
}

/// Viewport collaborator: answers ray queries against the rendered scene.
/// The construction core never touches the camera directly.
pub trait ViewportProbe: Send + Sync {
    /// The surface tile under a screen position and its height, if any.
    fn surface_under_cursor(&self, screen: ScreenCoords) -> Option<(CoordsXY, i32)>;

    /// Intersect the cursor ray with the horizontal plane at `z`.
    fn world_xy_at_z(&self, screen: ScreenCoords, z: i32) -> Option<CoordsXY>;
}

/// Latched modifier state carried between frames while a placement tool is
/// active. Owned by the construction session; reset when the tool changes.
#[derive(Resource, Default)]
pub struct PlacementInput {
    copy_z: Option<i32>,
    shift_anchor: Option<ShiftAnchor>,
    /// The Z the last resolution settled on; `None` means follow terrain.
    pub place_z: Option<i32>,
}

struct ShiftAnchor {
    screen: ScreenCoords,
    z_offset: i32,
}

fn floor_to(value: i32, step: i32) -> i32 {
    value.div_euclid(step) * step
}

impl PlacementInput {
    pub fn reset(&mut self) {
        self.copy_z = None;
        self.shift_anchor = None;
        self.place_z = None;
    }

    pub fn copy_height_active(&self) -> bool {
        self.copy_z.is_some()
    }

    pub fn shift_adjust_active(&self) -> bool {
        self.shift_anchor.is_some()
    }

    /// Resolve a screen position to a tile-aligned placement position.
    ///
    /// Returns the snapped world X/Y and, when a height latch is engaged, the
    /// explicit Z to place at. A `None` Z means the caller should follow the
    /// terrain height of the target tile.
    pub fn resolve(
        &mut self,
        screen: ScreenCoords,
        modifiers: PlacementModifiers,
        probe: &dyn ViewportProbe,
        map: &TrackMap,
    ) -> Option<(CoordsXY, Option<i32>)> {
        self.update_latches(screen, modifiers, probe);

        let mut screen = screen;
        if let Some(anchor) = &self.shift_anchor {
            screen = anchor.screen;
        }

        let (world, z) = if let Some(latched_z) = self.copy_z {
            let world = probe.world_xy_at_z(screen, latched_z)?;
            (world, Some(latched_z.max(MINIMUM_TRACK_Z)))
        } else {
            let (world, _) = probe.surface_under_cursor(screen)?;
            let z = self.shift_anchor.as_ref().map(|anchor| {
                let surface = floor_to(map.surface_z(world.to_tile()), LAND_HEIGHT_STEP);
                (surface + anchor.z_offset).max(MINIMUM_TRACK_Z)
            });
            (world, z)
        };

        self.place_z = z;
        Some((world.to_tile_start(), z))
    }

    fn update_latches(
        &mut self,
        screen: ScreenCoords,
        modifiers: PlacementModifiers,
        probe: &dyn ViewportProbe,
    ) {
        if self.copy_z.is_some() {
            if !modifiers.copy_height_held {
                self.copy_z = None;
            }
        } else if modifiers.copy_height_held && self.shift_anchor.is_none() {
            if let Some((_, surface_z)) = probe.surface_under_cursor(screen) {
                self.copy_z = Some(surface_z);
            }
        }

        match &mut self.shift_anchor {
            Some(anchor) => {
                if modifiers.shift_adjust_held {
                    anchor.z_offset =
                        floor_to(anchor.screen.y - screen.y + COORDS_Z_STEP / 2, COORDS_Z_STEP);
                } else {
                    self.shift_anchor = None;
                }
            }
            None => {
                if modifiers.shift_adjust_held && self.copy_z.is_none() {
                    self.shift_anchor = Some(ShiftAnchor { screen, z_offset: 0 });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Probe over a flat plane with a single raised water tile.
    struct FlatProbe {
        height: i32,
    }

    impl ViewportProbe for FlatProbe {
        fn surface_under_cursor(&self, screen: ScreenCoords) -> Option<(CoordsXY, i32)> {
            Some((CoordsXY::new(screen.x, screen.y), self.height))
        }

        fn world_xy_at_z(&self, screen: ScreenCoords, _z: i32) -> Option<CoordsXY> {
            Some(CoordsXY::new(screen.x, screen.y))
        }
    }

    fn test_map() -> TrackMap {
        TrackMap::flat(16, 16)
    }

    #[test]
    fn normal_mode_follows_terrain() {
        let mut input = PlacementInput::default();
        let probe = FlatProbe { height: 32 };
        let (world, z) = input
            .resolve(ScreenCoords::new(70, 40), PlacementModifiers::default(), &probe, &test_map())
            .unwrap();
        assert_eq!(world, CoordsXY::new(64, 32));
        assert_eq!(z, None);
    }

    #[test]
    fn copy_height_latches_sampled_surface() {
        let mut input = PlacementInput::default();
        let probe = FlatProbe { height: 48 };
        let modifiers = PlacementModifiers { copy_height_held: true, ..Default::default() };

        let (_, z) = input
            .resolve(ScreenCoords::new(10, 10), modifiers, &probe, &test_map())
            .unwrap();
        assert_eq!(z, Some(48));

        // Panning elsewhere keeps the latched height regardless of cursor Y.
        let lower = FlatProbe { height: 16 };
        let (_, z) = input
            .resolve(ScreenCoords::new(300, 500), modifiers, &lower, &test_map())
            .unwrap();
        assert_eq!(z, Some(48));

        // Releasing the modifier drops the latch.
        let (_, z) = input
            .resolve(ScreenCoords::new(300, 500), PlacementModifiers::default(), &lower, &test_map())
            .unwrap();
        assert_eq!(z, None);
    }

    #[test]
    fn shift_adjust_freezes_xy_and_steps_z() {
        let mut input = PlacementInput::default();
        let probe = FlatProbe { height: 16 };
        let modifiers = PlacementModifiers { shift_adjust_held: true, ..Default::default() };

        let (anchor_world, _) = input
            .resolve(ScreenCoords::new(64, 200), modifiers, &probe, &test_map())
            .unwrap();

        // Dragging 24 pixels up raises Z by 24 (rounded to 8-unit steps) while
        // X/Y stay pinned to the anchor tile.
        let (world, z) = input
            .resolve(ScreenCoords::new(500, 176), modifiers, &probe, &test_map())
            .unwrap();
        assert_eq!(world, anchor_world);
        assert_eq!(z, Some(16 + 24));
    }

    #[test]
    fn latches_are_mutually_exclusive() {
        let mut input = PlacementInput::default();
        let probe = FlatProbe { height: 16 };
        let both = PlacementModifiers { copy_height_held: true, shift_adjust_held: true };

        input.resolve(ScreenCoords::new(0, 0), both, &probe, &test_map()).unwrap();
        assert!(input.copy_height_active());
        assert!(!input.shift_adjust_active());
    }

    #[test]
    fn z_is_clamped_to_minimum() {
        let mut input = PlacementInput::default();
        let probe = FlatProbe { height: 0 };
        let modifiers = PlacementModifiers { copy_height_held: true, ..Default::default() };
        let (_, z) = input
            .resolve(ScreenCoords::new(0, 0), modifiers, &probe, &test_map())
            .unwrap();
        assert_eq!(z, Some(MINIMUM_TRACK_Z));
    }
}
