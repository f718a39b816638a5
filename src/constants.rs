//! Game constants and configuration values
//!
//! This module centralizes the magic numbers used by the construction core.

// ============================================================================
// WORLD GEOMETRY
// ============================================================================

/// Width of one map tile in world units.
pub const COORDS_XY_STEP: i32 = 32;

/// Smallest vertical step a track piece can be nudged by.
pub const COORDS_Z_STEP: i32 = 8;

/// Vertical size of one land height step.
pub const LAND_HEIGHT_STEP: i32 = 16;

/// Lowest Z at which track may be placed.
pub const MINIMUM_TRACK_Z: i32 = 16;

/// Default map edge length in tiles for new worlds.
pub const DEFAULT_MAP_SIZE: i32 = 128;

// ============================================================================
// CONSTRUCTION
// ============================================================================

/// Ticks between arrow visibility toggles on the construction marker.
pub const ARROW_PULSE_INTERVAL: i32 = 5;

/// Money amounts are fixed-point, ten units to the displayed currency unit.
pub type Money = i64;

/// Starting treasury balance for a fresh park.
pub const STARTING_TREASURY: Money = 100_000;
