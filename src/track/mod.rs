//! Track piece catalog and the vocabulary of ride construction.
//!
//! Submodules:
//! - `curve`: slope, bank and curve enums used by the selection UI state
//! - `element`: the concrete track element identifiers
//! - `groups`: capability groups and per-ride-type masks
//! - `descriptors`: the ordered selection-to-element resolution table
//! - `catalog`: per-element geometry, pricing and footprint data
//! - `ride`: ride entities and ride-type descriptors

pub mod catalog;
pub mod curve;
pub mod descriptors;
pub mod element;
pub mod groups;
pub mod ride;

pub use catalog::{CatalogError, PieceCoordinates, TrackBlock, TrackPieceCatalog, TrackPieceDefinition};
pub use curve::{CurveSelection, TrackBank, TrackCurve, TrackSlope};
pub use descriptors::{TrackDescriptor, descriptor_for, find_element};
pub use element::TrackElement;
pub use groups::{TrackGroup, TrackGroupSet};
pub use ride::{Ride, RideStatus, RideType, RideTypeDescriptor, Station};
