//! Trackwright - a ride track construction core
//!
//! This library exposes the construction state machine, the piece catalog
//! and the map collision model for testing and reuse. Everything runs
//! headless; rendering and input sit on top of the message layer.

use bevy::prelude::*;

use crate::construction::ConstructionPlugin;
use crate::logging::LoggingPlugin;
use crate::map::TrackMap;
use crate::track::TrackPieceCatalog;

pub mod constants;
pub mod construction;
pub mod geometry;
pub mod logging;
pub mod map;
pub mod track;

/// Plugin group for the construction logic (headless-compatible).
/// Use this for tests and tools that don't need rendering or input.
pub struct LogicPlugins;

impl PluginGroup for LogicPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(LoggingPlugin)
            .add(ConstructionPlugin)
    }
}

/// A ready-to-run headless app over a flat map of the default size.
pub fn app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins)
        .add_plugins(bevy::log::LogPlugin::default())
        .insert_resource(TrackMap::flat(
            constants::DEFAULT_MAP_SIZE,
            constants::DEFAULT_MAP_SIZE,
        ))
        .insert_resource(TrackPieceCatalog::standard())
        .add_plugins(LogicPlugins);

    app
}

#[cfg(test)]
pub mod test_utils;
