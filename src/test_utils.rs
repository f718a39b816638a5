//! Testing utilities for Trackwright
//!
//! Helper functions and fixtures for unit testing construction systems in
//! isolation. ECS makes testing particularly clean since we can easily mock
//! rides and resources.

use bevy::prelude::*;

use crate::construction::{
    ConstructionCursor, GhostState, ParkTreasury, PossibleConfigurations, TrackCommitService,
};
use crate::map::TrackMap;
use crate::track::{Ride, RideType, TrackPieceCatalog};

/// Creates a minimal ECS world with every resource the construction systems
/// read, over a flat map with surface height 16.
pub fn create_test_world() -> World {
    let mut world = World::new();

    world.insert_resource(Time::<()>::default());
    world.insert_resource(TrackMap::flat(32, 32));
    world.insert_resource(TrackPieceCatalog::standard());
    world.insert_resource(ConstructionCursor::default());
    world.insert_resource(GhostState::default());
    world.insert_resource(ParkTreasury::default());
    world.insert_resource(TrackCommitService::default());
    world.insert_resource(PossibleConfigurations::default());

    world
}

/// Spawns a closed ride of the given type and returns its entity.
pub fn create_test_ride(world: &mut World, ride_type: RideType) -> Entity {
    world.spawn(Ride::new(ride_type)).id()
}

/// Registers a message type on a bare world so systems that read or write
/// it can run.
pub fn register_message<M: Message>(world: &mut World) {
    world.init_resource::<Messages<M>>();
}

/// Queues a message for the next system run.
pub fn send_message<M: Message>(world: &mut World, message: M) {
    world.resource_mut::<Messages<M>>().write(message);
}

/// Drains and returns all pending messages of a type, emptying the buffer
/// so later one-shot system runs do not see them again.
pub fn drain_messages<M: Message>(world: &mut World) -> Vec<M> {
    world.resource_mut::<Messages<M>>().drain().collect()
}
