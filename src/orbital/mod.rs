//! Orbital mechanics module
//!
//! This module handles the simulated clock, the circular orbit model and the
//! systems that advance both once per frame.

use bevy::prelude::*;

pub mod position;
pub mod systems;
pub mod time;

pub use position::{BodyId, OrbitError, OrbitParams, OrbitalBody};
pub use systems::{BodyHandle, MotionInput, OrbitTrail, StarDateReport};
pub use time::StarDate;

use crate::solar_system::SolarSystem;

/// Plugin for the star date clock and body propagation
pub struct OrbitalPlugin;

impl Plugin for OrbitalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StarDate>()
            .init_resource::<MotionInput>()
            .init_resource::<StarDateReport>()
            .init_resource::<SolarSystem>()
            .add_systems(Startup, systems::spawn_body_entities)
            .add_systems(
                Update,
                (
                    systems::advance_star_date,
                    systems::propagate_bodies,
                    systems::sync_body_transforms,
                    systems::sync_orbit_trails,
                    systems::report_star_date,
                )
                    .chain(),
            );
    }
}
