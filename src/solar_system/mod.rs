//! Solar system registry
//!
//! Owns every [`OrbitalBody`] and resolves parent links by [`BodyId`].
//! Bodies are stored parent-first, so a parent always has a smaller id than
//! its satellites and the hierarchy cannot contain cycles.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::orbital::position::{BodyId, OrbitError, OrbitParams, OrbitalBody};

pub mod config;

pub use config::{BodyConfig, SimulationConfig};

#[derive(Resource, Debug, Clone, Default)]
pub struct SolarSystem {
    names: Vec<String>,
    bodies: Vec<OrbitalBody>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from a config, resolving parents by name.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, OrbitError> {
        let mut system = Self::new();
        for entry in &config.bodies {
            let parent = match &entry.parent {
                Some(name) => Some(
                    system
                        .id_by_name(name)
                        .ok_or_else(|| OrbitError::UnknownParent(name.clone()))?,
                ),
                None => None,
            };
            let mut body = OrbitalBody::new(OrbitParams {
                parent,
                orbital_period: entry.orbital_period,
                orbit_radius: entry.orbit_radius,
                spin_period: entry.spin_period,
                phase_offset: entry.phase_offset,
                relative_size: entry.relative_size,
            })?;
            body.update_tilt_speed(entry.tilt_speed)?;
            system.insert(&entry.name, body)?;
        }
        Ok(system)
    }

    /// Add a body. Its parent, if any, must already be registered.
    pub fn insert(&mut self, name: &str, body: OrbitalBody) -> Result<BodyId, OrbitError> {
        if self.id_by_name(name).is_some() {
            return Err(OrbitError::DuplicateName(name.to_string()));
        }
        if let Some(BodyId(parent)) = body.parent()
            && parent >= self.bodies.len()
        {
            return Err(OrbitError::UnknownParent(format!("#{}", parent)));
        }
        self.names.push(name.to_string());
        self.bodies.push(body);
        Ok(BodyId(self.bodies.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&OrbitalBody> {
        self.bodies.get(id.0)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut OrbitalBody> {
        self.bodies.get_mut(id.0)
    }

    pub fn name(&self, id: BodyId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BodyId> {
        self.names.iter().position(|n| n == name).map(BodyId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &OrbitalBody)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    pub fn bodies(&self) -> &[OrbitalBody] {
        &self.bodies
    }

    pub fn current_location(&self, id: BodyId) -> Option<DVec3> {
        self.get(id)?.current_location(&self.bodies)
    }

    pub fn next_location(&self, id: BodyId) -> Option<DVec3> {
        self.get(id)?.next_location(&self.bodies)
    }

    pub fn next_location_with_scale(&self, id: BodyId, scale: f64) -> Option<DVec3> {
        self.get(id)?.next_location_with_scale(&self.bodies, scale)
    }

    /// Top-down hit test of one body; unknown ids never hit.
    pub fn is_nearby(&self, id: BodyId, x: f64, y: f64) -> bool {
        self.get(id).is_some_and(|b| b.is_nearby(&self.bodies, x, y))
    }

    /// Feed one frame's simulated time into every body.
    pub fn add_time_difference(&mut self, delta: f64) {
        for body in &mut self.bodies {
            body.add_time_difference(delta);
        }
    }

    /// Set the tilt speed of every body.
    pub fn update_tilt_speed(&mut self, speed: f64) -> Result<(), OrbitError> {
        for body in &mut self.bodies {
            body.update_tilt_speed(speed)?;
        }
        Ok(())
    }

    /// Body under a top-down tap, closest centre first.
    pub fn body_at(&self, x: f64, y: f64) -> Option<BodyId> {
        self.iter()
            .filter_map(|(id, b)| b.hit_distance(&self.bodies, x, y).map(|d| (id, d)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }
}
