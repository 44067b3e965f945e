//! Per-frame systems driving the clock and the bodies

use bevy::prelude::*;

use crate::orbital::position::BodyId;
use crate::orbital::time::StarDate;
use crate::solar_system::SolarSystem;

/// Latest device tilt magnitude; 0 means the wall clock drives the simulation
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct MotionInput {
    pub tilt: f32,
}

/// Points per orbit trail
pub const ORBIT_TRAIL_SECTIONS: usize = 64;

/// Links an entity to its body in the [`SolarSystem`] registry
#[derive(Component, Copy, Clone, Debug)]
pub struct BodyHandle(pub BodyId);

/// Orbit circle of a body. `points` are relative to `centre`, which tracks
/// the parent's location.
#[derive(Component, Clone, Debug, Default)]
pub struct OrbitTrail {
    pub centre: Vec3,
    pub points: Vec<Vec3>,
}

/// Interval between star date log lines
#[derive(Resource)]
pub struct StarDateReport {
    pub timer: Timer,
}

impl Default for StarDateReport {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(5.0, TimerMode::Repeating),
        }
    }
}

/// Spawn one entity per registered body
pub fn spawn_body_entities(mut commands: Commands, system: Res<SolarSystem>) {
    for (id, body) in system.iter() {
        let Some(location) = system.current_location(id) else {
            warn!("Body {:?} has a broken parent chain, not spawned", id);
            continue;
        };
        let name = system.name(id).unwrap_or("body").to_string();
        let mut entity = commands.spawn((
            BodyHandle(id),
            Name::new(name),
            Transform::from_translation(location.as_vec3())
                .with_scale(Vec3::splat(body.relative_size() as f32)),
        ));
        if body.params().orbit_radius > 0.0 {
            entity.insert(OrbitTrail {
                centre: parent_location(&system, id),
                points: body
                    .orbit_outline(ORBIT_TRAIL_SECTIONS)
                    .into_iter()
                    .map(|p| p.as_vec3())
                    .collect(),
            });
        }
    }
    info!("Spawned {} orbital bodies", system.len());
}

/// Advance the star date from the tilt input, or from the frame time when idle
pub fn advance_star_date(
    time: Res<Time>,
    motion: Res<MotionInput>,
    mut star_date: ResMut<StarDate>,
) {
    if motion.tilt != 0.0 {
        star_date.update_time_with_tilt(motion.tilt);
    } else {
        star_date.advance_by_wall_clock(time.delta_secs_f64());
    }
}

/// Feed the simulated time elapsed since last frame into every body
pub fn propagate_bodies(mut star_date: ResMut<StarDate>, mut system: ResMut<SolarSystem>) {
    let delta = star_date.time_difference_update();
    if delta > 0.0 {
        system.add_time_difference(delta);
    }
}

/// Write body location, spin and size into the entity transforms
pub fn sync_body_transforms(
    system: Res<SolarSystem>,
    mut q: Query<(&BodyHandle, &mut Transform)>,
) {
    for (handle, mut transform) in &mut q {
        let Some(body) = system.get(handle.0) else {
            continue;
        };
        let Some(location) = system.current_location(handle.0) else {
            continue;
        };
        transform.translation = location.as_vec3();
        transform.rotation = Quat::from_rotation_y(body.next_rotation().to_radians() as f32);
        transform.scale = Vec3::splat(body.relative_size() as f32);
    }
}

/// Keep each orbit trail centred on the parent body
pub fn sync_orbit_trails(system: Res<SolarSystem>, mut q: Query<(&BodyHandle, &mut OrbitTrail)>) {
    for (handle, mut trail) in &mut q {
        trail.centre = parent_location(&system, handle.0);
    }
}

fn parent_location(system: &SolarSystem, id: BodyId) -> Vec3 {
    system
        .get(id)
        .and_then(|b| b.parent())
        .and_then(|parent| system.current_location(parent))
        .map_or(Vec3::ZERO, |p| p.as_vec3())
}

pub fn report_star_date(
    time: Res<Time>,
    star_date: Res<StarDate>,
    mut report: ResMut<StarDateReport>,
) {
    if report.timer.tick(time.delta()).just_finished() {
        info!("Star date: {}", star_date.display_time());
    }
}
