//! Circular orbit and spin model for a single body

use bevy::math::DVec3;
use std::f64::consts::TAU;
use std::fmt;

/// Smallest accepted magnitude for an orbital or spin period (days)
pub const MIN_PERIOD: f64 = 1e-6;

/// Hit radius in world units per unit of relative size
pub const HIT_TOLERANCE: f64 = 1.0;

/// Look-ahead used by the `next_*` queries (simulated days)
pub const LOOK_AHEAD: f64 = 1.0;

/// Index of a body inside its owning [`crate::solar_system::SolarSystem`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub enum OrbitError {
    InvalidOrbitalPeriod(f64),
    InvalidSpinPeriod(f64),
    InvalidOrbitRadius(f64),
    InvalidPhaseOffset(f64),
    InvalidRelativeSize(f64),
    InvalidTiltSpeed(f64),
    InvalidTimeScale(f64),
    UnknownParent(String),
    DuplicateName(String),
}

impl fmt::Display for OrbitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrbitalPeriod(p) => write!(f, "Invalid orbital period: {:?}", p),
            Self::InvalidSpinPeriod(p) => write!(f, "Invalid spin period: {:?}", p),
            Self::InvalidOrbitRadius(r) => write!(f, "Invalid orbit radius: {:?}", r),
            Self::InvalidPhaseOffset(p) => {
                write!(f, "Invalid phase offset: {:?} (expected 0 <= phase < 1)", p)
            }
            Self::InvalidRelativeSize(s) => write!(f, "Invalid relative size: {:?}", s),
            Self::InvalidTiltSpeed(s) => write!(f, "Invalid tilt speed: {:?}", s),
            Self::InvalidTimeScale(s) => write!(f, "Invalid time scale: {:?}", s),
            Self::UnknownParent(name) => write!(f, "Unknown parent body: {}", name),
            Self::DuplicateName(name) => write!(f, "Duplicate body name: {}", name),
        }
    }
}

impl std::error::Error for OrbitError {}

/// Fixed orbital parameters of a body
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitParams {
    pub parent: Option<BodyId>,
    /// Simulated days per revolution around the parent
    pub orbital_period: f64,
    pub orbit_radius: f64,
    /// Simulated days per rotation; negative spins retrograde
    pub spin_period: f64,
    /// Fraction of the orbit completed at the epoch
    pub phase_offset: f64,
    pub relative_size: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            parent: None,
            orbital_period: 1.0,
            orbit_radius: 0.0,
            spin_period: 1.0,
            phase_offset: 0.0,
            relative_size: 1.0,
        }
    }
}

/// A body on a circular orbit in the XZ plane.
///
/// All angles are closed-form functions of `elapsed`; nothing is integrated.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    params: OrbitParams,
    tilt_speed: f64,
    elapsed: f64,
}

/// Fractional part in [0, 1); `rem_euclid` can round up to 1.0 for tiny negatives.
fn fraction(turns: f64) -> f64 {
    let f = turns.rem_euclid(1.0);
    if f >= 1.0 { 0.0 } else { f }
}

fn valid_period(p: f64) -> bool {
    p.is_finite() && p.abs() >= MIN_PERIOD
}

impl OrbitalBody {
    pub fn new(params: OrbitParams) -> Result<Self, OrbitError> {
        if !valid_period(params.orbital_period) {
            return Err(OrbitError::InvalidOrbitalPeriod(params.orbital_period));
        }
        if !valid_period(params.spin_period) {
            return Err(OrbitError::InvalidSpinPeriod(params.spin_period));
        }
        if !(params.orbit_radius.is_finite() && params.orbit_radius >= 0.0) {
            return Err(OrbitError::InvalidOrbitRadius(params.orbit_radius));
        }
        if !(0.0..1.0).contains(&params.phase_offset) {
            return Err(OrbitError::InvalidPhaseOffset(params.phase_offset));
        }
        if !(params.relative_size.is_finite() && params.relative_size > 0.0) {
            return Err(OrbitError::InvalidRelativeSize(params.relative_size));
        }
        Ok(Self {
            params,
            tilt_speed: 1.0,
            elapsed: 0.0,
        })
    }

    /// Same body evaluated at an absolute elapsed time. Non-finite values are ignored.
    pub fn with_elapsed(mut self, elapsed: f64) -> Self {
        if elapsed.is_finite() {
            self.elapsed = elapsed.max(0.0);
        }
        self
    }

    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.params.parent
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tilt_speed(&self) -> f64 {
        self.tilt_speed
    }

    pub fn relative_size(&self) -> f64 {
        self.params.relative_size
    }

    pub fn update_tilt_speed(&mut self, speed: f64) -> Result<(), OrbitError> {
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(OrbitError::InvalidTiltSpeed(speed));
        }
        self.tilt_speed = speed;
        Ok(())
    }

    /// Consume `delta` simulated days scaled by the tilt speed.
    pub fn add_time_difference(&mut self, delta: f64) {
        let step = delta * self.tilt_speed;
        // keeps `elapsed` monotonic
        if step.is_finite() && step > 0.0 {
            self.elapsed += step;
        }
    }

    /// Orbit angle in radians, reduced to [0, 2π)
    pub fn orbit_angle_at(&self, elapsed: f64) -> f64 {
        fraction(elapsed / self.params.orbital_period + self.params.phase_offset) * TAU
    }

    /// Offset from the parent at the given elapsed time
    pub fn local_offset_at(&self, elapsed: f64, scale: f64) -> DVec3 {
        let theta = self.orbit_angle_at(elapsed);
        let r = self.params.orbit_radius * scale;
        DVec3::new(r * theta.cos(), 0.0, r * theta.sin())
    }

    /// World location, or `None` when the parent chain in `bodies` is broken
    pub fn current_location(&self, bodies: &[OrbitalBody]) -> Option<DVec3> {
        self.chain_location(bodies, 0.0, 1.0)
    }

    pub fn next_location(&self, bodies: &[OrbitalBody]) -> Option<DVec3> {
        self.next_location_with_scale(bodies, 1.0)
    }

    /// Look-ahead location with every radius in the parent chain scaled
    pub fn next_location_with_scale(&self, bodies: &[OrbitalBody], scale: f64) -> Option<DVec3> {
        self.chain_location(bodies, LOOK_AHEAD, scale)
    }

    /// Spin angle in degrees, in [0, 360)
    pub fn next_rotation(&self) -> f64 {
        fraction(self.elapsed / self.params.spin_period) * 360.0
    }

    /// Top-down hit test: screen (x, y) maps to world (x, z).
    pub fn is_nearby(&self, bodies: &[OrbitalBody], x: f64, y: f64) -> bool {
        self.hit_distance(bodies, x, y).is_some()
    }

    pub(crate) fn hit_distance(&self, bodies: &[OrbitalBody], x: f64, y: f64) -> Option<f64> {
        let here = self.current_location(bodies)?;
        let distance = (here.x - x).hypot(here.z - y);
        (distance <= HIT_TOLERANCE * self.params.relative_size).then_some(distance)
    }

    /// Points of the local orbit circle, centred on the parent
    pub fn orbit_outline(&self, sections: usize) -> Vec<DVec3> {
        let r = self.params.orbit_radius;
        (0..sections)
            .map(|i| {
                let theta = TAU * i as f64 / sections as f64;
                DVec3::new(r * theta.cos(), 0.0, r * theta.sin())
            })
            .collect()
    }

    /// Sum of the local offsets up the parent chain.
    ///
    /// Returns `None` for a parent index outside `bodies` or a chain that
    /// does not reach a root within `bodies.len()` steps (a cycle).
    fn chain_location(&self, bodies: &[OrbitalBody], look_ahead: f64, scale: f64) -> Option<DVec3> {
        let mut location = self.local_offset_at(self.elapsed + look_ahead, scale);
        let mut parent = self.params.parent;
        for _ in 0..=bodies.len() {
            let Some(BodyId(i)) = parent else {
                return Some(location);
            };
            let body = bodies.get(i)?;
            location += body.local_offset_at(body.elapsed + look_ahead, scale);
            parent = body.params.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn body(orbital_period: f64, orbit_radius: f64, spin_period: f64) -> OrbitalBody {
        OrbitalBody::new(OrbitParams {
            orbital_period,
            orbit_radius,
            spin_period,
            ..OrbitParams::default()
        })
        .unwrap()
    }

    fn assert_close(a: DVec3, b: DVec3, tol: f64) {
        assert!((a - b).length() < tol, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_quarter_orbit_location() {
        let b = body(360.0, 10.0, 1.0).with_elapsed(90.0);
        assert_close(b.current_location(&[]).unwrap(), DVec3::new(0.0, 0.0, 10.0), 1e-9);
    }

    #[test]
    fn test_phase_offset_shifts_start() {
        let b = OrbitalBody::new(OrbitParams {
            orbital_period: 100.0,
            orbit_radius: 2.0,
            phase_offset: 0.5,
            ..OrbitParams::default()
        })
        .unwrap();
        assert_close(b.current_location(&[]).unwrap(), DVec3::new(-2.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    fn test_rotation_is_periodic() {
        let period = 24.5;
        for t in [0.0, 1.0, 7.3, 100.25, 9_999.0] {
            let a = body(365.0, 1.0, period).with_elapsed(t).next_rotation();
            let b = body(365.0, 1.0, period).with_elapsed(t + period).next_rotation();
            let diff = (a - b).abs();
            assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "{} vs {}", a, b);
            assert!((0.0..360.0).contains(&a));
        }
    }

    #[test]
    fn test_retrograde_rotation_stays_in_range() {
        let b = body(225.0, 5.0, -243.0).with_elapsed(60.75);
        let angle = b.next_rotation();
        assert!((angle - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_chained_hierarchy_is_rigid() {
        let sun = body(1.0, 0.0, 25.0);
        let earth = body(365.0, 8.0, 1.0).with_elapsed(40.0);
        let moon = OrbitalBody::new(OrbitParams {
            parent: Some(BodyId(1)),
            orbital_period: 27.3,
            orbit_radius: 1.2,
            ..OrbitParams::default()
        })
        .unwrap()
        .with_elapsed(40.0);
        let bodies = vec![sun, earth, moon];

        let earth_at = bodies[1].current_location(&bodies).unwrap();
        let moon_at = bodies[2].current_location(&bodies).unwrap();
        assert_close(moon_at, earth_at + bodies[2].local_offset_at(40.0, 1.0), 1e-12);
        assert!(((moon_at - earth_at).length() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_next_location_looks_one_day_ahead() {
        let b = body(360.0, 10.0, 1.0).with_elapsed(89.0);
        assert_close(b.next_location(&[]).unwrap(), DVec3::new(0.0, 0.0, 10.0), 1e-9);
    }

    #[test]
    fn test_unit_scale_matches_next_location() {
        let earth = body(365.0, 8.0, 1.0).with_elapsed(12.0);
        let moon = OrbitalBody::new(OrbitParams {
            parent: Some(BodyId(0)),
            orbital_period: 27.3,
            orbit_radius: 1.2,
            ..OrbitParams::default()
        })
        .unwrap()
        .with_elapsed(3.0);
        let bodies = vec![earth, moon];
        for b in &bodies {
            assert_eq!(b.next_location_with_scale(&bodies, 1.0), b.next_location(&bodies));
        }
        let doubled = bodies[1].next_location_with_scale(&bodies, 2.0).unwrap();
        assert_close(doubled, bodies[1].next_location(&bodies).unwrap() * 2.0, 1e-9);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut b = body(365.0, 8.0, 1.0).with_elapsed(17.0);
        let before = b.current_location(&[]).unwrap();
        for _ in 0..1000 {
            b.add_time_difference(0.0);
        }
        assert_eq!(b.current_location(&[]).unwrap(), before);
        assert_eq!(b.elapsed(), 17.0);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut b = body(365.0, 8.0, 1.0);
        b.add_time_difference(5.0);
        b.add_time_difference(-3.0);
        b.add_time_difference(f64::NAN);
        assert_eq!(b.elapsed(), 5.0);
    }

    #[test]
    fn test_tilt_speed_scales_delta() {
        let mut b = body(365.0, 8.0, 1.0);
        b.update_tilt_speed(2.5).unwrap();
        b.add_time_difference(2.0);
        assert!((b.elapsed() - 5.0).abs() < EPSILON);
        assert!(b.update_tilt_speed(-1.0).is_err());
        assert!(b.update_tilt_speed(f64::INFINITY).is_err());
        assert_eq!(b.tilt_speed(), 2.5);
    }

    #[test]
    fn test_long_running_accumulation_matches_closed_form() {
        let step = 1.0 / 60.0;
        let steps = 1_000_000;
        let mut stepped = body(365.25, 10.0, 24.0);
        for _ in 0..steps {
            stepped.add_time_difference(step);
        }
        let mut single = body(365.25, 10.0, 24.0);
        single.add_time_difference(step * steps as f64);

        assert!((stepped.elapsed() - single.elapsed()).abs() < 1e-5);
        let angle_diff = (stepped.next_rotation() - single.next_rotation()).abs();
        assert!(angle_diff < 1e-3 || (360.0 - angle_diff) < 1e-3);
        let stepped_at = stepped.current_location(&[]).unwrap();
        let single_at = single.current_location(&[]).unwrap();
        assert_close(stepped_at, single_at, 1e-6);
    }

    #[test]
    fn test_is_nearby() {
        let b = body(360.0, 10.0, 1.0).with_elapsed(90.0);
        let here = b.current_location(&[]).unwrap();
        assert!(b.is_nearby(&[], here.x, here.z));
        assert!(b.is_nearby(&[], here.x + 0.5, here.z - 0.5));
        assert!(!b.is_nearby(&[], here.x + 50.0, here.z));
        assert!(!b.is_nearby(&[], -10.0, 0.0));
    }

    #[test]
    fn test_hit_tolerance_scales_with_size() {
        let small = body(360.0, 10.0, 1.0);
        let large = OrbitalBody::new(OrbitParams {
            orbital_period: 360.0,
            orbit_radius: 10.0,
            relative_size: 4.0,
            ..OrbitParams::default()
        })
        .unwrap();
        assert!(!small.is_nearby(&[], 13.0, 0.0));
        assert!(large.is_nearby(&[], 13.0, 0.0));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let bad = |params: OrbitParams| OrbitalBody::new(params).unwrap_err();
        assert_eq!(
            bad(OrbitParams {
                orbital_period: 0.0,
                ..OrbitParams::default()
            }),
            OrbitError::InvalidOrbitalPeriod(0.0)
        );
        assert_eq!(
            bad(OrbitParams {
                spin_period: 1e-9,
                ..OrbitParams::default()
            }),
            OrbitError::InvalidSpinPeriod(1e-9)
        );
        assert_eq!(
            bad(OrbitParams {
                orbit_radius: -1.0,
                ..OrbitParams::default()
            }),
            OrbitError::InvalidOrbitRadius(-1.0)
        );
        assert_eq!(
            bad(OrbitParams {
                phase_offset: 1.0,
                ..OrbitParams::default()
            }),
            OrbitError::InvalidPhaseOffset(1.0)
        );
        assert_eq!(
            bad(OrbitParams {
                relative_size: 0.0,
                ..OrbitParams::default()
            }),
            OrbitError::InvalidRelativeSize(0.0)
        );
        assert!(matches!(
            bad(OrbitParams {
                orbital_period: f64::NAN,
                ..OrbitParams::default()
            }),
            OrbitError::InvalidOrbitalPeriod(_)
        ));
    }

    #[test]
    fn test_orbit_outline() {
        let b = body(100.0, 3.0, 1.0);
        let points = b.orbit_outline(64);
        assert_eq!(points.len(), 64);
        for p in &points {
            assert!((p.length() - 3.0).abs() < 1e-12);
            assert_eq!(p.y, 0.0);
        }
        assert!(b.orbit_outline(0).is_empty());
    }

    #[test]
    fn test_dangling_parent_has_no_location() {
        let b = OrbitalBody::new(OrbitParams {
            parent: Some(BodyId(7)),
            orbit_radius: 1.0,
            ..OrbitParams::default()
        })
        .unwrap();
        assert_eq!(b.current_location(&[]), None);
        assert_eq!(b.next_location_with_scale(&[], 2.0), None);
        assert!(!b.is_nearby(&[], 1.0, 0.0));
    }

    #[test]
    fn test_parent_cycle_has_no_location() {
        let looped = |parent| {
            OrbitalBody::new(OrbitParams {
                parent: Some(BodyId(parent)),
                orbit_radius: 1.0,
                ..OrbitParams::default()
            })
            .unwrap()
        };
        let single = vec![looped(0)];
        assert_eq!(single[0].current_location(&single), None);
        assert_eq!(single[0].next_location(&single), None);

        let pair = vec![looped(1), looped(0)];
        for b in &pair {
            assert_eq!(b.current_location(&pair), None);
            assert!(!b.is_nearby(&pair, 0.0, 0.0));
        }
    }

    #[test]
    fn test_with_elapsed_ignores_non_finite() {
        let b = body(360.0, 10.0, 1.0).with_elapsed(90.0);
        for bad in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let same = b.clone().with_elapsed(bad);
            assert_eq!(same.elapsed(), 90.0);
            assert!(same.next_rotation().is_finite());
        }
        assert_eq!(body(360.0, 10.0, 1.0).with_elapsed(-5.0).elapsed(), 0.0);
    }
}
