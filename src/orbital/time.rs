//! Simulated calendar for the orbital model

use bevy::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::orbital::position::OrbitError;

/// Simulated seconds added per unit of tilt magnitude
pub const TILT_SECONDS: f64 = 3600.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// J2000 epoch, 2000-01-01T12:00:00Z
pub fn j2000() -> DateTime<Utc> {
    Utc.timestamp_opt(946_728_000, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Simulation clock resource.
///
/// `current` is moved by the date picker, the tilt input or the wall clock.
/// `last_queried` is only moved by [`StarDate::time_difference_update`].
#[derive(Resource, Clone, Debug)]
pub struct StarDate {
    current: DateTime<Utc>,
    last_queried: DateTime<Utc>,
    /// Simulated seconds per wall-clock second
    time_scale: f64,
}

impl Default for StarDate {
    fn default() -> Self {
        Self::new(j2000())
    }
}

impl StarDate {
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            current: epoch,
            last_queried: epoch,
            time_scale: SECONDS_PER_DAY,
        }
    }

    /// Set the wall-clock rate. It must be finite and non-negative; 0 pauses.
    pub fn with_time_scale(mut self, time_scale: f64) -> Result<Self, OrbitError> {
        if !(time_scale.is_finite() && time_scale >= 0.0) {
            return Err(OrbitError::InvalidTimeScale(time_scale));
        }
        self.time_scale = time_scale;
        Ok(self)
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn current(&self) -> DateTime<Utc> {
        self.current
    }

    /// Set the clock from an absolute date. Past dates are accepted.
    pub fn update_time_with_date(&mut self, date: DateTime<Utc>) {
        self.current = date;
    }

    /// Advance the clock by `|tilt| * TILT_SECONDS`.
    pub fn update_time_with_tilt(&mut self, tilt: f32) {
        if !tilt.is_finite() {
            warn!("Ignoring non-finite tilt magnitude: {}", tilt);
            return;
        }
        self.advance_seconds(f64::from(tilt).abs() * TILT_SECONDS);
    }

    /// Advance the clock by a wall-clock frame delta scaled by `time_scale`.
    pub fn advance_by_wall_clock(&mut self, dt_secs: f64) {
        let scaled = dt_secs * self.time_scale;
        if !scaled.is_finite() {
            warn!("Ignoring non-finite clock step: {} * {}", dt_secs, self.time_scale);
            return;
        }
        self.advance_seconds(scaled.max(0.0));
    }

    /// Simulated days since the previous call, never negative.
    ///
    /// The reference point always moves to the current time, so a backward
    /// date jump yields 0 once and later deltas count from the new date.
    pub fn time_difference_update(&mut self) -> f64 {
        let diff = self.current.signed_duration_since(self.last_queried);
        self.last_queried = self.current;
        duration_to_days(diff).max(0.0)
    }

    pub fn display_time(&self) -> String {
        self.current.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    fn advance_seconds(&mut self, seconds: f64) {
        let Some(step) = seconds_to_duration(seconds) else {
            warn!("Clock step of {} s is out of range", seconds);
            return;
        };
        match self.current.checked_add_signed(step) {
            Some(next) => self.current = next,
            None => warn!("Simulated date overflow at {}", self.current),
        }
    }
}

/// Split a float second count into a chrono duration.
fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    let whole = seconds.trunc();
    if whole.abs() >= i64::MAX as f64 / 1000.0 {
        return None;
    }
    let nanos = ((seconds - whole) * 1_000_000_000.0) as i64;
    Duration::try_seconds(whole as i64)?.checked_add(&Duration::nanoseconds(nanos))
}

fn duration_to_days(d: Duration) -> f64 {
    (d.num_seconds() as f64 + f64::from(d.subsec_nanos()) * 1e-9) / SECONDS_PER_DAY
}
