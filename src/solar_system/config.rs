//! Simulation configuration
//!
//! The body list is read from `system.json` in the platform config directory:
//! - macOS: ~/Library/Application Support/solarsystem/
//! - Linux: ~/.config/solarsystem/
//! - Windows: %APPDATA%\solarsystem\config\
//!
//! When no file exists the built-in model below is used.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::orbital::position::OrbitError;
use crate::orbital::time::{SECONDS_PER_DAY, StarDate, j2000};

const CONFIG_FILE: &str = "system.json";

fn default_tilt_speed() -> f64 {
    1.0
}

/// One body entry; parents are referenced by name and must appear earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub orbital_period: f64,
    pub orbit_radius: f64,
    pub spin_period: f64,
    #[serde(default)]
    pub phase_offset: f64,
    pub relative_size: f64,
    #[serde(default = "default_tilt_speed")]
    pub tilt_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "j2000")]
    pub epoch: DateTime<Utc>,
    /// Simulated seconds per wall-clock second
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    pub bodies: Vec<BodyConfig>,
}

fn default_time_scale() -> f64 {
    SECONDS_PER_DAY
}

fn body(
    name: &str,
    parent: Option<&str>,
    orbital_period: f64,
    orbit_radius: f64,
    spin_period: f64,
    phase_offset: f64,
    relative_size: f64,
) -> BodyConfig {
    BodyConfig {
        name: name.to_string(),
        parent: parent.map(str::to_string),
        orbital_period,
        orbit_radius,
        spin_period,
        phase_offset,
        relative_size,
        tilt_speed: 1.0,
    }
}

impl Default for SimulationConfig {
    /// Sun, planets and the Moon. Periods are real (days); radii and sizes
    /// are compressed to scene units so everything fits one view.
    fn default() -> Self {
        let sun = Some("Sun");
        Self {
            epoch: j2000(),
            time_scale: default_time_scale(),
            bodies: vec![
                body("Sun", None, 1.0, 0.0, 25.38, 0.0, 3.0),
                body("Mercury", sun, 87.97, 5.0, 58.65, 0.70, 0.38),
                body("Venus", sun, 224.70, 7.5, -243.02, 0.51, 0.95),
                body("Earth", sun, 365.26, 10.0, 0.997, 0.28, 1.0),
                body("Moon", Some("Earth"), 27.32, 1.5, 27.32, 0.35, 0.27),
                body("Mars", sun, 686.98, 13.0, 1.026, 0.99, 0.53),
                body("Jupiter", sun, 4_332.59, 19.0, 0.414, 0.10, 2.2),
                body("Saturn", sun, 10_759.22, 25.0, 0.444, 0.14, 1.9),
                body("Uranus", sun, 30_688.5, 30.0, -0.718, 0.87, 1.4),
                body("Neptune", sun, 60_182.0, 35.0, 0.671, 0.85, 1.35),
            ],
        }
    }
}

impl SimulationConfig {
    /// Path of the user config file, if a config directory can be resolved
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "solarsystem").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load the user config, or the built-in model when there is none.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load() -> Result<Self, anyhow::Error> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Clock starting at the configured epoch and running at `time_scale`
    pub fn star_date(&self) -> Result<StarDate, OrbitError> {
        StarDate::new(self.epoch).with_time_scale(self.time_scale)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), anyhow::Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
