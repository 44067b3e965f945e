// Headless solar system simulation: star date clock plus circular orbits.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use solarsystem::orbital::OrbitalPlugin;
use solarsystem::solar_system::{SimulationConfig, SolarSystem};

const FRAME_RATE: f64 = 60.0;

fn main() -> anyhow::Result<()> {
    // Reject a bad configuration before the first frame.
    let config = SimulationConfig::load()?;
    let system = SolarSystem::from_config(&config)?;
    let star_date = config.star_date()?;

    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / FRAME_RATE,
        ))),
        LogPlugin::default(),
    ));

    info!(
        "Loaded {} bodies, epoch {}, {} simulated s per second",
        system.len(),
        config.epoch,
        config.time_scale
    );

    app.insert_resource(star_date);
    app.insert_resource(system);
    app.add_plugins(OrbitalPlugin);

    app.run();
    Ok(())
}
