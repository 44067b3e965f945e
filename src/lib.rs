//! Solar system simulation core
//!
//! A star date clock ([`orbital::StarDate`]) advanced once per frame, and
//! circular orbits ([`orbital::OrbitalBody`]) chained into a hierarchy owned
//! by [`solar_system::SolarSystem`]. [`orbital::OrbitalPlugin`] wires both into
//! a bevy app.

pub mod orbital;
pub mod solar_system;
