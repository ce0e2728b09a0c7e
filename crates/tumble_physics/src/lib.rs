//! Rigid-body simulation for the tumble demo.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`world`]    | [`RapierSimulation`]: one owned rapier world behind the `Simulation` trait |
//! | [`scenario`] | The two seeded layouts (ring, stacks) and the sphere launch |

pub mod scenario;
pub mod world;

pub use scenario::{Scenario, ScenarioParseError};
pub use world::{BodyDesc, MassSpec, RapierSimulation, WorldConfig};
