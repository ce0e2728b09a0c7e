//! Shared building blocks for the tumble demo.
//!
//! Nothing in here touches the GPU.  The renderer, the physics adapter and
//! the application shell all depend on this crate, never on each other's
//! internals.

pub mod color;
pub mod input;
pub mod scene;
pub mod simulation;
pub mod time;
pub mod transform;

pub use color::Color;
pub use input::InputState;
pub use scene::{Camera, Controller};
pub use simulation::{
    validate_spawn, BodyId, BodySnapshot, ShapeDesc, ShapeKind, Simulation, SimulationError,
    FIXED_TIMESTEP,
};
pub use time::{FpsCounter, Time, TimeClock};
pub use transform::Transform;
