pub mod camera;
pub mod controller;

pub use camera::Camera;
pub use controller::Controller;
