//! Physics-to-render bridge: which mesh draws which body, how it is shaded,
//! and the per-frame step/render cycle.

pub mod frame_sync;
pub mod mesh_table;
pub mod shading;

pub use frame_sync::{FramePhase, FrameStats, FrameSynchronizer};
pub use mesh_table::{SceneGeometry, SceneMeshes};
pub use shading::{Shading, ShadingPolicy};
