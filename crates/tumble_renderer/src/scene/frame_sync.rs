/// Per-frame bridge between the simulation and the draw list.
///
/// ```text
///   Idle ──▶ Stepping ──▶ Rendering ──▶ Idle
///            step(1/60)   snapshot → draw
/// ```
///
/// The step is unconditional and never scaled by the measured frame time.
/// The resulting packet holds one draw per drawable body, in enumeration
/// order, followed by the ground quad with an identity model matrix.
use std::collections::HashSet;

use glam::Mat4;
use tumble_core::{ShapeKind, Simulation, FIXED_TIMESTEP};

use crate::graph::FramePacket;
use crate::resources::{InstanceUniform, MeshError};
use crate::scene::mesh_table::SceneMeshes;
use crate::scene::shading::ShadingPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    #[default]
    Idle,
    Stepping,
    Rendering,
}

/// What one frame produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub bodies: usize,
    pub drawn: usize,
    /// Bodies of a kind with no mesh in the table.
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct FrameSynchronizer {
    phase: FramePhase,
    frames: u64,
    reported: HashSet<ShapeKind>,
}

impl FrameSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Step `sim` once, then rebuild `packet.draws` from its bodies.
    ///
    /// `view_projection` is `projection * view`; each draw gets
    /// `view_projection * body.transform`.
    pub fn run_frame<S, B>(
        &mut self,
        sim: &mut S,
        view_projection: Mat4,
        meshes: &SceneMeshes<B>,
        shading: &ShadingPolicy,
        packet: &mut FramePacket<B>,
    ) -> Result<FrameStats, MeshError>
    where
        S: Simulation,
        B: Clone,
    {
        self.phase = FramePhase::Stepping;
        sim.step(FIXED_TIMESTEP);

        self.phase = FramePhase::Rendering;
        let result = self.record(sim, view_projection, meshes, shading, packet);
        self.phase = FramePhase::Idle;
        if result.is_ok() {
            self.frames += 1;
        }
        result
    }

    fn record<S, B>(
        &mut self,
        sim: &S,
        view_projection: Mat4,
        meshes: &SceneMeshes<B>,
        shading: &ShadingPolicy,
        packet: &mut FramePacket<B>,
    ) -> Result<FrameStats, MeshError>
    where
        S: Simulation,
        B: Clone,
    {
        packet.draws.clear();
        let mut stats = FrameStats::default();

        for (index, body) in sim.bodies().enumerate() {
            stats.bodies += 1;
            let Some(mesh) = meshes.for_kind(body.kind) else {
                // the ground plane is drawn below, everything else is unknown
                if body.kind != ShapeKind::Plane {
                    stats.skipped += 1;
                    if self.reported.insert(body.kind) {
                        log::debug!("no mesh for {:?} bodies; skipping them", body.kind);
                    }
                }
                continue;
            };
            let look = shading.body(index, &body);
            let mvp = view_projection * body.transform.matrix();
            mesh.draw(InstanceUniform::new(mvp, look.albedo), look.texture, &mut packet.draws)?;
            stats.drawn += 1;
        }

        let ground = shading.ground();
        meshes.ground.draw(
            InstanceUniform::new(view_projection * Mat4::IDENTITY, ground.albedo),
            ground.texture,
            &mut packet.draws,
        )?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use tumble_core::{BodyId, BodySnapshot, Color, ShapeDesc, SimulationError, Transform};

    use crate::resources::buffer::testing::{FakeBuffer, RecordingAllocator};
    use crate::resources::TextureId;
    use crate::scene::mesh_table::SceneGeometry;
    use crate::scene::shading::Shading;

    /// Replays a fixed body list; `step` just counts.
    #[derive(Default)]
    struct ScriptedSim {
        bodies: Vec<BodySnapshot>,
        steps: Vec<f32>,
    }

    impl Simulation for ScriptedSim {
        fn step(&mut self, dt: f32) {
            self.steps.push(dt);
        }

        fn spawn(
            &mut self,
            shape: ShapeDesc,
            position: Vec3,
            orientation: Quat,
            _velocity: Vec3,
        ) -> Result<BodyId, SimulationError> {
            let id = BodyId(self.bodies.len() as u64);
            self.bodies.push(BodySnapshot {
                id,
                kind: shape.kind(),
                transform: Transform::new(position, orientation),
            });
            Ok(id)
        }

        fn bodies(&self) -> impl Iterator<Item = BodySnapshot> + '_ {
            self.bodies.iter().copied()
        }

        fn remove_body(&mut self, id: BodyId) -> Result<(), SimulationError> {
            let before = self.bodies.len();
            self.bodies.retain(|b| b.id != id);
            if self.bodies.len() == before {
                Err(SimulationError::UnknownBody(id))
            } else {
                Ok(())
            }
        }

        fn body_count(&self) -> usize {
            self.bodies.len()
        }
    }

    fn snapshot(id: u64, kind: ShapeKind, position: Vec3) -> BodySnapshot {
        BodySnapshot { id: BodyId(id), kind, transform: Transform::from_position(position) }
    }

    fn meshes(alloc: &RecordingAllocator) -> SceneMeshes<FakeBuffer> {
        let geometry = SceneGeometry::new(Vec3::ONE, 1.0, 4, 10.0, 1.0).unwrap();
        SceneMeshes::upload(alloc, &geometry).unwrap()
    }

    #[test]
    fn steps_once_with_fixed_dt_and_returns_to_idle() {
        let alloc = RecordingAllocator::default();
        let meshes = meshes(&alloc);
        let mut sim = ScriptedSim::default();
        let mut sync = FrameSynchronizer::new();
        let mut packet = FramePacket::new(Color::BLACK);

        for _ in 0..3 {
            sync.run_frame(&mut sim, Mat4::IDENTITY, &meshes, &ShadingPolicy::primary_palette(), &mut packet)
                .unwrap();
        }
        assert_eq!(sim.steps, vec![FIXED_TIMESTEP; 3]);
        assert_eq!(sync.phase(), FramePhase::Idle);
        assert_eq!(sync.frames(), 3);
        // nothing but the ground
        assert_eq!(packet.draws.len(), 1);
    }

    #[test]
    fn draws_bodies_in_order_then_ground() {
        let alloc = RecordingAllocator::default();
        let meshes = meshes(&alloc);
        let mut sim = ScriptedSim {
            bodies: vec![
                snapshot(0, ShapeKind::Plane, Vec3::ZERO),
                snapshot(1, ShapeKind::Box, Vec3::new(0.0, 1.0, 0.0)),
                snapshot(2, ShapeKind::Sphere, Vec3::new(3.0, 2.0, 0.0)),
            ],
            ..Default::default()
        };
        let view_projection = Mat4::perspective_rh(1.0, 1.5, 0.25, 4000.0);
        let mut sync = FrameSynchronizer::new();
        let mut packet = FramePacket::new(Color::BLACK);

        let stats = sync
            .run_frame(&mut sim, view_projection, &meshes, &ShadingPolicy::primary_palette(), &mut packet)
            .unwrap();
        assert_eq!(stats, FrameStats { bodies: 3, drawn: 2, skipped: 0 });
        assert_eq!(packet.draws.len(), 3);

        let cube = &packet.draws[0];
        assert_eq!(cube.index_count, 36);
        assert_eq!(
            cube.instance.mvp,
            (view_projection * Mat4::from_translation(Vec3::Y)).to_cols_array_2d()
        );
        // palette index follows enumeration position, the plane included
        assert_eq!(cube.instance.albedo, Color::GREEN.to_array());
        assert_eq!(packet.draws[1].index_count, 3 * 32);
        assert_eq!(packet.draws[1].instance.albedo, Color::BLUE.to_array());

        let ground = &packet.draws[2];
        assert_eq!(ground.index_count, 6);
        assert_eq!(ground.instance.mvp, view_projection.to_cols_array_2d());
        assert_eq!(ground.instance.albedo, Color::gray(0.5).to_array());
    }

    #[test]
    fn unknown_kinds_are_skipped() {
        let alloc = RecordingAllocator::default();
        let meshes = meshes(&alloc);
        let mut sim = ScriptedSim {
            bodies: vec![
                snapshot(0, ShapeKind::Unsupported, Vec3::ZERO),
                snapshot(1, ShapeKind::Box, Vec3::ZERO),
                snapshot(2, ShapeKind::Unsupported, Vec3::ZERO),
            ],
            ..Default::default()
        };
        let mut sync = FrameSynchronizer::new();
        let mut packet = FramePacket::new(Color::BLACK);
        let stats = sync
            .run_frame(&mut sim, Mat4::IDENTITY, &meshes, &ShadingPolicy::primary_palette(), &mut packet)
            .unwrap();
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.drawn, 1);
        assert_eq!(packet.draws.len(), 2);
    }

    #[test]
    fn textured_policy_reaches_the_draws() {
        let alloc = RecordingAllocator::default();
        let meshes = meshes(&alloc);
        let mut sim = ScriptedSim::default();
        sim.spawn(ShapeDesc::Sphere { radius: 1.0 }, Vec3::ZERO, Quat::IDENTITY, Vec3::ZERO)
            .unwrap();
        let policy = ShadingPolicy::Textured {
            boxes: TextureId(1),
            balls: vec![TextureId(5), TextureId(6)],
            ground: TextureId(2),
        };
        let mut sync = FrameSynchronizer::new();
        let mut packet = FramePacket::new(Color::BLACK);
        sync.run_frame(&mut sim, Mat4::IDENTITY, &meshes, &policy, &mut packet).unwrap();
        assert_eq!(packet.draws[0].texture, TextureId(5));
        assert_eq!(packet.draws[1].texture, TextureId(2));
        assert_eq!(policy.ground(), Shading::textured(TextureId(2)));
    }

    #[test]
    fn released_meshes_fail_the_frame_and_reset_phase() {
        let alloc = RecordingAllocator::default();
        let mut meshes = meshes(&alloc);
        meshes.release(&alloc);
        let mut sim = ScriptedSim::default();
        let mut sync = FrameSynchronizer::new();
        let mut packet = FramePacket::new(Color::BLACK);
        let err = sync.run_frame(&mut sim, Mat4::IDENTITY, &meshes, &ShadingPolicy::primary_palette(), &mut packet);
        assert!(matches!(err, Err(MeshError::InvalidState(_))));
        assert_eq!(sync.phase(), FramePhase::Idle);
        assert_eq!(sync.frames(), 0);
    }
}
