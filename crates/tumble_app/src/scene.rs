//! The running demo: one simulation, its meshes, its shading and the
//! camera looking at it.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tumble_assets::{find_resource_root, load_or_checker, TexturePaths};
use tumble_core::input::KeyCode;
use tumble_core::{Camera, InputState, Simulation, Time};
use tumble_physics::{RapierSimulation, Scenario};
use tumble_renderer::scene::FrameStats;
use tumble_renderer::{
    FrameSynchronizer, MeshError, Renderer, SceneGeometry, SceneMeshes, ShadingPolicy, TextureId,
    WrapMode,
};

const SPHERE_SEGMENTS: u32 = 32;
const GROUND_HALF_EXTENT: f32 = 128.0;
const GROUND_UV_SCALE: f32 = 2.0;

pub struct DemoScene {
    scenario: Scenario,
    sim: RapierSimulation,
    meshes: SceneMeshes,
    shading: ShadingPolicy,
    camera: Camera,
    sync: FrameSynchronizer,
}

impl DemoScene {
    /// Seed the simulation and upload everything the scenario draws.
    pub fn new(
        scenario: Scenario,
        renderer: &mut Renderer,
        resource_root: Option<&Path>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let sim = scenario
            .build()
            .with_context(|| format!("seeding `{scenario}`"))?;

        let shading = match scenario {
            Scenario::Ring => ShadingPolicy::primary_palette(),
            Scenario::Stacks => load_textures(renderer, resource_root)?,
        };

        let geometry = SceneGeometry::new(
            scenario.box_half_extents(),
            scenario.sphere_radius(),
            SPHERE_SEGMENTS,
            GROUND_HALF_EXTENT,
            GROUND_UV_SCALE,
        )?;
        let meshes = SceneMeshes::upload(renderer.device(), &geometry).context("uploading meshes")?;

        let mut camera = scenario.camera();
        camera.set_viewport(width, height);

        Ok(Self {
            scenario,
            sim,
            meshes,
            shading,
            camera,
            sync: FrameSynchronizer::new(),
        })
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Move the camera, handle the launch key, step once and record the
    /// draws into the renderer's packet.
    pub fn frame(
        &mut self,
        renderer: &mut Renderer,
        input: &mut InputState,
        time: Time,
    ) -> Result<FrameStats, MeshError> {
        self.camera.update(input, time.delta);

        if input.just_pressed(KeyCode::Space) {
            if let Err(err) = self.scenario.launch(&mut self.sim, &self.camera) {
                log::warn!("launch failed: {err}");
            }
        }

        let stats = self.sync.run_frame(
            &mut self.sim,
            self.camera.view_projection(),
            &self.meshes,
            &self.shading,
            renderer.packet_mut(),
        )?;
        log::trace!("frame {}: {stats:?}", time.frame_count);
        Ok(stats)
    }

    /// Meshes, then textures, then the simulation.
    pub fn teardown(self, renderer: &mut Renderer) {
        let Self { mut meshes, sim, .. } = self;
        meshes.release(renderer.device());
        log::info!("meshes released");
        renderer.release_textures();
        log::info!("textures released");
        let bodies = sim.body_count();
        drop(sim);
        log::info!("simulation with {bodies} bodies dropped");
    }
}

fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }
    let found = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_resource_root(&cwd));
    match found {
        Some(root) => {
            log::info!("resources found at {}", root.display());
            root
        }
        None => {
            log::warn!("no resources/resources.loc found; textures will be generated");
            PathBuf::from("resources")
        }
    }
}

fn load_textures(renderer: &mut Renderer, explicit_root: Option<&Path>) -> anyhow::Result<ShadingPolicy> {
    let paths = TexturePaths::new(&resolve_root(explicit_root));
    let mut upload = |label: &str, path: &Path, wrap: WrapMode| -> anyhow::Result<TextureId> {
        let image = load_or_checker(path);
        let id = renderer.upload_texture(label, image.width, image.height, &image.to_rgba8(), wrap)?;
        Ok(id)
    };

    let boxes = upload("crate", &paths.crate_box, WrapMode::Clamp)?;
    let ground = upload("checker", &paths.checker, WrapMode::Repeat)?;
    let balls = paths
        .balls
        .iter()
        .enumerate()
        .map(|(i, path)| upload(&format!("pool_{:02}", i + 1), path, WrapMode::Clamp))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ShadingPolicy::Textured { boxes, balls, ground })
}
