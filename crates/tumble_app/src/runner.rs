use std::sync::Arc;

use tumble_core::input::KeyCode;
use tumble_core::{FpsCounter, InputState, TimeClock};
use tumble_renderer::scene::FrameStats;
use tumble_renderer::MeshError;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::builder::AppConfig;
use crate::graphics::GraphicsState;
use crate::scene::DemoScene;

/// What the loop does after one stage of a frame.
#[derive(Debug)]
enum FrameStep {
    Continue,
    /// Nothing to present this frame.
    Skip,
    /// Reapply the surface configuration, then carry on.
    Reconfigure,
    /// Stop the loop and return this from `run`.
    Fatal(anyhow::Error),
}

/// A frame that failed to record is never presented: the packet would only
/// hold the draws recorded before the failure.
fn record_outcome(frame: u64, recorded: Result<FrameStats, MeshError>) -> FrameStep {
    match recorded {
        Ok(_) => FrameStep::Continue,
        Err(err) => FrameStep::Fatal(anyhow::Error::new(err).context(format!("recording frame {frame}"))),
    }
}

fn surface_outcome(err: wgpu::SurfaceError) -> FrameStep {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => FrameStep::Reconfigure,
        wgpu::SurfaceError::Timeout => FrameStep::Skip,
        other => FrameStep::Fatal(anyhow::Error::new(other).context("acquiring surface texture")),
    }
}

struct Runner {
    config: AppConfig,
    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    scene: Option<DemoScene>,
    input: InputState,
    clock: TimeClock,
    fps: FpsCounter,
    /// First fatal error; returned from `run_internal` after the loop exits.
    error: Option<anyhow::Error>,
}

impl Runner {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            graphics: None,
            scene: None,
            input: InputState::new(),
            clock: TimeClock::new(),
            fps: FpsCounter::default(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let mut gfx = pollster::block_on(GraphicsState::new(
            window.clone(),
            self.config.vsync,
            self.config.clear_color(),
        ))?;
        let scene = DemoScene::new(
            self.config.scenario,
            &mut gfx.renderer,
            self.config.resource_root.as_deref(),
            gfx.config.width,
            gfx.config.height,
        )?;
        log::info!("running `{}`", scene.scenario());

        self.window = Some(window);
        self.graphics = Some(gfx);
        self.scene = Some(scene);
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gfx), Some(window), Some(scene)) =
            (&mut self.graphics, &self.window, &mut self.scene)
        else {
            return;
        };

        let time = self.clock.tick();
        if let Some(fps) = self.fps.record(time.raw_delta) {
            log::debug!("{fps:.0} fps");
            window.set_title(&format!("{} ({:.0} fps)", self.config.title, fps));
        }

        // ── 1. STEP + RECORD ─────────────────────────────────────────────────
        let recorded = scene.frame(&mut gfx.renderer, &mut self.input, time);
        if let FrameStep::Fatal(err) = record_outcome(time.frame_count, recorded) {
            log::error!("{err:#}");
            self.error.get_or_insert(err);
            event_loop.exit();
            return;
        }

        // ── 2. PRESENT ───────────────────────────────────────────────────────
        match gfx.surface.get_current_texture() {
            Ok(frame) => {
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                gfx.renderer.render(&view);
                frame.present();
            }
            Err(err) => match surface_outcome(err) {
                FrameStep::Reconfigure => {
                    log::debug!("surface lost; reconfiguring");
                    gfx.reconfigure();
                }
                FrameStep::Fatal(err) => {
                    log::error!("{err:#}");
                    self.error.get_or_insert(err);
                    event_loop.exit();
                    return;
                }
                FrameStep::Continue | FrameStep::Skip => log::warn!("surface timeout; frame skipped"),
            },
        }

        // after everything that reads just_pressed
        self.input.end_frame();
        window.request_redraw();
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    self.input.update_key(code, pressed);
                    if pressed && code == KeyCode::Escape {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input
                    .update_mouse_button(button, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.set_mouse_position(position.x, position.y);
            }
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.graphics {
                    gfx.resize(size.width, size.height);
                }
                if let Some(scene) = &mut self.scene {
                    scene.resize(size.width, size.height);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.frame(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let (Some(scene), Some(gfx)) = (self.scene.take(), self.graphics.as_mut()) {
            scene.teardown(&mut gfx.renderer);
        }
    }
}

pub(crate) fn run_internal(config: AppConfig) -> anyhow::Result<()> {
    let mut runner = Runner::new(config);
    let event_loop = EventLoop::new()?;
    // spin as fast as presentation allows
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut runner)?;
    match runner.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
