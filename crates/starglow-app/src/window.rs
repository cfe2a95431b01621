//! Window creation, event routing, and the per-frame redraw driver.
//!
//! [`BackdropApp`] implements winit's [`ApplicationHandler`]: it owns the
//! window, the GPU context, the active backdrop simulation and its
//! renderers. The redraw callback is the single scheduling point: it ticks
//! the clock, advances the simulation, uploads frame data, and issues one
//! render pass. Input handlers only write input-state fields.
//!
//! GPU initialization failure is absorbed: the app keeps running and simply
//! renders nothing. On shutdown, renderers are dropped before the GPU
//! context so no in-flight resource outlives its device.

use std::sync::Arc;

use glam::Mat4;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use starglow_config::{BackdropKind, Config};
use starglow_input::{PointerState, TiltSource};
use starglow_render::{
    Camera, FrameEncoder, RenderPassBuilder, RenderContext, SurfaceWrapper,
    init_render_context_blocking,
};
use starglow_sky::{
    MeteorRenderer, NebulaRenderer, NebulaTexture, ParticleField, ParticleFieldRenderer,
    SkyScene, StarfieldRenderer, pool_size, rng_from_seed,
};

use crate::frame_clock::FrameClock;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ))
}

/// The active backdrop simulation.
enum Backdrop {
    /// Deep-sky scene: starfield, nebula, meteors, parallax.
    Cosmic(SkyScene),
    /// 2D drifting particle field.
    Drift { field: ParticleField, reduced: bool },
}

/// GPU renderers matching the active backdrop. Absent when the GPU is.
enum Renderers {
    Cosmic {
        nebula: NebulaRenderer,
        stars: StarfieldRenderer,
        meteors: MeteorRenderer,
    },
    Drift(ParticleFieldRenderer),
}

/// Application state driving the backdrop.
pub struct BackdropApp {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    surface_wrapper: SurfaceWrapper,
    clock: FrameClock,
    pointer: PointerState,
    tilt: Option<Box<dyn TiltSource>>,
    camera: Camera,
    sim: Option<Backdrop>,
    renderers: Option<Renderers>,
}

impl BackdropApp {
    /// Create the app from a loaded configuration.
    pub fn new(config: Config) -> Self {
        let width = config.window.width as f32;
        let height = config.window.height as f32;
        Self {
            config,
            window: None,
            gpu: None,
            surface_wrapper: SurfaceWrapper::new(1, 1, 1.0),
            clock: FrameClock::new(),
            pointer: PointerState::new(width, height),
            tilt: starglow_input::detect(),
            camera: Camera::default(),
            sim: None,
            renderers: None,
        }
    }

    /// Build the simulation for the configured backdrop kind, and its
    /// renderers when a GPU is available.
    fn build_backdrop(&mut self) {
        let sky = &self.config.sky;
        let logical_width = self.surface_wrapper.logical_width() as f32;
        let logical_height = self.surface_wrapper.logical_height() as f32;
        let scale_factor = self.surface_wrapper.scale_factor();

        match sky.backdrop {
            BackdropKind::Starfield => {
                let scene = SkyScene::new(sky, logical_width);

                if let Some(gpu) = &self.gpu {
                    let tuning = sky.tuning(scene.device_class());
                    let point_size = sky.scaled_star_size(scene.device_class(), scale_factor);
                    let texture = NebulaTexture::bake(sky.nebula.texture_size, scene.seed());

                    self.renderers = Some(Renderers::Cosmic {
                        nebula: NebulaRenderer::new(
                            &gpu.device,
                            &gpu.queue,
                            gpu.surface_format,
                            &texture,
                        ),
                        stars: StarfieldRenderer::new(
                            &gpu.device,
                            gpu.surface_format,
                            scene.starfield().points(),
                            point_size,
                        ),
                        meteors: MeteorRenderer::new(
                            &gpu.device,
                            gpu.surface_format,
                            tuning.meteor_cap,
                        ),
                    });
                }

                self.sim = Some(Backdrop::Cosmic(scene));
            }
            BackdropKind::ParticleField => {
                let reduced = sky.motion.resolve();
                let class = sky.classify(logical_width);
                let count = pool_size(
                    logical_width,
                    sky.tuning(class).particle_count,
                    reduced,
                    sky.particles.reduced_count,
                );
                let (mut rng, seed) = rng_from_seed(sky.seed);
                let field = ParticleField::new(
                    logical_width,
                    logical_height,
                    count,
                    sky.particles.clone(),
                    &mut rng,
                );
                info!("Particle field mounted: {count} particles, seed {seed}");

                if let Some(gpu) = &self.gpu {
                    self.renderers = Some(Renderers::Drift(ParticleFieldRenderer::new(
                        &gpu.device,
                        gpu.surface_format,
                        count,
                    )));
                }

                self.sim = Some(Backdrop::Drift { field, reduced });
            }
        }
    }

    /// One animation frame: tick, advance, upload, render.
    fn frame(&mut self) {
        let dt = self.clock.tick();

        match &mut self.sim {
            Some(Backdrop::Cosmic(scene)) => {
                // Tilt drives parallax where the platform exposes it;
                // otherwise the pointer does.
                let target = match self.tilt.as_mut().and_then(|source| source.poll()) {
                    Some(reading) => reading.to_parallax_vector(),
                    None => self.pointer.parallax_vector(),
                };
                scene.set_parallax_target(target);
                scene.advance(dt);
            }
            Some(Backdrop::Drift { field, .. }) => {
                field.update(dt, self.pointer.position());
            }
            None => {}
        }

        self.render_frame();
    }

    /// Upload frame data and issue the single render pass. A no-op without
    /// a GPU (capability-missing) or before the backdrop is built.
    fn render_frame(&mut self) {
        let Some(gpu) = &self.gpu else { return };
        let (Some(sim), Some(renderers)) = (&self.sim, &mut self.renderers) else {
            return;
        };

        match (sim, renderers) {
            (Backdrop::Cosmic(scene), Renderers::Cosmic { nebula, stars, meteors }) => {
                self.camera.position = scene.camera_position();
                self.camera.target = scene.look_target();

                let view = self.camera.view_matrix();
                let proj = self.camera.projection_matrix();
                let view_proj = proj * view;
                let model = Mat4::from_rotation_y(scene.starfield().rotation_angle());

                nebula.update(&gpu.queue, scene.nebula().planes(), view_proj);
                stars.update(&gpu.queue, proj, view * model);
                meteors.update(&gpu.queue, scene.meteors(), view_proj);

                match gpu.get_current_texture() {
                    Ok(surface_texture) => {
                        let mut encoder = FrameEncoder::new(
                            &gpu.device,
                            Arc::new(gpu.queue.clone()),
                            surface_texture,
                        );
                        {
                            let builder = RenderPassBuilder::new().label("sky-pass");
                            let mut pass = encoder.begin_render_pass(&builder);
                            nebula.render(&mut pass);
                            stars.render(&mut pass);
                            meteors.render(&mut pass);
                        }
                        encoder.submit();
                    }
                    Err(e) => debug!("skipping frame: {e}"),
                }
            }
            (Backdrop::Drift { field, reduced }, Renderers::Drift(renderer)) => {
                renderer.update(&gpu.queue, field, !reduced);

                match gpu.get_current_texture() {
                    Ok(surface_texture) => {
                        let mut encoder = FrameEncoder::new(
                            &gpu.device,
                            Arc::new(gpu.queue.clone()),
                            surface_texture,
                        );
                        {
                            let builder = RenderPassBuilder::new().label("particle-pass");
                            let mut pass = encoder.begin_render_pass(&builder);
                            renderer.render(&mut pass);
                        }
                        encoder.submit();
                    }
                    Err(e) => debug!("skipping frame: {e}"),
                }
            }
            _ => {}
        }
    }

    /// Tear everything down: scene first, then renderers, then the GPU
    /// context. Safe to call more than once, and safe when some resources
    /// were never created.
    fn unmount(&mut self) {
        if let Some(Backdrop::Cosmic(scene)) = &mut self.sim {
            scene.unmount();
        }
        self.renderers = None;
        self.gpu = None;
    }
}

impl ApplicationHandler for BackdropApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper = SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        self.pointer.set_viewport(
            self.surface_wrapper.logical_width() as f32,
            self.surface_wrapper.logical_height() as f32,
        );
        self.camera
            .set_aspect_ratio(inner_size.width as f32, inner_size.height as f32);

        match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(ctx) => self.gpu = Some(ctx),
            Err(e) => {
                // Capability-missing: keep running, render nothing.
                warn!("GPU unavailable, backdrop will render nothing: {e}");
            }
        }

        self.build_backdrop();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.resize(resize.physical.width, resize.physical.height);
                    }
                    self.camera.set_aspect_ratio(
                        resize.physical.width as f32,
                        resize.physical.height as f32,
                    );
                    self.pointer
                        .set_viewport(resize.logical_width as f32, resize.logical_height as f32);
                    if let Some(Backdrop::Drift { field, .. }) = &mut self.sim {
                        field.resize(resize.logical_width as f32, resize.logical_height as f32);
                    }
                    debug!(
                        "Resized to {}x{} (scale {:.2})",
                        resize.physical.width, resize.physical.height, resize.scale_factor
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let new_inner = window.inner_size();
                    if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                        scale_factor,
                        new_inner.width,
                        new_inner.height,
                    ) {
                        if let Some(gpu) = &mut self.gpu {
                            gpu.resize(resize.physical.width, resize.physical.height);
                        }
                        self.camera.set_aspect_ratio(
                            resize.physical.width as f32,
                            resize.physical.height as f32,
                        );
                        self.pointer.set_viewport(
                            resize.logical_width as f32,
                            resize.logical_height as f32,
                        );
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let sf = self.surface_wrapper.scale_factor();
                self.pointer.on_cursor_moved(position.x / sf, position.y / sf);
            }
            WindowEvent::CursorEntered { .. } => {
                self.pointer.on_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                // Re-arm: the redraw callback is the only scheduling point.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}

/// Create the event loop and run the backdrop until close.
pub fn run(config: Config) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = BackdropApp::new(config);
    event_loop.run_app(&mut app)
}
