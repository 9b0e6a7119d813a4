use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec3;
use pixelsand_input::{Action, GravityMapper};
use pixelsand_render::FrameBuilder;
use pixelsand_render_wgpu::SpriteRenderer;
use pixelsand_sim::{SimConfig, Simulation};
use pixelsand_tools::SimInspector;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "pixelsand-desktop", about = "Pixel sand desktop application")]
struct Cli {
    /// Enable verbose logging (logs gravity every tick)
    #[arg(short, long)]
    verbose: bool,

    /// Simulation config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window pixels per grid cell
    #[arg(long, default_value = "16")]
    display_scale: u32,

    /// Simulation ticks per second
    #[arg(long, default_value = "20")]
    tick_hz: f64,

    /// Peak-to-peak gravity span across the window
    #[arg(long, default_value = "64")]
    gravity_range: f32,
}

fn action_for_key(key: KeyCode) -> Action {
    match key {
        KeyCode::Space => Action::TogglePause,
        KeyCode::Period => Action::Step,
        KeyCode::KeyR => Action::Reset,
        KeyCode::F1 => Action::ToggleInspector,
        KeyCode::Escape => Action::Quit,
        _ => Action::Noop,
    }
}

/// Window size for a grid of `config` cells at `scale` pixels per cell.
fn window_size(config: &SimConfig, scale: u32) -> Result<PhysicalSize<u32>> {
    anyhow::ensure!(scale > 0, "display scale must be positive");
    let scaled = |cells: u32| {
        cells
            .checked_mul(scale)
            .with_context(|| format!("{cells} cells at scale {scale} does not fit in u32"))
    };
    Ok(PhysicalSize::new(scaled(config.width)?, scaled(config.height)?))
}

/// Application state.
struct AppState {
    sim: Simulation,
    frames: FrameBuilder,
    gravity: GravityMapper,
    paused: bool,
    show_inspector: bool,
    selected_particle: usize,
    last_frame: Instant,
    // Fixed timestep
    tick_accumulator: f64,
    tick_rate: f64,
}

impl AppState {
    fn new(sim: Simulation, gravity: GravityMapper, tick_hz: f64) -> Result<Self> {
        anyhow::ensure!(tick_hz > 0.0, "tick rate must be positive, got {tick_hz}");
        Ok(Self {
            frames: FrameBuilder::for_grid(sim.width())?,
            sim,
            gravity,
            paused: false,
            show_inspector: false,
            selected_particle: 0,
            last_frame: Instant::now(),
            tick_accumulator: 0.0,
            tick_rate: 1.0 / tick_hz,
        })
    }

    fn update(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        self.tick_accumulator += dt;
        while self.tick_accumulator >= self.tick_rate {
            self.tick_accumulator -= self.tick_rate;
            self.step();
        }
    }

    fn step(&mut self) {
        let g = self.sim.gravity();
        tracing::debug!(
            tick = self.sim.tick_count(),
            "gravity ({:.2}, {:.2}, {:.2})",
            g.x,
            g.y,
            g.z
        );
        self.sim.tick();
    }

    /// Apply an action. `Quit` is handled by the event loop.
    fn apply(&mut self, action: Action) {
        match action {
            Action::SetGravity(g) => self.sim.set_gravity(g),
            Action::TogglePause => {
                self.paused = !self.paused;
                self.tick_accumulator = 0.0;
                tracing::info!(paused = self.paused, "pause toggled");
            }
            Action::Step if self.paused => self.step(),
            Action::Reset => self.sim.reset(),
            Action::ToggleInspector => self.show_inspector = !self.show_inspector,
            Action::Step | Action::Quit | Action::Noop => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let summary = SimInspector::summary(&self.sim);

        egui::SidePanel::left("inspector")
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Pixel Sand");
                ui.separator();
                ui.label(format!(
                    "Tick: {}  Seed: {}",
                    summary.tick,
                    self.sim.config().seed
                ));
                ui.label(format!(
                    "Particles: {}  Occupied: {}",
                    summary.particle_count, summary.occupied_cells
                ));
                let [gx, gy, gz] = summary.gravity;
                ui.label(format!("Gravity: ({gx:.1}, {gy:.1}, {gz:.1})"));
                ui.label(format!("Hash: {:016x}", summary.state_hash));
                if !summary.is_consistent() {
                    ui.colored_label(egui::Color32::RED, "bitmap out of sync");
                }
                let row_fill = SimInspector::row_fill(&self.sim);
                let full_rows = row_fill.iter().filter(|&&n| n == summary.width).count();
                let top = row_fill.iter().rposition(|&n| n > 0);
                ui.label(format!(
                    "Full rows: {full_rows}  Top: {}",
                    top.map_or_else(|| "-".to_string(), |y| y.to_string())
                ));
                ui.separator();

                ui.heading("Particle");
                let last = summary.particle_count.saturating_sub(1);
                ui.add(egui::DragValue::new(&mut self.selected_particle).range(0..=last));
                match SimInspector::inspect_particle(&self.sim, self.selected_particle) {
                    Some(info) => ui.label(info.to_string()),
                    None => ui.label("no particles"),
                };
                ui.separator();

                ui.heading("Tuning");
                let mut grav_scale = self.sim.config().grav_scale;
                if ui
                    .add(egui::Slider::new(&mut grav_scale, 0.0..=4.0).text("gravity scale"))
                    .changed()
                {
                    self.sim.set_grav_scale(grav_scale);
                }
                let mut bounce_scale = self.sim.config().bounce_scale;
                if ui
                    .add(egui::Slider::new(&mut bounce_scale, 0.0..=1.0).text("bounce"))
                    .changed()
                {
                    self.sim.set_bounce_scale(bounce_scale);
                }
                let mut shake = gz;
                if ui
                    .add(egui::Slider::new(&mut shake, -64.0..=64.0).text("shake"))
                    .changed()
                {
                    self.apply(Action::SetGravity(Vec3::new(gx, gy, shake)));
                }
                ui.separator();

                ui.horizontal(|ui| {
                    let pause_label = if self.paused { "Resume" } else { "Pause" };
                    if ui.button(pause_label).clicked() {
                        self.apply(Action::TogglePause);
                    }
                    if ui.button("Step (.)").clicked() {
                        self.apply(Action::Step);
                    }
                    if ui.button("Reset (R)").clicked() {
                        self.apply(Action::Reset);
                    }
                });

                ui.separator();
                ui.small("Cursor: gravity | Space: Pause | F1: Inspector | Esc: Quit");
            });
    }
}

/// Window, surface and renderers, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprites: SpriteRenderer,
    egui_ctx: EguiContext,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, size: PhysicalSize<u32>) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Pixel Sand")
            .with_inner_size(size)
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("pixelsand_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        // Sprite colours are written as-is, so prefer a linear surface.
        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sprites = SpriteRenderer::new(&device, surface_format);

        let egui_ctx = EguiContext::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend, surface {:?}",
            adapter.get_info().backend.to_str(),
            surface_format
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            sprites,
            egui_ctx,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self, state: &mut AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = state.frames.build(&state.sim);
        self.sprites
            .render(&self.device, &self.queue, &view, &frame);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    window_size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, self.window_size) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to start renderer: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match action_for_key(key) {
                Action::Quit => event_loop.exit(),
                action => self.state.apply(action),
            },
            WindowEvent::CursorMoved { position, .. } => {
                let gravity = self.state.gravity.from_cursor(
                    position.x,
                    position.y,
                    gpu.config.width,
                    gpu.config.height,
                    self.state.sim.gravity(),
                );
                self.state.apply(Action::SetGravity(gravity));
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f64().min(0.1);
                self.state.last_frame = now;
                self.state.update(dt);

                gpu.render(&mut self.state);
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("pixelsand-desktop starting");

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let window_size = window_size(&config, cli.display_scale)?;

    let sim = Simulation::new(config)?;
    let state = AppState::new(sim, GravityMapper::new(cli.gravity_range), cli.tick_hz)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp {
        state,
        window_size,
        gpu: None,
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
