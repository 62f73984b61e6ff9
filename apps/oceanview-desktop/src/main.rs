use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use oceanview_camera::Camera;
use oceanview_mesh::{GridMesh, build_grid};
use oceanview_render::FrameTransforms;
use oceanview_render_wgpu::{GridRenderer, RenderError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Fixed redraw cadence: 60 ticks per second.
const TICK_INTERVAL: Duration = Duration::from_micros(16_667);

/// Radians of camera rotation per unit of mouse travel.
const MOUSE_LOOK_SPEED: f32 = 0.03;

/// World units of camera travel per timer tick.
const MOVEMENT_SPEED: f32 = 0.05;

#[derive(Parser)]
#[command(name = "oceanview-desktop", about = "Real-time ocean grid viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in pixels
    #[arg(long, default_value = "640")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "480")]
    height: u32,

    /// Grid vertices per row
    #[arg(long, default_value = "10")]
    grid_width: u32,

    /// Grid rows
    #[arg(long, default_value = "10")]
    grid_height: u32,
}

/// Application state: the camera, the static mesh, and input flags.
struct AppState {
    camera: Camera,
    mesh: GridMesh,
    viewport: (u32, u32),
    // Input state
    keys_held: std::collections::HashSet<KeyCode>,
    mouse_captured: bool,
    redraw_pending: bool,
    frame_time: Duration,
}

impl AppState {
    fn new(mesh: GridMesh, viewport: (u32, u32)) -> Self {
        Self {
            camera: Camera::new(),
            mesh,
            viewport,
            keys_held: std::collections::HashSet::new(),
            mouse_captured: false,
            redraw_pending: true,
            frame_time: Duration::from_secs(1),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    /// Apply one tick of held-key movement to the camera position.
    fn apply_movement(&mut self) {
        let mut delta = Vec3::ZERO;
        if self.keys_held.contains(&KeyCode::KeyW) {
            delta += self.camera.forward();
        }
        if self.keys_held.contains(&KeyCode::KeyS) {
            delta -= self.camera.forward();
        }
        if self.keys_held.contains(&KeyCode::KeyA) {
            delta -= self.camera.right();
        }
        if self.keys_held.contains(&KeyCode::KeyD) {
            delta += self.camera.right();
        }
        self.camera.position += delta.normalize_or_zero() * MOVEMENT_SPEED;
    }

    /// Free-look: yaw about the camera's own up axis, pitch about its right
    /// axis. Positive mouse x turns right, positive mouse y looks down.
    fn look(&mut self, dx: f32, dy: f32) {
        self.camera
            .rotate_around_axis(self.camera.up(), -dx * MOUSE_LOOK_SPEED);
        self.camera
            .rotate_around_axis(self.camera.right(), -dy * MOUSE_LOOK_SPEED);
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<GridRenderer>,
    next_tick: Instant,
    fatal: Option<RenderError>,
}

impl GpuApp {
    fn new(cli: &Cli) -> Self {
        let mesh = build_grid(cli.grid_width, cli.grid_height);
        tracing::info!(
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "grid mesh built"
        );

        Self {
            state: AppState::new(mesh, (cli.width, cli.height)),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            next_tick: Instant::now(),
            fatal: None,
        }
    }

    fn redraw(&mut self) {
        self.state.redraw_pending = false;

        let (Some(surface), Some(device), Some(queue)) =
            (&self.surface, &self.device, &self.queue)
        else {
            return;
        };

        let started = Instant::now();

        let output = match surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(config) = &self.config {
                    surface.configure(device, config);
                }
                return;
            }
            Err(err) => {
                tracing::error!("surface error: {err}");
                return;
            }
        };

        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (width, height) = self.state.viewport;
        let transforms =
            FrameTransforms::from_camera(&self.state.camera, width as f32, height as f32);

        if let Some(renderer) = &self.renderer {
            renderer.render(device, queue, &target, &transforms);
        }

        output.present();

        self.state.frame_time = started.elapsed();
        tracing::trace!(
            frame_ms = self.state.frame_time.as_secs_f64() * 1000.0,
            "frame presented"
        );
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.state.viewport;
        let attrs = Window::default_attributes()
            .with_title("oceanview")
            .with_inner_size(PhysicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("oceanview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.viewport = (config.width, config.height);

        let renderer = match GridRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            &self.state.mesh,
        ) {
            Ok(renderer) => renderer,
            Err(err) => {
                tracing::error!("render pipeline rejected: {err}");
                self.fatal = Some(err);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        match cause {
            StartCause::Init => {
                self.next_tick = Instant::now() + TICK_INTERVAL;
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
            }
            StartCause::ResumeTimeReached { .. } => {
                self.state.apply_movement();
                self.state.redraw_pending = true;

                // Schedule from the previous deadline to keep the cadence
                // steady; catch up to now after a long frame.
                self.next_tick += TICK_INTERVAL;
                let now = Instant::now();
                if self.next_tick < now {
                    self.next_tick = now + TICK_INTERVAL;
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
            }
            _ => {}
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let (width, height) = (new_size.width.max(1), new_size.height.max(1));
                self.state.viewport = (width, height);
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = width;
                    config.height = height;
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, width, height);
                    }
                }
                self.state.redraw_pending = true;
                tracing::info!(width, height, "viewport resized");
            }
            WindowEvent::Focused(true) => {
                self.state.redraw_pending = true;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.mouse_captured = btn_state == ElementState::Pressed;
                if let Some(window) = &self.window {
                    window.set_cursor_visible(!self.state.mouse_captured);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mouse_captured {
                self.state.look(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Draw only once the event queue has drained.
        if !self.state.redraw_pending {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("oceanview starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(&cli);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.fatal.take() {
        return Err(err.into());
    }

    Ok(())
}
