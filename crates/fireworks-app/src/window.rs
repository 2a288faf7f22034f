//! Windowed front end: winit event loop with a `pixels` framebuffer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fireworks_core::{Flow, Runner, ShowConfig, StopSignal};
use fireworks_platform::{Clock, Rect, Result, Rgb, Surface, SystemClock};
use glam::Vec2;
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::raster::Canvas;

const STATS_EVERY: Duration = Duration::from_secs(5);

/// Frame owned by `pixels`; the window is shared so the surface can be `'static`.
pub struct PixelsSurface {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl PixelsSurface {
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self> {
        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(width, height, texture).map_err(|e| e.to_string())?;
        Ok(Self {
            window,
            pixels,
            width,
            height,
        })
    }

    fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(self.pixels.frame_mut(), self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Err(err) = self.pixels.resize_surface(width, height) {
            error!("failed to resize surface to {width}x{height}: {err}");
        }
    }
}

impl Surface for PixelsSurface {
    fn clear(&mut self, color: Rgb) {
        self.canvas().clear(color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.canvas().fill_circle(center, radius, color);
    }

    fn fill_rect_alpha(&mut self, rect: Rect, color: Rgb, alpha: u8) {
        self.canvas().blend_rect(rect, color, alpha);
    }

    fn present(&mut self) -> Result<()> {
        self.window.pre_present_notify();
        self.pixels.render().map_err(|e| e.to_string())?;
        Ok(())
    }
}

struct FireworksApp {
    config: ShowConfig,
    stop: StopSignal,
    runner: Option<Runner<PixelsSurface, SystemClock>>,
    window: Option<Arc<Window>>,
    origin: Instant,
    last_stats: Instant,
}

impl FireworksApp {
    fn new(config: ShowConfig, stop: StopSignal) -> Self {
        Self {
            config,
            stop,
            runner: None,
            window: None,
            origin: Instant::now(),
            last_stats: Instant::now(),
        }
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = (self.config.viewport.width, self.config.viewport.height);
        let attrs = Window::default_attributes()
            .with_title("Fireworks")
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs).map_err(|e| e.to_string())?);
        let surface = PixelsSurface::new(Arc::clone(&window), width, height)?;

        let clock = SystemClock::new();
        self.origin = clock.origin();
        self.runner = Some(Runner::new(
            self.config.clone(),
            surface,
            clock,
            self.stop.clone(),
        ));
        info!("window open: {width}x{height}");
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        if runner.tick() == Flow::Stop {
            event_loop.exit();
            return;
        }
        if self.last_stats.elapsed() >= STATS_EVERY {
            self.last_stats = Instant::now();
            let stats = runner.show().stats();
            debug!(
                ticks = runner.ticks(),
                shells = stats.shells,
                particles = stats.particles,
                launched = stats.launched,
                "show stats"
            );
        }
    }
}

impl ApplicationHandler for FireworksApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.runner.is_some() {
            return;
        }
        if let Err(err) = self.open(event_loop) {
            error!("failed to open window: {err}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("exit requested");
                self.stop.raise();
            }
            WindowEvent::Resized(size) => {
                if let Some(runner) = self.runner.as_mut() {
                    runner.surface_mut().resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.stop.is_raised() {
            event_loop.exit();
            return;
        }
        let (Some(runner), Some(window)) = (self.runner.as_ref(), self.window.as_ref()) else {
            return;
        };
        let deadline = self.origin + runner.next_deadline();
        if runner.clock().now() >= runner.next_deadline() {
            window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
    }
}

/// Opens the window and blocks until the show is stopped.
pub fn run_app(config: ShowConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| e.to_string())?;
    let mut app = FireworksApp::new(config, StopSignal::new());
    event_loop.run_app(&mut app).map_err(|e| e.to_string())?;
    if let Some(runner) = app.runner.as_ref() {
        let stats = runner.show().stats();
        info!(
            ticks = runner.ticks(),
            launched = stats.launched,
            "window closed"
        );
    }
    Ok(())
}
