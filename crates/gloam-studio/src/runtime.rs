use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use gloam_engine::{
    global_registry, native_resolver, GlutinDriver, GlutinDriverConfig, NativeSurfaceHandle,
    PixelFormatDescriptor, RenderSurfaceWidget, SubsystemEvent, SurfaceSize, WidgetConfig,
};

use crate::scene;

/// Window and surface configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub pixel_format: PixelFormatDescriptor,
    pub vsync: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "gloam studio".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
            pixel_format: PixelFormatDescriptor::default(),
            vsync: true,
        }
    }
}

impl StudioConfig {
    /// Defaults, with `GLOAM_SAMPLES` and `GLOAM_VSYNC=0` honored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(samples) = std::env::var("GLOAM_SAMPLES")
            .ok()
            .and_then(|s| s.parse::<u8>().ok())
        {
            config.pixel_format.samples = samples;
        }
        if std::env::var("GLOAM_VSYNC").is_ok_and(|v| v == "0") {
            config.vsync = false;
        }
        config
    }
}

/// Entry point for the studio event loop.
pub struct Runtime;

impl Runtime {
    pub fn run(config: StudioConfig) -> Result<()> {
        let event_loop = build_event_loop()?;

        global_registry().subscribe(|event| match event {
            SubsystemEvent::Initialized => log::info!("graphics subsystem up"),
            SubsystemEvent::ShuttingDown => log::info!("graphics subsystem going down"),
        });

        let mut state = AppState::new(config);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

// The resolver on X11-family systems needs Xlib handles, so Wayland
// sessions are sent through XWayland.
#[cfg(all(unix, not(target_os = "macos")))]
fn build_event_loop() -> Result<EventLoop<()>> {
    use winit::platform::x11::EventLoopBuilderExtX11;
    EventLoop::builder()
        .with_x11()
        .build()
        .context("failed to create winit EventLoop")
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn build_event_loop() -> Result<EventLoop<()>> {
    EventLoop::new().context("failed to create winit EventLoop")
}

struct Surface {
    // Declared before `window`: the widget must be torn down while the
    // native window still exists.
    widget: RenderSurfaceWidget<GlutinDriver>,
    window: Window,
}

struct AppState {
    config: StudioConfig,
    surface: Option<Surface>,
    exit_requested: bool,
}

impl AppState {
    fn new(config: StudioConfig) -> Self {
        Self {
            config,
            surface: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_surface(&self, event_loop: &ActiveEventLoop) -> Result<Surface> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let widget = build_widget(&self.config, &window)?;
        Ok(Surface { widget, window })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let err = match surface.widget.redraw() {
            Ok(()) => return,
            Err(e) => e,
        };

        if !err.is_context_lost() {
            log::error!("render surface failed: {err}");
            self.request_exit(event_loop);
            return;
        }

        // A lost context is rebuilt from scratch on the same window.
        log::warn!("{err}; rebuilding render surface");
        surface.widget.destroy();
        match build_widget(&self.config, &surface.window) {
            Ok(widget) => {
                surface.widget = widget;
                surface.window.request_redraw();
            }
            Err(e) => {
                log::error!("failed to rebuild render surface: {e:#}");
                self.request_exit(event_loop);
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }

        match self.create_surface(event_loop) {
            Ok(surface) => {
                surface.window.request_redraw();
                self.surface = Some(surface);
            }
            Err(e) => {
                log::error!("failed to create initial window: {e:#}");
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; pacing comes from vsync.
        if let Some(surface) = &self.surface {
            surface.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if surface.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(mut surface) = self.surface.take() {
                    surface.widget.destroy();
                    log::info!("closed after {} frames", surface.widget.frame_index());
                }
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                surface.widget.resize(to_surface_size(new_size));
                surface.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = surface.window.inner_size();
                surface.widget.resize(to_surface_size(new_size));
                surface.window.request_redraw();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Tear down while the event loop still owns a live display.
        self.surface = None;
    }
}

fn build_widget(
    config: &StudioConfig,
    window: &Window,
) -> Result<RenderSurfaceWidget<GlutinDriver>> {
    let handle =
        NativeSurfaceHandle::from_window(window).context("window has no native handle")?;
    let resolver = native_resolver().context("failed to set up window-info resolver")?;

    let driver = GlutinDriver::new(driver_config(config));
    let widget_config = WidgetConfig {
        pixel_format: config.pixel_format,
        initial_size: to_surface_size(window.inner_size()),
        ..Default::default()
    };

    let mut widget = RenderSurfaceWidget::new(handle, resolver, driver, widget_config);
    widget.set_paint(scene::paint);
    widget.on_initialized(|| log::info!("render surface ready"));
    widget.on_shutting_down(|| log::info!("render surface shutting down"));
    Ok(widget)
}

fn to_surface_size(size: PhysicalSize<u32>) -> SurfaceSize {
    SurfaceSize::new(size.width, size.height)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn driver_config(config: &StudioConfig) -> GlutinDriverConfig {
    let registrar: gloam_engine::context::XlibErrorHookRegistrar =
        std::sync::Arc::new(winit::platform::x11::register_xlib_error_hook);
    GlutinDriverConfig {
        vsync: config.vsync,
        xlib_error_hook: Some(registrar),
        ..Default::default()
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn driver_config(config: &StudioConfig) -> GlutinDriverConfig {
    GlutinDriverConfig {
        vsync: config.vsync,
        ..Default::default()
    }
}
