use std::num::NonZeroU32;

use glow::HasContext as _;
use glutin::config::{ColorBufferType, Config, ConfigTemplate, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributes, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
    PossiblyCurrentContext, PossiblyCurrentGlContext, Robustness, Version,
};
use glutin::display::{Display, DisplayApiPreference, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::RawWindowHandle;

use crate::error::{GlError, Result};
use crate::format::{ColorLayout, ContextFlags, PixelFormatDescriptor};
use crate::platform::{SurfaceSize, WindowInfo};

use super::selection::{self, ConfigSummary};
use super::{ContextRequest, GlDriver, RenderTarget};

/// Callback Xlib invokes on protocol errors; returns `true` when handled.
#[cfg(all(unix, not(target_os = "macos")))]
pub type XlibErrorHook =
    Box<dyn Fn(*mut std::ffi::c_void, *mut std::ffi::c_void) -> bool + Send + Sync>;

/// Installs an [`XlibErrorHook`] into the host toolkit's error handler.
#[cfg(all(unix, not(target_os = "macos")))]
pub type XlibErrorHookRegistrar = std::sync::Arc<dyn Fn(XlibErrorHook) + Send + Sync>;

/// Driver tuning.
#[derive(Clone)]
pub struct GlutinDriverConfig {
    /// Rank hardware-accelerated configs above software ones.
    pub prefer_hardware_accelerated: bool,

    /// Sync swaps to the display refresh.
    pub vsync: bool,

    /// Hook registrar for GLX. Without one, X11 contexts go through EGL,
    /// which reports errors without an Xlib error handler.
    #[cfg(all(unix, not(target_os = "macos")))]
    pub xlib_error_hook: Option<XlibErrorHookRegistrar>,
}

impl Default for GlutinDriverConfig {
    fn default() -> Self {
        Self {
            prefer_hardware_accelerated: true,
            vsync: true,
            #[cfg(all(unix, not(target_os = "macos")))]
            xlib_error_hook: None,
        }
    }
}

impl std::fmt::Debug for GlutinDriverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("GlutinDriverConfig");
        s.field("prefer_hardware_accelerated", &self.prefer_hardware_accelerated)
            .field("vsync", &self.vsync);
        #[cfg(all(unix, not(target_os = "macos")))]
        s.field("xlib_error_hook", &self.xlib_error_hook.is_some());
        s.finish()
    }
}

/// WGL / CGL / GLX / EGL through `glutin`.
#[derive(Debug, Clone, Default)]
pub struct GlutinDriver {
    config: GlutinDriverConfig,
}

/// Native state of one glutin-backed context.
///
/// Field order is drop order: function table, surface, context, display.
pub struct GlutinContext {
    gl: Option<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    summary: ConfigSummary,
    display: Display,
}

impl GlutinContext {
    pub fn gl(&self) -> Option<&glow::Context> {
        self.gl.as_ref()
    }
}

impl GlutinDriver {
    pub fn new(config: GlutinDriverConfig) -> Self {
        Self { config }
    }

    #[cfg(target_os = "windows")]
    fn display_preference(&self, window: RawWindowHandle) -> DisplayApiPreference {
        DisplayApiPreference::WglThenEgl(Some(window))
    }

    #[cfg(target_os = "macos")]
    fn display_preference(&self, _window: RawWindowHandle) -> DisplayApiPreference {
        DisplayApiPreference::Cgl
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn display_preference(&self, _window: RawWindowHandle) -> DisplayApiPreference {
        match &self.config.xlib_error_hook {
            Some(registrar) => {
                let registrar = std::sync::Arc::clone(registrar);
                DisplayApiPreference::GlxThenEgl(Box::new(move |hook| registrar(hook)))
            }
            None => DisplayApiPreference::Egl,
        }
    }

    fn choose_config(
        &self,
        display: &Display,
        template: ConfigTemplate,
        format: &PixelFormatDescriptor,
        layout: ColorLayout,
    ) -> Result<(Config, ConfigSummary)> {
        // SAFETY: the template's native window is the live widget window.
        let configs: Vec<Config> = unsafe { display.find_configs(template) }
            .map_err(|e| GlError::unsupported_format(format!("config query failed: {e}")))?
            .collect();

        let summaries: Vec<ConfigSummary> = configs.iter().map(summarize).collect();
        let index = selection::select_config(
            &summaries,
            format,
            layout,
            self.config.prefer_hardware_accelerated,
        )
        .ok_or_else(|| {
            GlError::unsupported_format(format!(
                "none of {} native configs satisfy color {} / depth {} / stencil {} / samples {} / stereo {}",
                configs.len(),
                format.color_bpp,
                format.depth_bpp,
                format.stencil_bpp,
                format.samples,
                format.stereo,
            ))
        })?;

        let summary = summaries[index];
        let config = configs
            .into_iter()
            .nth(index)
            .ok_or_else(|| GlError::unsupported_format("selected config vanished"))?;
        Ok((config, summary))
    }
}

fn summarize(config: &Config) -> ConfigSummary {
    let color_bits = match config.color_buffer_type() {
        Some(ColorBufferType::Rgb { r_size, g_size, b_size }) => r_size + g_size + b_size,
        Some(ColorBufferType::Luminance(bits)) => bits,
        None => 0,
    };
    ConfigSummary {
        color_bits,
        alpha: config.alpha_size(),
        depth: config.depth_size(),
        stencil: config.stencil_size(),
        samples: config.num_samples(),
        hardware: config.hardware_accelerated(),
    }
}

fn config_template(
    format: &PixelFormatDescriptor,
    layout: ColorLayout,
    window: RawWindowHandle,
) -> ConfigTemplate {
    let mut builder = ConfigTemplateBuilder::new()
        .with_buffer_type(ColorBufferType::Rgb {
            r_size: layout.red,
            g_size: layout.green,
            b_size: layout.blue,
        })
        .with_alpha_size(layout.alpha)
        .with_depth_size(format.depth_bpp)
        .with_stencil_size(format.stencil_bpp)
        .with_single_buffering(format.single_buffer)
        .compatible_with_native_window(window);

    if format.samples > 1 {
        builder = builder.with_multisampling(format.samples);
    }
    if format.stereo {
        builder = builder.with_stereoscopy(Some(true));
    }
    builder.build()
}

/// `None` lets the driver pick the best legacy-compatible version.
fn pinned_version(request: &ContextRequest) -> Option<Version> {
    (!request.version.is_legacy_default())
        .then(|| Version::new(request.version.major, request.version.minor))
}

fn context_attributes(request: &ContextRequest, window: RawWindowHandle) -> ContextAttributes {
    let version = pinned_version(request);

    let api = if request.flags.contains(ContextFlags::EMBEDDED) {
        ContextApi::Gles(version)
    } else {
        ContextApi::OpenGl(version)
    };

    let mut builder = ContextAttributesBuilder::new()
        .with_context_api(api)
        .with_debug(request.flags.contains(ContextFlags::DEBUG));

    if request.flags.contains(ContextFlags::FORWARD_COMPATIBLE) {
        builder = builder.with_profile(GlProfile::Core);
    } else if version.is_none() {
        builder = builder.with_profile(GlProfile::Compatibility);
    }
    if request.flags.contains(ContextFlags::ROBUST) {
        builder = builder.with_robustness(Robustness::RobustLoseContextOnReset);
    }

    builder.build(Some(window))
}

fn lost(what: &str, err: glutin::error::Error) -> GlError {
    GlError::context_lost(format!("{what} ({:?}): {err}", err.error_kind()))
}

impl GlDriver for GlutinDriver {
    type Native = GlutinContext;

    fn create(
        &self,
        window: &WindowInfo,
        format: &PixelFormatDescriptor,
        request: &ContextRequest,
        size: SurfaceSize,
    ) -> Result<GlutinContext> {
        let layout = selection::validate(format)?;
        if format.accum_bpp > 0 {
            log::debug!(
                "accumulation buffer ({} bpp) requested; not negotiated by this driver",
                format.accum_bpp
            );
        }

        let raw_window = window.raw_window_handle();
        let raw_display = window.raw_display_handle();

        // SAFETY: both handles come from the host toolkit and outlive the
        // context built on them.
        let display = unsafe { Display::new(raw_display, self.display_preference(raw_window)) }
            .map_err(|e| GlError::creation_failed(format!("no GL display: {e}")))?;
        log::debug!("GL display: {}", display.version_string());

        let template = config_template(format, layout, raw_window);
        let (config, summary) = self.choose_config(&display, template, format, layout)?;

        let attributes = context_attributes(request, raw_window);
        // SAFETY: `config` belongs to `display`.
        let context = unsafe { display.create_context(&config, &attributes) }
            .map_err(|e| {
                GlError::creation_failed(format!(
                    "driver refused GL {} ({:?}): {e}",
                    request.version, request.flags
                ))
            })?
            .treat_as_possibly_current();

        let (width, height) = size.clamped();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new()
            .with_single_buffer(format.single_buffer)
            .build(raw_window, width, height);
        // SAFETY: `raw_window` is the window `config` was matched against.
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .map_err(|e| GlError::creation_failed(format!("window surface: {e}")))?;

        Ok(GlutinContext {
            gl: None,
            surface,
            context,
            summary,
            display,
        })
    }

    fn make_current(&self, native: &mut GlutinContext) -> Result<()> {
        native
            .context
            .make_current(&native.surface)
            .map_err(|e| lost("make current", e))
    }

    fn swap_buffers(&self, native: &mut GlutinContext) -> Result<()> {
        native
            .surface
            .swap_buffers(&native.context)
            .map_err(|e| lost("swap buffers", e))
    }

    fn update(&self, native: &mut GlutinContext, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        let (width, height) = size.clamped();
        native.surface.resize(&native.context, width, height);
    }

    fn load_functions(&self, native: &mut GlutinContext) -> Result<()> {
        let display = &native.display;
        // SAFETY: the context is current; the loader returns pointers valid
        // for it.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };
        log::debug!("loaded GL {:?}", gl.version());

        if self.config.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = native.surface.set_swap_interval(&native.context, interval) {
                log::warn!("vsync unavailable: {e}");
            }
        }

        native.gl = Some(gl);
        Ok(())
    }

    fn describe_target<'a>(&self, native: &'a GlutinContext, size: SurfaceSize) -> RenderTarget<'a> {
        let mut target = RenderTarget::new(size, native.gl.as_ref());
        target.stencil_bits = native.summary.stencil;
        target.samples = native.summary.samples;
        if let Some(gl) = &native.gl {
            // SAFETY: only called while the context is current.
            let bound = unsafe { gl.get_parameter_i32(glow::FRAMEBUFFER_BINDING) };
            target.framebuffer = u32::try_from(bound).unwrap_or(0);
        }
        target
    }

    fn release(&self, native: GlutinContext) {
        let GlutinContext {
            gl,
            surface,
            context,
            display,
            ..
        } = native;
        drop(gl);
        drop(surface);
        drop(context);
        drop(display);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::GlVersion;

    #[test]
    fn default_config_prefers_hardware_and_vsync() {
        let c = GlutinDriverConfig::default();
        assert!(c.prefer_hardware_accelerated);
        assert!(c.vsync);
    }

    #[test]
    fn legacy_request_leaves_version_open() {
        assert!(pinned_version(&ContextRequest::default()).is_none());
    }

    #[test]
    fn explicit_request_pins_version() {
        let r = ContextRequest {
            version: GlVersion::new(3, 3),
            ..Default::default()
        };
        let pinned = pinned_version(&r).map(|v| (v.major, v.minor));
        assert_eq!(pinned, Some((3, 3)));
    }
}
