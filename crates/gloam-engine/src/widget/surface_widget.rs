use std::sync::Arc;

use crate::context::{ContextRequest, GlDriver, GraphicsContext, RenderTarget};
use crate::error::{GlError, Result};
use crate::platform::{NativeSurfaceHandle, SurfaceSize, WindowInfoResolver};
use crate::registry::{global_registry, RegistryToken, SharedContextRegistry};

use super::observers::LifecycleObservers;
use super::{WidgetConfig, WidgetState};

/// Draws one frame. Runs with the widget's context current.
pub type PaintCallback = Box<dyn FnMut(&RenderTarget<'_>)>;

/// A GL drawing surface embedded in a host-owned window.
///
/// The widget does not own the native window; it owns the context built on
/// top of it. The host must keep the window alive until [`destroy`] returns
/// or the widget is dropped.
///
/// All methods are expected to be called from the host's UI thread.
///
/// [`destroy`]: RenderSurfaceWidget::destroy
pub struct RenderSurfaceWidget<D: GlDriver> {
    surface: NativeSurfaceHandle,
    resolver: Box<dyn WindowInfoResolver>,
    // Moved into the context on initialization.
    driver: Option<D>,
    config: WidgetConfig,
    registry: Arc<SharedContextRegistry>,

    state: WidgetState,
    context: Option<GraphicsContext<D>>,
    token: Option<RegistryToken>,
    size: SurfaceSize,
    frame_index: u64,

    observers: LifecycleObservers,
    paint: Option<PaintCallback>,
}

impl<D: GlDriver> RenderSurfaceWidget<D> {
    /// Creates an uninitialized widget that joins the process-wide registry.
    pub fn new(
        surface: NativeSurfaceHandle,
        resolver: impl WindowInfoResolver + 'static,
        driver: D,
        config: WidgetConfig,
    ) -> Self {
        Self::with_registry(surface, resolver, driver, config, global_registry())
    }

    /// Like [`new`](Self::new), but accounts shared contexts in `registry`.
    pub fn with_registry(
        surface: NativeSurfaceHandle,
        resolver: impl WindowInfoResolver + 'static,
        driver: D,
        config: WidgetConfig,
        registry: Arc<SharedContextRegistry>,
    ) -> Self {
        Self {
            surface,
            resolver: Box::new(resolver),
            driver: Some(driver),
            size: config.initial_size,
            config,
            registry,
            state: WidgetState::Uninitialized,
            context: None,
            token: None,
            frame_index: 0,
            observers: LifecycleObservers::default(),
            paint: None,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == WidgetState::Ready
    }

    pub fn context(&self) -> Option<&GraphicsContext<D>> {
        self.context.as_ref()
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Frames presented so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Installs the frame painter, replacing any previous one.
    pub fn set_paint<F>(&mut self, paint: F)
    where
        F: FnMut(&RenderTarget<'_>) + 'static,
    {
        self.paint = Some(Box::new(paint));
    }

    /// Runs after the context is created and current, before the first
    /// frame is painted.
    pub fn on_initialized(&mut self, f: impl FnMut() + 'static) {
        self.observers.add_initialized(Box::new(f));
    }

    /// Runs during teardown while the context is still current, so GL
    /// objects owned by the observer can be freed.
    pub fn on_shutting_down(&mut self, f: impl FnMut() + 'static) {
        self.observers.add_shutting_down(Box::new(f));
    }

    /// Runs after each paint, before the buffers are swapped.
    pub fn on_render_frame(&mut self, f: impl FnMut() + 'static) {
        self.observers.add_render_frame(Box::new(f));
    }

    /// Handles a "redraw requested" notification from the host.
    ///
    /// The first call builds the context. Format and creation failures are
    /// fatal: the widget moves to [`WidgetState::Destroyed`] and the error is
    /// returned. A lost context is returned without changing state; the
    /// caller decides whether to destroy and rebuild.
    pub fn redraw(&mut self) -> Result<()> {
        match self.state {
            WidgetState::Uninitialized => self.initialize()?,
            WidgetState::Ready => {}
            WidgetState::Initializing | WidgetState::ShuttingDown | WidgetState::Destroyed => {
                log::trace!("redraw ignored in state {:?}", self.state);
                return Ok(());
            }
        }

        let ctx = self
            .context
            .as_mut()
            .ok_or_else(|| GlError::context_lost("widget has no context"))?;
        ctx.make_current()?;

        {
            let target = ctx
                .render_target(self.frame_index)
                .ok_or_else(|| GlError::context_lost("context was disposed"))?;
            if let Some(paint) = self.paint.as_mut() {
                paint(&target);
            }
        }
        self.observers.fire_render_frame();

        ctx.swap_buffers()?;
        self.frame_index += 1;
        Ok(())
    }

    /// Handles a "resized" notification from the host.
    ///
    /// Before initialization the size is only recorded and used when the
    /// context is created.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        if self.state != WidgetState::Ready {
            return;
        }
        if let Some(ctx) = self.context.as_mut() {
            log::debug!("surface resized to {}x{}", size.width, size.height);
            ctx.update(size);
        }
    }

    /// Tears the widget down. Idempotent; also run on drop.
    ///
    /// The context is made current, then shutdown observers run, then the
    /// registry reference is released, and finally the context is disposed.
    pub fn destroy(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        // An initialized observer that panicked leaves the widget
        // `Initializing` with a live context and registry token; those get
        // the full teardown too.
        if self.context.is_none() && self.token.is_none() {
            self.state = WidgetState::Destroyed;
            return;
        }

        self.state = WidgetState::ShuttingDown;

        if let Some(ctx) = self.context.as_mut() {
            if let Err(e) = ctx.make_current() {
                log::warn!("could not make context current for teardown: {e}");
            }
        }

        self.observers.fire_shutting_down();

        if let Some(token) = self.token.take() {
            self.registry.release(token);
        }

        if let Some(mut ctx) = self.context.take() {
            ctx.dispose();
        }

        self.state = WidgetState::Destroyed;
        log::debug!("render surface destroyed after {} frames", self.frame_index);
    }

    fn initialize(&mut self) -> Result<()> {
        self.state = WidgetState::Initializing;
        match self.build_context() {
            Ok((ctx, token)) => {
                self.context = Some(ctx);
                self.token = Some(token);
                self.observers.fire_initialized();
                self.state = WidgetState::Ready;
                Ok(())
            }
            Err(e) => {
                log::error!("render surface initialization failed: {e}");
                self.state = WidgetState::Destroyed;
                Err(e)
            }
        }
    }

    // Everything created here is dropped again on error, so a failed
    // initialization leaves nothing behind.
    fn build_context(&mut self) -> Result<(GraphicsContext<D>, RegistryToken)> {
        let driver = self
            .driver
            .take()
            .ok_or_else(|| GlError::creation_failed("driver already consumed"))?;

        let format = self.config.pixel_format.with_defaults();
        let share = self.config.share_contexts;

        let window = self.resolver.resolve(&self.surface, &format)?;
        let request = ContextRequest::from_format(&format, share);
        let mut ctx = GraphicsContext::create(driver, format, window, request, self.size)?;
        ctx.make_current()?;
        ctx.load_functions()?;

        let token = self.registry.acquire(share);
        if token.opened_namespace() {
            log::info!("shared GL namespace opened");
        }
        Ok((ctx, token))
    }
}

impl<D: GlDriver> Drop for RenderSurfaceWidget<D> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<D: GlDriver> std::fmt::Debug for RenderSurfaceWidget<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurfaceWidget")
            .field("platform", &self.resolver.platform())
            .field("state", &self.state)
            .field("size", &self.size)
            .field("frame_index", &self.frame_index)
            .field("context", &self.context)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
