use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{GlError, Result};
use crate::format::PixelFormatDescriptor;
use crate::platform::{SurfaceSize, WindowInfo};

use super::{ContextRequest, GlDriver, RenderTarget};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

// Context last made current on this thread (0 = none). A GL context is
// current on at most one thread and each thread has at most one current
// context, so a single slot per thread mirrors the driver's own state.
thread_local! {
    static CURRENT: Cell<u64> = const { Cell::new(0) };
}

/// A native GL context bound to the window it was created for.
///
/// Threading: `make_current` binds to the calling thread. Any thread that
/// issues GL calls must make the context current itself first, and only one
/// thread may hold it current at a time.
pub struct GraphicsContext<D: GlDriver> {
    id: u64,
    driver: D,
    // `None` once disposed.
    native: Option<D::Native>,
    format: PixelFormatDescriptor,
    request: ContextRequest,
    size: SurfaceSize,
    // Declared after `native` so the surface outlives the context on drop.
    window: WindowInfo,
}

impl<D: GlDriver> GraphicsContext<D> {
    /// Creates a context for `window`.
    ///
    /// `format` must already have defaults applied. The new context is not
    /// current.
    pub fn create(
        driver: D,
        format: PixelFormatDescriptor,
        window: WindowInfo,
        request: ContextRequest,
        size: SurfaceSize,
    ) -> Result<Self> {
        let native = driver.create(&window, &format, &request, size)?;
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        log::info!(
            "created GL context #{id} on {} (version {}, flags {:?}, color {} / depth {} / stencil {} / samples {}, shared={})",
            window.platform(),
            request.version,
            request.flags,
            format.color_bpp,
            format.depth_bpp,
            format.stencil_bpp,
            format.samples,
            request.shared,
        );

        Ok(Self {
            id,
            driver,
            native: Some(native),
            format,
            request,
            size,
            window,
        })
    }

    pub fn pixel_format(&self) -> &PixelFormatDescriptor {
        &self.format
    }

    pub fn window_info(&self) -> &WindowInfo {
        &self.window
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn is_shared(&self) -> bool {
        self.request.shared
    }

    pub fn is_disposed(&self) -> bool {
        self.native.is_none()
    }

    /// Whether this context is the one current on the calling thread.
    pub fn is_current(&self) -> bool {
        self.native.is_some() && CURRENT.with(|c| c.get() == self.id)
    }

    /// Binds this context to the calling thread against its window.
    pub fn make_current(&mut self) -> Result<()> {
        let native = self
            .native
            .as_mut()
            .ok_or_else(|| GlError::context_lost("context was disposed"))?;

        match self.driver.make_current(native) {
            Ok(()) => {
                CURRENT.with(|c| c.set(self.id));
                Ok(())
            }
            Err(e) => {
                CURRENT.with(|c| {
                    if c.get() == self.id {
                        c.set(0);
                    }
                });
                Err(e)
            }
        }
    }

    /// Presents the back buffer.
    ///
    /// Swapping a context that is not current on this thread is a caller
    /// bug; it is logged and skipped.
    pub fn swap_buffers(&mut self) -> Result<()> {
        if !self.is_current() {
            log::warn!("swap_buffers on GL context #{} which is not current; skipped", self.id);
            return Ok(());
        }
        match self.native.as_mut() {
            Some(native) => self.driver.swap_buffers(native),
            None => Ok(()),
        }
    }

    /// Call whenever the native surface is resized or reparented.
    pub fn update(&mut self, size: SurfaceSize) {
        self.size = size;
        if let Some(native) = self.native.as_mut() {
            self.driver.update(native, size);
        }
    }

    /// Loads GL entry points for this context. Must be current.
    pub fn load_functions(&mut self) -> Result<()> {
        let native = self
            .native
            .as_mut()
            .ok_or_else(|| GlError::context_lost("context was disposed"))?;
        self.driver.load_functions(native)
    }

    /// Describes the drawable for the current frame.
    pub fn render_target(&self, frame_index: u64) -> Option<RenderTarget<'_>> {
        let native = self.native.as_ref()?;
        let mut target = self.driver.describe_target(native, self.size);
        target.width = self.size.width;
        target.height = self.size.height;
        target.frame_index = frame_index;
        Some(target)
    }

    /// Destroys the native context. Idempotent.
    ///
    /// Makes the context current first so the driver frees its objects
    /// against the right context.
    pub fn dispose(&mut self) {
        if self.native.is_none() {
            return;
        }

        if let Err(e) = self.make_current() {
            log::warn!("GL context #{} could not be made current for disposal: {e}", self.id);
        }

        if let Some(native) = self.native.take() {
            self.driver.release(native);
        }

        CURRENT.with(|c| {
            if c.get() == self.id {
                c.set(0);
            }
        });
        log::debug!("disposed GL context #{}", self.id);
    }
}

impl<D: GlDriver> Drop for GraphicsContext<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<D: GlDriver> std::fmt::Debug for GraphicsContext<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("id", &self.id)
            .field("platform", &self.window.platform())
            .field("format", &self.format)
            .field("request", &self.request)
            .field("size", &self.size)
            .field("current", &self.is_current())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{win32_window_info, Call, RecordingDriver};
    use crate::format::GlVersion;

    fn format() -> PixelFormatDescriptor {
        PixelFormatDescriptor::default().with_defaults()
    }

    fn create(driver: &RecordingDriver) -> GraphicsContext<RecordingDriver> {
        GraphicsContext::create(
            driver.clone(),
            format(),
            win32_window_info(),
            ContextRequest::default(),
            SurfaceSize::new(100, 100),
        )
        .unwrap()
    }

    #[test]
    fn new_context_is_not_current() {
        let driver = RecordingDriver::default();
        let ctx = create(&driver);
        assert!(!ctx.is_current());
        assert_eq!(driver.calls(), vec![Call::Create]);
    }

    #[test]
    fn make_current_tracks_the_calling_thread() {
        let driver = RecordingDriver::default();
        let mut a = create(&driver);
        let mut b = create(&driver);

        a.make_current().unwrap();
        assert!(a.is_current());
        assert!(!b.is_current());

        b.make_current().unwrap();
        assert!(!a.is_current());
        assert!(b.is_current());
    }

    #[test]
    fn dispose_twice_releases_once() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        ctx.dispose();
        ctx.dispose();
        drop(ctx);

        assert_eq!(driver.count(|c| matches!(c, Call::Release(_))), 1);
    }

    #[test]
    fn dispose_makes_current_before_release() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        driver.clear();
        ctx.dispose();
        assert_eq!(driver.calls(), vec![Call::MakeCurrent(1), Call::Release(1)]);
        assert!(ctx.is_disposed());
        assert!(!ctx.is_current());
    }

    #[test]
    fn dispose_releases_even_if_surface_is_gone() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        driver.lose_surface();
        ctx.dispose();
        assert_eq!(driver.count(|c| matches!(c, Call::Release(_))), 1);
    }

    #[test]
    fn drop_disposes() {
        let driver = RecordingDriver::default();
        drop(create(&driver));
        assert_eq!(driver.count(|c| matches!(c, Call::Release(_))), 1);
    }

    #[test]
    fn lost_surface_surfaces_on_make_current() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        ctx.make_current().unwrap();
        driver.lose_surface();

        let err = ctx.make_current().unwrap_err();
        assert!(err.is_context_lost());
        assert!(!ctx.is_current());
    }

    #[test]
    fn make_current_after_dispose_is_context_lost() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        ctx.dispose();
        assert!(ctx.make_current().unwrap_err().is_context_lost());
    }

    #[test]
    fn swap_without_current_is_skipped() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        ctx.swap_buffers().unwrap();
        assert_eq!(driver.count(|c| matches!(c, Call::Swap(_))), 0);

        ctx.make_current().unwrap();
        ctx.swap_buffers().unwrap();
        assert_eq!(driver.count(|c| matches!(c, Call::Swap(_))), 1);
    }

    #[test]
    fn update_is_forwarded_and_idempotent() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        ctx.update(SurfaceSize::new(400, 300));
        ctx.update(SurfaceSize::new(400, 300));
        assert_eq!(ctx.size(), SurfaceSize::new(400, 300));
        assert_eq!(
            driver.count(|c| *c == Call::Update(SurfaceSize::new(400, 300))),
            2
        );
    }

    #[test]
    fn render_target_tracks_latest_size() {
        let driver = RecordingDriver::default();
        let mut ctx = create(&driver);
        ctx.update(SurfaceSize::new(640, 480));
        let target = ctx.render_target(7).unwrap();
        assert_eq!((target.width, target.height), (640, 480));
        assert_eq!(target.frame_index, 7);
    }

    #[test]
    fn explicit_version_failure_is_not_downgraded() {
        let driver = RecordingDriver::default().max_version(GlVersion::new(3, 3));
        let request = ContextRequest {
            version: GlVersion::new(4, 5),
            ..Default::default()
        };
        let err = GraphicsContext::create(
            driver.clone(),
            format(),
            win32_window_info(),
            request,
            SurfaceSize::new(1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, GlError::ContextCreationFailed { .. }));
        assert_eq!(driver.calls(), vec![Call::Create]);
    }
}
