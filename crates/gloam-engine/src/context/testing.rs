//! Recording test doubles for the driver and resolver seams.

use std::num::NonZeroIsize;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{GlError, Result};
use crate::format::{GlVersion, PixelFormatDescriptor};
use crate::platform::{
    NativeSurfaceHandle, PlatformKind, SurfaceSize, Win32WindowInfo, WindowInfo,
    WindowInfoResolver,
};

use super::{ContextRequest, GlDriver, RenderTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Resolve,
    Create,
    MakeCurrent(u32),
    Swap(u32),
    Update(SurfaceSize),
    LoadFunctions(u32),
    Release(u32),
    /// Marker pushed by test observers and listeners.
    Event(&'static str),
}

#[derive(Clone, Default)]
pub(crate) struct RecordingDriver {
    log: Arc<Mutex<Vec<Call>>>,
    next_id: Arc<AtomicU32>,
    lost: Arc<AtomicBool>,
    max_version: Option<GlVersion>,
    no_format: bool,
}

impl RecordingDriver {
    pub(crate) fn max_version(mut self, version: GlVersion) -> Self {
        self.max_version = Some(version);
        self
    }

    pub(crate) fn without_formats(mut self) -> Self {
        self.no_format = true;
        self
    }

    pub(crate) fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.log.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    pub(crate) fn lose_surface(&self) {
        self.lost.store(true, Ordering::SeqCst);
    }

    pub(crate) fn restore_surface(&self) {
        self.lost.store(false, Ordering::SeqCst);
    }

    fn check_surface(&self) -> Result<()> {
        if self.lost.load(Ordering::SeqCst) {
            Err(GlError::context_lost("surface destroyed"))
        } else {
            Ok(())
        }
    }
}

impl GlDriver for RecordingDriver {
    type Native = u32;

    fn create(
        &self,
        _window: &WindowInfo,
        _format: &PixelFormatDescriptor,
        request: &ContextRequest,
        _size: SurfaceSize,
    ) -> Result<u32> {
        self.record(Call::Create);
        if self.no_format {
            return Err(GlError::unsupported_format("no formats"));
        }
        if let Some(max) = self.max_version {
            if !request.version.is_legacy_default() && request.version > max {
                return Err(GlError::creation_failed(format!(
                    "GL {} unavailable (max {max})",
                    request.version
                )));
            }
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn make_current(&self, native: &mut u32) -> Result<()> {
        self.record(Call::MakeCurrent(*native));
        self.check_surface()
    }

    fn swap_buffers(&self, native: &mut u32) -> Result<()> {
        self.record(Call::Swap(*native));
        self.check_surface()
    }

    fn update(&self, _native: &mut u32, size: SurfaceSize) {
        self.record(Call::Update(size));
    }

    fn load_functions(&self, native: &mut u32) -> Result<()> {
        self.record(Call::LoadFunctions(*native));
        Ok(())
    }

    fn describe_target<'a>(&self, _native: &'a u32, size: SurfaceSize) -> RenderTarget<'a> {
        RenderTarget::new(size, None)
    }

    fn release(&self, native: u32) {
        self.record(Call::Release(native));
    }
}

pub(crate) fn win32_window_info() -> WindowInfo {
    WindowInfo::Win32(Win32WindowInfo {
        hwnd: NonZeroIsize::MIN,
        hinstance: None,
    })
}

/// Resolves every surface to a fixed Win32 target.
pub(crate) struct StubResolver {
    driver: RecordingDriver,
    fail: Option<GlError>,
}

impl StubResolver {
    pub(crate) fn new(driver: &RecordingDriver) -> Self {
        Self {
            driver: driver.clone(),
            fail: None,
        }
    }

    pub(crate) fn failing(driver: &RecordingDriver, err: GlError) -> Self {
        Self {
            driver: driver.clone(),
            fail: Some(err),
        }
    }
}

impl WindowInfoResolver for StubResolver {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn resolve(
        &self,
        _surface: &NativeSurfaceHandle,
        _format: &PixelFormatDescriptor,
    ) -> Result<WindowInfo> {
        self.driver.record(Call::Resolve);
        match &self.fail {
            Some(err) => Err(err.clone()),
            None => Ok(win32_window_info()),
        }
    }
}
