use crate::error::Result;
use crate::format::{ContextFlags, GlVersion, PixelFormatDescriptor};
use crate::platform::{SurfaceSize, WindowInfo};

use super::RenderTarget;

/// Version, flags and sharing requested for a new context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextRequest {
    pub version: GlVersion,
    pub flags: ContextFlags,
    pub shared: bool,
}

impl ContextRequest {
    pub fn from_format(format: &PixelFormatDescriptor, shared: bool) -> Self {
        Self {
            version: format.version,
            flags: format.flags,
            shared,
        }
    }
}

/// Native GL calls, one implementation per driver stack.
///
/// `GraphicsContext` is the only caller. It guarantees `release` runs at
/// most once per native context and is preceded by `make_current`.
pub trait GlDriver {
    type Native;

    /// Negotiates a pixel format and creates a context plus window surface.
    ///
    /// Must not make the context current. Fails with `UnsupportedPixelFormat`
    /// when no native format matches and `ContextCreationFailed` when the
    /// driver refuses the request; never downgrades an explicit version.
    fn create(
        &self,
        window: &WindowInfo,
        format: &PixelFormatDescriptor,
        request: &ContextRequest,
        size: SurfaceSize,
    ) -> Result<Self::Native>;

    /// Binds the context to the calling thread. `ContextLost` when the
    /// surface is gone.
    fn make_current(&self, native: &mut Self::Native) -> Result<()>;

    fn swap_buffers(&self, native: &mut Self::Native) -> Result<()>;

    /// Re-validates the surface against possibly changed geometry.
    fn update(&self, native: &mut Self::Native, size: SurfaceSize);

    /// Loads GL entry points. The context is current when this runs.
    fn load_functions(&self, native: &mut Self::Native) -> Result<()>;

    /// Describes the drawable the paint callback renders into.
    fn describe_target<'a>(&self, native: &'a Self::Native, size: SurfaceSize) -> RenderTarget<'a>;

    /// Destroys the native context. Runs while the context is current.
    fn release(&self, native: Self::Native);
}
