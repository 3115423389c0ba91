use crate::format::PixelFormatDescriptor;
use crate::platform::SurfaceSize;

/// Construction parameters for a `RenderSurfaceWidget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Requested framebuffer format. Zero color depth picks platform
    /// defaults at initialization.
    pub pixel_format: PixelFormatDescriptor,

    /// Join the process-wide shared GL namespace.
    pub share_contexts: bool,

    /// Size of the host window when the widget is created. Updated by
    /// resize notifications.
    pub initial_size: SurfaceSize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormatDescriptor::default(),
            share_contexts: true,
            initial_size: SurfaceSize::new(1, 1),
        }
    }
}
