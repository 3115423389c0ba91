use crate::platform::SurfaceSize;

/// Which corner pixel row 0 lives in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceOrigin {
    BottomLeft,
    TopLeft,
}

/// What a paint callback draws into for one frame.
///
/// Width and height always reflect the latest geometry delivered by the
/// host; they are refreshed every frame.
#[derive(Clone, Copy)]
pub struct RenderTarget<'a> {
    pub width: u32,
    pub height: u32,
    /// Framebuffer object bound while painting (0 is the window surface).
    pub framebuffer: u32,
    pub stencil_bits: u8,
    pub samples: u8,
    pub origin: SurfaceOrigin,
    /// Zero-based count of frames presented by the owning widget.
    pub frame_index: u64,
    gl: Option<&'a glow::Context>,
}

impl<'a> RenderTarget<'a> {
    pub fn new(size: SurfaceSize, gl: Option<&'a glow::Context>) -> Self {
        Self {
            width: size.width,
            height: size.height,
            framebuffer: 0,
            stencil_bits: 0,
            samples: 0,
            origin: SurfaceOrigin::BottomLeft,
            frame_index: 0,
            gl,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    /// GL function table of the current context, once loaded.
    pub fn gl(&self) -> Option<&'a glow::Context> {
        self.gl
    }
}

impl std::fmt::Debug for RenderTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("framebuffer", &self.framebuffer)
            .field("stencil_bits", &self.stencil_bits)
            .field("samples", &self.samples)
            .field("origin", &self.origin)
            .field("frame_index", &self.frame_index)
            .field("gl_loaded", &self.gl.is_some())
            .finish()
    }
}
