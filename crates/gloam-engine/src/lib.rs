//! Gloam engine crate.
//!
//! An OpenGL drawing surface that embeds inside a window owned by some other
//! windowing toolkit. The host forwards its redraw, resize and destroy
//! notifications to a [`RenderSurfaceWidget`], which builds a context on the
//! first redraw, paints through a callback each frame and tears everything
//! down in a fixed order.

pub mod context;
pub mod error;
pub mod format;
pub mod logging;
pub mod platform;
pub mod registry;
pub mod widget;

pub use context::{GlDriver, GlutinDriver, GlutinDriverConfig, GraphicsContext, RenderTarget};
pub use error::{GlError, Result};
pub use format::{ContextFlags, GlVersion, PixelFormatDescriptor};
pub use platform::{native_resolver, NativeSurfaceHandle, SurfaceSize, WindowInfoResolver};
pub use registry::{global_registry, SharedContextRegistry, SubsystemEvent};
pub use widget::{RenderSurfaceWidget, WidgetConfig, WidgetState};
