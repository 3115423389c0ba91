//! Native GL context ownership.
//!
//! [`GraphicsContext`] owns one native context bound to one [`WindowInfo`]
//! and enforces the lifecycle rules (current-before-destroy, single
//! release). The native calls themselves sit behind [`GlDriver`];
//! [`GlutinDriver`] is the production implementation.
//!
//! [`WindowInfo`]: crate::platform::WindowInfo

mod driver;
mod glutin_driver;
mod graphics;
mod selection;
mod target;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::{ContextRequest, GlDriver};
pub use crate::error::GlError;
pub use glutin_driver::{GlutinContext, GlutinDriver, GlutinDriverConfig};
pub use graphics::GraphicsContext;
pub use target::{RenderTarget, SurfaceOrigin};

#[cfg(all(unix, not(target_os = "macos")))]
pub use glutin_driver::{XlibErrorHook, XlibErrorHookRegistrar};
