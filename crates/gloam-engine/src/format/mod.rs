//! Pixel-format and context-version requests.
//!
//! These are plain values: nothing here touches the driver. Defaults are
//! substituted once, right before a context is created, and the result is
//! treated as immutable afterwards.

mod flags;
mod pixel_format;

pub use flags::{ContextFlags, GlVersion};
pub use pixel_format::{ColorLayout, PixelFormatDescriptor, DEFAULT_COLOR_BPP, DEFAULT_DEPTH_BPP};
