//! Native surface handles and per-platform window-info resolution.
//!
//! This is the only place that knows which windowing system is running.
//! Callers hand in the host toolkit's raw handles and get back a
//! [`WindowInfo`] the context layer can bind to.

mod handle;
mod resolver;
mod window_info;
mod xlib;

#[cfg(all(unix, not(target_os = "macos")))]
mod xlib_dynamic;

pub use handle::{NativeSurfaceHandle, PlatformKind, SurfaceSize};
pub use resolver::{AppKitResolver, Win32Resolver, WindowInfoResolver};
pub use window_info::{AppKitWindowInfo, Win32WindowInfo, WindowInfo};
pub use xlib::{XVisual, XlibApi, XlibResolver, XlibWindowInfo};

#[cfg(all(unix, not(target_os = "macos")))]
pub use xlib_dynamic::DynamicXlib;

/// Resolver for the platform this crate was compiled for.
#[cfg(target_os = "windows")]
pub type NativeResolver = Win32Resolver;

/// Resolver for the platform this crate was compiled for.
#[cfg(target_os = "macos")]
pub type NativeResolver = AppKitResolver;

/// Resolver for the platform this crate was compiled for.
#[cfg(all(unix, not(target_os = "macos")))]
pub type NativeResolver = XlibResolver;

/// Builds the resolver for the running platform.
///
/// On X11 this loads libX11; the other platforms cannot fail.
#[cfg(target_os = "windows")]
pub fn native_resolver() -> crate::error::Result<NativeResolver> {
    Ok(Win32Resolver)
}

/// Builds the resolver for the running platform.
///
/// On X11 this loads libX11; the other platforms cannot fail.
#[cfg(target_os = "macos")]
pub fn native_resolver() -> crate::error::Result<NativeResolver> {
    Ok(AppKitResolver)
}

/// Builds the resolver for the running platform.
///
/// On X11 this loads libX11; the other platforms cannot fail.
#[cfg(all(unix, not(target_os = "macos")))]
pub fn native_resolver() -> crate::error::Result<NativeResolver> {
    let api = DynamicXlib::load()?;
    Ok(XlibResolver::new(std::rc::Rc::new(api)))
}
