use raw_window_handle::RawWindowHandle;

use crate::error::{GlError, Result};
use crate::format::PixelFormatDescriptor;

use super::window_info::{AppKitWindowInfo, Win32WindowInfo};
use super::{NativeSurfaceHandle, PlatformKind, WindowInfo};

/// Turns the host toolkit's raw handles into a bindable [`WindowInfo`].
///
/// One implementation per platform family. The running platform picks its
/// implementation at compile time (see [`NativeResolver`]); nothing else in
/// the crate branches on the operating system.
///
/// [`NativeResolver`]: super::NativeResolver
pub trait WindowInfoResolver {
    fn platform(&self) -> PlatformKind;

    /// `format` must already have defaults applied.
    fn resolve(
        &self,
        surface: &NativeSurfaceHandle,
        format: &PixelFormatDescriptor,
    ) -> Result<WindowInfo>;
}

impl<R: WindowInfoResolver + ?Sized> WindowInfoResolver for Box<R> {
    fn platform(&self) -> PlatformKind {
        (**self).platform()
    }

    fn resolve(
        &self,
        surface: &NativeSurfaceHandle,
        format: &PixelFormatDescriptor,
    ) -> Result<WindowInfo> {
        (**self).resolve(surface, format)
    }
}

pub(super) fn wrong_handle(expected: PlatformKind, got: &RawWindowHandle) -> GlError {
    GlError::invalid_surface(format!("{expected} resolver cannot bind a {got:?} handle"))
}

/// Wraps the HWND directly; pixel format negotiation happens in the driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Resolver;

impl WindowInfoResolver for Win32Resolver {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn resolve(
        &self,
        surface: &NativeSurfaceHandle,
        _format: &PixelFormatDescriptor,
    ) -> Result<WindowInfo> {
        match surface.window {
            RawWindowHandle::Win32(h) => {
                log::debug!("resolved win32 window info (hwnd={:#x})", h.hwnd.get());
                Ok(WindowInfo::Win32(Win32WindowInfo {
                    hwnd: h.hwnd,
                    hinstance: h.hinstance,
                }))
            }
            other => Err(wrong_handle(PlatformKind::Windows, &other)),
        }
    }
}

/// Wraps the `NSView` directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppKitResolver;

impl WindowInfoResolver for AppKitResolver {
    fn platform(&self) -> PlatformKind {
        PlatformKind::MacOs
    }

    fn resolve(
        &self,
        surface: &NativeSurfaceHandle,
        _format: &PixelFormatDescriptor,
    ) -> Result<WindowInfo> {
        match surface.window {
            RawWindowHandle::AppKit(h) => {
                log::debug!("resolved appkit window info (ns_view={:p})", h.ns_view);
                Ok(WindowInfo::AppKit(AppKitWindowInfo { ns_view: h.ns_view }))
            }
            other => Err(wrong_handle(PlatformKind::MacOs, &other)),
        }
    }
}
