use std::num::NonZeroIsize;
use std::ptr::NonNull;

use raw_window_handle::{
    AppKitDisplayHandle, AppKitWindowHandle, RawDisplayHandle, RawWindowHandle,
    Win32WindowHandle, WindowsDisplayHandle,
};

use super::{PlatformKind, XlibWindowInfo};

/// Win32 target: the widget's HWND, wrapped as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win32WindowInfo {
    pub hwnd: NonZeroIsize,
    pub hinstance: Option<NonZeroIsize>,
}

/// AppKit target: the widget's `NSView`, wrapped as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppKitWindowInfo {
    pub ns_view: NonNull<std::ffi::c_void>,
}

/// Platform handle bundle a context is bound to.
///
/// Exclusively owned by the `GraphicsContext` built from it and never shared
/// across contexts. The X11 variant owns a colormap and frees it on drop.
#[derive(Debug)]
pub enum WindowInfo {
    Win32(Win32WindowInfo),
    AppKit(AppKitWindowInfo),
    Xlib(XlibWindowInfo),
}

impl WindowInfo {
    pub fn platform(&self) -> PlatformKind {
        match self {
            Self::Win32(_) => PlatformKind::Windows,
            Self::AppKit(_) => PlatformKind::MacOs,
            Self::Xlib(_) => PlatformKind::X11,
        }
    }

    /// Window handle in the form driver libraries consume.
    pub fn raw_window_handle(&self) -> RawWindowHandle {
        match self {
            Self::Win32(info) => {
                let mut handle = Win32WindowHandle::new(info.hwnd);
                handle.hinstance = info.hinstance;
                RawWindowHandle::Win32(handle)
            }
            Self::AppKit(info) => RawWindowHandle::AppKit(AppKitWindowHandle::new(info.ns_view)),
            Self::Xlib(info) => RawWindowHandle::Xlib(info.raw_window_handle()),
        }
    }

    /// Display handle in the form driver libraries consume.
    pub fn raw_display_handle(&self) -> RawDisplayHandle {
        match self {
            Self::Win32(_) => RawDisplayHandle::Windows(WindowsDisplayHandle::new()),
            Self::AppKit(_) => RawDisplayHandle::AppKit(AppKitDisplayHandle::new()),
            Self::Xlib(info) => RawDisplayHandle::Xlib(info.raw_display_handle()),
        }
    }
}
