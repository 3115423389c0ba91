use std::num::NonZeroU32;

use raw_window_handle::{
    HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle,
};

use crate::error::{GlError, Result};

/// Windowing system family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PlatformKind {
    Windows,
    MacOs,
    X11,
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Windows => "win32",
            Self::MacOs => "appkit",
            Self::X11 => "x11",
        })
    }
}

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimized or not-yet-mapped window reports a zero extent.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Non-zero extent, clamping each axis to at least one pixel.
    pub fn clamped(self) -> (NonZeroU32, NonZeroU32) {
        (
            NonZeroU32::new(self.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(self.height).unwrap_or(NonZeroU32::MIN),
        )
    }
}

/// Raw handles of the drawable the host toolkit owns.
///
/// The host keeps the native window alive for as long as any widget built
/// on it exists; nothing here takes ownership.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NativeSurfaceHandle {
    pub window: RawWindowHandle,
    pub display: RawDisplayHandle,
    /// X11 screen number. Ignored elsewhere.
    pub screen: i32,
    /// X11 root window of `screen`, used as the colormap's window. When
    /// unset the resolver asks the display for the screen's root. Ignored
    /// elsewhere.
    pub root_window: Option<u64>,
}

impl NativeSurfaceHandle {
    pub fn new(window: RawWindowHandle, display: RawDisplayHandle) -> Self {
        let screen = match display {
            RawDisplayHandle::Xlib(h) => h.screen,
            RawDisplayHandle::Xcb(h) => h.screen,
            _ => 0,
        };
        Self {
            window,
            display,
            screen,
            root_window: None,
        }
    }

    pub fn with_root_window(mut self, root: u64) -> Self {
        self.root_window = Some(root);
        self
    }

    /// Captures the raw handles of anything exposing `raw-window-handle`.
    pub fn from_window<W>(window: &W) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + ?Sized,
    {
        let raw_window = window
            .window_handle()
            .map_err(|e| GlError::invalid_surface(format!("window handle unavailable: {e}")))?
            .as_raw();
        let raw_display = window
            .display_handle()
            .map_err(|e| GlError::invalid_surface(format!("display handle unavailable: {e}")))?
            .as_raw();
        Ok(Self::new(raw_window, raw_display))
    }
}

#[cfg(test)]
mod tests {
    use std::ptr::NonNull;

    use raw_window_handle::{XlibDisplayHandle, XlibWindowHandle};

    use super::*;

    #[test]
    fn screen_is_taken_from_xlib_display() {
        let display = XlibDisplayHandle::new(Some(NonNull::dangling()), 2);
        let h = NativeSurfaceHandle::new(
            RawWindowHandle::Xlib(XlibWindowHandle::new(7)),
            RawDisplayHandle::Xlib(display),
        );
        assert_eq!(h.screen, 2);
        assert_eq!(h.root_window, None);
    }

    #[test]
    fn zero_extent_is_empty_and_clamps_to_one() {
        let s = SurfaceSize::new(0, 300);
        assert!(s.is_empty());
        let (w, h) = s.clamped();
        assert_eq!((w.get(), h.get()), (1, 300));
    }
}
