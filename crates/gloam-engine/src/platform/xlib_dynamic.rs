use std::ffi::{c_int, c_ulong, c_void};
use std::ptr::NonNull;

use x11_dl::xlib;

use crate::error::{GlError, Result};

use super::{XVisual, XlibApi};

/// libX11 opened at runtime.
///
/// The host toolkit has normally loaded libX11 already, so this resolves to
/// the same copy its display connection lives in.
pub struct DynamicXlib {
    xlib: xlib::Xlib,
}

impl DynamicXlib {
    pub fn load() -> Result<Self> {
        let xlib = xlib::Xlib::open().map_err(|e| GlError::PlatformLibrary {
            library: "libX11",
            reason: e.to_string(),
        })?;
        log::debug!("loaded libX11 entry points");
        Ok(Self { xlib })
    }
}

impl XlibApi for DynamicXlib {
    unsafe fn true_color_visuals(
        &self,
        display: NonNull<c_void>,
        screen: i32,
        depth: u8,
    ) -> Vec<XVisual> {
        // SAFETY: all-zero is a valid XVisualInfo template.
        let mut template: xlib::XVisualInfo = unsafe { std::mem::zeroed() };
        template.screen = screen;
        template.depth = c_int::from(depth);
        template.class = xlib::TrueColor;
        let mask = xlib::VisualScreenMask | xlib::VisualDepthMask | xlib::VisualClassMask;

        let mut count: c_int = 0;
        // SAFETY: the caller guarantees `display` is open.
        let list = unsafe {
            (self.xlib.XGetVisualInfo)(display.as_ptr().cast(), mask, &mut template, &mut count)
        };
        if list.is_null() {
            return Vec::new();
        }

        // SAFETY: Xlib returned `count` contiguous entries; we copy what we
        // need and release the array before returning.
        let found = unsafe { std::slice::from_raw_parts(list, count.max(0) as usize) }
            .iter()
            .map(|vi| XVisual {
                visual: vi.visual.cast(),
                id: vi.visualid as u64,
                depth: vi.depth as u8,
            })
            .collect();
        unsafe { (self.xlib.XFree)(list.cast()) };
        found
    }

    unsafe fn root_window(&self, display: NonNull<c_void>, screen: i32) -> u64 {
        // SAFETY: forwarded to the caller.
        unsafe { (self.xlib.XRootWindow)(display.as_ptr().cast(), screen) as u64 }
    }

    unsafe fn create_colormap(&self, display: NonNull<c_void>, window: u64, visual: &XVisual) -> u64 {
        // SAFETY: forwarded to the caller.
        unsafe {
            (self.xlib.XCreateColormap)(
                display.as_ptr().cast(),
                window as c_ulong,
                visual.visual.cast(),
                xlib::AllocNone,
            ) as u64
        }
    }

    unsafe fn free_colormap(&self, display: NonNull<c_void>, colormap: u64) {
        // SAFETY: forwarded to the caller.
        unsafe { (self.xlib.XFreeColormap)(display.as_ptr().cast(), colormap as c_ulong) };
    }
}
