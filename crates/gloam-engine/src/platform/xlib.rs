use std::ffi::c_void;
use std::ptr::NonNull;
use std::rc::Rc;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle, XlibDisplayHandle, XlibWindowHandle};

use crate::error::{GlError, Result};
use crate::format::PixelFormatDescriptor;

use super::resolver::wrong_handle;
use super::{NativeSurfaceHandle, PlatformKind, WindowInfo, WindowInfoResolver};

/// The fields of an `XVisualInfo` the binding layer keeps.
///
/// `visual` points into display-owned memory and stays valid for the life
/// of the display connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XVisual {
    pub visual: *mut c_void,
    pub id: u64,
    pub depth: u8,
}

/// The slice of Xlib the resolver needs.
///
/// All methods take a live `Display*` owned by the host toolkit.
pub trait XlibApi {
    /// `TrueColor` visuals on `screen` with exactly `depth` bits.
    ///
    /// # Safety
    /// `display` must be an open Xlib connection.
    unsafe fn true_color_visuals(
        &self,
        display: NonNull<c_void>,
        screen: i32,
        depth: u8,
    ) -> Vec<XVisual>;

    /// `XRootWindow(display, screen)`.
    ///
    /// # Safety
    /// `display` must be an open Xlib connection.
    unsafe fn root_window(&self, display: NonNull<c_void>, screen: i32) -> u64;

    /// `XCreateColormap(display, window, visual, AllocNone)`.
    ///
    /// # Safety
    /// `display` must be an open Xlib connection and `window` a window on it.
    unsafe fn create_colormap(&self, display: NonNull<c_void>, window: u64, visual: &XVisual) -> u64;

    /// # Safety
    /// `colormap` must have come from `create_colormap` on the same display.
    unsafe fn free_colormap(&self, display: NonNull<c_void>, colormap: u64);
}

/// Depths worth asking the server for, in preference order.
///
/// 32-bit color maps onto a 24-bit visual first: ARGB visuals are depth 32
/// but most servers only composite them correctly for top-level windows.
fn candidate_depths(color_bpp: u8) -> Result<&'static [u8]> {
    Ok(match color_bpp {
        32 => &[24, 32],
        24 => &[24],
        16 => &[16],
        15 => &[15],
        8 => &[8],
        other => {
            return Err(GlError::unsupported_format(format!(
                "no X11 visual depth for {other}-bit color"
            )));
        }
    })
}

/// X11 target: display, screen, window and the matched visual.
pub struct XlibWindowInfo {
    display: NonNull<c_void>,
    screen: i32,
    window: u64,
    root: u64,
    visual: XVisual,
    colormap: u64,
    api: Rc<dyn XlibApi>,
}

impl XlibWindowInfo {
    pub fn display(&self) -> NonNull<c_void> {
        self.display
    }

    pub fn screen(&self) -> i32 {
        self.screen
    }

    pub fn window(&self) -> u64 {
        self.window
    }

    pub fn root(&self) -> u64 {
        self.root
    }

    pub fn visual(&self) -> &XVisual {
        &self.visual
    }

    pub fn colormap(&self) -> u64 {
        self.colormap
    }

    pub(super) fn raw_window_handle(&self) -> XlibWindowHandle {
        let mut handle = XlibWindowHandle::new(self.window as _);
        handle.visual_id = self.visual.id as _;
        handle
    }

    pub(super) fn raw_display_handle(&self) -> XlibDisplayHandle {
        XlibDisplayHandle::new(Some(self.display), self.screen)
    }
}

impl std::fmt::Debug for XlibWindowInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlibWindowInfo")
            .field("display", &self.display)
            .field("screen", &self.screen)
            .field("window", &self.window)
            .field("root", &self.root)
            .field("visual", &self.visual)
            .field("colormap", &self.colormap)
            .finish()
    }
}

impl Drop for XlibWindowInfo {
    fn drop(&mut self) {
        if self.colormap != 0 {
            // SAFETY: the colormap was created on this display by `resolve`
            // and is freed exactly once, here.
            unsafe { self.api.free_colormap(self.display, self.colormap) };
        }
    }
}

/// Matches a `TrueColor` visual to the requested format and creates a
/// colormap for it.
#[derive(Clone)]
pub struct XlibResolver {
    api: Rc<dyn XlibApi>,
}

impl XlibResolver {
    pub fn new(api: Rc<dyn XlibApi>) -> Self {
        Self { api }
    }

    fn find_visual(
        &self,
        display: NonNull<c_void>,
        screen: i32,
        format: &PixelFormatDescriptor,
    ) -> Result<XVisual> {
        let depths = candidate_depths(format.color_bpp)?;
        for &depth in depths {
            // SAFETY: `display` comes from the host toolkit, which keeps the
            // connection open while its windows exist.
            let visuals = unsafe { self.api.true_color_visuals(display, screen, depth) };
            if let Some(v) = visuals.into_iter().next() {
                return Ok(v);
            }
        }
        Err(GlError::unsupported_format(format!(
            "no TrueColor visual on screen {screen} for {}-bit color (tried depths {depths:?})",
            format.color_bpp
        )))
    }
}

impl WindowInfoResolver for XlibResolver {
    fn platform(&self) -> PlatformKind {
        PlatformKind::X11
    }

    fn resolve(
        &self,
        surface: &NativeSurfaceHandle,
        format: &PixelFormatDescriptor,
    ) -> Result<WindowInfo> {
        let window = match surface.window {
            RawWindowHandle::Xlib(h) => h.window as u64,
            other => return Err(wrong_handle(PlatformKind::X11, &other)),
        };
        let display = match surface.display {
            RawDisplayHandle::Xlib(XlibDisplayHandle {
                display: Some(d), ..
            }) => d,
            _ => {
                return Err(GlError::invalid_surface(
                    "x11 resolver needs an open Xlib display connection",
                ));
            }
        };

        let screen = surface.screen;
        let root = match surface.root_window {
            Some(root) => root,
            // SAFETY: see `find_visual`.
            None => unsafe { self.api.root_window(display, screen) },
        };
        let visual = self.find_visual(display, screen, format)?;

        // SAFETY: see `find_visual`; `root` is a window on the same display.
        let colormap = unsafe { self.api.create_colormap(display, root, &visual) };
        if colormap == 0 {
            return Err(GlError::creation_failed(format!(
                "XCreateColormap failed for visual {:#x}",
                visual.id
            )));
        }

        log::debug!(
            "resolved x11 window info (window={window:#x}, screen={screen}, visual={:#x}, depth={})",
            visual.id,
            visual.depth
        );

        Ok(WindowInfo::Xlib(XlibWindowInfo {
            display,
            screen,
            window,
            root,
            visual,
            colormap,
            api: Rc::clone(&self.api),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    const SCREEN_ROOT: u64 = 0x7;

    #[derive(Default)]
    struct FakeXlib {
        // (visual, is TrueColor)
        visuals: Vec<(XVisual, bool)>,
        queried_depths: RefCell<Vec<u8>>,
        created: Cell<u32>,
        colormap_windows: RefCell<Vec<u64>>,
        freed: RefCell<Vec<u64>>,
    }

    impl XlibApi for FakeXlib {
        unsafe fn true_color_visuals(
            &self,
            _display: NonNull<c_void>,
            _screen: i32,
            depth: u8,
        ) -> Vec<XVisual> {
            self.queried_depths.borrow_mut().push(depth);
            self.visuals
                .iter()
                .filter(|(v, true_color)| *true_color && v.depth == depth)
                .map(|(v, _)| *v)
                .collect()
        }

        unsafe fn root_window(&self, _display: NonNull<c_void>, _screen: i32) -> u64 {
            SCREEN_ROOT
        }

        unsafe fn create_colormap(&self, _display: NonNull<c_void>, window: u64, visual: &XVisual) -> u64 {
            self.created.set(self.created.get() + 1);
            self.colormap_windows.borrow_mut().push(window);
            0x100 + visual.id
        }

        unsafe fn free_colormap(&self, _display: NonNull<c_void>, colormap: u64) {
            self.freed.borrow_mut().push(colormap);
        }
    }

    fn visual(id: u64, depth: u8, true_color: bool) -> (XVisual, bool) {
        let v = XVisual {
            visual: std::ptr::null_mut(),
            id,
            depth,
        };
        (v, true_color)
    }

    fn surface() -> NativeSurfaceHandle {
        NativeSurfaceHandle::new(
            RawWindowHandle::Xlib(XlibWindowHandle::new(0x42)),
            RawDisplayHandle::Xlib(XlibDisplayHandle::new(Some(NonNull::dangling()), 0)),
        )
        .with_root_window(0x1)
    }

    fn format(color: u8) -> PixelFormatDescriptor {
        PixelFormatDescriptor {
            color_bpp: color,
            ..Default::default()
        }
    }

    fn resolver(fake: &Rc<FakeXlib>) -> XlibResolver {
        XlibResolver::new(fake.clone())
    }

    #[test]
    fn picks_true_color_visual_at_preferred_depth() {
        let fake = Rc::new(FakeXlib {
            visuals: vec![visual(0x20, 24, false), visual(0x21, 24, true), visual(0x30, 32, true)],
            ..Default::default()
        });
        let info = resolver(&fake).resolve(&surface(), &format(32)).unwrap();
        let WindowInfo::Xlib(x) = &info else { panic!("expected xlib") };
        assert_eq!(x.visual().id, 0x21);
        assert_eq!(x.window(), 0x42);
        assert_eq!(x.root(), 0x1);
        assert_eq!(x.colormap(), 0x121);
        assert!(matches!(info.raw_window_handle(), RawWindowHandle::Xlib(h) if h.visual_id == 0x21));
    }

    #[test]
    fn falls_back_to_argb_depth() {
        let fake = Rc::new(FakeXlib {
            visuals: vec![visual(0x30, 32, true)],
            ..Default::default()
        });
        let info = resolver(&fake).resolve(&surface(), &format(32)).unwrap();
        let WindowInfo::Xlib(x) = &info else { panic!("expected xlib") };
        assert_eq!(x.visual().depth, 32);
        assert_eq!(*fake.queried_depths.borrow(), vec![24, 32]);
    }

    #[test]
    fn no_matching_visual_is_unsupported_format() {
        let fake = Rc::new(FakeXlib {
            visuals: vec![visual(0x20, 24, false)],
            ..Default::default()
        });
        let err = resolver(&fake).resolve(&surface(), &format(24)).unwrap_err();
        assert!(matches!(err, GlError::UnsupportedPixelFormat { .. }));
        assert_eq!(fake.created.get(), 0);
    }

    #[test]
    fn colormap_is_freed_once_on_drop() {
        let fake = Rc::new(FakeXlib {
            visuals: vec![visual(0x21, 24, true)],
            ..Default::default()
        });
        let info = resolver(&fake).resolve(&surface(), &format(24)).unwrap();
        assert!(fake.freed.borrow().is_empty());
        drop(info);
        assert_eq!(*fake.freed.borrow(), vec![0x121]);
    }

    #[test]
    fn missing_display_connection_is_invalid() {
        let fake = Rc::new(FakeXlib::default());
        let mut s = surface();
        s.display = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
        let err = resolver(&fake).resolve(&s, &format(24)).unwrap_err();
        assert!(matches!(err, GlError::InvalidSurface { .. }));
    }

    #[test]
    fn root_defaults_to_the_screen_root() {
        let fake = Rc::new(FakeXlib {
            visuals: vec![visual(0x21, 24, true)],
            ..Default::default()
        });
        let mut s = surface();
        s.root_window = None;
        let info = resolver(&fake).resolve(&s, &format(24)).unwrap();
        let WindowInfo::Xlib(x) = &info else { panic!("expected xlib") };
        assert_eq!(x.root(), SCREEN_ROOT);
        assert_eq!(*fake.colormap_windows.borrow(), vec![SCREEN_ROOT]);
    }

    #[test]
    fn explicit_root_is_used_for_the_colormap() {
        let fake = Rc::new(FakeXlib {
            visuals: vec![visual(0x21, 24, true)],
            ..Default::default()
        });
        let _info = resolver(&fake).resolve(&surface(), &format(24)).unwrap();
        assert_eq!(*fake.colormap_windows.borrow(), vec![0x1]);
    }
}
