//! The embeddable render surface.
//!
//! A [`RenderSurfaceWidget`] sits on top of a host-owned native window and
//! is driven entirely by three host notifications: redraw, resize and
//! destroy. It builds its GL context lazily on the first redraw.

mod config;
mod observers;
mod state;
mod surface_widget;

pub use config::WidgetConfig;
pub use state::WidgetState;
pub use surface_widget::{PaintCallback, RenderSurfaceWidget};
