use crate::error::{GlError, Result};

use super::{ContextFlags, GlVersion};

/// Color depth substituted when a descriptor leaves `color_bpp` at zero.
pub const DEFAULT_COLOR_BPP: u8 = 32;

/// Depth-buffer size substituted together with the color default.
pub const DEFAULT_DEPTH_BPP: u8 = 16;

/// Framebuffer capabilities requested for a context.
///
/// Zero bit depths mean "unspecified". Call [`with_defaults`] before handing
/// the descriptor to a resolver or driver.
///
/// [`with_defaults`]: PixelFormatDescriptor::with_defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormatDescriptor {
    pub single_buffer: bool,
    pub color_bpp: u8,
    pub accum_bpp: u8,
    pub depth_bpp: u8,
    pub stencil_bpp: u8,
    pub samples: u8,
    pub stereo: bool,
    pub version: GlVersion,
    pub flags: ContextFlags,
}

/// Per-channel split of a color depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorLayout {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl ColorLayout {
    pub fn total_bits(self) -> u8 {
        self.red + self.green + self.blue + self.alpha
    }
}

impl PixelFormatDescriptor {
    /// Substitutes platform defaults for an uninitialized descriptor.
    ///
    /// Depth is only defaulted when color was: a descriptor that names its
    /// color depth but leaves depth at zero asked for no depth buffer.
    pub fn with_defaults(mut self) -> Self {
        if self.color_bpp == 0 {
            self.color_bpp = DEFAULT_COLOR_BPP;
            if self.depth_bpp == 0 {
                self.depth_bpp = DEFAULT_DEPTH_BPP;
            }
        }
        self
    }

    /// Splits `color_bpp` into channel sizes.
    pub fn color_layout(&self) -> Result<ColorLayout> {
        let (red, green, blue, alpha) = match self.color_bpp {
            32 => (8, 8, 8, 8),
            24 => (8, 8, 8, 0),
            16 => (5, 6, 5, 0),
            15 => (5, 5, 5, 0),
            8 => (3, 3, 2, 0),
            0 => {
                return Err(GlError::unsupported_format(
                    "color depth is unset; apply defaults first",
                ));
            }
            other => {
                return Err(GlError::unsupported_format(format!(
                    "no channel layout for {other}-bit color"
                )));
            }
        };
        Ok(ColorLayout { red, green, blue, alpha })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(color: u8, depth: u8) -> PixelFormatDescriptor {
        PixelFormatDescriptor {
            color_bpp: color,
            depth_bpp: depth,
            ..Default::default()
        }
    }

    // ── with_defaults ─────────────────────────────────────────────────────

    #[test]
    fn zero_color_and_depth_get_both_defaults() {
        let f = fmt(0, 0).with_defaults();
        assert_eq!(f.color_bpp, 32);
        assert_eq!(f.depth_bpp, 16);
    }

    #[test]
    fn zero_color_keeps_explicit_depth() {
        let f = fmt(0, 24).with_defaults();
        assert_eq!(f.color_bpp, 32);
        assert_eq!(f.depth_bpp, 24);
    }

    #[test]
    fn explicit_color_leaves_zero_depth_alone() {
        let f = fmt(24, 0).with_defaults();
        assert_eq!(f.color_bpp, 24);
        assert_eq!(f.depth_bpp, 0);
    }

    #[test]
    fn defaults_hold_for_every_other_field_combination() {
        for stencil in [0u8, 8] {
            for samples in [0u8, 4] {
                for single_buffer in [false, true] {
                    let f = PixelFormatDescriptor {
                        stencil_bpp: stencil,
                        samples,
                        single_buffer,
                        ..Default::default()
                    }
                    .with_defaults();
                    assert_eq!(f.color_bpp, DEFAULT_COLOR_BPP);
                    assert_eq!(f.depth_bpp, DEFAULT_DEPTH_BPP);
                    assert_eq!(f.stencil_bpp, stencil);
                    assert_eq!(f.samples, samples);
                }
            }
        }
    }

    #[test]
    fn defaults_are_idempotent() {
        let once = fmt(0, 0).with_defaults();
        assert_eq!(once, once.with_defaults());
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn thirty_two_bit_color_carries_alpha() {
        let l = fmt(32, 0).color_layout().unwrap();
        assert_eq!(l.alpha, 8);
        assert_eq!(l.total_bits(), 32);
    }

    #[test]
    fn sixteen_bit_color_is_565() {
        let l = fmt(16, 0).color_layout().unwrap();
        assert_eq!((l.red, l.green, l.blue, l.alpha), (5, 6, 5, 0));
    }

    #[test]
    fn odd_color_depth_is_unsupported() {
        let err = fmt(12, 0).color_layout().unwrap_err();
        assert!(matches!(err, GlError::UnsupportedPixelFormat { .. }));
    }
}
