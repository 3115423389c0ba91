use crate::error::{GlError, Result};
use crate::format::{ColorLayout, PixelFormatDescriptor};

/// Capabilities of one native framebuffer config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ConfigSummary {
    pub color_bits: u8,
    pub alpha: u8,
    pub depth: u8,
    pub stencil: u8,
    pub samples: u8,
    pub hardware: bool,
}

/// Checks requests the native layers would otherwise reject obscurely.
pub(crate) fn validate(format: &PixelFormatDescriptor) -> Result<ColorLayout> {
    let layout = format.color_layout()?;
    if format.samples > 1 && !format.samples.is_power_of_two() {
        return Err(GlError::unsupported_format(format!(
            "{} samples is not a power of two",
            format.samples
        )));
    }
    Ok(layout)
}

/// Picks the closest config meeting every minimum in `format`.
///
/// Ranking: hardware acceleration (when preferred), then exact sample
/// count, then the least surplus depth, stencil and color bits.
pub(crate) fn select_config(
    candidates: &[ConfigSummary],
    format: &PixelFormatDescriptor,
    layout: ColorLayout,
    prefer_hardware: bool,
) -> Option<usize> {
    let want_color = layout.total_bits() - layout.alpha;
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            c.color_bits >= want_color
                && c.alpha >= layout.alpha
                && c.depth >= format.depth_bpp
                && c.stencil >= format.stencil_bpp
                && c.samples >= format.samples
        })
        .min_by_key(|(_, c)| {
            (
                prefer_hardware && !c.hardware,
                c.samples - format.samples,
                c.depth - format.depth_bpp,
                c.stencil - format.stencil_bpp,
                (c.color_bits - want_color) + (c.alpha - layout.alpha),
            )
        })
        .map(|(i, _)| i)
}
