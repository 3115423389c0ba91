use glow::HasContext;

use gloam_engine::RenderTarget;

/// Frames per full trip around the color wheel.
const PERIOD: f32 = 600.0;

/// Clears the whole surface to a color derived from the frame index.
pub fn paint(target: &RenderTarget<'_>) {
    let Some(gl) = target.gl() else {
        return;
    };
    let [r, g, b] = hue_to_rgb(target.frame_index as f32 / PERIOD);

    // SAFETY: the widget only paints with its context current.
    unsafe {
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        gl.viewport(0, 0, target.width as i32, target.height as i32);
        gl.clear_color(r, g, b, 1.0);
        gl.clear(glow::COLOR_BUFFER_BIT);
    }
}

/// Fully saturated color at `turns` around the hue circle.
fn hue_to_rgb(turns: f32) -> [f32; 3] {
    let h = turns.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}
