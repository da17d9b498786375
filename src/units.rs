//! Logical units vs. screen pixels.
//!
//! Every geometry constant in the crate (sheet rectangles, paste positions,
//! pan offsets, walk speed, borders) is in logical units: one unit is one
//! pixel of the source art. Screen pixels only appear after multiplying by
//! the fixed display scale and the camera zoom, and that multiplication only
//! happens through the helpers below.

/// Fixed integer upscale applied to the composited sprite (nearest neighbor).
pub const DISPLAY_SCALE: u32 = 2;

/// Screen pixels per logical unit at the given zoom.
#[inline]
pub fn pixels_per_unit(zoom: f32) -> f32 {
    DISPLAY_SCALE as f32 * zoom
}

/// Convert a logical distance to screen pixels at the given zoom.
#[inline]
pub fn to_screen(logical: f32, zoom: f32) -> f32 {
    logical * pixels_per_unit(zoom)
}

/// Size in screen pixels of a logical-size image drawn at the given zoom.
/// Never collapses below one pixel.
pub fn scaled_size(logical_w: u32, logical_h: u32, zoom: f32) -> (u32, u32) {
    let ppu = pixels_per_unit(zoom);
    (
        ((logical_w as f32 * ppu).round() as u32).max(1),
        ((logical_h as f32 * ppu).round() as u32).max(1),
    )
}
