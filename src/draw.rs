// Window + software drawing utilities.
// Provided here:
// 1) A window that shows the preview canvas and reports keyboard/mouse input.
// 2) Nearest-neighbor blitting of RGBA images with alpha onto the canvas.
// 3) Rectangles and a tiny 5x7 bitmap font for the HUD, prompt and compass.

use crate::error::Error;
use crate::types::FrameBuffer;
use image::{Rgba, RgbaImage};
use minifb::{InputCallback, Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a fixed-size window and cap its update rate.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Pump input without touching the displayed image.
    pub fn poll(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Keys that went down since the last update (no auto-repeat).
    pub fn keys_pressed(&self) -> Vec<Key> {
        self.window.get_keys_pressed(KeyRepeat::No)
    }

    /// Keys that went up since the last update.
    pub fn keys_released(&self) -> Vec<Key> {
        self.window.get_keys_released()
    }

    /// Edge-triggered check with auto-repeat (used for Backspace in the prompt).
    pub fn key_repeated(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::Yes)
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0) as i32, y.max(0.0) as i32))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Wheel movement this update as whole notches (+1 up, -1 down, 0 none).
    /// Platforms disagree on wheel units, so only the sign is kept.
    pub fn wheel_notches(&self) -> f32 {
        match self.window.get_scroll_wheel() {
            Some((_, dy)) if dy > 0.0 => 1.0,
            Some((_, dy)) if dy < 0.0 => -1.0,
            _ => 0.0,
        }
    }

    /// Route typed characters to `callback`.
    pub fn set_char_input(&mut self, callback: Box<dyn InputCallback>) {
        self.window.set_input_callback(callback);
    }
}

/* ---------- Software drawing: pixels, rectangles, images ---------- */

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Source-over blend of one RGBA pixel into a 0x00RRGGBB pixel.
#[inline]
fn blend_over(dst: u32, src: Rgba<u8>) -> u32 {
    let [r, g, b, a] = src.0;
    match a {
        0 => dst,
        255 => pack_rgb(r, g, b),
        _ => {
            let a = a as u32;
            let inv = 255 - a;
            let mix = |s: u8, shift: u32| -> u32 {
                let d = (dst >> shift) & 0xFF;
                (s as u32 * a + d * inv + 127) / 255
            };
            (mix(r, 16) << 16) | (mix(g, 8) << 8) | mix(b, 0)
        },
    }
}

/// Draw `img` with its top-left at (x,y), scaled by `scale` with
/// nearest-neighbor sampling. Only the visible part is touched.
pub fn blit_rgba_scaled(fb: &mut FrameBuffer, img: &RgbaImage, x: i32, y: i32, scale: f32) {
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 || !(scale > 0.0) {
        return;
    }
    let dw = ((iw as f32 * scale).round() as i32).max(1);
    let dh = ((ih as f32 * scale).round() as i32).max(1);

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + dw).min(fb.width as i32);
    let y1 = (y + dh).min(fb.height as i32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for sy in y0..y1 {
        let src_y = (((sy - y) as f32 / scale) as u32).min(ih - 1);
        let row = sy as usize * fb.width;
        for sx in x0..x1 {
            let src_x = (((sx - x) as f32 / scale) as u32).min(iw - 1);
            let idx = row + sx as usize;
            fb.pixels[idx] = blend_over(fb.pixels[idx], *img.get_pixel(src_x, src_y));
        }
    }
}

/// Solid rectangle, clipped to the canvas.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(fb.width as i32);
    let y1 = (y + h).min(fb.height as i32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    for yy in y0..y1 {
        let row = yy as usize * fb.width;
        fb.pixels[row + x0 as usize..row + x1 as usize].fill(color);
    }
}

/// One-pixel rectangle outline.
pub fn stroke_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    if w <= 0 || h <= 0 {
        return;
    }
    for xx in x..x + w {
        put_pixel(fb, xx, y, color);
        put_pixel(fb, xx, y + h - 1, color);
    }
    for yy in y..y + h {
        put_pixel(fb, x, yy, color);
        put_pixel(fb, x + w - 1, yy, color);
    }
}

/* ---------- 5x7 bitmap font (uppercase ASCII, digits, path punctuation) ---------- */

pub const GLYPH_ADVANCE: i32 = 6; // 5 pixels glyph width + 1 pixel spacing
pub const GLYPH_HEIGHT: i32 = 7;

/// Return a 5x7 glyph bitmap. Lowercase letters use the uppercase shapes.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '/' => g!(0b00001,0b00001,0b00010,0b00100,0b01000,0b10000,0b10000),
        '\\' => g!(0b10000,0b10000,0b01000,0b00100,0b00010,0b00001,0b00001),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '[' => g!(0b01110,0b01000,0b01000,0b01000,0b01000,0b01000,0b01110),
        ']' => g!(0b01110,0b00010,0b00010,0b00010,0b00010,0b00010,0b01110),
        '<' => g!(0b00010,0b00100,0b01000,0b10000,0b01000,0b00100,0b00010),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),
        '~' => g!(0b00000,0b00000,0b01000,0b10101,0b00010,0b00000,0b00000),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
/// Unknown characters render as '?'.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch).or_else(|| glyph5x7('?')) else {
        return;
    };
    for (pass_color, shift) in [(0x00000000, 1), (color, 0)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + shift, y + ry as i32 + shift, pass_color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += GLYPH_ADVANCE;
    }
}

/// Pixel width of `text` in the 5x7 font.
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_pixel_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new(4, 4);
        put_pixel(&mut fb, -1, 0, 0xFFFFFF);
        put_pixel(&mut fb, 4, 0, 0xFFFFFF);
        put_pixel(&mut fb, 3, 3, 0x123456);
        assert_eq!(fb.pixels.iter().filter(|p| **p != 0).count(), 1);
        assert_eq!(fb.pixels[15], 0x123456);
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(blend_over(0x00_11_22_33, Rgba([9, 9, 9, 0])), 0x00_11_22_33);
        assert_eq!(blend_over(0x00_11_22_33, Rgba([0xAA, 0xBB, 0xCC, 255])), 0x00_AA_BB_CC);
        assert_eq!(blend_over(0, Rgba([255, 0, 100, 128])), pack_rgb(128, 0, 50));
    }

    #[test]
    fn test_blit_scales_nearest_and_clips() {
        let mut fb = FrameBuffer::new(8, 8);
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        blit_rgba_scaled(&mut fb, &img, -2, 6, 3.0);
        // 6x3 footprint starting at (-2,6), clipped to x 0..4, y 6..8.
        assert_eq!(fb.pixels[6 * 8], 0x00FF0000);
        assert_eq!(fb.pixels[6 * 8 + 1], 0x000000FF);
        assert_eq!(fb.pixels[7 * 8 + 3], 0x000000FF);
        assert_eq!(fb.pixels[7 * 8 + 4], 0);
        assert_eq!(fb.pixels[5 * 8], 0);
    }

    #[test]
    fn test_blit_handles_degenerate_input() {
        let mut fb = FrameBuffer::new(4, 4);
        blit_rgba_scaled(&mut fb, &RgbaImage::new(0, 0), 0, 0, 2.0);
        blit_rgba_scaled(&mut fb, &RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 255])), 0, 0, 0.0);
        blit_rgba_scaled(&mut fb, &RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 255])), 100, 100, 1.0);
        assert!(fb.pixels.iter().all(|p| *p == 0));
    }

    #[test]
    fn test_fill_and_stroke_rect() {
        let mut fb = FrameBuffer::new(6, 6);
        fill_rect(&mut fb, 4, 4, 10, 10, 7);
        assert_eq!(fb.pixels.iter().filter(|p| **p == 7).count(), 4);
        stroke_rect(&mut fb, 0, 0, 3, 3, 9);
        assert_eq!(fb.pixels.iter().filter(|p| **p == 9).count(), 8);
    }

    #[test]
    fn test_text_metrics_and_fallback_glyph() {
        assert_eq!(text_width("ZOOM 1.0"), 48);
        assert_eq!(glyph5x7('a'), glyph5x7('A'));
        assert!(glyph5x7('%').is_none());
        let mut fb = FrameBuffer::new(16, 16);
        draw_text_5x7(&mut fb, 0, 0, "%", 0xFFFFFF);
        assert!(fb.pixels.iter().any(|p| *p == 0xFFFFFF));
    }
}
