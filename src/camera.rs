// View camera: background pan offset + zoom.
// The player sprite never moves on screen; walking pans the background
// the opposite way and zoom pivots around the canvas center.

use crate::units::{scaled_size, to_screen};

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct Camera {
    offset_x: f32, // logical units, background center relative to the sprite
    offset_y: f32,
    zoom: f32,
    border_x: f32, // |offset_x| never exceeds this
    border_y: f32,
}

impl Camera {
    pub fn new(border_x: f32, border_y: f32) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
            border_x: border_x.abs(),
            border_y: border_y.abs(),
        }
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn border(&self) -> (f32, f32) {
        (self.border_x, self.border_y)
    }

    /// Replace the border and pull the current offset back inside it.
    pub fn set_border(&mut self, border_x: f32, border_y: f32) {
        self.border_x = border_x.abs();
        self.border_y = border_y.abs();
        self.pan_by(0.0, 0.0);
    }

    /// Move the background by (dx, dy) logical units, clamped to the border.
    /// Returns true if the offset actually changed.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        let before = (self.offset_x, self.offset_y);
        self.offset_x = (self.offset_x + dx).clamp(-self.border_x, self.border_x);
        self.offset_y = (self.offset_y + dy).clamp(-self.border_y, self.border_y);
        before != (self.offset_x, self.offset_y)
    }

    /// Multiply zoom by `zoom_in` per positive wheel notch, or by `zoom_out`
    /// per negative one. Returns true if the zoom changed.
    pub fn zoom_by(&mut self, notches: f32, zoom_in: f32, zoom_out: f32) -> bool {
        if !notches.is_finite() || notches == 0.0 {
            return false;
        }
        let before = self.zoom;
        let factor = if notches > 0.0 {
            zoom_in.max(1.0).powf(notches)
        } else {
            zoom_out.min(1.0).powf(-notches)
        };
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        before != self.zoom
    }

    pub fn reset(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.zoom = 1.0;
    }

    /// Pan limits that keep the sprite at least `margin` logical units inside
    /// a background of the given logical size.
    pub fn border_for(background: (u32, u32), margin: f32) -> (f32, f32) {
        (
            (background.0 as f32 / 2.0 - margin).max(0.0),
            (background.1 as f32 / 2.0 - margin).max(0.0),
        )
    }

    /// Screen position (top-left) of a background of the given logical size,
    /// for a canvas of `canvas_w` x `canvas_h` pixels.
    pub fn background_origin(&self, canvas_w: usize, canvas_h: usize, bg_w: u32, bg_h: u32) -> (i32, i32) {
        let (sw, sh) = scaled_size(bg_w, bg_h, self.zoom);
        let cx = canvas_w as f32 / 2.0 + to_screen(self.offset_x, self.zoom);
        let cy = canvas_h as f32 / 2.0 + to_screen(self.offset_y, self.zoom);
        ((cx - sw as f32 / 2.0).round() as i32, (cy - sh as f32 / 2.0).round() as i32)
    }
}
