// On-screen compass: four buttons that act like the arrow keys while the
// left mouse button is held on them.

use crate::draw::{draw_text_5x7, fill_rect, stroke_rect, GLYPH_ADVANCE, GLYPH_HEIGHT};
use crate::input::{InputState, MoveKey};
use crate::types::FrameBuffer;

const BUTTON: i32 = 22;
const GAP: i32 = 2;
const MARGIN: i32 = 12;

const IDLE_FILL: u32 = 0x00_3A_3D_46;
const HELD_FILL: u32 = 0x00_E0_B0_40;
const OUTLINE: u32 = 0x00_C8_C8_C8;

#[derive(Debug, Clone, Copy)]
pub struct Compass {
    cx: i32, // center of the middle cell
    cy: i32,
}

impl Compass {
    /// Anchor the compass in the bottom-right corner of the canvas.
    pub fn for_canvas(width: usize, height: usize) -> Self {
        let span = 3 * BUTTON + 2 * GAP;
        Self {
            cx: width as i32 - MARGIN - span / 2,
            cy: height as i32 - MARGIN - span / 2,
        }
    }

    /// Top-left of a button.
    fn origin(&self, key: MoveKey) -> (i32, i32) {
        let step = BUTTON + GAP;
        let (col, row) = match key {
            MoveKey::Up => (0, -1),
            MoveKey::Down => (0, 1),
            MoveKey::Left => (-1, 0),
            MoveKey::Right => (1, 0),
        };
        (self.cx - BUTTON / 2 + col * step, self.cy - BUTTON / 2 + row * step)
    }

    /// Which button (if any) is under the mouse.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<MoveKey> {
        MoveKey::ALL.into_iter().find(|key| {
            let (bx, by) = self.origin(*key);
            x >= bx && x < bx + BUTTON && y >= by && y < by + BUTTON
        })
    }

    pub fn draw(&self, fb: &mut FrameBuffer, input: &InputState) {
        for key in MoveKey::ALL {
            let (bx, by) = self.origin(key);
            let fill = if input.is_held(key) { HELD_FILL } else { IDLE_FILL };
            fill_rect(fb, bx, by, BUTTON, BUTTON, fill);
            stroke_rect(fb, bx, by, BUTTON, BUTTON, OUTLINE);
            let label = match key {
                MoveKey::Up => "N",
                MoveKey::Down => "S",
                MoveKey::Left => "W",
                MoveKey::Right => "E",
            };
            draw_text_5x7(
                fb,
                bx + (BUTTON - GLYPH_ADVANCE) / 2 + 1,
                by + (BUTTON - GLYPH_HEIGHT) / 2,
                label,
                0x00_FF_FF_FF,
            );
        }
    }
}

/// Tracks which compass button the mouse is holding down, turning mouse
/// state into press/release edges for the preview.
#[derive(Debug, Default)]
pub struct CompassGrip {
    held: Option<MoveKey>,
}

/// Edge produced by a mouse update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripEdge {
    Press(MoveKey),
    Release(MoveKey),
}

impl CompassGrip {
    /// Forget the held button without emitting a release, e.g. after the
    /// preview dropped every held key itself. A button still under the
    /// pressed mouse is picked up again on the next update.
    pub fn reset(&mut self) {
        self.held = None;
    }

    /// Feed the current mouse state; returns the press/release edges in order.
    pub fn update(&mut self, compass: &Compass, mouse: Option<(i32, i32)>, down: bool) -> Vec<GripEdge> {
        let target = match (mouse, down) {
            (Some((x, y)), true) => compass.hit_test(x, y),
            _ => None,
        };
        if target == self.held {
            return Vec::new();
        }
        let mut edges = Vec::with_capacity(2);
        if let Some(old) = self.held {
            edges.push(GripEdge::Release(old));
        }
        if let Some(new) = target {
            edges.push(GripEdge::Press(new));
        }
        self.held = target;
        edges
    }
}
