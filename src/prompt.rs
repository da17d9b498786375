//! In-window "open file" prompt.
//!
//! Typed characters arrive through the window's character callback into a
//! buffer shared with the prompt. The buffer only accepts text while the
//! prompt is open, so ordinary key presses never leak into it.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use minifb::InputCallback;

use crate::assets::LoadTarget;
use crate::draw::{draw_text_5x7, fill_rect, stroke_rect, text_width, GLYPH_ADVANCE};
use crate::types::FrameBuffer;

#[derive(Debug, Default)]
struct PromptBuffer {
    active: bool,
    text: String,
}

/// Character sink handed to the window.
pub struct PromptInput {
    buffer: Rc<RefCell<PromptBuffer>>,
}

impl InputCallback for PromptInput {
    fn add_char(&mut self, uni_char: u32) {
        let mut buffer = self.buffer.borrow_mut();
        if !buffer.active {
            return;
        }
        // Backspace/Enter/Escape come through as control chars; the key handlers own those.
        if let Some(c) = char::from_u32(uni_char).filter(|c| !c.is_control()) {
            buffer.text.push(c);
        }
    }
}

#[derive(Debug, Default)]
pub struct PathPrompt {
    buffer: Rc<RefCell<PromptBuffer>>,
    target: Option<LoadTarget>,
}

impl PathPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_callback(&self) -> Box<dyn InputCallback> {
        Box::new(PromptInput { buffer: Rc::clone(&self.buffer) })
    }

    /// Start editing, pre-filled with the current path of `target`.
    pub fn open(&mut self, target: LoadTarget, current: &Path) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.active = true;
        buffer.text = current.display().to_string();
        self.target = Some(target);
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<LoadTarget> {
        self.target
    }

    pub fn text(&self) -> String {
        self.buffer.borrow().text.clone()
    }

    pub fn backspace(&mut self) {
        self.buffer.borrow_mut().text.pop();
    }

    pub fn cancel(&mut self) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.active = false;
        buffer.text.clear();
        self.target = None;
    }

    /// Close the prompt and hand back what to load. An empty path just closes.
    pub fn submit(&mut self) -> Option<(LoadTarget, PathBuf)> {
        let target = self.target?;
        let text = self.text();
        self.cancel();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some((target, PathBuf::from(trimmed)))
        }
    }

    pub fn draw(&self, fb: &mut FrameBuffer) {
        let Some(target) = self.target else {
            return;
        };
        let x = 16;
        let y = 40;
        let w = fb.width as i32 - 2 * x;
        let h = 40;
        fill_rect(fb, x, y, w, h, 0x00_14_16_1C);
        stroke_rect(fb, x, y, w, h, 0x00_E0_B0_40);

        let label = format!("LOAD {}: ", target.label());
        draw_text_5x7(fb, x + 8, y + 8, &label, 0x00_E0_B0_40);

        // Show the tail of long paths; the caret is always visible.
        let room = ((w - 16 - text_width(&label)) / GLYPH_ADVANCE).max(4) as usize;
        let mut shown = format!("{}_", self.text());
        let count = shown.chars().count();
        if count > room {
            let tail: String = shown.chars().skip(count - (room - 2)).collect();
            shown = format!("..{tail}");
        }
        draw_text_5x7(fb, x + 8 + text_width(&label), y + 8, &shown, 0x00_FF_FF_FF);
        draw_text_5x7(fb, x + 8, y + 24, "ENTER LOAD   ESC CANCEL", 0x00_90_90_90);
    }
}
