//! Scene renderer: background, character, compass, HUD and prompt onto the
//! window framebuffer.
//!
//! The character stays centered on the canvas. The background is placed by
//! the camera so that zoom pivots around the character.

use image::RgbaImage;

use crate::assets::{Assets, LoadTarget};
use crate::camera::Camera;
use crate::compass::Compass;
use crate::compositor::{self, LayerSet, CANVAS_SIZE};
use crate::draw::{blit_rgba_scaled, draw_text_5x7};
use crate::frames::Layer;
use crate::preview::Preview;
use crate::prompt::PathPrompt;
use crate::types::{FrameBuffer, Pose};
use crate::units::scaled_size;

const HUD_COLOR: u32 = 0x00_FF_FF_FF;
const HINT_COLOR: u32 = 0x00_A0_A0_A0;

pub struct Renderer {
    sprite_pose: Option<Pose>,
    sprite: RgbaImage, // composited at display scale, rebuilt on pose change
    compass: Compass,
    clear_color: u32,
    show_hud: bool,
}

impl Renderer {
    pub fn new(width: usize, height: usize, clear_color: u32, show_hud: bool) -> Self {
        Self {
            sprite_pose: None,
            sprite: RgbaImage::new(0, 0),
            compass: Compass::for_canvas(width, height),
            clear_color,
            show_hud,
        }
    }

    pub fn compass(&self) -> &Compass {
        &self.compass
    }

    /// Forget the cached character (a layer image changed).
    pub fn invalidate_sprite(&mut self) {
        self.sprite_pose = None;
    }

    fn sprite_for(&mut self, layers: &LayerSet, pose: Pose) -> &RgbaImage {
        if self.sprite_pose != Some(pose) {
            self.sprite = compositor::composite_scaled(layers, &pose);
            self.sprite_pose = Some(pose);
        }
        &self.sprite
    }

    /// Top-left screen position of the character at the current zoom.
    pub fn sprite_origin(fb: &FrameBuffer, zoom: f32) -> (i32, i32) {
        let (w, h) = scaled_size(CANVAS_SIZE.0, CANVAS_SIZE.1, zoom);
        (
            (fb.width as i32 - w as i32) / 2,
            (fb.height as i32 - h as i32) / 2,
        )
    }

    /// Background and character only.
    pub fn draw_scene(&mut self, fb: &mut FrameBuffer, camera: &Camera, pose: Pose, assets: &Assets) {
        fb.clear(self.clear_color);

        let zoom = camera.zoom();
        let (bg_w, bg_h) = assets.background_size();
        let (bx, by) = camera.background_origin(fb.width, fb.height, bg_w, bg_h);
        // Both images are stored at display scale; only zoom remains.
        blit_rgba_scaled(fb, &assets.background, bx, by, zoom);

        let (sx, sy) = Self::sprite_origin(fb, zoom);
        let sprite = self.sprite_for(&assets.layers, pose);
        blit_rgba_scaled(fb, sprite, sx, sy, zoom);
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, preview: &Preview, assets: &Assets, fps_text: &str) {
        let pose = preview.pose();
        let camera = preview.camera();
        let (ox, oy) = camera.offset();
        let status = format!(
            "{} {} {} | ZOOM {:.2} | PAN {:.0},{:.0} | {}",
            pose.action.label(),
            pose.direction.label(),
            pose.frame,
            camera.zoom(),
            ox,
            oy,
            fps_text,
        );
        draw_text_5x7(fb, 8, 8, &status, HUD_COLOR);

        let name = |target: LoadTarget| -> String {
            assets
                .path(target)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "-".to_string())
        };
        let files = format!(
            "F1 HAT {}  F2 HEAD {}  F3 BODY {}  F4 BG {}",
            name(LoadTarget::Layer(Layer::Hat)),
            name(LoadTarget::Layer(Layer::Head)),
            name(LoadTarget::Layer(Layer::Body)),
            name(LoadTarget::Background),
        );
        draw_text_5x7(fb, 8, 20, &files, HINT_COLOR);

        let keys = "ARROWS/WASD WALK  IJKL ACT  G GRAB  H HURT  F DEATH  WHEEL ZOOM  R RESET";
        draw_text_5x7(fb, 8, fb.height as i32 - 16, keys, HINT_COLOR);
    }

    /// Full frame: scene, compass, HUD, then the prompt on top.
    pub fn render(
        &mut self,
        fb: &mut FrameBuffer,
        preview: &Preview,
        assets: &Assets,
        prompt: &PathPrompt,
        fps_text: &str,
    ) {
        self.draw_scene(fb, preview.camera(), preview.pose(), assets);
        self.compass.draw(fb, preview.input());
        if self.show_hud {
            self.draw_hud(fb, preview, assets, fps_text);
        }
        prompt.draw(fb);
    }
}
