//! Layer compositing: crop body/head/hat for a pose and stack them.
//!
//! All positions are logical units on a transparent canvas. Z-order is
//! fixed: body first, head over it, hat on top.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::frames::{self, Layer, FRAME_SIZE};
use crate::types::{Action, Pose, Rect, FRAME_COUNT};
use crate::units::DISPLAY_SCALE;

/// Logical size of the composited character: one tile wide, with room
/// above the body for the head.
pub const CANVAS_SIZE: (u32, u32) = (FRAME_SIZE, FRAME_SIZE + BODY_OFFSET_Y as u32);

/// Body sits this far below the canvas top.
pub const BODY_OFFSET_Y: i64 = 12;
/// Hat is raised this far above the head.
pub const HAT_OFFSET_Y: i64 = -18;

/// Vertical footstep displacement for head and hat, indexed by walk frame.
pub const BOB_OFFSETS: [i64; FRAME_COUNT] = [1, 0, -1, 0, 1];

/// The three layer sheets. Each one is replaced wholesale on load.
pub struct LayerSet {
    pub body: RgbaImage,
    pub head: RgbaImage,
    pub hat: RgbaImage,
}

impl LayerSet {
    pub fn get(&self, layer: Layer) -> &RgbaImage {
        match layer {
            Layer::Body => &self.body,
            Layer::Head => &self.head,
            Layer::Hat => &self.hat,
        }
    }

    pub fn replace(&mut self, layer: Layer, image: RgbaImage) {
        match layer {
            Layer::Body => self.body = image,
            Layer::Head => self.head = image,
            Layer::Hat => self.hat = image,
        }
    }
}

/// Paste positions (top-left, logical) of each layer on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub body: (i64, i64),
    pub head: (i64, i64),
    pub hat: (i64, i64),
}

/// How far left the hat sits so the wider hat is centered over the head.
pub fn hat_inset() -> i64 {
    let (hat_w, _) = Layer::Hat.frame_size();
    let (head_w, _) = Layer::Head.frame_size();
    (hat_w as i64 - head_w as i64) / 2
}

/// Upright layout used by every action except death.
pub fn standing() -> Placement {
    Placement {
        body: (0, BODY_OFFSET_Y),
        head: (0, 0),
        hat: (-hat_inset(), HAT_OFFSET_Y),
    }
}

/// Lying-down layout for the death pose: head beside the body, hat on the head.
pub fn fallen() -> Placement {
    let head = (16, 12);
    Placement {
        body: (0, BODY_OFFSET_Y),
        head,
        hat: (head.0 - hat_inset(), head.1 + HAT_OFFSET_Y),
    }
}

/// Bob applied to head and hat; only walk frames move.
pub fn bob_offset(pose: &Pose) -> i64 {
    if pose.action == Action::Walk {
        BOB_OFFSETS[pose.frame % FRAME_COUNT]
    } else {
        0
    }
}

/// Final paste positions for a pose, bob included.
pub fn placement_for(pose: &Pose) -> Placement {
    if pose.action == Action::Death {
        return fallen();
    }
    let bob = bob_offset(pose);
    let base = standing();
    Placement {
        body: base.body,
        head: (base.head.0, base.head.1 + bob),
        hat: (base.hat.0, base.hat.1 + bob),
    }
}

fn crop(sheet: &RgbaImage, rect: Rect) -> RgbaImage {
    // crop_imm clamps to the sheet, so an undersized user image just yields a smaller tile.
    imageops::crop_imm(sheet, rect.x, rect.y, rect.w, rect.h).to_image()
}

/// Composite a pose at logical size (`CANVAS_SIZE`).
pub fn composite(layers: &LayerSet, pose: &Pose) -> RgbaImage {
    let rects = frames::select(pose);
    let at = placement_for(pose);
    let mut canvas = RgbaImage::new(CANVAS_SIZE.0, CANVAS_SIZE.1);

    imageops::overlay(&mut canvas, &crop(&layers.body, rects.body), at.body.0, at.body.1);
    imageops::overlay(&mut canvas, &crop(&layers.head, rects.head), at.head.0, at.head.1);
    imageops::overlay(&mut canvas, &crop(&layers.hat, rects.hat), at.hat.0, at.hat.1);
    canvas
}

/// Composite and upscale by the display scale with nearest-neighbor filtering.
pub fn composite_scaled(layers: &LayerSet, pose: &Pose) -> RgbaImage {
    let logical = composite(layers, pose);
    imageops::resize(
        &logical,
        logical.width() * DISPLAY_SCALE,
        logical.height() * DISPLAY_SCALE,
        FilterType::Nearest,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn solid(layer: Layer, color: Rgba<u8>) -> RgbaImage {
        let (w, h) = layer.sheet_size();
        RgbaImage::from_pixel(w, h, color)
    }

    fn colored_layers() -> LayerSet {
        LayerSet {
            body: solid(Layer::Body, RED),
            head: solid(Layer::Head, GREEN),
            hat: solid(Layer::Hat, BLUE),
        }
    }

    #[test]
    fn test_hat_is_centered_over_head() {
        assert_eq!(hat_inset(), 8);
        let p = standing();
        let (hat_w, _) = Layer::Hat.frame_size();
        let (head_w, _) = Layer::Head.frame_size();
        assert_eq!(p.hat.0 * 2 + hat_w as i64, p.head.0 * 2 + head_w as i64);
    }

    #[test]
    fn test_standing_and_fallen_positions() {
        assert_eq!(CANVAS_SIZE, (32, 44));
        assert_eq!(standing(), Placement { body: (0, 12), head: (0, 0), hat: (-8, -18) });
        assert_eq!(fallen(), Placement { body: (0, 12), head: (16, 12), hat: (8, -6) });
    }

    #[test]
    fn test_bob_only_on_walk() {
        let walk: Vec<i64> = (0..FRAME_COUNT)
            .map(|f| bob_offset(&Pose::new(Action::Walk, Direction::Front, f)))
            .collect();
        assert_eq!(walk, vec![1, 0, -1, 0, 1]);
        for action in [Action::Idle, Action::Action, Action::Grab, Action::Damage, Action::Death] {
            for f in 0..FRAME_COUNT {
                assert_eq!(bob_offset(&Pose::new(action, Direction::Left, f)), 0);
            }
        }
    }

    #[test]
    fn test_bob_moves_head_and_hat_but_not_body() {
        let p = placement_for(&Pose::new(Action::Walk, Direction::Front, 2));
        let base = standing();
        assert_eq!(p.body, base.body);
        assert_eq!(p.head.1, base.head.1 - 1);
        assert_eq!(p.hat.1, base.hat.1 - 1);
    }

    #[test]
    fn test_z_order_body_head_hat() {
        let out = composite(&colored_layers(), &Pose::idle(Direction::Front));
        assert_eq!(out.dimensions(), CANVAS_SIZE);
        // The 48x48 hat at y=-18 covers the head down to row 29.
        assert_eq!(*out.get_pixel(10, 10), BLUE);
        assert_eq!(*out.get_pixel(10, 29), BLUE);
        // Head shows below the hat and over the body (rows 30..31).
        assert_eq!(*out.get_pixel(10, 31), GREEN);
        // Body below the head.
        assert_eq!(*out.get_pixel(10, 40), RED);
    }

    #[test]
    fn test_death_uses_fallen_layout() {
        let out = composite(&colored_layers(), &Pose::new(Action::Death, Direction::Right, 0));
        assert_eq!(placement_for(&Pose::new(Action::Death, Direction::Back, 3)), fallen());
        // Body on the left, clear of the hat.
        assert_eq!(*out.get_pixel(2, 20), RED);
        // Head below the hat on the right.
        assert_eq!(*out.get_pixel(20, 43), GREEN);
        // Hat over the head.
        assert_eq!(*out.get_pixel(20, 20), BLUE);
        // Nothing above the body on the left.
        assert_eq!(out.get_pixel(2, 2).0[3], 0);
    }

    #[test]
    fn test_scaled_output_is_nearest_neighbor() {
        let layers = colored_layers();
        let pose = Pose::idle(Direction::Back);
        let logical = composite(&layers, &pose);
        let scaled = composite_scaled(&layers, &pose);
        assert_eq!(scaled.dimensions(), (CANVAS_SIZE.0 * DISPLAY_SCALE, CANVAS_SIZE.1 * DISPLAY_SCALE));
        for (x, y) in [(0, 0), (10, 10), (10, 31), (5, 40)] {
            let src = logical.get_pixel(x, y);
            for dy in 0..DISPLAY_SCALE {
                for dx in 0..DISPLAY_SCALE {
                    assert_eq!(scaled.get_pixel(x * DISPLAY_SCALE + dx, y * DISPLAY_SCALE + dy), src);
                }
            }
        }
    }

    #[test]
    fn test_undersized_sheet_does_not_panic() {
        let layers = LayerSet {
            body: RgbaImage::new(4, 4),
            head: RgbaImage::new(1, 1),
            hat: RgbaImage::new(2, 2),
        };
        for action in Action::ALL {
            let out = composite(&layers, &Pose::new(action, Direction::Right, 4));
            assert_eq!(out.dimensions(), CANVAS_SIZE);
        }
    }
}
