//! Frame selection: pose key -> source rectangles in the three layer sheets.
//!
//! Sheet layouts (logical pixels). Direction columns are ordered back, left,
//! front, right.
//!
//! * body, 32x32 frames: one column per direction at x = 0/32/64/96. Idle is
//!   row y=0, walk steps down from y=32, action steps down from y=160, grab
//!   is y=416. Damage frames sit at their own coordinates and the single
//!   death frame is a wider 48x32 tile at (32, 672).
//! * head, 32x32 frames in a single column at x=0, one y per action and
//!   direction. The same head is shown for every frame of an action.
//! * hat, 48x48 frames: idle row y=0 at x = 0/48/96/144, grab row y=48,
//!   death at (0, 96).
//!
//! A layer without a row for an action falls back to its idle row.

use crate::types::{Action, Pose, Rect, FRAME_COUNT};

/// Body and head tile edge.
pub const FRAME_SIZE: u32 = 32;
/// Hat tile edge.
pub const HAT_FRAME_SIZE: u32 = 48;
/// The lying-down body is wider than a regular tile.
pub const BODY_DEATH_SIZE: (u32, u32) = (48, 32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Body,
    Head,
    Hat,
}

impl Layer {
    /// Size of one regular frame.
    pub fn frame_size(self) -> (u32, u32) {
        match self {
            Layer::Body | Layer::Head => (FRAME_SIZE, FRAME_SIZE),
            Layer::Hat => (HAT_FRAME_SIZE, HAT_FRAME_SIZE),
        }
    }

    /// Smallest sheet that holds every rectangle the tables address.
    pub fn sheet_size(self) -> (u32, u32) {
        match self {
            Layer::Body => (128, 704),
            Layer::Head => (32, 560),
            Layer::Hat => (192, 144),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Layer::Body => "BODY",
            Layer::Head => "HEAD",
            Layer::Hat => "HAT",
        }
    }
}

/// One table cell: where frame 0 starts and how big a tile is. Animated rows
/// step down by one tile height per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Origin {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    animated: bool,
}

type DirTable = [Origin; 4];

const fn tile(x: u32, y: u32) -> Origin {
    Origin { x, y, w: FRAME_SIZE, h: FRAME_SIZE, animated: false }
}

const fn hat(x: u32, y: u32) -> Origin {
    Origin { x, y, w: HAT_FRAME_SIZE, h: HAT_FRAME_SIZE, animated: false }
}

const fn stepping(x: u32, y: u32) -> Origin {
    Origin { x, y, w: FRAME_SIZE, h: FRAME_SIZE, animated: true }
}

/// Every direction maps to the same origin.
const fn shared(origin: Origin) -> DirTable {
    [origin; 4]
}

const BODY_COLUMNS: [u32; 4] = [0, 32, 64, 96];

const fn body_row(y: u32, animated: bool) -> DirTable {
    let c = BODY_COLUMNS;
    if animated {
        [stepping(c[0], y), stepping(c[1], y), stepping(c[2], y), stepping(c[3], y)]
    } else {
        [tile(c[0], y), tile(c[1], y), tile(c[2], y), tile(c[3], y)]
    }
}

const BODY_IDLE: DirTable = body_row(0, false);
const BODY_WALK: DirTable = body_row(32, true);
const BODY_ACTION: DirTable = body_row(160, true);
const BODY_GRAB: DirTable = body_row(416, false);
const BODY_DAMAGE: DirTable = [tile(32, 608), tile(32, 640), tile(96, 608), tile(96, 640)];
const BODY_DEATH: DirTable =
    shared(Origin { x: 32, y: 672, w: BODY_DEATH_SIZE.0, h: BODY_DEATH_SIZE.1, animated: false });

const HEAD_IDLE: DirTable = [tile(0, 0), tile(0, 32), tile(0, 64), tile(0, 96)];
const HEAD_GRAB: DirTable = [tile(0, 272), tile(0, 176), tile(0, 208), tile(0, 240)];
const HEAD_ACTION: DirTable = [tile(0, 272), tile(0, 304), tile(0, 336), tile(0, 368)];
const HEAD_DAMAGE: DirTable = [tile(0, 400), tile(0, 432), tile(0, 464), tile(0, 496)];
const HEAD_DEATH: DirTable = shared(tile(0, 528));

const HAT_IDLE: DirTable = [hat(0, 0), hat(48, 0), hat(96, 0), hat(144, 0)];
// No hat art for reaching away from the viewer; it keeps the idle back tile.
const HAT_GRAB: DirTable = [HAT_IDLE[0], hat(48, 48), hat(96, 48), hat(144, 48)];
const HAT_DEATH: DirTable = shared(hat(0, 96));

fn idle_table(layer: Layer) -> &'static DirTable {
    match layer {
        Layer::Body => &BODY_IDLE,
        Layer::Head => &HEAD_IDLE,
        Layer::Hat => &HAT_IDLE,
    }
}

fn action_table(layer: Layer, action: Action) -> Option<&'static DirTable> {
    match (layer, action) {
        (_, Action::Idle) => Some(idle_table(layer)),
        (Layer::Body, Action::Walk) => Some(&BODY_WALK),
        (Layer::Body, Action::Action) => Some(&BODY_ACTION),
        (Layer::Body, Action::Grab) => Some(&BODY_GRAB),
        (Layer::Body, Action::Damage) => Some(&BODY_DAMAGE),
        (Layer::Body, Action::Death) => Some(&BODY_DEATH),
        (Layer::Head, Action::Grab) => Some(&HEAD_GRAB),
        (Layer::Head, Action::Action) => Some(&HEAD_ACTION),
        (Layer::Head, Action::Damage) => Some(&HEAD_DAMAGE),
        (Layer::Head, Action::Death) => Some(&HEAD_DEATH),
        (Layer::Hat, Action::Grab) => Some(&HAT_GRAB),
        (Layer::Hat, Action::Death) => Some(&HAT_DEATH),
        _ => None,
    }
}

/// Source rectangle of one layer for a pose.
pub fn layer_rect(layer: Layer, pose: &Pose) -> Rect {
    let table = action_table(layer, pose.action).unwrap_or_else(|| idle_table(layer));
    let origin = table[pose.direction.index()];
    let step = if origin.animated { (pose.frame % FRAME_COUNT) as u32 * origin.h } else { 0 };
    Rect::new(origin.x, origin.y + step, origin.w, origin.h)
}

/// The three crop rectangles for a pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseFrames {
    pub body: Rect,
    pub head: Rect,
    pub hat: Rect,
}

pub fn select(pose: &Pose) -> PoseFrames {
    PoseFrames {
        body: layer_rect(Layer::Body, pose),
        head: layer_rect(Layer::Head, pose),
        hat: layer_rect(Layer::Hat, pose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn inside_sheet(layer: Layer, r: Rect) -> bool {
        let (sw, sh) = layer.sheet_size();
        r.right() <= sw && r.bottom() <= sh
    }

    #[test]
    fn test_every_pose_has_rects_inside_the_sheets() {
        for action in Action::ALL {
            for direction in Direction::ALL {
                for frame in 0..FRAME_COUNT {
                    let pose = Pose::new(action, direction, frame);
                    let frames = select(&pose);
                    assert!(inside_sheet(Layer::Body, frames.body), "{pose:?} body {:?}", frames.body);
                    assert!(inside_sheet(Layer::Head, frames.head), "{pose:?} head {:?}", frames.head);
                    assert!(inside_sheet(Layer::Hat, frames.hat), "{pose:?} hat {:?}", frames.hat);
                }
            }
        }
    }

    #[test]
    fn test_body_columns_and_rows() {
        let walk = |d, f| layer_rect(Layer::Body, &Pose::new(Action::Walk, d, f));
        assert_eq!(walk(Direction::Right, 0), Rect::new(96, 32, 32, 32));
        assert_eq!(walk(Direction::Back, 4), Rect::new(0, 160, 32, 32));
        assert_eq!(
            layer_rect(Layer::Body, &Pose::new(Action::Action, Direction::Left, 3)),
            Rect::new(32, 256, 32, 32)
        );
        assert_eq!(
            layer_rect(Layer::Body, &Pose::new(Action::Grab, Direction::Front, 0)),
            Rect::new(64, 416, 32, 32)
        );
        assert_eq!(layer_rect(Layer::Body, &Pose::idle(Direction::Front)), Rect::new(64, 0, 32, 32));
    }

    #[test]
    fn test_body_damage_coordinates() {
        let damage = |d| layer_rect(Layer::Body, &Pose::new(Action::Damage, d, 0));
        assert_eq!(damage(Direction::Back), Rect::new(32, 608, 32, 32));
        assert_eq!(damage(Direction::Left), Rect::new(32, 640, 32, 32));
        assert_eq!(damage(Direction::Front), Rect::new(96, 608, 32, 32));
        assert_eq!(damage(Direction::Right), Rect::new(96, 640, 32, 32));
    }

    #[test]
    fn test_head_rows_per_action() {
        let head_y = |a, d| layer_rect(Layer::Head, &Pose::new(a, d, 2)).y;
        let ys = |a| Direction::ALL.map(|d| head_y(a, d));
        assert_eq!(ys(Action::Idle), [0, 32, 64, 96]);
        assert_eq!(ys(Action::Grab), [272, 176, 208, 240]);
        assert_eq!(ys(Action::Action), [272, 304, 336, 368]);
        assert_eq!(ys(Action::Damage), [400, 432, 464, 496]);
        assert_eq!(ys(Action::Death), [528; 4]);
        assert_eq!(layer_rect(Layer::Head, &Pose::new(Action::Action, Direction::Left, 0)), Rect::new(0, 304, 32, 32));
    }

    #[test]
    fn test_death_collapses_directions() {
        let first = select(&Pose::new(Action::Death, Direction::Back, 0));
        for direction in Direction::ALL {
            for frame in 0..FRAME_COUNT {
                assert_eq!(select(&Pose::new(Action::Death, direction, frame)), first);
            }
        }
        assert_eq!(first.body, Rect::new(32, 672, 48, 32));
        assert_eq!(first.head, Rect::new(0, 528, 32, 32));
        assert_eq!(first.hat, Rect::new(0, 96, 48, 48));
    }

    #[test]
    fn test_hat_grab_back_reuses_idle_back() {
        let grab = |d| layer_rect(Layer::Hat, &Pose::new(Action::Grab, d, 0));
        assert_eq!(grab(Direction::Back), layer_rect(Layer::Hat, &Pose::idle(Direction::Back)));
        assert_eq!(grab(Direction::Left), Rect::new(48, 48, 48, 48));
        assert_eq!(grab(Direction::Right), Rect::new(144, 48, 48, 48));
    }

    #[test]
    fn test_missing_rows_fall_back_to_idle() {
        for direction in Direction::ALL {
            let idle = select(&Pose::idle(direction));
            for frame in 0..FRAME_COUNT {
                let walk = Pose::new(Action::Walk, direction, frame);
                assert_eq!(layer_rect(Layer::Head, &walk), idle.head);
                assert_eq!(layer_rect(Layer::Hat, &walk), idle.hat);
            }
            for action in [Action::Action, Action::Damage] {
                assert_eq!(layer_rect(Layer::Hat, &Pose::new(action, direction, 1)), idle.hat);
            }
        }
    }

    #[test]
    fn test_walk_frames_step_down_the_column() {
        let ys: Vec<u32> = (0..FRAME_COUNT)
            .map(|f| layer_rect(Layer::Body, &Pose::new(Action::Walk, Direction::Right, f)).y)
            .collect();
        assert_eq!(ys, vec![32, 64, 96, 128, 160]);
    }

    #[test]
    fn test_idle_ignores_frame_index() {
        let a = select(&Pose::new(Action::Idle, Direction::Left, 0));
        let b = select(&Pose { action: Action::Idle, direction: Direction::Left, frame: 4 });
        assert_eq!(a, b);
    }
}
