// Core types shared by the frame tables, the compositor and the renderer.

/// Walk cycle length, and the longest one-shot animation.
pub const FRAME_COUNT: usize = 5;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the window canvas is (pixels)
    pub height: usize,     // how tall the window canvas is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Fill every pixel with one color (start of each redraw).
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

/// Pixel rectangle inside a source sheet, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

/// Facing direction. The discriminant is the column index used by the frame tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Back = 0,
    Left = 1,
    #[default]
    Front = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Back, Direction::Left, Direction::Front, Direction::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Back => "BACK",
            Direction::Left => "LEFT",
            Direction::Front => "FRONT",
            Direction::Right => "RIGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    Idle,
    Walk,
    Action,
    Grab,
    Damage,
    Death,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Idle,
        Action::Walk,
        Action::Action,
        Action::Grab,
        Action::Damage,
        Action::Death,
    ];

    /// Short one-shot animations that play once and return to idle.
    pub fn is_one_shot(self) -> bool {
        matches!(self, Action::Action | Action::Grab | Action::Damage)
    }

    /// How many frames a one-shot shows before returning to idle. The action
    /// row facing away has one more frame than the other three.
    pub fn one_shot_frames(self, direction: Direction) -> usize {
        match self {
            Action::Action if direction == Direction::Back => FRAME_COUNT,
            Action::Action => FRAME_COUNT - 1,
            Action::Grab | Action::Damage => 1,
            Action::Idle | Action::Walk | Action::Death => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Idle => "IDLE",
            Action::Walk => "WALK",
            Action::Action => "ACTION",
            Action::Grab => "GRAB",
            Action::Damage => "DAMAGE",
            Action::Death => "DEATH",
        }
    }
}

/// Lookup key for sprite geometry: what the character does, where it faces,
/// and which frame of the row is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pose {
    pub action: Action,
    pub direction: Direction,
    pub frame: usize,
}

impl Pose {
    pub fn new(action: Action, direction: Direction, frame: usize) -> Self {
        Self { action, direction, frame: frame % FRAME_COUNT }
    }

    pub fn idle(direction: Direction) -> Self {
        Self::new(Action::Idle, direction, 0)
    }
}
