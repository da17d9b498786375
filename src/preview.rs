//! Preview state machine: input events and scheduled ticks in, pose and
//! camera out.
//!
//! Time is passed in explicitly (`now` since startup), so the whole machine
//! runs the same way under the window loop and under tests.

use std::time::Duration;

use tracing::{debug, trace};

use crate::camera::Camera;
use crate::config::PreviewConfig;
use crate::input::{ActionKey, InputState, MoveKey};
use crate::scheduler::Scheduler;
use crate::types::{Action, Direction, Pose, FRAME_COUNT};

/// Timing and speed knobs taken from the config.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub walk_speed: f32,
    pub move_interval: Duration,
    pub anim_interval: Duration,
    pub zoom_in: f32,
    pub zoom_out: f32,
    pub border_margin: f32,
}

impl From<&PreviewConfig> for Tuning {
    fn from(config: &PreviewConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            move_interval: config.move_interval(),
            anim_interval: config.anim_interval(),
            zoom_in: config.zoom_step,
            zoom_out: config.zoom_out_step,
            border_margin: config.border_margin,
        }
    }
}

pub struct Preview {
    tuning: Tuning,
    camera: Camera,
    input: InputState,
    scheduler: Scheduler,
    pose: Pose,
    walk_frame: usize, // next walk frame to show
    dirty: bool,
}

impl Preview {
    pub fn new(config: &PreviewConfig) -> Self {
        let (border_x, border_y) = Camera::border_for(config.background_size, config.border_margin);
        Self {
            tuning: Tuning::from(config),
            camera: Camera::new(border_x, border_y),
            input: InputState::new(),
            scheduler: Scheduler::new(),
            pose: Pose::idle(Direction::Front),
            walk_frame: 0,
            dirty: true,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// True once after anything visible changed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn set_pose(&mut self, pose: Pose) {
        if pose != self.pose {
            self.pose = pose;
            self.dirty = true;
        }
    }

    fn go_idle(&mut self) {
        self.walk_frame = 0;
        self.set_pose(Pose::idle(self.pose.direction));
    }

    fn animating(&self) -> bool {
        self.pose.action.is_one_shot()
    }

    /// A movement key went down.
    pub fn press_move(&mut self, key: MoveKey, now: Duration) {
        self.input.press(key);
        if self.animating() {
            // Held keys are picked up again when the animation ends.
            return;
        }
        if self.pose.action == Action::Death {
            debug!("Revived by {key:?}");
            self.go_idle();
        }
        if !self.scheduler.movement.is_pending() {
            self.scheduler.movement.schedule(now, Duration::ZERO);
        }
    }

    /// A movement key went up. Releasing the last one stops walking at once.
    pub fn release_move(&mut self, key: MoveKey, _now: Duration) {
        self.input.release(key);
        if !self.input.any_held() {
            self.scheduler.movement.cancel();
            if self.pose.action == Action::Walk {
                self.go_idle();
            }
        }
    }

    /// Drop every held key (e.g. when a text prompt takes the keyboard).
    pub fn release_all_moves(&mut self, now: Duration) {
        for key in MoveKey::ALL {
            self.release_move(key, now);
        }
    }

    /// Start a pose from a single-press key. Any pending movement tick or
    /// animation step is canceled first.
    pub fn trigger(&mut self, key: ActionKey, now: Duration) {
        let dropped = self.scheduler.cancel_all();
        let direction = match key {
            ActionKey::Face(d) => d,
            _ => self.pose.direction,
        };
        let action = key.action();
        debug!(?action, ?direction, dropped, "Starting pose");

        self.walk_frame = 0;
        self.set_pose(Pose::new(action, direction, 0));
        self.dirty = true;
        if action.is_one_shot() {
            self.scheduler.animation.schedule(now, self.tuning.anim_interval);
        }
    }

    /// Mouse wheel notches (positive zooms in).
    pub fn wheel(&mut self, notches: f32) {
        if self.camera.zoom_by(notches, self.tuning.zoom_in, self.tuning.zoom_out) {
            trace!(zoom = self.camera.zoom(), "Zoom");
            self.dirty = true;
        }
    }

    /// Re-derive the pan limits for a background of `size` logical units.
    pub fn fit_background(&mut self, size: (u32, u32)) {
        let (border_x, border_y) = Camera::border_for(size, self.tuning.border_margin);
        self.camera.set_border(border_x, border_y);
        self.dirty = true;
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.dirty = true;
    }

    /// Run whatever ticks are due at `now`.
    pub fn update(&mut self, now: Duration) {
        if self.scheduler.animation.poll(now) {
            self.animation_step(now);
        }
        if self.scheduler.movement.poll(now) {
            self.movement_tick(now);
        }
    }

    fn animation_step(&mut self, now: Duration) {
        let next = self.pose.frame + 1;
        if next >= self.pose.action.one_shot_frames(self.pose.direction) {
            debug!(action = ?self.pose.action, "Animation finished");
            self.go_idle();
            if self.input.any_held() {
                self.scheduler.movement.schedule(now, Duration::ZERO);
            }
            return;
        }
        self.set_pose(Pose::new(self.pose.action, self.pose.direction, next));
        self.scheduler.animation.schedule(now, self.tuning.anim_interval);
    }

    fn movement_tick(&mut self, now: Duration) {
        if !self.input.any_held() {
            self.go_idle();
            return;
        }
        let direction = self.input.resolve_direction().unwrap_or(self.pose.direction);
        let (vx, vy) = self.input.movement_vector(self.tuning.walk_speed);
        if vx == 0.0 && vy == 0.0 {
            // Opposite keys cancel out: stand still until one is released.
            self.set_pose(Pose::idle(direction));
        } else {
            // The sprite stays put; the world slides the other way.
            if self.camera.pan_by(-vx, -vy) {
                self.dirty = true;
            }
            self.set_pose(Pose::new(Action::Walk, direction, self.walk_frame));
            self.walk_frame = (self.walk_frame + 1) % FRAME_COUNT;
            trace!(frame = self.pose.frame, offset = ?self.camera.offset(), "Walk tick");
        }

        self.scheduler.movement.schedule(now, self.tuning.move_interval);
    }

    /// Cancel every pending tick before the window goes away.
    pub fn shutdown(&mut self) -> usize {
        self.scheduler.cancel_all()
    }
}
