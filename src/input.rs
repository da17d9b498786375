// Keyboard state for walking: which movement keys are held, and the order
// they were pressed in (so the newest of two opposite keys wins).

use std::collections::{HashSet, VecDeque};

use minifb::Key;

use crate::types::{Action, Direction};

/// Most presses kept in the recent-order queue.
pub const RECENT_CAP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [MoveKey::Up, MoveKey::Down, MoveKey::Left, MoveKey::Right];
}

/// Single-press keys that start a pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKey {
    /// Play the action animation facing this way.
    Face(Direction),
    Grab,
    Damage,
    Death,
}

impl ActionKey {
    pub fn action(self) -> Action {
        match self {
            ActionKey::Face(_) => Action::Action,
            ActionKey::Grab => Action::Grab,
            ActionKey::Damage => Action::Damage,
            ActionKey::Death => Action::Death,
        }
    }
}

/// Arrow keys or WASD walk.
pub fn move_key(key: Key) -> Option<MoveKey> {
    match key {
        Key::Up | Key::W => Some(MoveKey::Up),
        Key::Down | Key::S => Some(MoveKey::Down),
        Key::Left | Key::A => Some(MoveKey::Left),
        Key::Right | Key::D => Some(MoveKey::Right),
        _ => None,
    }
}

/// I/J/K/L act facing back/left/front/right, G grab, H hurt, F death.
pub fn action_key(key: Key) -> Option<ActionKey> {
    match key {
        Key::I => Some(ActionKey::Face(Direction::Back)),
        Key::J => Some(ActionKey::Face(Direction::Left)),
        Key::K => Some(ActionKey::Face(Direction::Front)),
        Key::L => Some(ActionKey::Face(Direction::Right)),
        Key::G => Some(ActionKey::Grab),
        Key::H => Some(ActionKey::Damage),
        Key::F => Some(ActionKey::Death),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<MoveKey>,
    recent: VecDeque<MoveKey>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key was not already held. Repeats of a held key
    /// and presses beyond the cap are not queued.
    pub fn press(&mut self, key: MoveKey) -> bool {
        let fresh = self.held.insert(key);
        if fresh && self.recent.len() < RECENT_CAP {
            self.recent.push_back(key);
        }
        fresh
    }

    /// Returns true if the key was held. The queue keeps only held keys.
    pub fn release(&mut self, key: MoveKey) -> bool {
        let was_held = self.held.remove(&key);
        let held = &self.held;
        self.recent.retain(|k| held.contains(k));
        while self.recent.len() > RECENT_CAP {
            self.recent.pop_front();
        }
        was_held
    }

    pub fn release_all(&mut self) {
        self.held.clear();
        self.recent.clear();
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn recent(&self) -> impl Iterator<Item = MoveKey> + '_ {
        self.recent.iter().copied()
    }

    /// Of two opposite held keys, the one pressed last.
    fn newest_of(&self, a: MoveKey, b: MoveKey) -> Option<MoveKey> {
        match (self.is_held(a), self.is_held(b)) {
            (true, false) => Some(a),
            (false, true) => Some(b),
            (false, false) => None,
            // Queue was full when one of them went down: fall back to the first.
            (true, true) => Some(self.recent.iter().rev().copied().find(|k| *k == a || *k == b).unwrap_or(a)),
        }
    }

    /// Facing direction implied by the held keys. Lateral keys win over
    /// vertical ones, so up+left faces left.
    pub fn resolve_direction(&self) -> Option<Direction> {
        if let Some(lateral) = self.newest_of(MoveKey::Left, MoveKey::Right) {
            return Some(if lateral == MoveKey::Left { Direction::Left } else { Direction::Right });
        }
        self.newest_of(MoveKey::Up, MoveKey::Down)
            .map(|v| if v == MoveKey::Up { Direction::Back } else { Direction::Front })
    }

    /// Per-tick sprite movement in logical units (screen y grows downward).
    /// Diagonals are normalized so they are no faster than cardinals; opposite
    /// keys cancel.
    pub fn movement_vector(&self, speed: f32) -> (f32, f32) {
        let axis = |neg: MoveKey, pos: MoveKey| -> f32 {
            (self.is_held(pos) as i32 - self.is_held(neg) as i32) as f32
        };
        let dx = axis(MoveKey::Left, MoveKey::Right);
        let dy = axis(MoveKey::Up, MoveKey::Down);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return (0.0, 0.0);
        }
        (dx / len * speed, dy / len * speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn held(keys: &[MoveKey]) -> InputState {
        let mut s = InputState::new();
        for k in keys {
            s.press(*k);
        }
        s
    }

    #[test]
    fn test_single_keys() {
        assert_eq!(held(&[MoveKey::Up]).resolve_direction(), Some(Direction::Back));
        assert_eq!(held(&[MoveKey::Down]).resolve_direction(), Some(Direction::Front));
        assert_eq!(held(&[MoveKey::Left]).resolve_direction(), Some(Direction::Left));
        assert_eq!(held(&[MoveKey::Right]).resolve_direction(), Some(Direction::Right));
        assert_eq!(held(&[]).resolve_direction(), None);
    }

    #[test]
    fn test_diagonals_resolve_to_lateral() {
        for vertical in [MoveKey::Up, MoveKey::Down] {
            for lateral in [MoveKey::Left, MoveKey::Right] {
                let alone = held(&[lateral]).resolve_direction();
                assert_eq!(held(&[vertical, lateral]).resolve_direction(), alone);
                assert_eq!(held(&[lateral, vertical]).resolve_direction(), alone);
            }
        }
    }

    #[test]
    fn test_newest_opposite_key_wins() {
        assert_eq!(held(&[MoveKey::Left, MoveKey::Right]).resolve_direction(), Some(Direction::Right));
        assert_eq!(held(&[MoveKey::Right, MoveKey::Left]).resolve_direction(), Some(Direction::Left));
        assert_eq!(held(&[MoveKey::Down, MoveKey::Up]).resolve_direction(), Some(Direction::Back));
    }

    #[test]
    fn test_opposite_keys_cancel_movement() {
        assert_eq!(held(&[MoveKey::Left, MoveKey::Right]).movement_vector(3.0), (0.0, 0.0));
        assert_eq!(held(&[]).movement_vector(3.0), (0.0, 0.0));
    }

    #[test]
    fn test_recent_queue_tracks_held_keys() {
        let mut s = InputState::new();
        for _ in 0..100 {
            s.press(MoveKey::Left);
            s.release(MoveKey::Left);
        }
        assert_eq!(s.recent().count(), 0);
        assert!(!s.any_held());

        for key in MoveKey::ALL {
            s.press(key);
            s.press(key);
        }
        assert_eq!(s.recent().collect::<Vec<_>>(), MoveKey::ALL.to_vec());
        s.release(MoveKey::Down);
        assert_eq!(
            s.recent().collect::<Vec<_>>(),
            vec![MoveKey::Up, MoveKey::Left, MoveKey::Right]
        );
        s.release_all();
        assert_eq!(s.recent().count(), 0);
    }

    #[test]
    fn test_release_reports_state() {
        let mut s = held(&[MoveKey::Up]);
        assert!(!s.press(MoveKey::Up));
        assert!(s.release(MoveKey::Up));
        assert!(!s.release(MoveKey::Up));
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(move_key(Key::Left), Some(MoveKey::Left));
        assert_eq!(move_key(Key::A), Some(MoveKey::Left));
        assert_eq!(move_key(Key::W), Some(MoveKey::Up));
        assert_eq!(move_key(Key::F), None);
        assert_eq!(action_key(Key::J), Some(ActionKey::Face(Direction::Left)));
        assert_eq!(action_key(Key::F).map(ActionKey::action), Some(Action::Death));
        assert_eq!(action_key(Key::X), None);
        assert_eq!(action_key(Key::Up), None);
    }

    fn any_keys() -> impl Strategy<Value = Vec<MoveKey>> {
        prop::collection::vec(prop::sample::select(MoveKey::ALL.to_vec()), 0..12)
    }

    proptest! {
        #[test]
        fn prop_speed_is_constant_for_any_moving_combo(keys in any_keys(), speed in 0.5f32..20.0) {
            let (dx, dy) = held(&keys).movement_vector(speed);
            let mag = (dx * dx + dy * dy).sqrt();
            prop_assert!(mag == 0.0 || (mag - speed).abs() < 1e-4);
        }

        #[test]
        fn prop_vertical_key_never_overrides_lateral(keys in any_keys()) {
            let s = held(&keys);
            let lateral_held = s.is_held(MoveKey::Left) || s.is_held(MoveKey::Right);
            if lateral_held {
                prop_assert!(matches!(s.resolve_direction(), Some(Direction::Left | Direction::Right)));
            }
        }
    }
}
