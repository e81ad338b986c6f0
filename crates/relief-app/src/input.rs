use relief_core::interaction::InputSnapshot;

// ---------------------------------------------------------------------------
// Key — windowing-library-independent key representation
// ---------------------------------------------------------------------------

/// A bound keyboard key, independent of any windowing library.
///
/// `main.rs` maps `winit::keyboard::PhysicalKey` → `Key`; everything else
/// in the input pipeline works purely with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    N,
    M,
}

// ---------------------------------------------------------------------------
// KeyState — held/released level of every bound key
// ---------------------------------------------------------------------------

/// Tracks which bound keys are down between frames. Window events update it
/// as they arrive; the render loop reads one [`InputSnapshot`] per frame.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    snapshot: InputSnapshot,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, held: bool) {
        let slot = match key {
            Key::Digit1 => &mut self.snapshot.mode_keys[0],
            Key::Digit2 => &mut self.snapshot.mode_keys[1],
            Key::Digit3 => &mut self.snapshot.mode_keys[2],
            Key::Digit4 => &mut self.snapshot.mode_keys[3],
            Key::N => &mut self.snapshot.normal_map_key,
            Key::M => &mut self.snapshot.mipmap_key,
        };
        *slot = held;
    }

    /// Drop every held key, e.g. when the window loses focus and release
    /// events may never arrive.
    pub fn clear(&mut self) {
        self.snapshot = InputSnapshot::default();
    }

    pub fn snapshot(&self) -> InputSnapshot {
        self.snapshot
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use relief_core::interaction::Interaction;
    use relief_core::post::PostMode;

    #[test]
    fn digits_map_to_mode_slots() {
        for (i, key) in [Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4]
            .into_iter()
            .enumerate()
        {
            let mut keys = KeyState::new();
            keys.set(key, true);
            let snap = keys.snapshot();
            for (j, held) in snap.mode_keys.iter().enumerate() {
                assert_eq!(*held, i == j, "key {key:?} slot {j}");
            }
        }
    }

    #[test]
    fn toggle_keys_map_to_their_flags() {
        let mut keys = KeyState::new();
        keys.set(Key::N, true);
        assert!(keys.snapshot().normal_map_key);
        assert!(!keys.snapshot().mipmap_key);
        keys.set(Key::M, true);
        assert!(keys.snapshot().mipmap_key);
    }

    #[test]
    fn release_clears_level() {
        let mut keys = KeyState::new();
        keys.set(Key::M, true);
        keys.set(Key::M, false);
        assert_eq!(keys.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn clear_releases_everything() {
        let mut keys = KeyState::new();
        keys.set(Key::Digit3, true);
        keys.set(Key::N, true);
        keys.clear();
        assert_eq!(keys.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn key_held_across_frames_toggles_once() {
        let mut keys = KeyState::new();
        let mut machine = Interaction::default();
        keys.set(Key::N, true);
        let transitions = (0..60)
            .filter(|_| machine.update(&keys.snapshot()).normal_map)
            .count();
        assert_eq!(transitions, 1);
    }

    #[test]
    fn digit_press_selects_mode_through_machine() {
        let mut keys = KeyState::new();
        let mut machine = Interaction::default();
        keys.set(Key::Digit3, true);
        machine.update(&keys.snapshot());
        assert_eq!(machine.state().post_mode, PostMode::EdgeDetect);
    }
}
