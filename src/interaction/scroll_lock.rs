//! Reentrant background scroll lock.
//!
//! Overlays that open while another overlay already holds the lock must not
//! restore scrolling when they close, so the lock counts holders. The
//! background state is captured on the first lock and written back exactly
//! on the last unlock, even if something moved it in between.

use tracing::trace;

use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// ScrollState
// ---------------------------------------------------------------------------

/// Scroll state of the background surface behind overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    /// Current scroll offset of the background content.
    pub offset: Offset,
    /// Whether wheel events reach the background.
    pub wheel_enabled: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self { offset: Offset::new(0, 0), wheel_enabled: true }
    }
}

// ---------------------------------------------------------------------------
// ScrollLock
// ---------------------------------------------------------------------------

/// Counted lock over a [`ScrollState`].
///
/// `lock` increments the count and captures the state only on the 0→1
/// transition; `unlock` decrements and restores only on 1→0. Extra unlocks
/// are ignored, the count never goes negative.
#[derive(Debug, Default)]
pub struct ScrollLock {
    depth: u32,
    saved: Option<ScrollState>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take (or re-take) the lock. The first holder captures `state` and
    /// disables background wheel routing.
    pub fn lock(&mut self, state: &mut ScrollState) {
        self.depth += 1;
        if self.depth == 1 {
            self.saved = Some(*state);
            state.wheel_enabled = false;
            trace!("background scroll locked");
        }
    }

    /// Release one hold. The last holder restores the captured state.
    pub fn unlock(&mut self, state: &mut ScrollState) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            if let Some(saved) = self.saved.take() {
                *state = saved;
            }
            trace!("background scroll restored");
        }
    }

    /// Drop every hold and restore the captured state. For error recovery
    /// and test teardown.
    pub fn force_unlock(&mut self, state: &mut ScrollState) {
        if self.depth > 0 {
            if let Some(saved) = self.saved.take() {
                *state = saved;
            }
        }
        self.depth = 0;
    }

    pub fn is_locked(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_lock_captures_and_disables_wheel() {
        let mut state = ScrollState { offset: Offset::new(0, 7), wheel_enabled: true };
        let mut lock = ScrollLock::new();

        lock.lock(&mut state);
        assert!(lock.is_locked());
        assert!(!state.wheel_enabled);
    }

    #[test]
    fn nested_locks_release_only_at_the_last_unlock() {
        let mut state = ScrollState { offset: Offset::new(0, 7), wheel_enabled: true };
        let mut lock = ScrollLock::new();

        lock.lock(&mut state);
        lock.lock(&mut state);
        assert_eq!(lock.depth(), 2);

        lock.unlock(&mut state);
        assert!(lock.is_locked());
        assert!(!state.wheel_enabled);

        lock.unlock(&mut state);
        assert!(!lock.is_locked());
        assert!(state.wheel_enabled);
    }

    #[test]
    fn restore_is_exact_even_after_drift() {
        let mut state = ScrollState { offset: Offset::new(0, 7), wheel_enabled: true };
        let mut lock = ScrollLock::new();

        lock.lock(&mut state);
        // Something scrolls the background while it is locked.
        state.offset = Offset::new(0, 42);
        lock.unlock(&mut state);

        assert_eq!(state.offset, Offset::new(0, 7));
        assert!(state.wheel_enabled);
    }

    #[test]
    fn extra_unlocks_are_ignored() {
        let mut state = ScrollState::default();
        let mut lock = ScrollLock::new();

        lock.unlock(&mut state);
        assert_eq!(lock.depth(), 0);

        lock.lock(&mut state);
        lock.unlock(&mut state);
        lock.unlock(&mut state);
        assert_eq!(lock.depth(), 0);

        // The counter did not go negative: the next lock is a fresh 0→1.
        lock.lock(&mut state);
        assert!(lock.is_locked());
        assert!(!state.wheel_enabled);
    }

    #[test]
    fn force_unlock_resets_any_depth() {
        let mut state = ScrollState { offset: Offset::new(3, 9), wheel_enabled: true };
        let mut lock = ScrollLock::new();

        lock.lock(&mut state);
        lock.lock(&mut state);
        lock.lock(&mut state);
        lock.force_unlock(&mut state);

        assert_eq!(lock.depth(), 0);
        assert_eq!(state.offset, Offset::new(3, 9));
        assert!(state.wheel_enabled);
    }

    #[test]
    fn force_unlock_when_open_is_a_no_op() {
        let mut state = ScrollState { offset: Offset::new(1, 1), wheel_enabled: true };
        let mut lock = ScrollLock::new();
        lock.force_unlock(&mut state);
        assert_eq!(state.offset, Offset::new(1, 1));
        assert!(state.wheel_enabled);
    }
}
