//! Deadline timers and hover intent.
//!
//! The runtime owns one [`TimerQueue`] and advances it from its tick; due
//! timers come back as values routed to their owning controllers.
//! [`HoverIntent`] layers open/close delays on top so a pointer crossing a
//! sibling item does not flicker a submenu shut.

use std::time::Duration;

use crate::controller::ControllerId;

// ---------------------------------------------------------------------------
// TimerQueue
// ---------------------------------------------------------------------------

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A timer that came due, ready for the runtime to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub owner: ControllerId,
    pub token: u32,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    id: TimerId,
    owner: ControllerId,
    token: u32,
    deadline: Duration,
}

/// One-shot timers against a monotonic clock the caller advances.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
    now: Duration,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a one-shot timer `delay` from now.
    pub fn schedule(&mut self, owner: ControllerId, token: u32, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            owner,
            token,
            deadline: self.now + delay,
        });
        id
    }

    /// Cancel a pending timer. Unknown or already-fired handles are no-ops.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every pending timer owned by a controller (unmount cleanup).
    pub fn cancel_owner(&mut self, owner: ControllerId) {
        self.timers.retain(|t| t.owner != owner);
    }

    /// Advance the clock and collect the timers that came due, ordered by
    /// deadline and then by scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<FiredTimer> {
        self.now += elapsed;
        let now = self.now;

        let mut due: Vec<Timer> = self
            .timers
            .iter()
            .copied()
            .filter(|t| t.deadline <= now)
            .collect();
        self.timers.retain(|t| t.deadline > now);
        due.sort_by_key(|t| (t.deadline, t.id.0));

        due.into_iter()
            .map(|t| FiredTimer { id: t.id, owner: t.owner, token: t.token })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// HoverIntent
// ---------------------------------------------------------------------------

/// Which hover edge a resolved timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverFired {
    Open,
    Close,
}

/// Open/close delays around pointer enter and leave.
///
/// Entering cancels a pending close before scheduling an open, so moving
/// across a sibling and back within the close delay leaves an open submenu
/// alone.
#[derive(Debug)]
pub struct HoverIntent {
    pub open_delay: Duration,
    pub close_delay: Duration,
    open_timer: Option<TimerId>,
    close_timer: Option<TimerId>,
}

impl HoverIntent {
    pub const DEFAULT_OPEN_DELAY: Duration = Duration::from_millis(100);
    pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

    pub fn new(open_delay: Duration, close_delay: Duration) -> Self {
        Self {
            open_delay,
            close_delay,
            open_timer: None,
            close_timer: None,
        }
    }

    /// Pointer entered the trigger: drop any pending close and arm the
    /// open delay. An already-armed open keeps its original deadline.
    pub fn pointer_enter(&mut self, timers: &mut TimerQueue, owner: ControllerId, token: u32) {
        if let Some(close) = self.close_timer.take() {
            timers.cancel(close);
        }
        if self.open_timer.is_none() {
            self.open_timer = Some(timers.schedule(owner, token, self.open_delay));
        }
    }

    /// Pointer left the trigger: drop any pending open and arm the close
    /// delay.
    pub fn pointer_leave(&mut self, timers: &mut TimerQueue, owner: ControllerId, token: u32) {
        if let Some(open) = self.open_timer.take() {
            timers.cancel(open);
        }
        if self.close_timer.is_none() {
            self.close_timer = Some(timers.schedule(owner, token, self.close_delay));
        }
    }

    /// Match a fired timer against the armed edges, clearing the handle.
    /// Returns `None` for timers that are not ours.
    pub fn resolve(&mut self, timer: TimerId) -> Option<HoverFired> {
        if self.open_timer == Some(timer) {
            self.open_timer = None;
            return Some(HoverFired::Open);
        }
        if self.close_timer == Some(timer) {
            self.close_timer = None;
            return Some(HoverFired::Close);
        }
        None
    }

    /// Drop both pending edges (unmount or explicit open/close).
    pub fn cancel(&mut self, timers: &mut TimerQueue) {
        if let Some(open) = self.open_timer.take() {
            timers.cancel(open);
        }
        if let Some(close) = self.close_timer.take() {
            timers.cancel(close);
        }
    }

    pub fn open_pending(&self) -> bool {
        self.open_timer.is_some()
    }

    pub fn close_pending(&self) -> bool {
        self.close_timer.is_some()
    }
}

impl Default for HoverIntent {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OPEN_DELAY, Self::DEFAULT_CLOSE_DELAY)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
