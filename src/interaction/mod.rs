//! Interaction primitives shared by every component: floating placement,
//! focus management, scroll locking, dismissal, and hover intent.

pub mod dismiss;
pub mod focus;
pub mod intent;
pub mod positioner;
pub mod scroll_lock;

pub use dismiss::{
    BindingId, DismissPhase, DismissReason, DismissTrigger, EscapeOptions, EscapePlan,
    EscapeRegistry, Fired, OutsideClickOptions, OutsideClickRegistry,
};
pub use focus::{FocusOrder, FocusTrap, TrapOptions};
pub use intent::{FiredTimer, HoverFired, HoverIntent, TimerId, TimerQueue};
pub use positioner::{
    Align, Placement, PositionConfig, Positioner, Resolved, Side, resolve,
};
pub use scroll_lock::{ScrollLock, ScrollState};
