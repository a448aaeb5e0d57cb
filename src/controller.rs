//! Controller trait: the behavior attached to a component subtree.
//!
//! A controller builds its subtree at mount, reacts to routed input, and
//! tears everything down at unmount. Controllers are owned by the runtime
//! and addressed through [`Mounted`] handles; all side effects go through
//! the [`Ctx`] passed into every callback.

use std::any::Any;
use std::marker::PhantomData;

use slotmap::new_key_type;

use crate::dom::NodeId;
use crate::event::{KeyEvent, MouseEvent};
use crate::geometry::Region;
use crate::interaction::dismiss::DismissReason;
use crate::interaction::intent::FiredTimer;
use crate::service::ServiceReply;
use crate::ui::Ctx;

new_key_type! {
    /// Stable handle for a mounted controller.
    pub struct ControllerId;
}

// ---------------------------------------------------------------------------
// Handled
// ---------------------------------------------------------------------------

/// Whether a controller consumed an event or lets it bubble to an
/// enclosing controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl Handled {
    pub fn is_handled(self) -> bool {
        self == Handled::Yes
    }
}

// ---------------------------------------------------------------------------
// Controller trait
// ---------------------------------------------------------------------------

/// Behavior bound to a subtree of the element tree.
///
/// The trait is object-safe; the runtime stores controllers as boxed trait
/// objects. Event callbacks default to ignoring, so a controller only
/// implements the inputs it cares about.
pub trait Controller {
    /// Identifier written onto the root node, e.g. "dropdown-menu".
    fn kind(&self) -> &'static str;

    /// Build the subtree under `parent` and return its root node.
    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId;

    /// Orderly teardown before the runtime removes the subtree and drops
    /// every binding, timer, and positioner this controller still owns.
    /// Controllers holding a scroll lock or focus trap release them here.
    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        let _ = ctx;
    }

    /// A key routed to this controller. Unhandled keys bubble outward.
    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        let _ = (ctx, event);
        Handled::No
    }

    /// A pointer event whose hit-test landed on `target` inside this
    /// controller's subtree. Unhandled events bubble outward.
    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        let _ = (ctx, target, event);
        Handled::No
    }

    /// The pointer moved off this controller's subtree after hovering it.
    fn on_pointer_left(&mut self, ctx: &mut Ctx<'_>) {
        let _ = ctx;
    }

    /// The viewport changed. Floating placements are already re-resolved
    /// by the runtime; controllers that size themselves against the
    /// viewport recompute here.
    fn on_resize(&mut self, ctx: &mut Ctx<'_>, viewport: Region) {
        let _ = (ctx, viewport);
    }

    /// A timer scheduled by this controller came due.
    fn on_timer(&mut self, ctx: &mut Ctx<'_>, timer: FiredTimer) {
        let _ = (ctx, timer);
    }

    /// A dismissal binding owned by this controller fired.
    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, reason: DismissReason, token: u32) {
        let _ = (ctx, reason, token);
    }

    /// A service reply addressed to this controller arrived.
    fn on_reply(&mut self, ctx: &mut Ctx<'_>, reply: ServiceReply) {
        let _ = (ctx, reply);
    }

    /// Downcast support for typed access through [`Mounted`].
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// Mounted
// ---------------------------------------------------------------------------

/// Typed handle to a mounted controller: its id plus its root node.
///
/// Dropping the handle does nothing; passing it to the runtime's unmount
/// is the disposer.
#[derive(Debug)]
pub struct Mounted<C> {
    id: ControllerId,
    root: NodeId,
    _marker: PhantomData<fn() -> C>,
}

impl<C> Mounted<C> {
    pub(crate) fn new(id: ControllerId, root: NodeId) -> Self {
        Self { id, root, _marker: PhantomData }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }
}

impl<C> Clone for Mounted<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Mounted<C> {}

// ===========================================================================
// Tests
// ===========================================================================
