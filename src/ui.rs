//! Runtime: owns the tree, the interaction registries, and the mounted
//! controllers, and routes every input event.
//!
//! Keys go to the escape registry first, then Tab cycling (innermost trap
//! or global order), then bubble from the focused node outward through the
//! controllers that own its ancestors. Pointer events hit-test the region
//! map with overlays in front, run capture-phase outside-click bindings,
//! dispatch along the target's controller chain, then run bubble-phase
//! bindings. [`Ui::tick`] advances timers and the service round-trip.

use std::time::Duration;

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, trace, warn};

use crate::controller::{Controller, ControllerId, Handled, Mounted};
use crate::dom::{Dom, NodeId, RegionMap};
use crate::event::{InputEvent, Key, KeyEvent, MouseAction, MouseEvent};
use crate::geometry::{Offset, Region, Size};
use crate::interaction::dismiss::{
    BindingId, DismissPhase, DismissReason, DismissTrigger, EscapeOptions, EscapeRegistry,
    OutsideClickOptions, OutsideClickRegistry,
};
use crate::interaction::focus::{FocusOrder, FocusTrap, TrapOptions};
use crate::interaction::intent::{HoverIntent, TimerId, TimerQueue};
use crate::interaction::positioner::{PositionConfig, Positioner, Resolved};
use crate::interaction::scroll_lock::{ScrollLock, ScrollState};
use crate::service::{ServiceBridge, ServiceRequest};

// ---------------------------------------------------------------------------
// Ctx
// ---------------------------------------------------------------------------

/// Controller-side view of the runtime, passed into every callback.
///
/// The tree and region map are open fields; everything else goes through
/// methods that tag the side effect with the owning controller so unmount
/// can clean up wholesale.
pub struct Ctx<'a> {
    owner: ControllerId,
    viewport: Region,
    pub dom: &'a mut Dom,
    pub regions: &'a mut RegionMap,
    focused: &'a mut Option<NodeId>,
    traps: &'a mut Vec<FocusTrap>,
    outside: &'a mut OutsideClickRegistry,
    escapes: &'a mut EscapeRegistry,
    timers: &'a mut TimerQueue,
    lock: &'a mut ScrollLock,
    scroll: &'a mut ScrollState,
    positioners: &'a mut Vec<Positioner>,
    overlays: &'a mut Vec<NodeId>,
    requests: &'a mut Vec<(ControllerId, ServiceRequest)>,
}

impl Ctx<'_> {
    pub fn owner(&self) -> ControllerId {
        self.owner
    }

    pub fn viewport(&self) -> Region {
        self.viewport
    }

    // ── Focus ────────────────────────────────────────────────────────

    pub fn focused(&self) -> Option<NodeId> {
        *self.focused
    }

    /// Move focus to a node, keeping the innermost trap in step when the
    /// node lives inside it. Stale ids are silent no-ops.
    pub fn focus(&mut self, node: NodeId) {
        if !self.dom.contains(node) {
            return;
        }
        *self.focused = Some(node);
        let dom = &*self.dom;
        if let Some(trap) = self.traps.last_mut() {
            if trap.contains(dom, node) {
                trap.focus(dom, node);
            }
        }
    }

    /// Scope Tab cycling to `container` and record where focus came from.
    /// Returns the auto-focused node, if any.
    pub fn activate_trap(&mut self, container: NodeId, options: TrapOptions) -> Option<NodeId> {
        let mut trap = FocusTrap::new(container, options);
        let auto = trap.activate(self.dom, *self.focused);
        if let Some(node) = auto {
            *self.focused = Some(node);
        }
        self.traps.push(trap);
        auto
    }

    /// Deactivate the trap scoped to `container` and restore focus to the
    /// node recorded at activation. Idempotent.
    pub fn deactivate_trap(&mut self, container: NodeId) -> Option<NodeId> {
        let idx = self.traps.iter().rposition(|t| t.container() == container)?;
        let mut trap = self.traps.remove(idx);
        let restore = trap.deactivate(None);
        if let Some(node) = restore {
            if self.dom.contains(node) {
                *self.focused = Some(node);
            }
        }
        restore
    }

    // ── Dismissal bindings ───────────────────────────────────────────

    /// Attach an outside-click binding; it arms at the end of the current
    /// event, so the click being dispatched right now can never fire it.
    pub fn attach_outside_click(
        &mut self,
        token: u32,
        inside: Vec<NodeId>,
        options: OutsideClickOptions,
    ) -> BindingId {
        self.outside.attach(self.owner, token, inside, options)
    }

    pub fn detach_outside_click(&mut self, id: BindingId) -> bool {
        self.outside.detach(id)
    }

    pub fn attach_escape(&mut self, token: u32, options: EscapeOptions) -> BindingId {
        self.escapes.attach(self.owner, token, options)
    }

    pub fn detach_escape(&mut self, id: BindingId) -> bool {
        self.escapes.detach(id)
    }

    pub fn set_escape_enabled(&mut self, id: BindingId, enabled: bool) -> bool {
        self.escapes.set_enabled(id, enabled)
    }

    // ── Timers ───────────────────────────────────────────────────────

    pub fn schedule(&mut self, token: u32, delay: Duration) -> TimerId {
        self.timers.schedule(self.owner, token, delay)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn hover_enter(&mut self, hover: &mut HoverIntent, token: u32) {
        hover.pointer_enter(self.timers, self.owner, token);
    }

    pub fn hover_leave(&mut self, hover: &mut HoverIntent, token: u32) {
        hover.pointer_leave(self.timers, self.owner, token);
    }

    /// Drop both intent timers (the owning overlay is closing).
    pub fn hover_cancel(&mut self, hover: &mut HoverIntent) {
        hover.cancel(self.timers);
    }

    // ── Floating placement ───────────────────────────────────────────

    /// Start positioning `content` against `anchor`, replacing any earlier
    /// placement of the same content node, and apply it once. The runtime
    /// re-applies on every resize and scroll until stopped.
    pub fn start_positioning(
        &mut self,
        anchor: NodeId,
        content: NodeId,
        content_size: Size,
        config: PositionConfig,
    ) -> Option<Resolved> {
        self.positioners.retain(|p| p.content() != content);
        let positioner = Positioner::new(anchor, content, content_size, config);
        let resolved = positioner.apply(self.dom, self.regions, self.viewport);
        self.positioners.push(positioner);
        resolved
    }

    /// Force a one-shot recompute for `content`.
    pub fn update_positioning(&mut self, content: NodeId) -> Option<Resolved> {
        let positioner = self.positioners.iter().find(|p| p.content() == content)?;
        positioner.apply(self.dom, self.regions, self.viewport)
    }

    /// Re-measure the content and recompute its placement.
    pub fn resize_content(&mut self, content: NodeId, size: Size) -> Option<Resolved> {
        let positioner = self
            .positioners
            .iter_mut()
            .find(|p| p.content() == content)?;
        positioner.set_content_size(size);
        positioner.apply(self.dom, self.regions, self.viewport)
    }

    /// Stop tracking `content`. Idempotent.
    pub fn stop_positioning(&mut self, content: NodeId) {
        self.positioners.retain(|p| p.content() != content);
    }

    // ── Scroll lock ──────────────────────────────────────────────────

    pub fn lock_scroll(&mut self) {
        self.lock.lock(self.scroll);
    }

    pub fn unlock_scroll(&mut self) {
        self.lock.unlock(self.scroll);
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_locked()
    }

    // ── Overlays ─────────────────────────────────────────────────────

    /// Put a subtree in front for hit-testing; re-pushing moves it to the
    /// front.
    pub fn push_overlay(&mut self, node: NodeId) {
        self.overlays.retain(|&n| n != node);
        self.overlays.push(node);
    }

    /// Remove a subtree from the overlay order. Idempotent.
    pub fn pop_overlay(&mut self, node: NodeId) {
        self.overlays.retain(|&n| n != node);
    }

    // ── Services ─────────────────────────────────────────────────────

    /// Queue a service request on behalf of this controller. The reply
    /// comes back through `on_reply` after a later tick.
    pub fn request(&mut self, request: ServiceRequest) {
        self.requests.push((self.owner, request));
    }
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// The single-threaded runtime.
pub struct Ui {
    pub dom: Dom,
    pub regions: RegionMap,
    viewport: Region,
    focused: Option<NodeId>,
    order: FocusOrder,
    traps: Vec<FocusTrap>,
    outside: OutsideClickRegistry,
    escapes: EscapeRegistry,
    timers: TimerQueue,
    lock: ScrollLock,
    scroll: ScrollState,
    positioners: Vec<Positioner>,
    overlays: Vec<NodeId>,
    service: Option<ServiceBridge>,
    requests: Vec<(ControllerId, ServiceRequest)>,
    controllers: SlotMap<ControllerId, Option<Box<dyn Controller>>>,
    roots: SecondaryMap<NodeId, ControllerId>,
    controller_roots: SecondaryMap<ControllerId, NodeId>,
    hover_chain: Vec<ControllerId>,
    capture: Option<(ControllerId, NodeId)>,
}

impl Ui {
    pub fn new(viewport: Region) -> Self {
        Self {
            dom: Dom::new(),
            regions: RegionMap::new(),
            viewport,
            focused: None,
            order: FocusOrder::new(),
            traps: Vec::new(),
            outside: OutsideClickRegistry::new(),
            escapes: EscapeRegistry::new(),
            timers: TimerQueue::new(),
            lock: ScrollLock::new(),
            scroll: ScrollState::default(),
            positioners: Vec::new(),
            overlays: Vec::new(),
            service: None,
            requests: Vec::new(),
            controllers: SlotMap::with_key(),
            roots: SecondaryMap::new(),
            controller_roots: SecondaryMap::new(),
            hover_chain: Vec::new(),
            capture: None,
        }
    }

    pub fn with_service(viewport: Region, service: ServiceBridge) -> Self {
        let mut ui = Self::new(viewport);
        ui.service = Some(service);
        ui
    }

    pub fn set_service(&mut self, service: ServiceBridge) {
        self.service = Some(service);
    }

    pub fn viewport(&self) -> Region {
        self.viewport
    }

    // ── Mount / unmount ──────────────────────────────────────────────

    /// Mount a controller under `parent`; it builds its subtree and the
    /// returned handle is the disposer token for [`Ui::unmount`].
    pub fn mount<C: Controller + 'static>(&mut self, controller: C, parent: NodeId) -> Mounted<C> {
        let id = self.controllers.insert(None);
        let mut boxed: Box<dyn Controller> = Box::new(controller);

        let root = {
            let mut ctx = self.ctx(id);
            boxed.mount(&mut ctx, parent)
        };
        debug_assert!(
            self.dom
                .get(root)
                .is_some_and(|data| data.attrs.get("controller").is_some()),
            "controller must annotate its root node"
        );

        debug!(kind = boxed.kind(), "controller mounted");
        if let Some(slot) = self.controllers.get_mut(id) {
            *slot = Some(boxed);
        }
        self.roots.insert(root, id);
        self.controller_roots.insert(id, root);
        self.outside.arm_pending();
        Mounted::new(id, root)
    }

    /// Run the disposer chain: orderly controller teardown, then drop its
    /// bindings, timers, traps, placements, and subtree. Idempotent.
    pub fn unmount<C>(&mut self, handle: Mounted<C>) {
        let id = handle.id();
        let root = handle.root();

        let Some(slot) = self.controllers.get_mut(id) else {
            return;
        };
        let Some(mut boxed) = slot.take() else {
            return;
        };
        {
            let mut ctx = self.ctx(id);
            boxed.unmount(&mut ctx);
        }
        debug!(kind = boxed.kind(), "controller unmounted");
        drop(boxed);

        self.outside.detach_owner(id);
        self.escapes.detach_owner(id);
        self.timers.cancel_owner(id);
        self.requests.retain(|(owner, _)| *owner != id);
        self.hover_chain.retain(|&c| c != id);
        if self.capture.is_some_and(|(c, _)| c == id) {
            self.capture = None;
        }

        // Traps scoped inside the removed subtree deactivate and restore.
        let dom = &self.dom;
        let mut restore = None;
        let mut kept = Vec::with_capacity(self.traps.len());
        for mut trap in self.traps.drain(..) {
            if dom.is_within(trap.container(), root) {
                if let Some(node) = trap.deactivate(None) {
                    restore = Some(node);
                }
            } else {
                kept.push(trap);
            }
        }
        self.traps = kept;

        let dom = &self.dom;
        self.positioners
            .retain(|p| !dom.is_within(p.content(), root) && !dom.is_within(p.anchor(), root));
        self.overlays.retain(|&n| !dom.is_within(n, root));

        if self.focused.is_some_and(|f| self.dom.is_within(f, root)) {
            self.focused = None;
        }
        if let Some(node) = restore {
            if self.dom.contains(node) && !self.dom.is_within(node, root) {
                self.focused = Some(node);
            }
        }

        self.regions.remove_subtree(&self.dom, root);
        self.dom.remove(root);
        self.roots.remove(root);
        self.controller_roots.remove(id);
        self.controllers.remove(id);
    }

    /// Typed access to a mounted controller for assertions and models.
    pub fn controller<C: Controller + 'static>(&self, handle: &Mounted<C>) -> Option<&C> {
        self.controllers
            .get(handle.id())
            .and_then(|slot| slot.as_ref())
            .and_then(|boxed| boxed.as_any().downcast_ref())
    }

    pub fn controller_mut<C: Controller + 'static>(
        &mut self,
        handle: &Mounted<C>,
    ) -> Option<&mut C> {
        self.controllers
            .get_mut(handle.id())
            .and_then(|slot| slot.as_mut())
            .and_then(|boxed| boxed.as_any_mut().downcast_mut())
    }

    // ── Focus ────────────────────────────────────────────────────────

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&n| self.dom.contains(n))
    }

    pub fn focus(&mut self, node: NodeId) {
        if !self.dom.contains(node) {
            return;
        }
        self.focused = Some(node);
        let dom = &self.dom;
        if let Some(trap) = self.traps.last_mut() {
            if trap.contains(dom, node) {
                trap.focus(dom, node);
            }
        }
    }

    // ── Scroll state ─────────────────────────────────────────────────

    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    /// Error-recovery reset of the scroll lock.
    pub fn force_unlock_scroll(&mut self) {
        self.lock.force_unlock(&mut self.scroll);
    }

    // ── Input ────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::Paste(text) => {
                for ch in text.chars() {
                    self.handle_key(KeyEvent::plain(Key::Char(ch)));
                }
            }
            InputEvent::FocusGained | InputEvent::FocusLost => {}
        }
        self.flush_requests();
        self.outside.arm_pending();
    }

    /// Advance the clock: fire due timers, push queued service requests,
    /// and deliver any replies that have arrived.
    pub fn tick(&mut self, elapsed: Duration) {
        for fired in self.timers.advance(elapsed) {
            self.with_controller(fired.owner, |c, ctx| c.on_timer(ctx, fired));
        }
        self.flush_requests();
        self.drain_replies();
        self.outside.arm_pending();
    }

    /// Hit-test a position, overlays first (frontmost last), then the
    /// background tree in painter's order.
    pub fn hit_test(&self, pos: Offset) -> Option<NodeId> {
        for &overlay in self.overlays.iter().rev() {
            if let Some(hit) = self.regions.hit_in(&self.dom, overlay, pos.x, pos.y) {
                return Some(hit);
            }
        }
        let root = self.dom.root()?;
        self.regions.hit_in(&self.dom, root, pos.x, pos.y)
    }

    // ── Key routing ──────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        if self.focused.is_some_and(|f| !self.dom.contains(f)) {
            self.focused = None;
        }

        if key.is(Key::Escape) {
            self.handle_escape();
            return;
        }

        if key.is(Key::Tab) || key.is(Key::BackTab) {
            let forward = key.is(Key::Tab);
            let dom = &self.dom;
            let next = match self.traps.last_mut() {
                Some(trap) => {
                    if forward {
                        trap.next(dom)
                    } else {
                        trap.previous(dom)
                    }
                }
                None => {
                    self.order.rebuild(dom);
                    if let Some(focused) = self.focused {
                        self.order.focus(focused);
                    }
                    if forward {
                        self.order.next()
                    } else {
                        self.order.previous()
                    }
                }
            };
            if let Some(node) = next {
                self.focused = Some(node);
            }
            return;
        }

        let chain = self.controller_chain(self.focused);
        for id in chain {
            let handled = self
                .with_controller(id, |c, ctx| c.on_key(ctx, key))
                .unwrap_or(Handled::No);
            if handled.is_handled() {
                return;
            }
        }
    }

    fn handle_escape(&mut self) {
        let plan = self.escapes.plan();
        for fired in &plan.fired {
            if self.escapes.contains(fired.binding) {
                trace!(token = fired.token, "escape dismissal");
                self.with_controller(fired.owner, |c, ctx| {
                    c.on_dismiss(ctx, DismissReason::Escape, fired.token)
                });
            }
        }
        if plan.consumed {
            return;
        }
        if !plan.suppress_default {
            // Fallback: drop focus, nothing else.
            self.focused = None;
        }
    }

    // ── Pointer routing ──────────────────────────────────────────────

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = mouse.position();

        if matches!(mouse.kind, MouseAction::ScrollUp | MouseAction::ScrollDown) {
            // Ancestor-scroll analog: floating content tracks its anchor.
            self.reposition_all();
            if self.lock.is_locked() {
                let hit = self.hit_test(pos);
                let dom = &self.dom;
                let in_overlay = hit
                    .is_some_and(|h| self.overlays.iter().any(|&o| dom.is_within(h, o)));
                if !in_overlay {
                    trace!("wheel swallowed while the scroll lock is held");
                    return;
                }
            }
        }

        let hit = self.hit_test(pos);

        if matches!(mouse.kind, MouseAction::Moved) {
            self.update_hover(hit);
        }

        // Pressing a focusable node focuses it, so following keys route
        // there. An active trap keeps focus inside its container.
        if mouse.is_press() {
            if let Some(hit) = hit {
                let inside_trap = match self.traps.last() {
                    Some(trap) => trap.contains(&self.dom, hit),
                    None => true,
                };
                let focusable = self
                    .dom
                    .get(hit)
                    .is_some_and(|d| d.focusable && !d.disabled);
                if inside_trap && focusable {
                    self.focus(hit);
                }
            }
        }

        let trigger = if mouse.is_press() {
            Some(DismissTrigger::Press)
        } else if mouse.is_release() {
            Some(DismissTrigger::Release)
        } else {
            None
        };

        if let Some(trigger) = trigger {
            self.run_outside(hit, trigger, DismissPhase::Capture);
        }

        if let Some((captured, root)) = self.capture {
            // Implicit pointer capture: the press handler keeps the stream
            // until release, wherever the pointer goes.
            let target = hit.unwrap_or(root);
            self.with_controller(captured, |c, ctx| c.on_mouse(ctx, target, mouse));
            if mouse.is_release() {
                self.capture = None;
            }
        } else if let Some(target) = hit {
            for id in self.controller_chain(Some(target)) {
                let handled = self
                    .with_controller(id, |c, ctx| c.on_mouse(ctx, target, mouse))
                    .unwrap_or(Handled::No);
                if handled.is_handled() {
                    if mouse.is_press() {
                        let root = self.controller_roots.get(id).copied().unwrap_or(target);
                        self.capture = Some((id, root));
                    }
                    break;
                }
            }
        }

        if let Some(trigger) = trigger {
            self.run_outside(hit, trigger, DismissPhase::Bubble);
        }
    }

    fn run_outside(&mut self, hit: Option<NodeId>, trigger: DismissTrigger, phase: DismissPhase) {
        let fired = self.outside.fired(&self.dom, hit, trigger, phase);
        for f in fired {
            if self.outside.contains(f.binding) {
                trace!(token = f.token, "outside click dismissal");
                self.with_controller(f.owner, |c, ctx| {
                    c.on_dismiss(ctx, DismissReason::OutsideClick, f.token)
                });
            }
        }
    }

    fn update_hover(&mut self, hit: Option<NodeId>) {
        if self.capture.is_some() {
            return;
        }
        let new_chain = match hit {
            Some(h) => self.controller_chain(Some(h)),
            None => Vec::new(),
        };
        let old_chain = std::mem::replace(&mut self.hover_chain, new_chain.clone());
        for id in old_chain {
            if !new_chain.contains(&id) {
                self.with_controller(id, |c, ctx| c.on_pointer_left(ctx));
            }
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Region::new(0, 0, width as i32, height as i32);
        self.reposition_all();
        let viewport = self.viewport;
        let ids: Vec<ControllerId> = self.controllers.keys().collect();
        for id in ids {
            self.with_controller(id, |c, ctx| c.on_resize(ctx, viewport));
        }
    }

    fn reposition_all(&mut self) {
        let viewport = self.viewport;
        let dom = &mut self.dom;
        let regions = &mut self.regions;
        for positioner in &self.positioners {
            positioner.apply(dom, regions, viewport);
        }
    }

    // ── Services ─────────────────────────────────────────────────────

    fn flush_requests(&mut self) {
        if self.requests.is_empty() {
            return;
        }
        let requests = std::mem::take(&mut self.requests);
        match self.service.as_mut() {
            Some(bridge) => {
                for (owner, request) in requests {
                    bridge.send(owner, request);
                }
            }
            None => warn!(
                count = requests.len(),
                "no date service configured; requests dropped"
            ),
        }
    }

    fn drain_replies(&mut self) {
        let Some(bridge) = self.service.as_mut() else {
            return;
        };
        let replies = bridge.drain();
        for (owner, reply) in replies {
            self.with_controller(owner, |c, ctx| c.on_reply(ctx, reply));
        }
    }

    // ── Dispatch plumbing ────────────────────────────────────────────

    /// Controllers owning `from` or one of its ancestors, innermost first.
    fn controller_chain(&self, from: Option<NodeId>) -> Vec<ControllerId> {
        let mut out = Vec::new();
        let Some(mut node) = from else {
            return out;
        };
        loop {
            if let Some(&ctrl) = self.roots.get(node) {
                out.push(ctrl);
            }
            match self.dom.parent(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }
        out
    }

    /// Take the controller out of its slot, run `f` with a fresh [`Ctx`],
    /// and put it back. The slot stays occupied-but-empty during the call,
    /// which makes reentrant dispatch to the same controller a no-op.
    fn with_controller<R>(
        &mut self,
        id: ControllerId,
        f: impl FnOnce(&mut dyn Controller, &mut Ctx<'_>) -> R,
    ) -> Option<R> {
        let slot = self.controllers.get_mut(id)?;
        let mut boxed = slot.take()?;
        let result = {
            let mut ctx = self.ctx(id);
            f(boxed.as_mut(), &mut ctx)
        };
        if let Some(slot) = self.controllers.get_mut(id) {
            *slot = Some(boxed);
        }
        Some(result)
    }

    fn ctx(&mut self, owner: ControllerId) -> Ctx<'_> {
        Ctx {
            owner,
            viewport: self.viewport,
            dom: &mut self.dom,
            regions: &mut self.regions,
            focused: &mut self.focused,
            traps: &mut self.traps,
            outside: &mut self.outside,
            escapes: &mut self.escapes,
            timers: &mut self.timers,
            lock: &mut self.lock,
            scroll: &mut self.scroll,
            positioners: &mut self.positioners,
            overlays: &mut self.overlays,
            requests: &mut self.requests,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
