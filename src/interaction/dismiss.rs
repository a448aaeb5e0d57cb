//! Dismissal registries: outside clicks and the Escape key.
//!
//! Both registries map events to fired bindings as plain values; the
//! runtime looks up the owning controller and delivers the dismissal. A
//! binding carries a token chosen by its owner so one controller can tell
//! its bindings apart.
//!
//! Outside-click bindings are inert until armed. The runtime arms them at
//! the end of the input event that attached them, so the click that opens
//! an overlay can never be the click that dismisses it.

use crate::controller::ControllerId;
use crate::dom::{Dom, NodeId};

// ---------------------------------------------------------------------------
// Binding handles
// ---------------------------------------------------------------------------

/// Handle returned by attach; detaching with it is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

/// Why a dismissal fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    OutsideClick,
    Escape,
}

/// A binding that fired, ready for the runtime to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub binding: BindingId,
    pub owner: ControllerId,
    pub token: u32,
}

// ---------------------------------------------------------------------------
// Outside clicks
// ---------------------------------------------------------------------------

/// Which pointer transition triggers an outside-click binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DismissTrigger {
    /// Button press, before the press is delivered anywhere.
    Press,
    /// Button release, the click analog.
    #[default]
    Release,
}

/// When the binding runs relative to target dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DismissPhase {
    /// Before the hit node's controller chain sees the event.
    Capture,
    /// After the controller chain, the usual case.
    #[default]
    Bubble,
}

/// Configuration for one outside-click binding.
#[derive(Debug, Clone, Default)]
pub struct OutsideClickOptions {
    pub trigger: DismissTrigger,
    pub phase: DismissPhase,
    ignore_kinds: Vec<String>,
    ignore_classes: Vec<String>,
}

impl OutsideClickOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(mut self, trigger: DismissTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn phase(mut self, phase: DismissPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Hits on nodes of this kind (or inside one) never fire the binding.
    pub fn ignore_kind(mut self, kind: impl Into<String>) -> Self {
        self.ignore_kinds.push(kind.into());
        self
    }

    /// Hits on nodes carrying this class (or inside one) never fire it.
    pub fn ignore_class(mut self, class: impl Into<String>) -> Self {
        self.ignore_classes.push(class.into());
        self
    }
}

#[derive(Debug)]
struct OutsideClickBinding {
    id: BindingId,
    owner: ControllerId,
    token: u32,
    inside: Vec<NodeId>,
    options: OutsideClickOptions,
    armed: bool,
}

impl OutsideClickBinding {
    /// Whether a pointer event that hit `hit` lands outside this binding.
    fn is_outside(&self, dom: &Dom, hit: Option<NodeId>) -> bool {
        let Some(hit) = hit else {
            // Missed every region: outside everything.
            return true;
        };
        if self
            .inside
            .iter()
            .any(|&inside| dom.is_within(hit, inside))
        {
            return false;
        }
        // Walk ancestor-or-self so a hit on a child of an ignored node is
        // also ignored.
        let mut cursor = Some(hit);
        while let Some(id) = cursor {
            if let Some(data) = dom.get(id) {
                if self.options.ignore_kinds.iter().any(|k| k == &data.kind) {
                    return false;
                }
                if self
                    .options
                    .ignore_classes
                    .iter()
                    .any(|c| data.classes.contains(c))
                {
                    return false;
                }
            }
            cursor = dom.parent(id);
        }
        true
    }
}

/// Registry of outside-click bindings.
#[derive(Debug, Default)]
pub struct OutsideClickRegistry {
    bindings: Vec<OutsideClickBinding>,
    next_id: u64,
}

impl OutsideClickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a binding monitoring the subtrees under `inside`. The
    /// binding stays inert until [`OutsideClickRegistry::arm_pending`].
    pub fn attach(
        &mut self,
        owner: ControllerId,
        token: u32,
        inside: Vec<NodeId>,
        options: OutsideClickOptions,
    ) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.push(OutsideClickBinding {
            id,
            owner,
            token,
            inside,
            options,
            armed: false,
        });
        id
    }

    /// Arm every binding attached since the last call.
    pub fn arm_pending(&mut self) {
        for binding in &mut self.bindings {
            binding.armed = true;
        }
    }

    /// Remove a binding. Unknown or already-detached handles are no-ops.
    pub fn detach(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        self.bindings.len() != before
    }

    /// Remove every binding owned by a controller (unmount cleanup).
    pub fn detach_owner(&mut self, owner: ControllerId) {
        self.bindings.retain(|b| b.owner != owner);
    }

    /// Bindings that fire for a pointer event in the given phase.
    ///
    /// `hit` is the hit-test result for the event position. The returned
    /// list is a snapshot: callers may attach and detach while dispatching
    /// it.
    pub fn fired(
        &self,
        dom: &Dom,
        hit: Option<NodeId>,
        trigger: DismissTrigger,
        phase: DismissPhase,
    ) -> Vec<Fired> {
        self.bindings
            .iter()
            .filter(|b| b.armed)
            .filter(|b| b.options.trigger == trigger && b.options.phase == phase)
            .filter(|b| b.is_outside(dom, hit))
            .map(|b| Fired { binding: b.id, owner: b.owner, token: b.token })
            .collect()
    }

    /// Whether a binding is still attached. Snapshots taken by `fired` are
    /// re-checked against this before delivery.
    pub fn contains(&self, id: BindingId) -> bool {
        self.bindings.iter().any(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Escape key
// ---------------------------------------------------------------------------

/// Configuration for one Escape binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeOptions {
    /// Consume the event: later-attached handlers already ran, but earlier
    /// ones and the focused controller chain never see it.
    pub stop_propagation: bool,
    /// Suppress the runtime's own fallback handling for this press.
    pub prevent_default: bool,
}

impl EscapeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_propagation(mut self, stop: bool) -> Self {
        self.stop_propagation = stop;
        self
    }

    pub fn prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = prevent;
        self
    }
}

#[derive(Debug)]
struct EscapeBinding {
    id: BindingId,
    owner: ControllerId,
    token: u32,
    options: EscapeOptions,
    enabled: bool,
}

/// What one Escape press should do, resolved against the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EscapePlan {
    /// Handlers to run, most recently attached first.
    pub fired: Vec<Fired>,
    /// A handler consumed the event; do not route it further.
    pub consumed: bool,
    /// A handler suppressed the runtime's fallback handling.
    pub suppress_default: bool,
}

/// Registry of Escape-key bindings, consulted before normal key routing.
#[derive(Debug, Default)]
pub struct EscapeRegistry {
    bindings: Vec<EscapeBinding>,
    next_id: u64,
}

impl EscapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(
        &mut self,
        owner: ControllerId,
        token: u32,
        options: EscapeOptions,
    ) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.push(EscapeBinding {
            id,
            owner,
            token,
            options,
            enabled: true,
        });
        id
    }

    /// Remove a binding. Unknown or already-detached handles are no-ops.
    pub fn detach(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        self.bindings.len() != before
    }

    pub fn detach_owner(&mut self, owner: ControllerId) {
        self.bindings.retain(|b| b.owner != owner);
    }

    /// Toggle a binding without re-attaching, keeping its place in the
    /// overlay order. Returns `false` for unknown handles.
    pub fn set_enabled(&mut self, id: BindingId, enabled: bool) -> bool {
        match self.bindings.iter_mut().find(|b| b.id == id) {
            Some(binding) => {
                binding.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Resolve one Escape press. Disabled bindings are skipped; collection
    /// stops after the first binding that stops propagation.
    pub fn plan(&self) -> EscapePlan {
        let mut plan = EscapePlan::default();
        for binding in self.bindings.iter().rev() {
            if !binding.enabled {
                continue;
            }
            plan.fired.push(Fired {
                binding: binding.id,
                owner: binding.owner,
                token: binding.token,
            });
            if binding.options.prevent_default {
                plan.suppress_default = true;
            }
            if binding.options.stop_propagation {
                plan.consumed = true;
                break;
            }
        }
        plan
    }

    /// Whether a binding is still attached.
    pub fn contains(&self, id: BindingId) -> bool {
        self.bindings.iter().any(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
