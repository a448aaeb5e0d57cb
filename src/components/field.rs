//! Field and empty state: static compositions with no controller.
//!
//! A field wraps one control with a label, an optional description, and a
//! validation message slot; the message node always exists so an error can
//! arrive after build. An empty state is a placeholder block for a region
//! with nothing to show yet. Both are plain tree builders: the host mounts
//! whatever interactive controller it likes into the slots they return.

use crate::dom::{Dom, NodeData, NodeId};
use crate::style::{part_attrs, part_classes, Appearance};

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// Configuration for [`build_field`].
#[derive(Clone, Debug)]
pub struct FieldConfig {
    label: String,
    description: Option<String>,
    error: Option<String>,
    appearance: Appearance,
    id: Option<String>,
}

impl FieldConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            error: None,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Node handles for a built field.
#[derive(Clone, Copy, Debug)]
pub struct FieldParts {
    pub root: NodeId,
    pub label: NodeId,
    /// Slot for the control this field describes.
    pub control: NodeId,
    pub description: Option<NodeId>,
    /// Validation message, hidden until an error is set.
    pub message: NodeId,
}

pub fn build_field(dom: &mut Dom, parent: NodeId, config: FieldConfig) -> FieldParts {
    let invalid = config.error.is_some();
    let mut root_data = NodeData::new("field")
        .with_classes(part_classes("col gap-1", &config.appearance))
        .with_attrs(part_attrs("field", "root", &config.appearance))
        .with_data("invalid", if invalid { "true" } else { "false" });
    if let Some(id) = &config.id {
        root_data = root_data.with_id(id.clone());
    }
    let root = dom.insert_child(parent, root_data);

    let label = dom.insert_child(
        root,
        NodeData::new("label")
            .with_attrs(part_attrs("field", "label", &Appearance::default()))
            .with_text(&config.label),
    );
    let control = dom.insert_child(
        root,
        NodeData::new("group")
            .with_attrs(part_attrs("field", "control", &Appearance::default())),
    );
    let description = config.description.as_ref().map(|text| {
        dom.insert_child(
            root,
            NodeData::new("text")
                .with_class("muted")
                .with_attrs(part_attrs("field", "description", &Appearance::default()))
                .with_text(text),
        )
    });

    let mut message_data = NodeData::new("text")
        .with_class("destructive")
        .with_attrs(part_attrs("field", "message", &Appearance::default()));
    if let Some(error) = &config.error {
        message_data = message_data.with_text(error);
    }
    message_data.visible = invalid;
    let message = dom.insert_child(root, message_data);

    FieldParts {
        root,
        label,
        control,
        description,
        message,
    }
}

/// Set or clear the field's validation error.
pub fn set_field_error(dom: &mut Dom, parts: &FieldParts, error: Option<&str>) {
    match error {
        Some(text) => {
            dom.set_text(parts.message, text);
            dom.set_visible(parts.message, true);
            dom.set_data(parts.root, "invalid", "true");
        }
        None => {
            dom.set_visible(parts.message, false);
            dom.set_data(parts.root, "invalid", "false");
        }
    }
}

// ---------------------------------------------------------------------------
// EmptyState
// ---------------------------------------------------------------------------

/// Configuration for [`build_empty_state`].
#[derive(Clone, Debug)]
pub struct EmptyStateConfig {
    icon: Option<String>,
    title: String,
    description: Option<String>,
    action: Option<String>,
    appearance: Appearance,
    id: Option<String>,
}

impl EmptyStateConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            icon: None,
            title: title.into(),
            description: None,
            action: None,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Label for an action button; the host wires its behavior.
    pub fn action(mut self, label: impl Into<String>) -> Self {
        self.action = Some(label.into());
        self
    }

    pub fn appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Node handles for a built empty state.
#[derive(Clone, Copy, Debug)]
pub struct EmptyStateParts {
    pub root: NodeId,
    pub title: NodeId,
    pub description: Option<NodeId>,
    pub action: Option<NodeId>,
}

pub fn build_empty_state(dom: &mut Dom, parent: NodeId, config: EmptyStateConfig) -> EmptyStateParts {
    let mut root_data = NodeData::new("empty-state")
        .with_classes(part_classes("border rounded pad-2 col gap-1", &config.appearance))
        .with_attrs(part_attrs("empty-state", "root", &config.appearance));
    if let Some(id) = &config.id {
        root_data = root_data.with_id(id.clone());
    }
    let root = dom.insert_child(parent, root_data);

    if let Some(icon) = &config.icon {
        dom.insert_child(
            root,
            NodeData::new("text")
                .with_class("muted")
                .with_attrs(part_attrs("empty-state", "icon", &Appearance::default()))
                .with_text(icon),
        );
    }
    let title = dom.insert_child(
        root,
        NodeData::new("heading")
            .with_attrs(part_attrs("empty-state", "title", &Appearance::default()))
            .with_text(&config.title),
    );
    let description = config.description.as_ref().map(|text| {
        dom.insert_child(
            root,
            NodeData::new("text")
                .with_class("muted")
                .with_attrs(part_attrs("empty-state", "description", &Appearance::default()))
                .with_text(text),
        )
    });
    let action = config.action.as_ref().map(|label| {
        dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("border rounded pad-x-2", &Appearance::default()))
                .with_attrs(part_attrs("empty-state", "action", &Appearance::default()))
                .with_text(label)
                .focusable(true),
        )
    });

    EmptyStateParts {
        root,
        title,
        description,
        action,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
