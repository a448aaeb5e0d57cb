//! Outline serialization of DOM subtrees.
//!
//! [`outline`] flattens a subtree into indented text, one node per line,
//! suitable for snapshot assertions. Hidden subtrees are omitted, so the
//! outline shows what a host would actually paint.

use crate::dom::{Dom, NodeData, NodeId};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize a subtree to indented text, one line per visible node.
///
/// Each line starts with the node kind, followed by `#id`, one `.class` per
/// token, a `[name=value ...]` block of data markers sorted by name, and the
/// node text in quotes; every part appears only when the node carries it.
/// Children indent two spaces per level. A node with `visible == false` is
/// skipped along with its whole subtree.
///
/// # Examples
///
/// ```ignore
/// use plinth_tui::testing::outline;
///
/// let text = outline(&ui.dom, root);
/// assert!(text.contains("button [state=off] \"Mute\""));
/// ```
pub fn outline(dom: &Dom, root: NodeId) -> String {
    let mut lines = Vec::new();
    collect(dom, root, 0, &mut lines);
    lines.join("\n")
}

fn collect(dom: &Dom, node: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(data) = dom.get(node) else {
        return;
    };
    if !data.visible {
        return;
    }
    let mut line = "  ".repeat(depth);
    line.push_str(&describe(data));
    lines.push(line);
    for &child in dom.children(node) {
        collect(dom, child, depth + 1, lines);
    }
}

/// One node as `kind #id .class [name=value] "text"`.
fn describe(data: &NodeData) -> String {
    let mut line = data.kind.clone();
    if let Some(id) = &data.id {
        line.push_str(" #");
        line.push_str(id);
    }
    for class in data.classes.iter() {
        line.push_str(" .");
        line.push_str(class);
    }
    // Markers sort by name so the line is stable however they were set.
    let mut markers: Vec<(&str, &str)> = data.data.iter().collect();
    markers.sort_by(|a, b| a.0.cmp(b.0));
    if !markers.is_empty() {
        line.push_str(" [");
        for (i, (name, value)) in markers.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(name);
            line.push('=');
            line.push_str(value);
        }
        line.push(']');
    }
    if !data.text().is_empty() {
        line.push(' ');
        line.push_str(&format!("{:?}", data.text()));
    }
    line
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nested_nodes_indent_two_spaces_per_level() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("panel").with_id("prefs"));
        let row = dom.insert_child(root, NodeData::new("group").with_class("row"));
        dom.insert_child(row, NodeData::new("label").with_text("Volume"));
        dom.insert_child(
            row,
            NodeData::new("slider")
                .with_data("value", "40")
                .with_data("percent", "40"),
        );

        let expected = "\
panel #prefs
  group .row
    label \"Volume\"
    slider [percent=40 value=40]";
        assert_eq!(outline(&dom, root), expected);
    }

    #[test]
    fn hidden_subtrees_are_omitted() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("popover"));
        let mut surface_data = NodeData::new("surface").with_data("state", "closed");
        surface_data.visible = false;
        let surface = dom.insert_child(root, surface_data);
        dom.insert_child(surface, NodeData::new("text").with_text("Hidden"));
        dom.insert_child(root, NodeData::new("button").with_text("Open"));

        assert_eq!(outline(&dom, root), "popover\n  button \"Open\"");
    }

    #[test]
    fn a_missing_root_serializes_to_nothing() {
        let dom = Dom::new();
        assert_eq!(outline(&dom, NodeId::default()), "");
    }

    #[test]
    fn a_form_outline_reads_as_a_tree() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("form").with_id("login"));
        let field = dom.insert_child(
            root,
            NodeData::new("field").with_data("invalid", "true"),
        );
        dom.insert_child(field, NodeData::new("label").with_text("Email"));
        dom.insert_child(
            field,
            NodeData::new("input")
                .with_class("border")
                .with_text("not-an-address"),
        );
        dom.insert_child(
            field,
            NodeData::new("text")
                .with_class("destructive")
                .with_text("Enter a valid email"),
        );

        insta::assert_snapshot!(outline(&dom, root), @r#"
        form #login
          field [invalid=true]
            label "Email"
            input .border "not-an-address"
            text .destructive "Enter a valid email"
        "#);
    }
}
