//! Accordion: vertically stacked expandable sections.
//!
//! Single mode collapses the open sibling when another section expands;
//! all-closed is allowed. Multiple mode leaves sections independent.
//! Content visibility mirrors the section state.

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseEvent};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

/// Whether several sections may be open at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccordionMode {
    Single,
    Multiple,
}

/// One section of an [`Accordion`].
#[derive(Clone, Debug)]
pub struct AccordionSection {
    title: String,
    body: String,
    open: bool,
}

impl AccordionSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into(), open: false }
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }
}

/// Configuration for an [`Accordion`].
#[derive(Clone, Debug)]
pub struct AccordionConfig {
    mode: AccordionMode,
    sections: Vec<AccordionSection>,
    appearance: Appearance,
    id: Option<String>,
}

impl AccordionConfig {
    pub fn new(mode: AccordionMode) -> Self {
        Self {
            mode,
            sections: Vec::new(),
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn section(mut self, section: AccordionSection) -> Self {
        self.sections.push(section);
        self
    }

    pub fn sections(mut self, sections: Vec<AccordionSection>) -> Self {
        self.sections = sections;
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

struct Section {
    item: NodeId,
    header: NodeId,
    content: NodeId,
    open: bool,
}

/// Expandable section stack.
pub struct Accordion {
    config: AccordionConfig,
    sections: Vec<Section>,
}

impl Accordion {
    pub fn new(config: AccordionConfig) -> Self {
        Self { config, sections: Vec::new() }
    }

    pub fn mode(&self) -> AccordionMode {
        self.config.mode
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.sections.get(index).is_some_and(|s| s.open)
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.open)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn header(&self, index: usize) -> Option<NodeId> {
        self.sections.get(index).map(|s| s.header)
    }

    pub fn content(&self, index: usize) -> Option<NodeId> {
        self.sections.get(index).map(|s| s.content)
    }

    fn set_open(&mut self, ctx: &mut Ctx<'_>, index: usize, open: bool) {
        let Some(section) = self.sections.get_mut(index) else {
            return;
        };
        section.open = open;
        let state = if open { "open" } else { "closed" };
        ctx.dom.set_data(section.item, "state", state);
        ctx.dom.set_data(section.header, "state", state);
        ctx.dom.set_visible(section.content, open);
    }

    fn toggle(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        let was_open = self.sections.get(index).is_some_and(|s| s.open);
        if !was_open && self.config.mode == AccordionMode::Single {
            for i in 0..self.sections.len() {
                if self.sections[i].open {
                    self.set_open(ctx, i, false);
                }
            }
        }
        self.set_open(ctx, index, !was_open);
    }

    fn header_index(&self, node: NodeId, dom: &Dom) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.header == node || dom.is_within(node, s.header))
    }

    /// Move focus across headers, wrapping.
    fn move_focus(&mut self, ctx: &mut Ctx<'_>, from: usize, delta: i64) {
        let n = self.sections.len();
        if n == 0 {
            return;
        }
        let next = (from as i64 + delta).rem_euclid(n as i64) as usize;
        if let Some(section) = self.sections.get(next) {
            ctx.focus(section.header);
        }
    }
}

impl Controller for Accordion {
    fn kind(&self) -> &'static str {
        "accordion"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("accordion")
            .with_classes(part_classes("column", &self.config.appearance))
            .with_attrs(part_attrs("accordion", "root", &self.config.appearance));
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        let mut initial_open = Vec::new();
        for (index, section) in self.config.sections.iter().enumerate() {
            let item = ctx.dom.insert_child(
                root,
                NodeData::new("section")
                    .with_class("border-b")
                    .with_attrs(part_attrs("accordion", "item", &Appearance::default()))
                    .with_data("state", "closed"),
            );
            let header = ctx.dom.insert_child(
                item,
                NodeData::new("button")
                    .with_attrs(part_attrs("accordion", "trigger", &Appearance::default()))
                    .with_text(&section.title)
                    .focusable(true)
                    .with_data("state", "closed"),
            );
            let mut content_data = NodeData::new("group")
                .with_attrs(part_attrs("accordion", "content", &Appearance::default()));
            content_data.visible = false;
            let content = ctx.dom.insert_child(item, content_data);
            ctx.dom.insert_child(
                content,
                NodeData::new("text").with_text(&section.body),
            );
            self.sections.push(Section { item, header, content, open: false });
            if section.open {
                initial_open.push(index);
            }
        }
        for index in initial_open {
            self.toggle(ctx, index);
        }
        root
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        let Some(focused) = ctx.focused() else {
            return Handled::No;
        };
        let Some(index) = self.header_index(focused, ctx.dom) else {
            return Handled::No;
        };
        match event.code {
            Key::Enter | Key::Char(' ') => {
                self.toggle(ctx, index);
                Handled::Yes
            }
            Key::Down => {
                self.move_focus(ctx, index, 1);
                Handled::Yes
            }
            Key::Up => {
                self.move_focus(ctx, index, -1);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        let Some(index) = self.header_index(target, ctx.dom) else {
            return Handled::No;
        };
        if event.is_press() {
            return Handled::Yes;
        }
        if event.is_release() {
            self.toggle(ctx, index);
            return Handled::Yes;
        }
        Handled::No
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;
    use crate::geometry::Region;
    use crate::ui::Ui;

    fn shell() -> (Ui, NodeId) {
        let mut ui = Ui::new(Region::new(0, 0, 80, 24));
        let root = ui.dom.insert(NodeData::new("shell"));
        ui.dom.set_root(root);
        (ui, root)
    }

    fn key(ui: &mut Ui, code: Key) {
        ui.handle_input(InputEvent::Key(KeyEvent::plain(code)));
    }

    fn config(mode: AccordionMode) -> AccordionConfig {
        AccordionConfig::new(mode)
            .section(AccordionSection::new("Is it accessible?", "Yes."))
            .section(AccordionSection::new("Is it styled?", "Yes, with classes."))
            .section(AccordionSection::new("Is it animated?", "No."))
    }

    #[test]
    fn single_mode_collapses_the_open_sibling() {
        let (mut ui, root) = shell();
        let accordion = ui.mount(Accordion::new(config(AccordionMode::Single)), root);
        let first = ui.controller(&accordion).unwrap().header(0).unwrap();
        ui.focus(first);

        key(&mut ui, Key::Enter);
        assert_eq!(ui.controller(&accordion).unwrap().open_indices(), vec![0]);

        key(&mut ui, Key::Down);
        key(&mut ui, Key::Enter);
        let a = ui.controller(&accordion).unwrap();
        assert_eq!(a.open_indices(), vec![1]);
        assert!(!ui.dom.is_shown(a.content(0).unwrap()));
        assert!(ui.dom.is_shown(a.content(1).unwrap()));
    }

    #[test]
    fn single_mode_allows_all_closed() {
        let (mut ui, root) = shell();
        let accordion = ui.mount(Accordion::new(config(AccordionMode::Single)), root);
        let first = ui.controller(&accordion).unwrap().header(0).unwrap();
        ui.focus(first);

        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Enter);
        assert!(ui.controller(&accordion).unwrap().open_indices().is_empty());
    }

    #[test]
    fn multiple_mode_sections_are_independent() {
        let (mut ui, root) = shell();
        let accordion = ui.mount(Accordion::new(config(AccordionMode::Multiple)), root);
        let first = ui.controller(&accordion).unwrap().header(0).unwrap();
        ui.focus(first);

        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Down);
        key(&mut ui, Key::Enter);
        assert_eq!(ui.controller(&accordion).unwrap().open_indices(), vec![0, 1]);
    }

    #[test]
    fn content_visibility_mirrors_state() {
        let (mut ui, root) = shell();
        let accordion = ui.mount(Accordion::new(config(AccordionMode::Single)), root);
        let a = ui.controller(&accordion).unwrap();
        let item_state = |ui: &Ui, n: NodeId| ui.dom.data(n, "state").map(str::to_string);
        let header = a.header(2).unwrap();
        let content = a.content(2).unwrap();
        assert!(!ui.dom.is_shown(content));

        ui.regions.set(header, Region::new(0, 4, 30, 1));
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(5, 4)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(5, 4)));

        assert!(ui.dom.is_shown(content));
        assert_eq!(item_state(&ui, header).as_deref(), Some("open"));
    }

    #[test]
    fn arrows_cycle_across_headers() {
        let (mut ui, root) = shell();
        let accordion = ui.mount(Accordion::new(config(AccordionMode::Single)), root);
        let a = ui.controller(&accordion).unwrap();
        let first = a.header(0).unwrap();
        let last = a.header(2).unwrap();
        ui.focus(first);

        key(&mut ui, Key::Up);
        assert_eq!(ui.focused(), Some(last));
        key(&mut ui, Key::Down);
        assert_eq!(ui.focused(), Some(first));
    }

    #[test]
    fn a_section_can_start_open() {
        let (mut ui, root) = shell();
        let config = AccordionConfig::new(AccordionMode::Single)
            .section(AccordionSection::new("One", "1"))
            .section(AccordionSection::new("Two", "2").open(true));
        let accordion = ui.mount(Accordion::new(config), root);
        assert_eq!(ui.controller(&accordion).unwrap().open_indices(), vec![1]);
    }
}
