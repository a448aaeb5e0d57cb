//! Headless component testing: the [`Pilot`] harness, semantic models,
//! and outline serialization.
//!
//! A [`Pilot`] hosts a runtime over a virtual terminal, stacks mounted
//! components into rows, and translates node handles into pointer
//! coordinates. Models wrap a pilot and speak one component's own
//! vocabulary. [`outline`] renders a DOM subtree as indented text for
//! snapshot assertions.

pub mod models;
pub mod outline;
pub mod pilot;

pub use models::{
    AccordionModel, CalendarModel, CheckboxModel, ComboboxModel, DatePickerModel, DialogModel,
    DrawerModel, MenuModel, MenubarModel, PopoverModel, RadioGroupModel, SelectModel,
    SidebarModel, SliderModel, ToggleGroupModel, ToggleModel, TooltipModel,
};
pub use outline::outline;
pub use pilot::Pilot;
