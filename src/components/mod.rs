//! Built-in components: menus, pickers, overlays, form controls, and the
//! static field/empty-state compositions.
//!
//! Every interactive component is a [`Controller`](crate::controller::Controller)
//! constructed from a plain config struct and mounted with
//! [`Ui::mount`](crate::ui::Ui::mount). The statics in [`field`] are free
//! builder functions over the tree instead.

pub mod accordion;
pub mod calendar;
pub mod choice;
pub mod combobox;
pub mod dialog;
pub mod drawer;
pub mod field;
pub mod menu;
pub mod menubar;
pub mod popover;
pub mod select;
pub mod sidebar;
pub mod slider;
pub mod toggle;
pub mod tooltip;

pub use accordion::{Accordion, AccordionConfig, AccordionMode, AccordionSection};
pub use calendar::{Calendar, CalendarConfig, DatePicker, DatePickerConfig};
pub use choice::{Checkbox, CheckboxConfig, RadioGroup, RadioGroupConfig, RadioItem};
pub use combobox::{Combobox, ComboboxConfig};
pub use dialog::{Dialog, DialogConfig};
pub use drawer::{Drawer, DrawerConfig};
pub use field::{
    build_empty_state, build_field, set_field_error, EmptyStateConfig, EmptyStateParts,
    FieldConfig, FieldParts,
};
pub use menu::{DropdownMenu, DropdownMenuConfig, MenuItem};
pub use menubar::{Menubar, MenubarConfig, MenubarMenu};
pub use popover::{Popover, PopoverConfig};
pub use select::{Select, SelectConfig, SelectOption};
pub use sidebar::{Sidebar, SidebarConfig, SidebarItem};
pub use slider::{Slider, SliderConfig};
pub use toggle::{
    Toggle, ToggleConfig, ToggleGroup, ToggleGroupConfig, ToggleGroupItem, ToggleMode,
};
pub use tooltip::{Tooltip, TooltipConfig};
