//! # plinth-tui
//!
//! Composable interaction components for terminal UIs, built on a retained
//! DOM and a controller runtime.
//!
//! plinth-tui brings the interaction grammar of web component libraries to
//! the terminal: menus, dialogs, comboboxes, and date pickers driven by
//! keyboard and mouse, sharing the floating, focus, and dismissal
//! machinery underneath. Components own a DOM subtree, react to routed
//! input, and expose their state through plain accessors, so they can be
//! exercised headlessly or composed into a real screen.
//!
//! ## Core Systems
//!
//! - **[`dom`]** — Slotmap-backed node arena with data markers, queries, and the region map
//! - **[`geometry`]** — Offset, Size, Region primitives
//! - **[`event`]** — Key, mouse, resize, and paste input translated from crossterm
//! - **[`style`]** — Appearance variants and part attribute helpers
//! - **[`interaction`]** — Dismissal registries, focus order and traps, hover intent, surface positioning, scroll locks
//! - **[`controller`]** — The Controller trait, dispatch context, and typed mount handles
//! - **[`ui`]** — The runtime: input routing, overlay stack, timers, service bridge
//! - **[`service`]** — Date service requests and replies over an async bridge
//! - **[`components`]** — The component set, from Toggle to DatePicker
//! - **[`testing`]** — Pilot harness, semantic models, outline snapshots

// Foundation
pub mod geometry;

// Core systems
pub mod dom;
pub mod event;
pub mod style;

// Interaction machinery
pub mod interaction;

// Controllers and runtime
pub mod controller;
pub mod ui;

// Data services
pub mod service;

// Component set
pub mod components;

// Headless test harness
pub mod testing;
