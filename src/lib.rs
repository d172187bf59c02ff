//! Page-object components over a Chrome DevTools Protocol driver.
//!
//! Components describe *how to find* an element (a CSS selector, visible
//! text, or a resolver function) and expose actions and assertions that
//! re-resolve against the live page each time they run.

pub mod assertion;
pub mod browser;
pub mod component;
pub mod config;
pub mod driver;
pub mod error;
pub mod interaction;
pub mod selectors;
pub mod suite;

pub use component::{
    BasicComponent, Checkable, Clickable, Component, ComponentCore, ComponentNode, Filterable, Focusable, Form,
    Group, Input, Interactive, InteractiveComponent, Lookup, LookupOptions, Resolver, Select,
    Selectable, Submittable, Typeable, TypeableComponent,
};
pub use driver::{Driver, ElementHandle, SharedDriver};
pub use error::{Error, Result};
