//! Page-object components.
//!
//! A component is an id plus a [`Lookup`] plus named child components. It
//! never holds on to elements: every action and assertion resolves the
//! lookup against the live page first. Capabilities (clicking, typing,
//! checking, ...) are traits with provided methods; concrete component
//! types opt into the ones they support.

pub mod basic;
pub mod form;
pub mod group;
pub mod input;
pub mod interactive;
pub mod lookup;
pub mod select;
pub mod typeable;

pub use basic::{BasicComponent, Clickable, Focusable};
pub use form::{Form, Submittable};
pub use group::{Filterable, Group};
pub use input::{Checkable, Input};
pub use interactive::{Interactive, InteractiveComponent};
pub use lookup::{Lookup, LookupOptions, Resolver};
pub use select::{Select, Selectable};
pub use typeable::{Typeable, TypeableComponent};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::assertion::Assertion;
use crate::driver::{Action, CollectionOp, ElementHandle, Query, SharedDriver};
use crate::error::{Error, Result};
use crate::interaction::wait::{retry_until, PollOptions};

/// State shared by every component type.
#[derive(Clone)]
pub struct ComponentCore {
    id: String,
    driver: SharedDriver,
    lookup: Option<Lookup>,
    children: Vec<(String, Arc<dyn ComponentNode>)>,
}

impl ComponentCore {
    pub fn new(driver: &SharedDriver, id: impl Into<String>, options: impl Into<LookupOptions>) -> Self {
        Self {
            id: id.into(),
            driver: driver.clone(),
            lookup: options.into().into_lookup(),
            children: Vec::new(),
        }
    }

    pub fn with_lookup(driver: SharedDriver, id: impl Into<String>, lookup: Lookup) -> Self {
        Self {
            id: id.into(),
            driver,
            lookup: Some(lookup),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Resolve the lookup against the live page.
    pub async fn resolve(&self) -> Result<ElementHandle> {
        match &self.lookup {
            Some(Lookup::Resolver(resolver)) => {
                tracing::debug!("Resolving '{}' by resolver", self.id);
                resolver.call().await
            }
            Some(Lookup::Selector(selector)) => {
                tracing::debug!("Resolving '{}' by selector {}", self.id, selector);
                self.driver.query(&Query::Selector(selector.clone())).await
            }
            Some(Lookup::Text(text)) => {
                tracing::debug!("Resolving '{}' by text {:?}", self.id, text);
                self.driver.query(&Query::Text(text.clone())).await
            }
            None => Err(Error::NoLookupStrategy(self.id.clone())),
        }
    }

    pub async fn resolve_by_resolver(&self) -> Result<ElementHandle> {
        match &self.lookup {
            Some(Lookup::Resolver(resolver)) => resolver.call().await,
            _ => Err(Error::NoResolver(self.id.clone())),
        }
    }

    pub async fn resolve_by_selector(&self) -> Result<ElementHandle> {
        match &self.lookup {
            Some(Lookup::Selector(selector)) => self.driver.query(&Query::Selector(selector.clone())).await,
            _ => Err(Error::NoLookupStrategy(self.id.clone())),
        }
    }

    pub async fn resolve_by_text(&self) -> Result<ElementHandle> {
        match &self.lookup {
            Some(Lookup::Text(text)) => self.driver.query(&Query::Text(text.clone())).await,
            _ => Err(Error::NoLookupStrategy(self.id.clone())),
        }
    }

    /// Resolve and run one driver action.
    pub async fn perform(&self, action: Action) -> Result<()> {
        let handle = self.resolve().await?;
        let performed = self.driver.perform(&handle, &action).await;
        let released = self.driver.release(&handle).await;
        performed.and(released)
    }

    /// Validate and parse the condition, then resolve and check it until it
    /// passes or the command timeout runs out. Every attempt resolves anew.
    pub async fn assert(&self, condition: &str, args: &[&str]) -> Result<()> {
        if condition.trim().is_empty() {
            return Err(Error::MissingCondition(self.id.clone()));
        }
        let assertion = Assertion::parse(condition, args)?;
        let assertion = &assertion;
        retry_until(move || self.attempt(assertion), PollOptions::from_settings(None))
            .await?
            .map_err(Error::AssertionFailed)
    }

    async fn attempt(&self, assertion: &Assertion) -> Result<std::result::Result<(), String>> {
        let handle = self.resolve().await?;
        let checked = self.driver.assert(&handle, assertion).await;
        self.driver.release(&handle).await?;
        match checked {
            Ok(()) => Ok(Ok(())),
            Err(Error::AssertionFailed(message)) => Ok(Err(message)),
            Err(e) => Err(e),
        }
    }

    fn insert_child(&mut self, child: Arc<dyn ComponentNode>) {
        let id = child.id().to_string();
        match self.children.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = child,
            None => self.children.push((id, child)),
        }
    }
}

impl fmt::Debug for ComponentCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCore")
            .field("id", &self.id)
            .field("lookup", &self.lookup)
            .field(
                "children",
                &self.children.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The object-safe part of a component: identity, resolution, children
/// and non-chaining assertions. Nested children are stored as this trait.
#[async_trait]
pub trait ComponentNode: Send + Sync {
    fn core(&self) -> &ComponentCore;

    fn id(&self) -> &str {
        self.core().id()
    }

    async fn resolve(&self) -> Result<ElementHandle> {
        self.core().resolve().await
    }

    /// Resolve through the resolver only; fails if none is configured.
    async fn resolve_by_resolver(&self) -> Result<ElementHandle> {
        self.core().resolve_by_resolver().await
    }

    async fn resolve_by_selector(&self) -> Result<ElementHandle> {
        self.core().resolve_by_selector().await
    }

    async fn resolve_by_text(&self) -> Result<ElementHandle> {
        self.core().resolve_by_text().await
    }

    /// Descendants of this component matching `selector`.
    async fn find_within(&self, selector: &str) -> Result<ElementHandle> {
        let driver = self.core().driver();
        let handle = self.resolve().await?;
        let found = driver
            .narrow(&handle, &CollectionOp::Find(selector.to_string()))
            .await;
        let released = driver.release(&handle).await;
        let found = found?;
        released?;
        Ok(found)
    }

    /// Snapshot of the registered children in insertion order.
    fn nested_components(&self) -> Vec<Arc<dyn ComponentNode>> {
        self.core().children.iter().map(|(_, c)| c.clone()).collect()
    }

    fn nested_component(&self, id: &str) -> Option<Arc<dyn ComponentNode>> {
        self.core()
            .children
            .iter()
            .find(|(child_id, _)| child_id == id)
            .map(|(_, c)| c.clone())
    }

    /// Same check as [`Component::should`], without the chaining return.
    async fn assert(&self, condition: &str, args: &[&str]) -> Result<()> {
        self.core().assert(condition, args).await
    }
}

/// Chaining API shared by every concrete component type: nesting, `should`
/// and the basic assertions. All assertion methods return the component.
#[async_trait]
pub trait Component: ComponentNode {
    fn core_mut(&mut self) -> &mut ComponentCore;

    fn from_core(core: ComponentCore) -> Self
    where
        Self: Sized;

    /// Register `child` under its id, replacing any child with the same id.
    fn add_nested_component<C: Component + 'static>(&mut self, child: C) -> &mut Self
    where
        Self: Sized,
    {
        self.core_mut().insert_child(Arc::new(child));
        self
    }

    /// Assert a chainer such as `be.visible` or `have.attr` with its arguments.
    async fn should(&self, condition: &str, args: &[&str]) -> Result<&Self> {
        self.core().assert(condition, args).await?;
        Ok(self)
    }

    /// Another assertion in a chain. Resolves again, like every `should`.
    async fn and(&self, condition: &str, args: &[&str]) -> Result<&Self> {
        self.should(condition, args).await
    }

    async fn should_be_visible(&self) -> Result<&Self> {
        self.should("be.visible", &[]).await
    }

    async fn should_not_be_visible(&self) -> Result<&Self> {
        self.should("not.be.visible", &[]).await
    }

    async fn should_exist(&self) -> Result<&Self> {
        self.should("exist", &[]).await
    }

    async fn should_not_exist(&self) -> Result<&Self> {
        self.should("not.exist", &[]).await
    }

    async fn should_be_empty(&self) -> Result<&Self> {
        self.should("be.empty", &[]).await
    }

    async fn should_not_be_empty(&self) -> Result<&Self> {
        self.should("not.be.empty", &[]).await
    }

    async fn should_have_text(&self, text: &str) -> Result<&Self> {
        self.should("have.text", &[text]).await
    }

    async fn should_not_have_text(&self, text: &str) -> Result<&Self> {
        self.should("not.have.text", &[text]).await
    }

    async fn should_contain_text(&self, text: &str) -> Result<&Self> {
        self.should("contain", &[text]).await
    }

    async fn should_not_contain_text(&self, text: &str) -> Result<&Self> {
        self.should("not.contain", &[text]).await
    }

    async fn should_have_attribute(&self, name: &str, value: Option<&str>) -> Result<&Self> {
        match value {
            Some(value) => self.should("have.attr", &[name, value]).await,
            None => self.should("have.attr", &[name]).await,
        }
    }

    async fn should_not_have_attribute(&self, name: &str, value: Option<&str>) -> Result<&Self> {
        match value {
            Some(value) => self.should("not.have.attr", &[name, value]).await,
            None => self.should("not.have.attr", &[name]).await,
        }
    }

    async fn should_have_class(&self, class: &str) -> Result<&Self> {
        self.should("have.class", &[class]).await
    }

    async fn should_not_have_class(&self, class: &str) -> Result<&Self> {
        self.should("not.have.class", &[class]).await
    }

    async fn should_match_selector(&self, selector: &str) -> Result<&Self> {
        self.should("match", &[selector]).await
    }

    async fn should_not_match_selector(&self, selector: &str) -> Result<&Self> {
        self.should("not.match", &[selector]).await
    }

    async fn should_have_length(&self, len: usize) -> Result<&Self> {
        let len = len.to_string();
        self.should("have.length", &[len.as_str()]).await
    }
}

/// Declares a component newtype over [`ComponentCore`] with its constructor
/// and [`ComponentNode`]/[`Component`] impls.
macro_rules! component_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            core: $crate::component::ComponentCore,
        }

        impl $name {
            pub fn new(
                driver: &$crate::driver::SharedDriver,
                id: impl Into<String>,
                lookup: impl Into<$crate::component::LookupOptions>,
            ) -> Self {
                Self {
                    core: $crate::component::ComponentCore::new(driver, id, lookup),
                }
            }
        }

        impl $crate::component::ComponentNode for $name {
            fn core(&self) -> &$crate::component::ComponentCore {
                &self.core
            }
        }

        impl $crate::component::Component for $name {
            fn core_mut(&mut self) -> &mut $crate::component::ComponentCore {
                &mut self.core
            }

            fn from_core(core: $crate::component::ComponentCore) -> Self {
                Self { core }
            }
        }
    };
}

pub(crate) use component_type;
