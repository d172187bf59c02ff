//! Collections of components that can be narrowed lazily.
//!
//! `Group<C>` wraps any component type and adds [`Filterable`]. Each
//! narrowing call returns a new group whose lookup is a resolver: "resolve
//! the parent, then apply this operation". Nothing touches the page until an
//! action or assertion runs, and then the whole chain is replayed.

use super::{
    Checkable, Clickable, Component, ComponentCore, ComponentNode, Focusable, Interactive, Lookup,
    LookupOptions, Resolver, Selectable, Submittable, Typeable,
};
use crate::driver::{CollectionOp, SharedDriver};

#[derive(Clone, Debug)]
pub struct Group<C> {
    inner: C,
}

impl<C: Component> Group<C> {
    pub fn new(driver: &SharedDriver, id: impl Into<String>, lookup: impl Into<LookupOptions>) -> Self {
        Self::from_core(ComponentCore::new(driver, id, lookup))
    }

    /// Turn an existing component into a group.
    pub fn wrap(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Component> ComponentNode for Group<C> {
    fn core(&self) -> &ComponentCore {
        self.inner.core()
    }
}

impl<C: Component> Component for Group<C> {
    fn core_mut(&mut self) -> &mut ComponentCore {
        self.inner.core_mut()
    }

    fn from_core(core: ComponentCore) -> Self {
        Self {
            inner: C::from_core(core),
        }
    }
}

impl<C: Clickable> Clickable for Group<C> {}
impl<C: Focusable> Focusable for Group<C> {}
impl<C: Interactive> Interactive for Group<C> {}
impl<C: Typeable> Typeable for Group<C> {}
impl<C: Checkable> Checkable for Group<C> {}
impl<C: Selectable> Selectable for Group<C> {}
impl<C: Submittable> Submittable for Group<C> {}

/// Id of the component derived from `parent_id` by `op`.
pub fn chained_id(parent_id: &str, op: &CollectionOp) -> String {
    format!("{}-{}-{}", parent_id, op.name(), op.args().join("-"))
}

/// A core whose lookup resolves `parent` and applies `op`, anew on every
/// resolution. The parent's handle is released once narrowed.
pub(crate) fn narrowed(parent: &ComponentCore, op: CollectionOp) -> ComponentCore {
    let id = chained_id(parent.id(), &op);
    let driver = parent.driver().clone();
    let parent = parent.clone();
    let resolver = Resolver::new(move || {
        let parent = parent.clone();
        let op = op.clone();
        async move {
            let driver = parent.driver();
            let handle = parent.resolve().await?;
            let narrowed = driver.narrow(&handle, &op).await;
            let released = driver.release(&handle).await;
            let narrowed = narrowed?;
            released?;
            Ok(narrowed)
        }
    });
    ComponentCore::with_lookup(driver, id, Lookup::Resolver(resolver))
}

/// Lazy narrowing of a group's elements.
pub trait Filterable: Component + Sized {
    /// Derive a group that applies `op` to this group's elements on every
    /// resolution.
    fn chain(&self, op: CollectionOp) -> Self;

    fn filter(&self, selector: &str) -> Self {
        self.chain(CollectionOp::Filter(selector.to_string()))
    }

    #[allow(clippy::should_implement_trait)]
    fn not(&self, selector: &str) -> Self {
        self.chain(CollectionOp::Not(selector.to_string()))
    }

    /// Element at `index`; negative values count from the end.
    fn eq(&self, index: i64) -> Self {
        self.chain(CollectionOp::Eq(index))
    }

    fn first(&self) -> Self {
        self.chain(CollectionOp::First)
    }

    fn last(&self) -> Self {
        self.chain(CollectionOp::Last)
    }

    /// Descendants containing `text`.
    fn contains(&self, text: &str) -> Self {
        self.chain(CollectionOp::Contains {
            selector: None,
            text: text.to_string(),
        })
    }

    /// Descendants matching `selector` that contain `text`.
    fn contains_within(&self, selector: &str, text: &str) -> Self {
        self.chain(CollectionOp::Contains {
            selector: Some(selector.to_string()),
            text: text.to_string(),
        })
    }

    fn find(&self, selector: &str) -> Self {
        self.chain(CollectionOp::Find(selector.to_string()))
    }
}

impl<C: Component> Filterable for Group<C> {
    fn chain(&self, op: CollectionOp) -> Self {
        Self::from_core(narrowed(self.core(), op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_ids() {
        assert_eq!(
            chained_id("rows", &CollectionOp::Filter(".active".into())),
            "rows-filter-.active"
        );
        assert_eq!(chained_id("rows", &CollectionOp::Eq(0)), "rows-eq-0");
        assert_eq!(chained_id("rows", &CollectionOp::First), "rows-first-");
        assert_eq!(
            chained_id(
                "rows",
                &CollectionOp::Contains {
                    selector: Some("td".into()),
                    text: "Paid".into()
                }
            ),
            "rows-contains-td-Paid"
        );
    }
}
