//! [`Driver`] backed by a Chrome page over CDP.
//!
//! Resolved element arrays live in a page-side registry keyed by handle key,
//! so a narrowing operation or an action always works on exactly the
//! elements its handle was resolved to. Components release entries once
//! they are done with them; the registry is also capped at
//! [`selectors::REGISTRY_LIMIT`] entries, dropping the oldest first.

use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::page::Page;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Action, CollectionOp, Driver, ElementHandle, Query};
use crate::assertion::Assertion;
use crate::error::{Error, Result};
use crate::interaction::{click, element, keyboard, scroll};
use crate::selectors::{self, collection, ElementInfo};

pub struct CdpDriver {
    page: Page,
    next_key: AtomicU64,
}

impl CdpDriver {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            next_key: AtomicU64::new(1),
        }
    }

    /// Navigate and give post-load scripts a moment to render.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok(())
    }

    fn next_key(&self) -> String {
        format!("h{}", self.next_key.fetch_add(1, Ordering::Relaxed))
    }

    async fn store(&self, elements_js: &str, description: String) -> Result<ElementHandle> {
        let key = self.next_key();
        let len: usize = self
            .page
            .evaluate(selectors::store_js(&key, elements_js)?)
            .await
            .with_context(|| format!("Failed to resolve {}", description))?
            .into_value()
            .context("Failed to parse element count")?;
        tracing::debug!("Resolved {} -> {} element(s) as {}", description, len, key);
        Ok(ElementHandle::new(key, len, description))
    }

    async fn snapshot(&self, handle: &ElementHandle, match_selector: Option<&str>) -> Result<Vec<ElementInfo>> {
        let value: serde_json::Value = self
            .page
            .evaluate(selectors::snapshot_js(handle.key(), match_selector)?)
            .await
            .context("Failed to read element state")?
            .into_value()
            .context("Failed to parse element state")?;
        Ok(selectors::parse_element_results(value)?)
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn query(&self, query: &Query) -> Result<ElementHandle> {
        let js = selectors::query_js(query)?;
        self.store(&js, query.to_string()).await
    }

    async fn narrow(&self, handle: &ElementHandle, op: &CollectionOp) -> Result<ElementHandle> {
        let source = selectors::registry_entry_js(handle.key())?;
        let js = collection::narrow_js(&source, op)?;
        self.store(&js, format!("{} >> {}", handle.description(), op)).await
    }

    async fn perform(&self, handle: &ElementHandle, action: &Action) -> Result<()> {
        tracing::debug!("{} on {}", action, handle.description());
        let els = selectors::registry_entry_js(handle.key())?;
        let page = &self.page;
        match action {
            Action::Click(button) => {
                let result = click::hybrid_click(page, &els, *button).await?;
                tracing::debug!("Clicked {} via {}", handle.description(), result.method_used);
            }
            Action::DoubleClick => click::double_click(page, &els).await?,
            Action::Trigger(event) => click::trigger(page, &els, event).await?,
            Action::Focus => element::set_focus(page, &els, true).await?,
            Action::Blur => element::set_focus(page, &els, false).await?,
            Action::Type { text, options } => keyboard::type_text(page, &els, text, options).await?,
            Action::Press(key) => keyboard::press_key(page, &els, *key).await?,
            Action::Clear => keyboard::clear(page, &els).await?,
            Action::Check => element::set_checked(page, &els, true).await?,
            Action::Uncheck => element::set_checked(page, &els, false).await?,
            Action::Select(value) => element::select_option(page, &els, value).await?,
            Action::ScrollIntoView { smooth } => scroll::scroll_into_view(page, &els, *smooth).await?,
            Action::RemoveAttr(name) => element::set_attribute(page, &els, name, None).await?,
            Action::SetAttr { name, value } => {
                element::set_attribute(page, &els, name, Some(value)).await?
            }
        }
        Ok(())
    }

    async fn assert(&self, handle: &ElementHandle, assertion: &Assertion) -> Result<()> {
        let elements = self.snapshot(handle, assertion.match_selector()).await?;
        assertion
            .evaluate(handle.description(), &elements)
            .map_err(Error::AssertionFailed)
    }

    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool> {
        let elements = self.snapshot(handle, None).await?;
        Ok(elements.first().map(|e| e.visible).unwrap_or(false))
    }

    async fn release(&self, handle: &ElementHandle) -> Result<()> {
        self.page
            .evaluate(selectors::release_js(handle.key())?)
            .await
            .with_context(|| format!("Failed to release {}", handle.description()))?;
        Ok(())
    }
}
