use async_trait::async_trait;

use super::group::narrowed;
use super::{component_type, Checkable, Clickable, Component, Focusable, Interactive, Typeable};
use crate::driver::{Action, CollectionOp};
use crate::error::Result;

/// Dropdown handling.
#[async_trait]
pub trait Selectable: Component {
    /// Select an option by value (or visible text).
    async fn select_option(&self, value: &str) -> Result<&Self> {
        self.core()
            .perform(Action::Select(value.to_string()))
            .await?;
        Ok(self)
    }

    /// Assert that one of the `<option>` children contains `text`.
    async fn should_have_option(&self, text: &str) -> Result<&Self> {
        narrowed(self.core(), CollectionOp::Find("option".to_string()))
            .assert("contain", &[text])
            .await?;
        Ok(self)
    }
}

component_type!(
    /// A `<select>` element. Carries every `Input` capability as well.
    Select
);

impl Clickable for Select {}
impl Focusable for Select {}
impl Interactive for Select {}
impl Typeable for Select {}
impl Checkable for Select {}
impl Selectable for Select {}
