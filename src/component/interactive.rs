use async_trait::async_trait;

use super::{component_type, Clickable, Component, Focusable};
use crate::driver::Action;
use crate::error::Result;

/// Enabled/disabled state and value assertions.
#[async_trait]
pub trait Interactive: Component {
    /// Remove the `disabled` attribute.
    async fn enable(&self) -> Result<&Self> {
        self.core()
            .perform(Action::RemoveAttr("disabled".to_string()))
            .await?;
        Ok(self)
    }

    /// Set `disabled="true"`.
    async fn disable(&self) -> Result<&Self> {
        self.core()
            .perform(Action::SetAttr {
                name: "disabled".to_string(),
                value: "true".to_string(),
            })
            .await?;
        Ok(self)
    }

    async fn should_be_enabled(&self) -> Result<&Self> {
        self.should("not.be.disabled", &[]).await
    }

    async fn should_be_disabled(&self) -> Result<&Self> {
        self.should("be.disabled", &[]).await
    }

    async fn should_have_value(&self, value: &str) -> Result<&Self> {
        self.should("have.value", &[value]).await
    }

    async fn should_not_have_value(&self, value: &str) -> Result<&Self> {
        self.should("not.have.value", &[value]).await
    }
}

component_type!(
    /// A control that can be enabled, disabled and carry a value.
    InteractiveComponent
);

impl Clickable for InteractiveComponent {}
impl Focusable for InteractiveComponent {}
impl Interactive for InteractiveComponent {}
