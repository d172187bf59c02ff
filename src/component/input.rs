use async_trait::async_trait;

use super::{component_type, Clickable, Focusable, Interactive, Typeable};
use crate::driver::Action;
use crate::error::Result;

/// Checkbox and radio handling.
#[async_trait]
pub trait Checkable: Clickable {
    /// Check the element if it isn't already.
    async fn check(&self) -> Result<&Self> {
        self.core().perform(Action::Check).await?;
        Ok(self)
    }

    /// Uncheck the element if it is checked.
    async fn uncheck(&self) -> Result<&Self> {
        self.core().perform(Action::Uncheck).await?;
        Ok(self)
    }

    /// Flip the checked state with a click.
    async fn toggle(&self) -> Result<&Self> {
        self.click().await?;
        Ok(self)
    }

    async fn should_be_checked(&self) -> Result<&Self> {
        self.should("be.checked", &[]).await
    }

    async fn should_not_be_checked(&self) -> Result<&Self> {
        self.should("not.be.checked", &[]).await
    }

    /// Assert the `type` attribute, e.g. `email` or `password`.
    async fn should_accept_type(&self, expected: &str) -> Result<&Self> {
        self.should_have_attribute("type", Some(expected)).await
    }
}

component_type!(
    /// An `<input>` element.
    Input
);

impl Clickable for Input {}
impl Focusable for Input {}
impl Interactive for Input {}
impl Typeable for Input {}
impl Checkable for Input {}
