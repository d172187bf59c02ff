use async_trait::async_trait;

use super::{component_type, Clickable, Focusable, Interactive};
use crate::driver::{Action, TypeOptions};
use crate::error::Result;

/// Text entry.
#[async_trait]
pub trait Typeable: Interactive {
    async fn type_text(&self, text: &str) -> Result<&Self> {
        self.type_with(text, TypeOptions::default()).await
    }

    async fn type_with(&self, text: &str, options: TypeOptions) -> Result<&Self> {
        self.core()
            .perform(Action::Type {
                text: text.to_string(),
                options,
            })
            .await?;
        Ok(self)
    }

    async fn clear(&self) -> Result<&Self> {
        self.core().perform(Action::Clear).await?;
        Ok(self)
    }

    async fn should_have_max_length(&self, len: usize) -> Result<&Self> {
        let len = len.to_string();
        self.should_have_attribute("maxlength", Some(len.as_str())).await
    }

    async fn should_have_min_length(&self, len: usize) -> Result<&Self> {
        let len = len.to_string();
        self.should_have_attribute("minlength", Some(len.as_str())).await
    }

    async fn should_be_readonly(&self) -> Result<&Self> {
        self.should_have_attribute("readonly", None).await
    }

    async fn should_be_required(&self) -> Result<&Self> {
        self.should_have_attribute("required", None).await
    }
}

component_type!(
    /// A text field or text area.
    TypeableComponent
);

impl Clickable for TypeableComponent {}
impl Focusable for TypeableComponent {}
impl Interactive for TypeableComponent {}
impl Typeable for TypeableComponent {}
