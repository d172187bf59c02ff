use async_trait::async_trait;

use super::{component_type, Clickable, Component, Focusable, Interactive};
use crate::driver::Action;
use crate::error::Result;

#[async_trait]
pub trait Submittable: Component {
    /// Dispatch a `submit` event.
    async fn submit(&self) -> Result<&Self> {
        self.core()
            .perform(Action::Trigger("submit".to_string()))
            .await?;
        Ok(self)
    }
}

component_type!(
    /// A `<form>`; its fields are usually registered as nested components.
    Form
);

impl Clickable for Form {}
impl Focusable for Form {}
impl Interactive for Form {}
impl Submittable for Form {}
