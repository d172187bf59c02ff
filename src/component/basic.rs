use async_trait::async_trait;
use std::time::Duration;

use super::{component_type, Component};
use crate::driver::{Action, Key, MouseButton};
use crate::error::{Error, Result};
use crate::interaction::wait::{poll_until, PollOptions};

/// Pointer interactions.
#[async_trait]
pub trait Clickable: Component {
    async fn click(&self) -> Result<&Self> {
        self.core().perform(Action::Click(MouseButton::Left)).await?;
        Ok(self)
    }

    /// Click only if the component shows up and is visible within `timeout`
    /// (default: the configured command timeout).
    ///
    /// Polls for a match at the configured interval, then checks the first
    /// match, which is the one a click targets. Never appearing, or
    /// appearing hidden, is not an error: the call just returns without
    /// clicking.
    async fn click_if_visible(&self, timeout: Option<Duration>) -> Result<&Self> {
        let core = self.core();
        let options = PollOptions::from_settings(timeout);
        let appeared = poll_until(
            move || async move {
                let handle = core.resolve().await?;
                core.driver().release(&handle).await?;
                Ok::<_, Error>(!handle.is_empty())
            },
            options,
        )
        .await?;

        let driver = core.driver();
        let handle = core.resolve().await?;
        let visible = !handle.is_empty() && driver.is_visible(&handle).await?;
        let clicked = if visible {
            driver.perform(&handle, &Action::Click(MouseButton::Left)).await
        } else {
            Ok(())
        };
        let released = driver.release(&handle).await;
        clicked.and(released)?;

        if !visible {
            tracing::warn!(
                "Skipped click on '{}': {} after {:?}",
                core.id(),
                if appeared { "not visible" } else { "never appeared" },
                options.timeout
            );
        }
        Ok(self)
    }

    async fn double_click(&self) -> Result<&Self> {
        self.core().perform(Action::DoubleClick).await?;
        Ok(self)
    }

    async fn right_click(&self) -> Result<&Self> {
        self.core().perform(Action::Click(MouseButton::Right)).await?;
        Ok(self)
    }

    async fn hover(&self) -> Result<&Self> {
        self.core()
            .perform(Action::Trigger("mouseover".to_string()))
            .await?;
        Ok(self)
    }

    async fn scroll_into_view(&self, smooth: bool) -> Result<&Self> {
        self.core().perform(Action::ScrollIntoView { smooth }).await?;
        Ok(self)
    }
}

/// Focus and keyboard interactions.
#[async_trait]
pub trait Focusable: Component {
    async fn focus(&self) -> Result<&Self> {
        self.core().perform(Action::Focus).await?;
        Ok(self)
    }

    async fn blur(&self) -> Result<&Self> {
        self.core().perform(Action::Blur).await?;
        Ok(self)
    }

    async fn press_enter(&self) -> Result<&Self> {
        self.core().perform(Action::Press(Key::Enter)).await?;
        Ok(self)
    }

    async fn press_space(&self) -> Result<&Self> {
        self.core().perform(Action::Press(Key::Space)).await?;
        Ok(self)
    }

    async fn press_up_arrow(&self) -> Result<&Self> {
        self.core().perform(Action::Press(Key::ArrowUp)).await?;
        Ok(self)
    }

    async fn press_down_arrow(&self) -> Result<&Self> {
        self.core().perform(Action::Press(Key::ArrowDown)).await?;
        Ok(self)
    }
}

component_type!(
    /// Any element on the page.
    BasicComponent
);

impl Clickable for BasicComponent {}
impl Focusable for BasicComponent {}
