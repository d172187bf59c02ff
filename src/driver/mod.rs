//! The capability surface components need from a browser-automation runtime.
//!
//! Components never touch the browser directly: they describe what to find
//! ([`Query`], [`CollectionOp`]) and what to do ([`Action`], [`Assertion`]) and
//! hand those descriptions to a [`Driver`].

pub mod cdp;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::assertion::Assertion;
use crate::error::Result;

/// Shared driver reference held by every component.
pub type SharedDriver = Arc<dyn Driver>;

/// A page-wide element query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Selector(String),
    Text(String),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => write!(f, "{}", selector),
            Self::Text(text) => write!(f, "text={:?}", text),
        }
    }
}

/// A collection operation applied to an already resolved handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOp {
    /// Keep elements matching the selector.
    Filter(String),
    /// Drop elements matching the selector.
    Not(String),
    /// Element at an index; negative indexes count from the end.
    Eq(i64),
    First,
    Last,
    /// Descendants containing `text`, optionally restricted to `selector`.
    Contains {
        selector: Option<String>,
        text: String,
    },
    /// Descendants matching the selector.
    Find(String),
}

impl CollectionOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Filter(_) => "filter",
            Self::Not(_) => "not",
            Self::Eq(_) => "eq",
            Self::First => "first",
            Self::Last => "last",
            Self::Contains { .. } => "contains",
            Self::Find(_) => "find",
        }
    }

    /// String forms of the arguments, in call order.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Filter(s) | Self::Not(s) | Self::Find(s) => vec![s.clone()],
            Self::Eq(i) => vec![i.to_string()],
            Self::First | Self::Last => Vec::new(),
            Self::Contains {
                selector: Some(selector),
                text,
            } => vec![selector.clone(), text.clone()],
            Self::Contains {
                selector: None,
                text,
            } => vec![text.clone()],
        }
    }
}

impl fmt::Display for CollectionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.args().join(", "))
    }
}

/// Keys sent by the `press_*` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
}

impl Key {
    /// DOM `KeyboardEvent.key` value.
    pub fn dom_key(&self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Space => " ",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
        }
    }
}

/// Options for [`Action::Type`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeOptions {
    /// Clear the field before typing.
    pub clear_first: bool,
    /// Delay between characters.
    pub delay: Option<Duration>,
}

/// Mouse button for [`Action::Click`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
}

/// A single driver interaction primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click(MouseButton),
    DoubleClick,
    Focus,
    Blur,
    Trigger(String),
    Type { text: String, options: TypeOptions },
    Press(Key),
    Clear,
    Check,
    Uncheck,
    Select(String),
    ScrollIntoView { smooth: bool },
    RemoveAttr(String),
    SetAttr { name: String, value: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click(MouseButton::Left) => write!(f, "click"),
            Self::Click(MouseButton::Right) => write!(f, "rightclick"),
            Self::DoubleClick => write!(f, "dblclick"),
            Self::Focus => write!(f, "focus"),
            Self::Blur => write!(f, "blur"),
            Self::Trigger(event) => write!(f, "trigger({})", event),
            Self::Type { text, .. } => write!(f, "type({})", text),
            Self::Press(key) => write!(f, "press({:?})", key),
            Self::Clear => write!(f, "clear"),
            Self::Check => write!(f, "check"),
            Self::Uncheck => write!(f, "uncheck"),
            Self::Select(value) => write!(f, "select({})", value),
            Self::ScrollIntoView { smooth } => write!(f, "scrollIntoView(smooth={})", smooth),
            Self::RemoveAttr(name) => write!(f, "removeAttr({})", name),
            Self::SetAttr { name, value } => write!(f, "attr({}, {})", name, value),
        }
    }
}

/// A resolved set of live elements.
///
/// The handle only names a driver-side element array; it is produced fresh
/// by every resolution and is not meant to be kept across operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    key: String,
    len: usize,
    description: String,
}

impl ElementHandle {
    pub fn new(key: impl Into<String>, len: usize, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            len,
            description: description.into(),
        }
    }

    /// Driver-specific key of the element array.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of matched elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Human-readable lookup chain, e.g. `#rows >> filter(.active)`.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Browser-automation capabilities consumed by components.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Query the whole page.
    async fn query(&self, query: &Query) -> Result<ElementHandle>;

    /// Derive a new handle by applying a collection operation to `handle`.
    async fn narrow(&self, handle: &ElementHandle, op: &CollectionOp) -> Result<ElementHandle>;

    /// Run one interaction primitive on the elements.
    async fn perform(&self, handle: &ElementHandle, action: &Action) -> Result<()>;

    /// Check an assertion once against the current state of the elements,
    /// failing with [`crate::Error::AssertionFailed`]. Retrying is up to the
    /// caller.
    async fn assert(&self, handle: &ElementHandle, assertion: &Assertion) -> Result<()>;

    /// Whether the first element is currently visible. Single-element
    /// actions such as click target that same element.
    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool>;

    /// Forget a handle once nothing will use it again.
    async fn release(&self, handle: &ElementHandle) -> Result<()>;
}
