//! In-memory page used by the component tests.
//!
//! `FakeDriver` keeps a flat list of elements (with parent links), answers
//! queries with a small selector matcher (`tag`, `#id`, `.class` and
//! compounds of those) and records every driver call in order. An element's
//! `text` stands for its full text content, children included. Releases are
//! tracked through [`FakeDriver::live_handles`] rather than the call log.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use page_components::assertion::Assertion;
use page_components::driver::{Action, CollectionOp, Driver, ElementHandle, Query, SharedDriver};
use page_components::selectors::ElementInfo;
use page_components::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    pub value: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub visible: bool,
    pub checked: bool,
    pub disabled: bool,
    pub parent: Option<usize>,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            visible: true,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn child_of(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if selector.is_empty() {
            return false;
        }
        let mut rest = selector;
        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" && tag != self.tag {
            return false;
        }
        rest = &rest[tag_end..];
        while !rest.is_empty() {
            let marker = &rest[..1];
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            let ok = match marker {
                "#" => self.id.as_deref() == Some(name),
                _ => self.classes.iter().any(|c| c == name),
            };
            if !ok {
                return false;
            }
            rest = &body[end..];
        }
        true
    }

    fn info(&self, child_count: usize, match_selector: Option<&str>) -> ElementInfo {
        let mut attributes = self.attributes.clone();
        if let Some(ref id) = self.id {
            attributes.insert("id".into(), id.clone());
        }
        if !self.classes.is_empty() {
            attributes.insert("class".into(), self.classes.join(" "));
        }
        ElementInfo {
            tag: self.tag.clone(),
            text: self.text.clone(),
            value: self.value.clone(),
            attributes,
            visible: self.visible,
            checked: self.checked,
            disabled: self.disabled,
            child_count,
            matches: match_selector.map(|s| self.matches(s)),
        }
    }
}

#[derive(Default)]
struct State {
    elements: Vec<FakeElement>,
    handles: HashMap<String, Vec<usize>>,
    next_key: u64,
    calls: Vec<String>,
}

impl State {
    fn is_descendant(&self, mut idx: usize, ancestor: usize) -> bool {
        while let Some(parent) = self.elements[idx].parent {
            if parent == ancestor {
                return true;
            }
            idx = parent;
        }
        false
    }

    fn descendants(&self, roots: &[usize]) -> Vec<usize> {
        (0..self.elements.len())
            .filter(|&i| roots.iter().any(|&r| self.is_descendant(i, r)))
            .collect()
    }

    /// Drop every element that has another element of `indexes` below it.
    fn innermost(&self, indexes: Vec<usize>) -> Vec<usize> {
        indexes
            .iter()
            .copied()
            .filter(|&i| !indexes.iter().any(|&j| j != i && self.is_descendant(j, i)))
            .collect()
    }

    fn child_count(&self, idx: usize) -> usize {
        self.elements
            .iter()
            .filter(|e| e.parent == Some(idx))
            .count()
    }

    fn store(&mut self, indexes: Vec<usize>, description: String) -> ElementHandle {
        self.next_key += 1;
        let key = format!("h{}", self.next_key);
        let len = indexes.len();
        self.handles.insert(key.clone(), indexes);
        ElementHandle::new(key, len, description)
    }

    fn resolved(&self, handle: &ElementHandle) -> Vec<usize> {
        self.handles.get(handle.key()).cloned().unwrap_or_default()
    }
}

/// A recording, in-memory [`Driver`].
#[derive(Default)]
pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new(elements: Vec<FakeElement>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                elements,
                ..Default::default()
            }),
        })
    }

    pub fn shared(self: &Arc<Self>) -> SharedDriver {
        self.clone()
    }

    /// Driver calls so far, e.g. `query #email` or `perform type(a@b.com)`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Handles resolved but not yet released.
    pub fn live_handles(&self) -> usize {
        self.state.lock().unwrap().handles.len()
    }

    /// Mutate the page between operations.
    pub fn edit_page(&self, f: impl FnOnce(&mut Vec<FakeElement>)) {
        f(&mut self.state.lock().unwrap().elements);
    }

    /// The first element with `id`.
    pub fn element(&self, id: &str) -> FakeElement {
        self.state
            .lock()
            .unwrap()
            .elements
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned()
            .unwrap_or_else(|| panic!("no element #{}", id))
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn query(&self, query: &Query) -> Result<ElementHandle> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("query {}", query));
        let indexes: Vec<usize> = match query {
            Query::Selector(selector) => (0..state.elements.len())
                .filter(|&i| state.elements[i].matches(selector))
                .collect(),
            Query::Text(text) => {
                let containing: Vec<usize> = (0..state.elements.len())
                    .filter(|&i| state.elements[i].text.contains(text.as_str()))
                    .collect();
                state.innermost(containing)
            }
        };
        Ok(state.store(indexes, query.to_string()))
    }

    async fn narrow(&self, handle: &ElementHandle, op: &CollectionOp) -> Result<ElementHandle> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("narrow {}", op));
        let source = state.resolved(handle);
        let indexes: Vec<usize> = match op {
            CollectionOp::Filter(s) => source
                .into_iter()
                .filter(|&i| state.elements[i].matches(s))
                .collect(),
            CollectionOp::Not(s) => source
                .into_iter()
                .filter(|&i| !state.elements[i].matches(s))
                .collect(),
            CollectionOp::Eq(index) => {
                let len = source.len() as i64;
                let at = if *index < 0 { len + index } else { *index };
                if at >= 0 && at < len {
                    vec![source[at as usize]]
                } else {
                    Vec::new()
                }
            }
            CollectionOp::First => source.first().copied().into_iter().collect(),
            CollectionOp::Last => source.last().copied().into_iter().collect(),
            CollectionOp::Contains { selector, text } => {
                let containing: Vec<usize> = state
                    .descendants(&source)
                    .into_iter()
                    .filter(|&i| {
                        let e = &state.elements[i];
                        e.text.contains(text.as_str())
                            && selector.as_deref().map(|s| e.matches(s)).unwrap_or(true)
                    })
                    .collect();
                state.innermost(containing)
            }
            CollectionOp::Find(s) => state
                .descendants(&source)
                .into_iter()
                .filter(|&i| state.elements[i].matches(s))
                .collect(),
        };
        let description = format!("{} >> {}", handle.description(), op);
        Ok(state.store(indexes, description))
    }

    async fn perform(&self, handle: &ElementHandle, action: &Action) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("perform {}", action));
        let targets = state.resolved(handle);
        let Some(&first) = targets.first() else {
            return Err(Error::Driver(anyhow::anyhow!(
                "No element found for {}",
                handle.description()
            )));
        };
        match action {
            Action::Type { text, options } => {
                let e = &mut state.elements[first];
                let mut value = if options.clear_first {
                    String::new()
                } else {
                    e.value.clone().unwrap_or_default()
                };
                value.push_str(text);
                e.value = Some(value);
            }
            Action::Clear => state.elements[first].value = Some(String::new()),
            Action::Select(value) => state.elements[first].value = Some(value.clone()),
            Action::Check | Action::Uncheck => {
                for i in targets {
                    state.elements[i].checked = matches!(action, Action::Check);
                }
            }
            Action::Click(_) => {
                let e = &mut state.elements[first];
                if e.attributes.get("type").map(String::as_str) == Some("checkbox") {
                    e.checked = !e.checked;
                }
            }
            Action::SetAttr { name, value } => {
                for i in targets {
                    let e = &mut state.elements[i];
                    if name == "disabled" {
                        e.disabled = true;
                    }
                    e.attributes.insert(name.clone(), value.clone());
                }
            }
            Action::RemoveAttr(name) => {
                for i in targets {
                    let e = &mut state.elements[i];
                    if name == "disabled" {
                        e.disabled = false;
                    }
                    e.attributes.remove(name);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn assert(&self, handle: &ElementHandle, assertion: &Assertion) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("assert {}", assertion));
        let infos: Vec<ElementInfo> = state
            .resolved(handle)
            .into_iter()
            .map(|i| state.elements[i].info(state.child_count(i), assertion.match_selector()))
            .collect();
        assertion
            .evaluate(handle.description(), &infos)
            .map_err(Error::AssertionFailed)
    }

    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("is_visible".to_string());
        Ok(state
            .resolved(handle)
            .first()
            .map(|&i| state.elements[i].visible)
            .unwrap_or(false))
    }

    async fn release(&self, handle: &ElementHandle) -> Result<()> {
        self.state.lock().unwrap().handles.remove(handle.key());
        Ok(())
    }
}
