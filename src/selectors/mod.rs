pub mod collection;
pub mod css;
pub mod text;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::driver::Query;

/// Page-side registry holding resolved element arrays, keyed by handle key.
pub const REGISTRY: &str = "window.__pageComponents";

/// Most entries the registry keeps; older ones are dropped on insert.
pub const REGISTRY_LIMIT: usize = 256;

/// Snapshot of one resolved element, enough to evaluate an assertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementInfo {
    pub tag: String,
    pub text: String,
    pub value: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub visible: bool,
    pub checked: bool,
    pub disabled: bool,
    pub child_count: usize,
    /// Result of `Element.matches()` when the assertion asked for it.
    pub matches: Option<bool>,
}

impl ElementInfo {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

/// JS expression evaluating to an array of the elements a query matches.
pub fn query_js(query: &Query) -> Result<String> {
    match query {
        Query::Selector(selector) => css::query_js(selector),
        Query::Text(text) => text::query_js(text),
    }
}

/// JS expression for the element array stored under `key`.
pub fn registry_entry_js(key: &str) -> Result<String> {
    Ok(format!(
        "(({registry} || {{}})[{key}] || [])",
        registry = REGISTRY,
        key = serde_json::to_string(key)?
    ))
}

/// Wrap an array-producing expression so the result is stored under `key`
/// and the statement evaluates to the number of elements.
pub fn store_js(key: &str, elements_js: &str) -> Result<String> {
    Ok(format!(
        r#"(() => {{
            const registry = {registry} = {registry} || {{}};
            const els = {elements_js};
            registry[{key}] = els;
            const keys = Object.keys(registry);
            for (const stale of keys.slice(0, Math.max(0, keys.length - {limit}))) {{
                delete registry[stale];
            }}
            return els.length;
        }})()"#,
        registry = REGISTRY,
        elements_js = elements_js,
        key = serde_json::to_string(key)?,
        limit = REGISTRY_LIMIT
    ))
}

/// JS statement deleting the registry entry for `key`.
pub fn release_js(key: &str) -> Result<String> {
    Ok(format!(
        "(() => {{ if ({registry}) delete {registry}[{key}]; return true; }})()",
        registry = REGISTRY,
        key = serde_json::to_string(key)?
    ))
}

/// JS returning an `ElementInfo` array for the elements stored under `key`.
pub fn snapshot_js(key: &str, match_selector: Option<&str>) -> Result<String> {
    Ok(format!(
        r#"(() => {{
            const matchSel = {match_sel};
            return {entry}.map((el) => {{
                const attrs = {{}};
                for (const attr of el.attributes || []) {{
                    attrs[attr.name] = attr.value;
                }}
                const style = getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                return {{
                    tag: el.tagName.toLowerCase(),
                    text: el.textContent || '',
                    value: ('value' in el && typeof el.value === 'string') ? el.value : null,
                    attributes: attrs,
                    visible: style.display !== 'none'
                        && style.visibility !== 'hidden'
                        && parseFloat(style.opacity) > 0
                        && rect.width > 0
                        && rect.height > 0,
                    checked: !!el.checked,
                    disabled: !!el.disabled,
                    childCount: el.children.length,
                    matches: matchSel === null ? null : el.matches(matchSel)
                }};
            }});
        }})()"#,
        match_sel = serde_json::to_string(&match_selector)?,
        entry = registry_entry_js(key)?
    ))
}

/// Parse the value returned by [`snapshot_js`].
pub fn parse_element_results(value: serde_json::Value) -> Result<Vec<ElementInfo>> {
    serde_json::from_value(value).context("Expected array of element snapshots")
}
