use anyhow::Result;

/// JS expression for every element matching a CSS selector.
pub fn query_js(selector: &str) -> Result<String> {
    Ok(format!(
        "Array.from(document.querySelectorAll({sel}))",
        sel = serde_json::to_string(selector)?
    ))
}
