use anyhow::Result;

/// JS expression for the elements whose text content contains `text`.
///
/// Matching is case-sensitive and spans child elements, so
/// `<button>Sign <b>in</b></button>` matches "Sign in". Only the innermost
/// matches are kept: an element is dropped when one of its descendants
/// also matches. Results are in document order.
pub fn query_js(text: &str) -> Result<String> {
    Ok(format!(
        r#"(() => {{
            const target = {text};
            const matches = Array.from(document.body.querySelectorAll('*')).filter(
                (el) => el.tagName !== 'SCRIPT' && el.tagName !== 'STYLE'
                    && el.textContent.includes(target)
            );
            return {innermost};
        }})()"#,
        text = serde_json::to_string(text)?,
        innermost = innermost_js("matches")
    ))
}

/// JS expression keeping the innermost elements of `list`, a document-ordered
/// array. A match's matching descendants directly follow it in that order.
pub(crate) fn innermost_js(list: &str) -> String {
    format!(
        "{list}.filter((el, i) => !({list}[i + 1] && el.contains({list}[i + 1])))",
        list = list
    )
}
