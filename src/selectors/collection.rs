use anyhow::Result;

use super::text::innermost_js;
use crate::driver::CollectionOp;

/// JS expression applying `op` to the element array produced by `source_js`.
pub fn narrow_js(source_js: &str, op: &CollectionOp) -> Result<String> {
    let body = match op {
        CollectionOp::Filter(selector) => format!(
            "return src.filter((el) => el.matches({sel}));",
            sel = serde_json::to_string(selector)?
        ),
        CollectionOp::Not(selector) => format!(
            "return src.filter((el) => !el.matches({sel}));",
            sel = serde_json::to_string(selector)?
        ),
        CollectionOp::Eq(index) => format!(
            r#"const at = {index} < 0 ? src.length + {index} : {index};
            return at >= 0 && at < src.length ? [src[at]] : [];"#,
            index = index
        ),
        CollectionOp::First => "return src.slice(0, 1);".to_string(),
        CollectionOp::Last => "return src.slice(-1);".to_string(),
        CollectionOp::Contains { selector, text } => format!(
            r#"const target = {text};
            const sel = {sel};
            const results = [];
            for (const root of src) {{
                const candidates = Array.from(root.querySelectorAll(sel === null ? '*' : sel))
                    .filter((el) => el.tagName !== 'SCRIPT' && el.tagName !== 'STYLE'
                        && el.textContent.includes(target));
                for (const el of {innermost}) {{
                    if (!results.includes(el)) results.push(el);
                }}
            }}
            return results;"#,
            text = serde_json::to_string(text)?,
            sel = serde_json::to_string(selector)?,
            innermost = innermost_js("candidates")
        ),
        CollectionOp::Find(selector) => format!(
            r#"const results = [];
            for (const root of src) {{
                for (const el of root.querySelectorAll({sel})) {{
                    if (!results.includes(el)) results.push(el);
                }}
            }}
            return results;"#,
            sel = serde_json::to_string(selector)?
        ),
    };

    Ok(format!(
        r#"(() => {{
            const src = {source_js};
            {body}
        }})()"#,
        source_js = source_js,
        body = body
    ))
}
