use anyhow::{Context, Result};
use chromiumoxide::page::Page;

async fn run(page: &Page, js: String, what: &str) -> Result<()> {
    page.evaluate(js.as_str())
        .await
        .with_context(|| format!("Failed to {}", what))?;
    Ok(())
}

/// Focus or blur the first element.
pub async fn set_focus(page: &Page, elements_js: &str, focused: bool) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) throw new Error('Element not found');
            {call}
            return true;
        }})()"#,
        elements_js = elements_js,
        call = if focused { "el.focus();" } else { "el.blur();" }
    );
    run(page, js, if focused { "focus element" } else { "blur element" }).await
}

/// Check or uncheck every checkbox/radio in the set.
pub async fn set_checked(page: &Page, elements_js: &str, checked: bool) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const els = {elements_js};
            if (els.length === 0) throw new Error('Element not found');
            for (const el of els) {{
                if (el.type !== 'checkbox' && el.type !== 'radio') {{
                    throw new Error('Element is not a checkbox or radio: <' + el.tagName.toLowerCase() + '>');
                }}
                if (el.checked !== {checked}) {{
                    el.click();
                }}
            }}
            return true;
        }})()"#,
        elements_js = elements_js,
        checked = checked
    );
    run(page, js, if checked { "check element" } else { "uncheck element" }).await
}

/// Select an option by value, falling back to its visible text.
pub async fn select_option(page: &Page, elements_js: &str, value: &str) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) throw new Error('Element not found');
            if (el.tagName !== 'SELECT') throw new Error('Element is not a <select>');
            const wanted = {value};
            const option = Array.from(el.options).find((o) => o.value === wanted)
                || Array.from(el.options).find((o) => o.text.trim() === wanted);
            if (!option) throw new Error('No option matching ' + JSON.stringify(wanted));
            el.value = option.value;
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#,
        elements_js = elements_js,
        value = serde_json::to_string(value)?
    );
    run(page, js, "select option").await
}

/// Set (`Some`) or remove (`None`) an attribute on every element.
pub async fn set_attribute(page: &Page, elements_js: &str, name: &str, value: Option<&str>) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const els = {elements_js};
            const name = {name};
            const value = {value};
            for (const el of els) {{
                if (value === null) {{
                    el.removeAttribute(name);
                }} else {{
                    el.setAttribute(name, value);
                }}
            }}
            return true;
        }})()"#,
        elements_js = elements_js,
        name = serde_json::to_string(name)?,
        value = serde_json::to_string(&value)?
    );
    run(page, js, "update attribute").await
}
