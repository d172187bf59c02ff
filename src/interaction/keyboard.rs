use anyhow::{Context, Result};
use chromiumoxide::page::Page;

use crate::driver::{Key, TypeOptions};

/// Type text into the first element by focusing it and updating its value.
pub async fn type_text(page: &Page, elements_js: &str, text: &str, options: &TypeOptions) -> Result<()> {
    let focus_js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) throw new Error('Element not found');
            el.scrollIntoView({{ block: 'center', behavior: 'instant' }});
            el.focus();
            if ({clear}) {{
                el.value = '';
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            }}
            return true;
        }})()"#,
        elements_js = elements_js,
        clear = options.clear_first
    );

    page.evaluate(focus_js.as_str())
        .await
        .context("Failed to focus element")?;

    match options.delay {
        Some(delay) => {
            let mut buf = [0u8; 4];
            for c in text.chars() {
                append_text(page, elements_js, c.encode_utf8(&mut buf)).await?;
                tokio::time::sleep(delay).await;
            }
        }
        None => append_text(page, elements_js, text).await?,
    }

    Ok(())
}

async fn append_text(page: &Page, elements_js: &str, text: &str) -> Result<()> {
    let type_js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            const text = {text};
            if (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA') {{
                const proto = el.tagName === 'INPUT'
                    ? window.HTMLInputElement.prototype
                    : window.HTMLTextAreaElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value')?.set;
                if (setter) {{
                    setter.call(el, el.value + text);
                }} else {{
                    el.value += text;
                }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            }} else {{
                // contenteditable
                document.execCommand('insertText', false, text);
            }}
            return true;
        }})()"#,
        elements_js = elements_js,
        text = serde_json::to_string(text)?
    );

    page.evaluate(type_js.as_str())
        .await
        .context("Failed to type text")?;
    Ok(())
}

/// Clear the value of the first element.
pub async fn clear(page: &Page, elements_js: &str) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) throw new Error('Element not found');
            el.focus();
            el.value = '';
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#,
        elements_js = elements_js
    );

    page.evaluate(js.as_str()).await.context("Failed to clear element")?;
    Ok(())
}

/// Press a key on the first element.
pub async fn press_key(page: &Page, elements_js: &str, key: Key) -> Result<()> {
    let (code, key_code) = key_to_code(key);
    let js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) throw new Error('Element not found');
            el.focus();
            const opts = {{
                key: {key},
                code: {code},
                keyCode: {key_code},
                which: {key_code},
                bubbles: true,
                cancelable: true
            }};
            el.dispatchEvent(new KeyboardEvent('keydown', opts));
            el.dispatchEvent(new KeyboardEvent('keypress', opts));
            el.dispatchEvent(new KeyboardEvent('keyup', opts));
            return true;
        }})()"#,
        elements_js = elements_js,
        key = serde_json::to_string(key.dom_key())?,
        code = serde_json::to_string(code)?,
        key_code = key_code,
    );

    page.evaluate(js.as_str()).await.context("Failed to press key")?;
    Ok(())
}

fn key_to_code(key: Key) -> (&'static str, u32) {
    match key {
        Key::Enter => ("Enter", 13),
        Key::Space => ("Space", 32),
        Key::ArrowUp => ("ArrowUp", 38),
        Key::ArrowDown => ("ArrowDown", 40),
    }
}
