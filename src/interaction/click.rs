use anyhow::{Context, Result};
use chromiumoxide::page::Page;

use crate::driver::MouseButton;

#[derive(Debug, Clone)]
pub struct ClickResult {
    pub method_used: String,
}

fn button_num(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 2,
    }
}

/// Hybrid click on the first element of `elements_js`:
/// 1. Scroll into view
/// 2. Get bounding box
/// 3. Check visibility and obstruction
/// 4. Dispatch mouse events if visible, fall back to JS click
pub async fn hybrid_click(page: &Page, elements_js: &str, button: MouseButton) -> Result<ClickResult> {
    let check_js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) return {{ error: 'Element not found' }};

            el.scrollIntoView({{ block: 'center', inline: 'center', behavior: 'instant' }});

            const rect = el.getBoundingClientRect();
            if (rect.width === 0 && rect.height === 0) {{
                return {{ error: 'Element has zero size' }};
            }}

            const centerX = rect.left + rect.width / 2;
            const centerY = rect.top + rect.height / 2;

            const style = getComputedStyle(el);
            if (style.display === 'none' || style.visibility === 'hidden' || parseFloat(style.opacity) === 0) {{
                return {{ visible: false }};
            }}

            const topEl = document.elementFromPoint(centerX, centerY);
            const isUnobscured = topEl && (el === topEl || el.contains(topEl) || topEl.contains(el));

            return {{ visible: true, unobscured: isUnobscured }};
        }})()"#,
        elements_js = elements_js
    );

    let check_result: serde_json::Value = page
        .evaluate(check_js.as_str())
        .await
        .context("Failed to evaluate click check")?
        .into_value()
        .context("Failed to parse click check result")?;

    if let Some(error) = check_result.get("error").and_then(|e| e.as_str()) {
        anyhow::bail!("{}", error);
    }

    let visible = check_result["visible"].as_bool().unwrap_or(false);
    let unobscured = check_result["unobscured"].as_bool().unwrap_or(false);

    // Let scroll/layout settle
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    if visible && unobscured {
        let mut events = vec!["mousemove", "mousedown", "mouseup"];
        events.push(if button == MouseButton::Right { "contextmenu" } else { "click" });
        dispatch_mouse_events(page, elements_js, &events, button).await?;
        Ok(ClickResult {
            method_used: "mouse_event".to_string(),
        })
    } else {
        let js_click = format!(
            r#"(() => {{
                const el = {elements_js}[0];
                if (!el) throw new Error('Element not found');
                el.click();
                return true;
            }})()"#,
            elements_js = elements_js
        );

        page.evaluate(js_click.as_str())
            .await
            .context("Failed to JS click")?;

        Ok(ClickResult {
            method_used: "js_click".to_string(),
        })
    }
}

/// Double-click the first element.
pub async fn double_click(page: &Page, elements_js: &str) -> Result<()> {
    dispatch_mouse_events(
        page,
        elements_js,
        &["mousedown", "mouseup", "click", "mousedown", "mouseup", "click", "dblclick"],
        MouseButton::Left,
    )
    .await
}

/// Dispatch a named event on every element, e.g. `mouseover` or `submit`.
pub async fn trigger(page: &Page, elements_js: &str, event: &str) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const els = {elements_js};
            if (els.length === 0) throw new Error('Element not found');
            const name = {event};
            for (const el of els) {{
                const evt = name.startsWith('mouse') || name === 'click'
                    ? new MouseEvent(name, {{ bubbles: true, cancelable: true }})
                    : new Event(name, {{ bubbles: true, cancelable: true }});
                el.dispatchEvent(evt);
            }}
            return true;
        }})()"#,
        elements_js = elements_js,
        event = serde_json::to_string(event)?
    );

    page.evaluate(js.as_str())
        .await
        .with_context(|| format!("Failed to trigger {}", event))?;
    Ok(())
}

async fn dispatch_mouse_events(
    page: &Page,
    elements_js: &str,
    events: &[&str],
    button: MouseButton,
) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) throw new Error('Element not found');
            const rect = el.getBoundingClientRect();
            const x = rect.left + rect.width / 2;
            const y = rect.top + rect.height / 2;
            const opts = {{ bubbles: true, cancelable: true, clientX: x, clientY: y, button: {button_num} }};
            for (const name of {events}) {{
                el.dispatchEvent(new MouseEvent(name, opts));
            }}
            return true;
        }})()"#,
        elements_js = elements_js,
        button_num = button_num(button),
        events = serde_json::to_string(events)?
    );

    page.evaluate(js.as_str())
        .await
        .context("Failed to dispatch mouse events")?;
    Ok(())
}
