use anyhow::{Context, Result};
use chromiumoxide::page::Page;

/// Scroll the first element into view.
pub async fn scroll_into_view(page: &Page, elements_js: &str, smooth: bool) -> Result<()> {
    let js = format!(
        r#"(() => {{
            const el = {elements_js}[0];
            if (!el) throw new Error('Element not found');
            el.scrollIntoView({{ block: 'center', behavior: {behavior} }});
            return true;
        }})()"#,
        elements_js = elements_js,
        behavior = if smooth { "'smooth'" } else { "'auto'" }
    );
    page.evaluate(js.as_str())
        .await
        .context("Failed to scroll element into view")?;

    if smooth {
        // Wait for scroll to settle
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    Ok(())
}
