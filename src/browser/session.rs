use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use super::launcher;
use crate::config::Settings;
use crate::driver::cdp::CdpDriver;
use crate::driver::SharedDriver;

/// A launched Chrome with one page, ready to drive components.
pub struct BrowserSession {
    browser: Browser,
    _handler_task: tokio::task::JoinHandle<()>,
    _profile_dir: tempfile::TempDir,
    driver: std::sync::Arc<CdpDriver>,
}

impl BrowserSession {
    /// Launch a new browser and establish the CDP connection.
    pub async fn launch(settings: &Settings) -> Result<Self> {
        let profile_dir = tempfile::tempdir().context("Failed to create Chrome profile dir")?;
        let executable = launcher::find_chrome_binary()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .user_data_dir(profile_dir.path())
            .window_size(1280, 720);
        for arg in launcher::default_chrome_args(settings.headless) {
            builder = builder.arg(arg);
        }
        if !settings.headless {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(|e| anyhow::anyhow!("{}", e))?;

        let (browser, mut handler) =
            Browser::launch(config).await.context("Failed to launch Chrome")?;

        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Drain browser events
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create initial page")?;

        tracing::info!("Browser session started (headless: {})", settings.headless);

        Ok(Self {
            browser,
            _handler_task: handler_task,
            _profile_dir: profile_dir,
            driver: std::sync::Arc::new(CdpDriver::new(page)),
        })
    }

    /// The driver for the session's page.
    pub fn driver(&self) -> SharedDriver {
        self.driver.clone()
    }

    /// Navigate the session's page.
    pub async fn goto(&self, url: &str) -> crate::Result<()> {
        self.driver.goto(url).await
    }

    /// Close the browser.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("Failed to close Chrome")?;
        self._handler_task.abort();
        Ok(())
    }
}
