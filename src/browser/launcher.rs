use anyhow::{Result, bail};
use std::path::PathBuf;

/// Environment variable naming an explicit Chrome binary.
pub const CHROME_ENV: &str = "PAGE_COMPONENTS_CHROME";

/// Find the Chrome/Chromium binary: `PAGE_COMPONENTS_CHROME` first, then the
/// platform's usual install locations, then `PATH`.
pub fn find_chrome_binary() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CHROME_ENV).map(PathBuf::from) {
        if path.exists() {
            tracing::info!("Using Chrome from {}: {}", CHROME_ENV, path.display());
            return Ok(path);
        }
        bail!("{} points to a missing file: {}", CHROME_ENV, path.display());
    }

    let candidates = chrome_candidates();

    for candidate in &candidates {
        let path = PathBuf::from(candidate);
        if path.exists() {
            tracing::info!("Found Chrome at: {}", path.display());
            return Ok(path);
        }
    }

    // Try PATH lookup
    for name in &[
        "google-chrome",
        "google-chrome-stable",
        "chromium-browser",
        "chromium",
    ] {
        if let Ok(path) = which::which(name) {
            tracing::info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    bail!(
        "Could not find Chrome or Chromium. Searched:\n{}",
        candidates.join("\n")
    )
}

fn chrome_candidates() -> Vec<String> {
    let mut candidates = Vec::new();

    #[cfg(target_os = "macos")]
    {
        candidates.extend([
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome".into(),
            "/Applications/Chromium.app/Contents/MacOS/Chromium".into(),
            "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary".into(),
        ]);
        // Homebrew paths
        if let Ok(home) = std::env::var("HOME") {
            candidates.push(format!(
                "{}/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                home
            ));
        }
    }

    #[cfg(target_os = "linux")]
    {
        candidates.extend([
            "/usr/bin/google-chrome".into(),
            "/usr/bin/google-chrome-stable".into(),
            "/usr/bin/chromium-browser".into(),
            "/usr/bin/chromium".into(),
            "/snap/bin/chromium".into(),
        ]);
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(pf) = std::env::var("PROGRAMFILES") {
            candidates.push(format!("{}\\Google\\Chrome\\Application\\chrome.exe", pf));
        }
        if let Ok(pf86) = std::env::var("PROGRAMFILES(X86)") {
            candidates.push(format!("{}\\Google\\Chrome\\Application\\chrome.exe", pf86));
        }
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            candidates.push(format!("{}\\Google\\Chrome\\Application\\chrome.exe", local));
        }
    }

    candidates
}

/// Chrome flags applied to every session.
pub fn default_chrome_args(headless: bool) -> Vec<&'static str> {
    let mut args = vec![
        "--no-first-run",
        "--no-default-browser-check",
        "--disable-background-networking",
        "--disable-client-side-phishing-detection",
        "--disable-default-apps",
        "--disable-extensions",
        "--disable-hang-monitor",
        "--disable-popup-blocking",
        "--disable-prompt-on-repost",
        "--disable-sync",
        "--disable-translate",
        "--metrics-recording-only",
        "--safebrowsing-disable-auto-update",
    ];

    if headless {
        args.push("--headless=new");
    }

    args
}
