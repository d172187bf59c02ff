use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use page_components::browser::BrowserSession;
use page_components::config::{self, Settings};
use page_components::suite::Suite;

/// page-components: run page-object check suites in Chrome
#[derive(Parser)]
#[command(name = "page-components", version, about)]
struct Cli {
    /// Suite file (JSON)
    suite: PathBuf,

    /// Page to open instead of the suite's `url`
    #[arg(long)]
    url: Option<String>,

    /// Run Chrome with a visible window (default: headless)
    #[arg(long)]
    headed: bool,

    /// Retry budget for assertions and visibility waits
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if cli.headed {
        settings.headless = false;
    }
    if let Some(ms) = cli.timeout_ms {
        settings.command_timeout = Duration::from_millis(ms);
    }
    config::init(settings.clone());

    let suite = Suite::load(&cli.suite)?;
    let url = cli
        .url
        .or_else(|| suite.url.clone())
        .context("No page to open: pass --url or set `url` in the suite")?;

    let session = BrowserSession::launch(&settings).await?;
    tracing::info!("Opening {}", url);

    let outcome = tokio::select! {
        result = async {
            session.goto(&url).await?;
            let report = suite.run(&session.driver()).await?;
            anyhow::Ok(report)
        } => Some(result),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received interrupt signal, shutting down");
            None
        }
    };

    // Always kill Chrome before exiting
    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close Chrome: {:#}", e);
    }

    match outcome {
        Some(Ok(report)) => {
            println!("{}", report.format_output());
            if !report.success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Err(e)) => Err(e),
        None => std::process::exit(130),
    }
}
