use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::config;

/// Bounds for [`poll_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Poll with the configured interval for up to `timeout`, or the
    /// configured command timeout.
    pub fn from_settings(timeout: Option<Duration>) -> Self {
        let settings = config::settings();
        Self {
            timeout: timeout.unwrap_or(settings.command_timeout),
            interval: settings.poll_interval,
        }
    }
}

/// Evaluate `predicate` every `interval` until it returns true or the next
/// poll would land at or beyond `timeout`.
///
/// Returns `Ok(true)` when the predicate passed and `Ok(false)` on timeout.
/// Errors from the predicate end the poll immediately.
pub async fn poll_until<F, Fut, E>(mut predicate: F, options: PollOptions) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let outcome = retry_until(
        move || {
            let passed = predicate();
            async move { Ok::<_, E>(if passed.await? { Ok(()) } else { Err(()) }) }
        },
        options,
    )
    .await?;
    Ok(outcome.is_ok())
}

/// Run `attempt` on the same schedule as [`poll_until`].
///
/// An attempt yields `Ok(Ok(value))` to stop, `Ok(Err(last))` to try again,
/// or `Err(e)` to abort. On timeout the last `Err` outcome is returned.
pub async fn retry_until<F, Fut, T, L, E>(
    mut attempt: F,
    options: PollOptions,
) -> Result<std::result::Result<T, L>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<std::result::Result<T, L>, E>>,
{
    let start = Instant::now();
    loop {
        match attempt().await? {
            Ok(value) => return Ok(Ok(value)),
            Err(last) if start.elapsed() + options.interval >= options.timeout => {
                return Ok(Err(last))
            }
            Err(_) => tokio::time::sleep(options.interval).await,
        }
    }
}
