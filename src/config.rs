use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 4000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Process-wide test configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long commands such as `click_if_visible` and assertions may wait.
    #[serde(with = "millis")]
    pub command_timeout: Duration,
    /// Delay between two polls of the page.
    #[serde(with = "millis")]
    pub poll_interval: Duration,
    /// Run Chrome without a window.
    pub headless: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_millis(DEFAULT_COMMAND_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            headless: true,
        }
    }
}

impl Settings {
    /// Build settings from `PAGE_COMPONENTS_*` environment variables, falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(ms) = lookup("PAGE_COMPONENTS_COMMAND_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            settings.command_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = lookup("PAGE_COMPONENTS_POLL_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            settings.poll_interval = Duration::from_millis(ms);
        }
        if let Some(headed) = lookup("PAGE_COMPONENTS_HEADED") {
            settings.headless = !matches!(headed.as_str(), "1" | "true" | "yes");
        }
        settings
    }
}

/// The process-wide settings, read from the environment on first use.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(Settings::from_env)
}

/// Install explicit settings. Returns false if settings were already in use.
pub fn init(settings: Settings) -> bool {
    SETTINGS.set(settings).is_ok()
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
