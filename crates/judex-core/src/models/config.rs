//! Configuration structures for the scraping pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration for the judex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JudexConfig {
    /// Portal location and identification.
    pub portal: PortalConfig,

    /// Browser backend configuration.
    pub browser: BrowserConfig,

    /// Page readiness waits.
    pub loader: LoaderConfig,

    /// Retry policies.
    pub retry: RetryConfig,

    /// Batch and gap-repair configuration.
    pub batch: BatchConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Portal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL of the portal, without trailing slash.
    pub base_url: String,

    /// User agent sent by the browser.
    pub user_agent: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://portal.stf.jus.br".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Which browser renders the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserBackend {
    /// Local headless Chrome / Chromium.
    Chrome,
    /// Remote Browserless instance.
    Browserless,
}

/// Browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub backend: BrowserBackend,

    /// Chrome executable.
    pub chrome_bin: String,

    /// Window size passed to Chrome as "W,H".
    pub window_size: String,

    /// Virtual time Chrome grants scripts before dumping the DOM.
    pub render_budget_ms: u64,

    /// Hard limit for a single render.
    pub render_timeout_secs: u64,

    /// Browserless endpoint.
    pub browserless_url: String,

    /// Browserless API token.
    pub browserless_token: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: BrowserBackend::Chrome,
            chrome_bin: std::env::var("CHROME_BIN").unwrap_or_else(|_| "chromium".to_string()),
            window_size: "920,600".to_string(),
            render_budget_ms: 5_000,
            render_timeout_secs: 30,
            browserless_url: "http://localhost:3000".to_string(),
            browserless_token: None,
        }
    }
}

impl BrowserConfig {
    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }
}

/// Waits applied while a case page loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Upper bound for the content anchor to appear.
    pub anchor_timeout_secs: f64,

    /// Pause after navigation before the first check.
    pub settle_delay_secs: f64,

    /// Pause between readiness checks.
    pub poll_interval_secs: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            anchor_timeout_secs: 10.0,
            settle_delay_secs: 1.0,
            poll_interval_secs: 1.0,
        }
    }
}

impl LoaderConfig {
    pub fn anchor_timeout(&self) -> Duration {
        secs(self.anchor_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        secs(self.settle_delay_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        secs(self.poll_interval_secs)
    }
}

/// Retry policies for page loads and document downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub driver: RetrySettings,
    pub documents: RetrySettings,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            driver: RetrySettings {
                max_attempts: 5,
                multiplier: 1.0,
                min_secs: 0.0,
                max_secs: 10.0,
            },
            documents: RetrySettings {
                max_attempts: 3,
                multiplier: 1.0,
                min_secs: 2.0,
                max_secs: 5.0,
            },
        }
    }
}

/// Bounded exponential backoff settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts, including the first one.
    pub max_attempts: u32,

    pub multiplier: f64,
    pub min_secs: f64,
    pub max_secs: f64,
}

/// Batch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Gap-repair rounds after the first sweep.
    pub max_gap_rounds: u32,

    /// Stop a sweep after this many consecutive not-found cases.
    pub max_consecutive_not_found: Option<u32>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_gap_rounds: 5,
            max_consecutive_not_found: None,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Download virtual-session documents and store their text.
    pub fetch_documents: bool,
}

impl JudexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        config.validate().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Check that every wait is a finite number of seconds within `[0, 86400]`.
    pub fn validate(&self) -> Result<(), String> {
        let waits = [
            ("loader.anchor_timeout_secs", self.loader.anchor_timeout_secs),
            ("loader.settle_delay_secs", self.loader.settle_delay_secs),
            ("loader.poll_interval_secs", self.loader.poll_interval_secs),
            ("retry.driver.multiplier", self.retry.driver.multiplier),
            ("retry.driver.min_secs", self.retry.driver.min_secs),
            ("retry.driver.max_secs", self.retry.driver.max_secs),
            ("retry.documents.multiplier", self.retry.documents.multiplier),
            ("retry.documents.min_secs", self.retry.documents.min_secs),
            ("retry.documents.max_secs", self.retry.documents.max_secs),
        ];
        for (key, value) in waits {
            if !(0.0..=MAX_WAIT_SECS).contains(&value) {
                return Err(format!("{key} must be between 0 and {MAX_WAIT_SECS} seconds, got {value}"));
            }
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

/// Longest wait any setting may ask for.
const MAX_WAIT_SECS: f64 = 86_400.0;

/// Seconds as a `Duration`, saturating into `[0, MAX_WAIT_SECS]`; NaN is zero.
pub(crate) fn secs(value: f64) -> Duration {
    if value.is_nan() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(value.clamp(0.0, MAX_WAIT_SECS))
}
