//! Headless Chrome session using `--dump-dom`.

use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, warn};

use super::{PageSession, Result, SessionFactory};
use crate::error::SessionError;
use crate::models::config::BrowserConfig;

/// Opens one [`ChromeSession`] per case.
pub struct ChromeFactory {
    config: BrowserConfig,
    user_agent: String,
}

impl ChromeFactory {
    pub fn new(config: BrowserConfig, user_agent: &str) -> Self {
        Self {
            config,
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait]
impl SessionFactory for ChromeFactory {
    async fn open(&self) -> Result<Box<dyn PageSession>> {
        let profile = tempfile::tempdir()
            .map_err(|e| SessionError::Launch(format!("failed to create profile dir: {e}")))?;
        debug!(profile = %profile.path().display(), "Opened Chrome session");

        Ok(Box::new(ChromeSession {
            config: self.config.clone(),
            user_agent: self.user_agent.clone(),
            profile: Some(profile),
            url: None,
        }))
    }
}

/// Renders the current URL with a headless Chrome process on every
/// `page_source` call. The incognito profile lives as long as the session.
pub struct ChromeSession {
    config: BrowserConfig,
    user_agent: String,
    profile: Option<TempDir>,
    url: Option<String>,
}

impl ChromeSession {
    fn args(&self, url: &str, profile: &TempDir) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--incognito".to_string(),
            "--no-sandbox".to_string(),
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            format!("--window-size={}", self.config.window_size),
            format!("--user-agent={}", self.user_agent),
            format!("--user-data-dir={}", profile.path().display()),
            format!("--virtual-time-budget={}", self.config.render_budget_ms),
            "--dump-dom".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url).map_err(|e| SessionError::Render(format!("invalid URL {url}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SessionError::Render(format!(
                "only http/https URLs are allowed, got: {}",
                parsed.scheme()
            )));
        }
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        let url = self.url.as_deref().ok_or(SessionError::NoPage)?;
        let profile = self.profile.as_ref().ok_or(SessionError::NoPage)?;
        let timeout: Duration = self.config.render_timeout();

        let output = tokio::time::timeout(
            timeout,
            tokio::process::Command::new(&self.config.chrome_bin)
                .args(self.args(url, profile))
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| SessionError::Timeout(timeout))?
        .map_err(|e| SessionError::Launch(format!("{}: {e}", self.config.chrome_bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(url, stderr = %stderr, "Chrome exited with error");
            return Err(SessionError::Render(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn close(&mut self) -> Result<()> {
        self.url = None;
        if let Some(profile) = self.profile.take() {
            profile
                .close()
                .map_err(|e| SessionError::Render(format!("failed to remove profile dir: {e}")))?;
        }
        debug!("Closed Chrome session");
        Ok(())
    }
}
