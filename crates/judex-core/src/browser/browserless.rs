//! Remote rendering through the Browserless `/content` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{PageSession, Result, SessionFactory};
use crate::error::SessionError;

/// Selector Browserless waits for before returning the DOM.
const WAIT_SELECTOR: &str = "#conteudo";

pub struct BrowserlessFactory {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl BrowserlessFactory {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SessionError::Launch(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }
}

#[async_trait]
impl SessionFactory for BrowserlessFactory {
    async fn open(&self) -> Result<Box<dyn PageSession>> {
        Ok(Box::new(BrowserlessSession {
            client: self.client.clone(),
            endpoint: self.endpoint(),
            timeout: self.timeout,
            url: None,
        }))
    }
}

/// Session backed by stateless Browserless calls; every `page_source`
/// renders the current URL anew.
pub struct BrowserlessSession {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    url: Option<String>,
}

#[async_trait]
impl PageSession for BrowserlessSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        let url = self.url.as_deref().ok_or(SessionError::NoPage)?;
        let body = serde_json::json!({
            "url": url,
            "waitForSelector": {
                "selector": WAIT_SELECTOR,
                "timeout": self.timeout.as_millis() as u64,
            },
        });

        debug!(url, "Requesting Browserless render");
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SessionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }

    async fn close(&mut self) -> Result<()> {
        self.url = None;
        Ok(())
    }
}
