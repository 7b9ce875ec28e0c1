//! Text of documents linked from a case page (PDF or RTF).

mod rtf;

pub use rtf::rtf_to_text;

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::DocumentError;
use crate::extract::normalize_spaces;
use crate::models::config::RetrySettings;
use crate::retry::RetryPolicy;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Downloads a document and returns its text.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// reqwest-based fetcher with its own retry policy.
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpDocumentFetcher {
    pub fn new(user_agent: &str, retry: RetrySettings, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            retry: RetryPolicy::new(retry),
        })
    }

    async fn download(&self, url: &str) -> Result<(Vec<u8>, Option<String>)> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DocumentError::Status(status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await?;
        Ok((bytes.to_vec(), content_type))
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;

        let (bytes, content_type) = loop {
            match self.download(url).await {
                Ok(downloaded) => break downloaded,
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry.delay(attempt);
                    warn!(url, attempt, error = %e, "Document download failed, retrying in {:.1}s", delay.as_secs_f64());
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        debug!(url, bytes = bytes.len(), content_type = ?content_type, "Downloaded document");
        decode_document(&bytes, content_type.as_deref())
    }
}

/// Detected document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Rtf,
    Html,
    Text,
}

/// Detect the format from magic bytes, falling back to the content type.
pub fn detect_kind(bytes: &[u8], content_type: Option<&str>) -> Option<DocumentKind> {
    let head = trim_ascii_start(bytes);
    if head.starts_with(b"%PDF") {
        return Some(DocumentKind::Pdf);
    }
    if head.starts_with(b"{\\rtf") {
        return Some(DocumentKind::Rtf);
    }

    let content_type = content_type?.to_ascii_lowercase();
    if content_type.contains("pdf") {
        Some(DocumentKind::Pdf)
    } else if content_type.contains("rtf") {
        Some(DocumentKind::Rtf)
    } else if content_type.contains("html") {
        Some(DocumentKind::Html)
    } else if content_type.starts_with("text/") {
        Some(DocumentKind::Text)
    } else {
        None
    }
}

/// Extract text from downloaded bytes.
pub fn decode_document(bytes: &[u8], content_type: Option<&str>) -> Result<String> {
    let text = match detect_kind(bytes, content_type).ok_or(DocumentError::UnsupportedFormat)? {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))?
        }
        DocumentKind::Rtf => rtf_to_text(&String::from_utf8_lossy(bytes)),
        DocumentKind::Html => {
            let html = Html::parse_document(&String::from_utf8_lossy(bytes));
            normalize_spaces(&html.root_element().text().collect::<Vec<_>>().join(" "))
        }
        DocumentKind::Text => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(DocumentError::Empty);
    }
    Ok(text)
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    &bytes[start..]
}
