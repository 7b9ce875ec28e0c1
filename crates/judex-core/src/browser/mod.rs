//! Browser sessions that render case pages.

mod browserless;
mod chrome;
#[cfg(test)]
pub(crate) mod fake;

pub use browserless::{BrowserlessFactory, BrowserlessSession};
pub use chrome::{ChromeFactory, ChromeSession};

use async_trait::async_trait;

use crate::error::SessionError;
use crate::models::config::{BrowserBackend, BrowserConfig, PortalConfig};

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// A page-render session, owned by exactly one case at a time.
#[async_trait]
pub trait PageSession: Send {
    /// Point the session at a URL.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Current rendered DOM of the page.
    async fn page_source(&mut self) -> Result<String>;

    /// Release the session. Called on every exit path.
    async fn close(&mut self) -> Result<()>;
}

/// Opens fresh sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageSession>>;
}

/// Build the session factory selected in the configuration.
pub fn factory_from_config(browser: &BrowserConfig, portal: &PortalConfig) -> Result<Box<dyn SessionFactory>> {
    Ok(match browser.backend {
        BrowserBackend::Chrome => Box::new(ChromeFactory::new(browser.clone(), &portal.user_agent)),
        BrowserBackend::Browserless => Box::new(BrowserlessFactory::new(
            &browser.browserless_url,
            browser.browserless_token.as_deref(),
            browser.render_timeout(),
        )?),
    })
}
