//! Case page loading with failure classification and retry.

use std::time::Duration;

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::browser::PageSession;
use crate::error::LoadError;
use crate::extract::normalize_spaces;
use crate::models::config::JudexConfig;
use crate::models::CaseClass;
use crate::retry::RetryPolicy;

/// Element that marks a rendered case page.
pub const CONTENT_ANCHOR: &str = "#conteudo";

/// Element holding the case origin.
pub const ORIGIN_ANCHOR: &str = "#descricao-procedencia";

const NOT_FOUND_MARKER: &str = "Processo não encontrado";

lazy_static! {
    static ref CONTENT: Selector = Selector::parse(CONTENT_ANCHOR).unwrap();
    static ref ORIGIN: Selector = Selector::parse(ORIGIN_ANCHOR).unwrap();
}

/// Fully loaded case page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub url: String,
    /// Inner markup of the content anchor.
    pub content: String,
    /// Text of the origin anchor.
    pub origin: String,
    /// Complete rendered DOM.
    pub page_source: String,
}

/// Why a case was classified as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The portal rendered its "case not found" message.
    NotFoundMarker,
    /// The origin anchor is present but empty.
    EmptyOrigin,
}

/// Result of a load that reached a verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(RawDocument),
    NotFound(NotFoundReason),
}

/// Loads case pages through a [`PageSession`], retrying transient failures.
#[derive(Debug, Clone)]
pub struct CaseLoader {
    base_url: String,
    settle_delay: Duration,
    poll_interval: Duration,
    anchor_timeout: Duration,
    retry: RetryPolicy,
}

impl CaseLoader {
    pub fn new(config: &JudexConfig) -> Self {
        Self {
            base_url: config.portal.base_url.trim_end_matches('/').to_string(),
            settle_delay: config.loader.settle_delay(),
            poll_interval: config.loader.poll_interval(),
            anchor_timeout: config.loader.anchor_timeout(),
            retry: RetryPolicy::new(config.retry.driver),
        }
    }

    /// Case page URL for `classe` / `id`.
    pub fn case_url(&self, classe: &CaseClass, id: u64) -> String {
        format!(
            "{}/processos/listarProcessos.asp?classe={}&numeroProcesso={}",
            self.base_url, classe, id
        )
    }

    /// Load one case. `NotFound` is terminal and costs a single attempt;
    /// retryable errors are retried up to the policy ceiling and the last
    /// error is returned on exhaustion.
    pub async fn load(
        &self,
        session: &mut dyn PageSession,
        classe: &CaseClass,
        id: u64,
    ) -> Result<LoadOutcome, LoadError> {
        let url = self.case_url(classe, id);
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;

        loop {
            debug!(url = %url, attempt, "Loading case page");
            match self.attempt(session, &url).await {
                Ok(outcome) => {
                    if let LoadOutcome::NotFound(reason) = &outcome {
                        info!(classe = %classe, id, ?reason, "Case not found");
                    }
                    return Ok(outcome);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        classe = %classe,
                        id,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Load failed, retrying in {:.1}s",
                        delay.as_secs_f64()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(classe = %classe, id, attempt, error = %e, "Giving up on case");
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(&self, session: &mut dyn PageSession, url: &str) -> Result<LoadOutcome, LoadError> {
        session.navigate(url).await?;
        sleep(self.settle_delay).await;
        let source = self.wait_for_content(session).await?;
        classify(url, source)
    }

    /// Poll the page until the content anchor appears or a failure
    /// signature shows up.
    async fn wait_for_content(&self, session: &mut dyn PageSession) -> Result<String, LoadError> {
        let started = Instant::now();
        loop {
            let source = session.page_source().await?;
            check_failure_signatures(&source)?;
            if has_content_anchor(&source) {
                return Ok(source);
            }

            let waited = started.elapsed();
            if waited >= self.anchor_timeout {
                return Err(LoadError::AnchorTimeout {
                    anchor: CONTENT_ANCHOR,
                    waited,
                });
            }
            sleep(self.poll_interval).await;
        }
    }
}

/// Map known error pages to their transient error.
pub fn check_failure_signatures(source: &str) -> Result<(), LoadError> {
    if source.contains("403 Forbidden") {
        Err(LoadError::AccessDenied)
    } else if source.contains("CAPTCHA") {
        Err(LoadError::BotChallenge)
    } else if source.contains("502 Bad Gateway") {
        Err(LoadError::BadGateway)
    } else {
        Ok(())
    }
}

fn has_content_anchor(source: &str) -> bool {
    Html::parse_document(source).select(&CONTENT).next().is_some()
}

/// Decide between a found case and a legitimate absence.
fn classify(url: &str, page_source: String) -> Result<LoadOutcome, LoadError> {
    let html = Html::parse_document(&page_source);
    let content = html
        .select(&CONTENT)
        .next()
        .ok_or(LoadError::MissingAnchor(CONTENT_ANCHOR))?;

    let text = normalize_spaces(&content.text().collect::<String>());
    if text.contains(NOT_FOUND_MARKER) {
        return Ok(LoadOutcome::NotFound(NotFoundReason::NotFoundMarker));
    }

    let origin = html
        .select(&ORIGIN)
        .next()
        .ok_or(LoadError::MissingAnchor(ORIGIN_ANCHOR))?;
    let origin = origin.text().collect::<String>().trim().to_string();
    if origin.is_empty() {
        return Ok(LoadOutcome::NotFound(NotFoundReason::EmptyOrigin));
    }

    let content = content.inner_html();

    Ok(LoadOutcome::Found(RawDocument {
        url: url.to_string(),
        content,
        origin,
        page_source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{self, FakePortal};

    fn re() -> CaseClass {
        CaseClass::parse("RE").unwrap()
    }

    #[test]
    fn test_case_url() {
        let loader = CaseLoader::new(&JudexConfig::default());
        assert_eq!(
            loader.case_url(&re(), 1234567),
            "https://portal.stf.jus.br/processos/listarProcessos.asp?classe=RE&numeroProcesso=1234567"
        );
    }

    #[test]
    fn test_failure_signatures() {
        assert!(matches!(check_failure_signatures("<h1>403 Forbidden</h1>"), Err(LoadError::AccessDenied)));
        assert!(matches!(check_failure_signatures(&fake::captcha_page()), Err(LoadError::BotChallenge)));
        assert!(matches!(check_failure_signatures("502 Bad Gateway"), Err(LoadError::BadGateway)));
        assert!(check_failure_signatures(&fake::case_page(1)).is_ok());
    }

    #[test]
    fn test_classify_found() {
        let outcome = classify("u", fake::case_page(7)).unwrap();
        match outcome {
            LoadOutcome::Found(raw) => {
                assert_eq!(raw.origin, "SP - SÃO PAULO");
                assert!(raw.content.contains("incidente"));
                assert_eq!(raw.url, "u");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_classify_not_found_variants() {
        assert_eq!(
            classify("u", fake::not_found_page()).unwrap(),
            LoadOutcome::NotFound(NotFoundReason::NotFoundMarker)
        );

        let empty_origin = r#"<div id="conteudo"><div id="descricao-procedencia">  </div></div>"#;
        assert_eq!(
            classify("u", empty_origin.to_string()).unwrap(),
            LoadOutcome::NotFound(NotFoundReason::EmptyOrigin)
        );

        let no_origin = r#"<div id="conteudo"><p>partial</p></div>"#;
        let err = classify("u", no_origin.to_string()).unwrap_err();
        assert!(matches!(err, LoadError::MissingAnchor(ORIGIN_ANCHOR)));
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_consumes_one_attempt() {
        let portal = FakePortal::new();
        let mut session = portal.session();
        let loader = CaseLoader::new(&JudexConfig::default());

        let outcome = loader.load(&mut session, &re(), 99).await.unwrap();
        assert_eq!(outcome, LoadOutcome::NotFound(NotFoundReason::NotFoundMarker));
        assert_eq!(portal.navigations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_split_across_elements_is_not_found() {
        let portal = FakePortal::new();
        portal.serve(
            12,
            vec![r#"<html><body><div id="conteudo"><p>Processo <b>não
                encontrado</b>.</p></div></body></html>"#
                .to_string()],
        );
        let mut session = portal.session();
        let loader = CaseLoader::new(&JudexConfig::default());

        let outcome = loader.load(&mut session, &re(), 12).await.unwrap();
        assert_eq!(outcome, LoadOutcome::NotFound(NotFoundReason::NotFoundMarker));
        assert_eq!(portal.navigations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_captcha_exhausts_attempt_ceiling() {
        let portal = FakePortal::new();
        portal.serve(5, vec![fake::captcha_page()]);
        let mut session = portal.session();
        let loader = CaseLoader::new(&JudexConfig::default());

        let err = loader.load(&mut session, &re(), 5).await.unwrap_err();
        assert!(matches!(err, LoadError::BotChallenge));
        assert_eq!(portal.navigations().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_then_success() {
        let portal = FakePortal::new();
        portal.serve(
            8,
            vec!["<h1>502 Bad Gateway</h1>".to_string(), fake::case_page(8)],
        );
        let mut session = portal.session();
        let loader = CaseLoader::new(&JudexConfig::default());

        let outcome = loader.load(&mut session, &re(), 8).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Found(_)));
        assert_eq!(portal.navigations().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_content_anchor() {
        let portal = FakePortal::new();
        portal.serve(
            3,
            vec![fake::loading_page(), fake::loading_page(), fake::case_page(3)],
        );
        let mut session = portal.session();
        let loader = CaseLoader::new(&JudexConfig::default());

        let outcome = loader.load(&mut session, &re(), 3).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Found(_)));
        assert_eq!(portal.navigations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_anchor_timeout_is_retried() {
        let portal = FakePortal::new();
        portal.serve(4, vec![fake::loading_page()]);
        let mut session = portal.session();
        let mut config = JudexConfig::default();
        config.retry.driver.max_attempts = 2;
        let loader = CaseLoader::new(&config);

        let err = loader.load(&mut session, &re(), 4).await.unwrap_err();
        assert!(matches!(err, LoadError::AnchorTimeout { anchor: CONTENT_ANCHOR, .. }));
        assert_eq!(portal.navigations().len(), 2);
    }
}
