//! Per-field extractors for the case page.
//!
//! Every extractor is a plain `fn(&CasePage) -> Result<T, ExtractionError>`.
//! Callers go through [`run_extractor`], which turns a failure into the
//! field's absent value so one broken field never loses the whole record.

pub mod andamentos;
pub mod classification;
pub mod deslocamentos;
pub mod header;
pub mod informacoes;
pub mod listas;
pub mod partes;
pub mod patterns;
pub mod sessao;

pub use andamentos::extract_andamentos;
pub use classification::{extract_badges, extract_meio, extract_publicidade};
pub use deslocamentos::extract_deslocamentos;
pub use header::{extract_incidente, extract_numero_unico, extract_origem, extract_relator};
pub use informacoes::{
    extract_apensos, extract_assuntos, extract_data_protocolo, extract_folhas, extract_numero_origem,
    extract_orgao_origem, extract_volumes,
};
pub use listas::{extract_pautas, extract_peticoes, extract_recursos};
pub use partes::{extract_partes, extract_primeiro_autor};
pub use sessao::extract_sessao_virtual;

use std::time::Instant;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::ExtractionError;
use patterns::WHITESPACE;

/// Result type for extractors.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Signature shared by all field extractors.
pub type Extractor<T> = fn(&CasePage) -> Result<T>;

/// A parsed case page.
pub struct CasePage {
    html: Html,
    base_url: String,
}

impl CasePage {
    pub fn parse(page_source: &str, base_url: &str) -> Self {
        Self {
            html: Html::parse_document(page_source),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Portal base URL, used to absolutize relative links.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First element matching `selector`.
    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// First element matching `selector`, or `MissingElement`.
    pub fn require(&self, selector: &Selector, name: &str) -> Result<ElementRef<'_>> {
        self.first(selector)
            .ok_or_else(|| ExtractionError::MissingElement(name.to_string()))
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }
}

/// Run one extractor, logging its timing. A failure is logged and replaced
/// by the absent value of the field.
pub fn run_extractor<T: Default>(page: &CasePage, field: &str, extractor: Extractor<T>) -> T {
    let started = Instant::now();
    let result = extractor(page);
    let elapsed = started.elapsed();

    match result {
        Ok(value) => {
            debug!(field, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Extracted field");
            value
        }
        Err(e) => {
            warn!(field, error = %e, "Field extraction failed, using absent value");
            T::default()
        }
    }
}

/// Collapse runs of whitespace (including non-breaking spaces) and trim.
pub fn normalize_spaces(text: &str) -> String {
    WHITESPACE
        .replace_all(&text.replace('\u{a0}', " "), " ")
        .trim()
        .to_string()
}

/// Normalized value, or `None` for blank and placeholder values.
pub fn none_if_blank(text: &str) -> Option<String> {
    let text = normalize_spaces(text);
    match text.to_ascii_uppercase().as_str() {
        "" | "NA" | "N/A" | "-" => None,
        _ => Some(text),
    }
}

/// Whitespace-normalized text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_spaces(&element.text().collect::<String>())
}

/// Text of the first descendant matching `selector`, blank values dropped.
pub fn child_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|child| none_if_blank(&element_text(child)))
}

/// 1-based descending position of item `position` in a list of `total`
/// items rendered newest first.
pub(crate) fn descending_index(total: usize, position: usize) -> u32 {
    (total - position) as u32
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_spaces() {
        assert_eq!(normalize_spaces("  RECURSO \n\t EXTRAORDINÁRIO\u{a0} "), "RECURSO EXTRAORDINÁRIO");
        assert_eq!(normalize_spaces(""), "");
    }

    #[test]
    fn test_none_if_blank() {
        assert_eq!(none_if_blank("   "), None);
        assert_eq!(none_if_blank("NA"), None);
        assert_eq!(none_if_blank("n/a"), None);
        assert_eq!(none_if_blank(" - "), None);
        assert_eq!(none_if_blank(" SÃO  PAULO "), Some("SÃO PAULO".to_string()));
    }

    #[test]
    fn test_run_extractor_falls_back_to_default() {
        fn failing(_: &CasePage) -> Result<Option<String>> {
            Err(ExtractionError::MissingElement("#nothing".to_string()))
        }
        fn working(_: &CasePage) -> Result<Vec<u32>> {
            Ok(vec![1, 2])
        }

        let page = fixture::fragment("<p>empty</p>");
        assert_eq!(run_extractor(&page, "failing", failing), None);
        assert_eq!(run_extractor(&page, "working", working), vec![1, 2]);
    }

    #[test]
    fn test_descending_index() {
        let indices: Vec<u32> = (0..3).map(|i| descending_index(3, i)).collect();
        assert_eq!(indices, vec![3, 2, 1]);
    }
}
