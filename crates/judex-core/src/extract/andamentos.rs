//! Procedural steps.

use scraper::ElementRef;

use super::patterns::{
    ANDAMENTO_COMPLEMENTO, ANDAMENTO_DATA, ANDAMENTO_ITEM, ANDAMENTO_JULGADOR, ANDAMENTO_NOME, GUIA_SUFFIX, LINK,
};
use super::{child_text, descending_index, element_text, none_if_blank, CasePage, Result};
use crate::models::Andamento;

/// Steps in page order (newest first); the oldest gets `index_num` 1.
pub fn extract_andamentos(page: &CasePage) -> Result<Vec<Andamento>> {
    let items = page.select_all(&ANDAMENTO_ITEM);
    let total = items.len();

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| parse_item(item, descending_index(total, i), page.base_url()))
        .collect())
}

fn parse_item(item: ElementRef<'_>, index_num: u32, base_url: &str) -> Andamento {
    let nome = child_text(item, &ANDAMENTO_NOME).unwrap_or_default();
    let nome = GUIA_SUFFIX.replace(&nome, "").trim().to_uppercase();

    let anchor = item.select(&LINK).next();
    let link = anchor
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_link(href, base_url));
    let link_descricao = anchor
        .and_then(|a| none_if_blank(&element_text(a)))
        .map(|text| text.to_uppercase());

    Andamento {
        index_num,
        data: child_text(item, &ANDAMENTO_DATA).unwrap_or_default(),
        nome,
        complemento: child_text(item, &ANDAMENTO_COMPLEMENTO),
        julgador: child_text(item, &ANDAMENTO_JULGADOR),
        link,
        link_descricao,
    }
}

/// Absolute links are kept; relative ones live under `/processos/`.
pub(crate) fn resolve_link(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    let href = href.replace("amp;", "");
    Some(format!("{}/processos/{}", base_url, href.trim_start_matches('/')))
}
