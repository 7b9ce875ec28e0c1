//! Virtual judgment sessions.

use scraper::ElementRef;
use tracing::debug;

use super::andamentos::resolve_link;
use super::patterns::{
    ACOMPANHA, CELL_LABEL, CELL_VALUE, JULGAMENTO_ITEM, LISTA_JULGAMENTO, MANIFESTACAO, TABLE_CELL, TABLE_ROW,
    TEXTO_LINK, TITULO_LISTA,
};
use super::{child_text, element_text, none_if_blank, CasePage, Result};
use crate::models::SessaoVirtual;

/// Sessions from the static DOM. Document contents stay empty here; the
/// assembler fills them when document fetching is enabled.
pub fn extract_sessao_virtual(page: &CasePage) -> Result<Vec<SessaoVirtual>> {
    let mut sessoes = Vec::new();
    for item in page.select_all(&JULGAMENTO_ITEM) {
        let Some(lista) = item.select(&LISTA_JULGAMENTO).next() else {
            debug!("Skipping julgamento item without session list");
            continue;
        };
        let sessao = parse_lista(lista, page.base_url());
        if sessao != SessaoVirtual::default() {
            sessoes.push(sessao);
        }
    }
    Ok(sessoes)
}

fn parse_lista(lista: ElementRef<'_>, base_url: &str) -> SessaoVirtual {
    let mut sessao = SessaoVirtual::default();

    for row in lista.select(&TABLE_ROW) {
        let cells: Vec<ElementRef<'_>> = row.select(&TABLE_CELL).collect();
        let [label_cell, value_cell] = cells.as_slice() else {
            continue;
        };
        let label = child_text(*label_cell, &CELL_LABEL).unwrap_or_else(|| element_text(*label_cell));
        let value = child_text(*value_cell, &CELL_VALUE).or_else(|| none_if_blank(&element_text(*value_cell)));

        let slot = if label.contains("Lista:") {
            &mut sessao.lista
        } else if label.contains("Relator(a):") {
            &mut sessao.relator
        } else if label.contains("Órgão Julgador:") {
            &mut sessao.orgao_julgador
        } else if label.contains("Data início:") {
            &mut sessao.data_inicio
        } else if label.contains("Data prevista fim:") {
            &mut sessao.data_fim_prevista
        } else {
            continue;
        };
        *slot = value;
    }

    sessao.voto_texto = child_text(lista, &TITULO_LISTA);

    let relator = lista
        .select(&MANIFESTACAO)
        .find(|el| !inside_acompanha(*el))
        .and_then(|el| none_if_blank(&element_text(el)));
    if relator.is_some() {
        sessao.relator = relator;
    }

    sessao.acompanham_relator = lista
        .select(&ACOMPANHA)
        .filter_map(|el| none_if_blank(&element_text(el)))
        .collect();

    let mut links = lista
        .select(&TEXTO_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url));
    sessao.url_relatorio = links.next();
    sessao.url_voto = links.next();

    sessao
}

fn inside_acompanha(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(|node| node.value().as_element())
        .any(|el| el.id() == Some("acompanha"))
}
