//! The "Informações" tab: subjects, filing data, origin numbers and counters.

use super::patterns::{
    ASSUNTOS, DATA_PROTOCOLO, NUMERO_ORIGEM, NUMERO_QUADRO, ORGAO_ORIGEM, PROCEDENCIA, QUADRO, ROTULO_QUADRO,
};
use super::{element_text, none_if_blank, normalize_spaces, CasePage, Result};

pub fn extract_assuntos(page: &CasePage) -> Result<Vec<String>> {
    Ok(page
        .select_all(&ASSUNTOS)
        .into_iter()
        .filter_map(|li| none_if_blank(&element_text(li)))
        .collect())
}

pub fn extract_data_protocolo(page: &CasePage) -> Result<Option<String>> {
    Ok(page.first(&DATA_PROTOCOLO).and_then(|el| none_if_blank(&element_text(el))))
}

pub fn extract_orgao_origem(page: &CasePage) -> Result<Option<String>> {
    Ok(page.first(&ORGAO_ORIGEM).and_then(|el| none_if_blank(&element_text(el))))
}

/// Origin case numbers listed after "Número de Origem:" in the Procedência
/// block, comma separated.
pub fn extract_numero_origem(page: &CasePage) -> Result<Vec<String>> {
    let Some(block) = page.first(&PROCEDENCIA) else {
        return Ok(Vec::new());
    };
    let text = normalize_spaces(&block.text().collect::<Vec<_>>().join(" "));

    Ok(NUMERO_ORIGEM
        .captures(&text)
        .map(|caps| {
            caps[1]
                .split(',')
                .filter_map(none_if_blank)
                .collect()
        })
        .unwrap_or_default())
}

pub fn extract_volumes(page: &CasePage) -> Result<Option<u32>> {
    counter(page, "VOLUME")
}

pub fn extract_folhas(page: &CasePage) -> Result<Option<u32>> {
    counter(page, "FOLHA")
}

pub fn extract_apensos(page: &CasePage) -> Result<Option<u32>> {
    counter(page, "APENSO")
}

/// Value of the counter box whose label contains `label`; non-numeric values are absent.
fn counter(page: &CasePage, label: &str) -> Result<Option<u32>> {
    for quadro in page.select_all(&QUADRO) {
        let (Some(rotulo), Some(numero)) = (
            quadro.select(&ROTULO_QUADRO).next(),
            quadro.select(&NUMERO_QUADRO).next(),
        ) else {
            continue;
        };

        if element_text(rotulo).to_uppercase().contains(label) {
            let value = element_text(numero);
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
                return Ok(None);
            }
            return Ok(value.parse().ok());
        }
    }
    Ok(None)
}
