//! Case header: tracking token, CNJ number, reporting judge, origin.

use super::patterns::{DADOS, INCIDENTE, ORIGEM, ROTULO};
use super::{element_text, none_if_blank, CasePage, Result};
use crate::error::ExtractionError;

const NUMERO_UNICO_LABEL: &str = "Número Único:";
const SEM_NUMERO_UNICO: &str = "Sem número único";
const RELATOR_LABEL: &str = "Relator(a):";

/// Hidden `incidente` input; anything but a plain number is absent.
pub fn extract_incidente(page: &CasePage) -> Result<Option<u64>> {
    let input = page.require(&INCIDENTE, "input#incidente")?;
    let value = input.value().attr("value").unwrap_or_default().trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    value.parse().map(Some).map_err(|_| ExtractionError::Parse {
        field: "incidente".to_string(),
        value: value.to_string(),
    })
}

pub fn extract_numero_unico(page: &CasePage) -> Result<Option<String>> {
    let numero = page
        .select_all(&ROTULO)
        .into_iter()
        .map(element_text)
        .find_map(|text| text.split_once(NUMERO_UNICO_LABEL).map(|(_, rest)| rest.to_string()));

    Ok(numero
        .filter(|n| !n.trim().eq_ignore_ascii_case(SEM_NUMERO_UNICO))
        .and_then(|n| none_if_blank(&n)))
}

/// Reporting judge, without the "MIN." prefix.
pub fn extract_relator(page: &CasePage) -> Result<Option<String>> {
    let relator = page
        .select_all(&DADOS)
        .into_iter()
        .map(element_text)
        .find_map(|text| text.strip_prefix(RELATOR_LABEL).map(str::to_string));

    Ok(relator.and_then(|r| {
        let r = r.trim();
        none_if_blank(r.strip_prefix("MIN. ").unwrap_or(r))
    }))
}

pub fn extract_origem(page: &CasePage) -> Result<Option<String>> {
    let origem = page.require(&ORIGEM, "#descricao-procedencia")?;
    Ok(none_if_blank(&element_text(origem)))
}
