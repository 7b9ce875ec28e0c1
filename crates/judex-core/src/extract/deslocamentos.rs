//! Transfers of the case file, parsed from each item's inner markup.

use super::patterns::{DESLOCAMENTOS, SPAN_BOLD, SPAN_GUIA, SPAN_INFO, SPAN_PLAIN, SPAN_SUCCESS, TRAILING_DATE};
use super::{descending_index, none_if_blank, normalize_spaces, CasePage, Result};
use crate::models::Deslocamento;

pub fn extract_deslocamentos(page: &CasePage) -> Result<Vec<Deslocamento>> {
    let items = page.select_all(&DESLOCAMENTOS);
    let total = items.len();

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| parse_item(&item.inner_html(), descending_index(total, i)))
        .collect())
}

fn parse_item(markup: &str, index_num: u32) -> Deslocamento {
    let guia_match = SPAN_GUIA.captures(markup).and_then(|caps| caps.get(1));
    let guia = guia_match.and_then(|m| clean_guia(m.as_str()));

    // The first plain span that is not the routing slip.
    let recebido = SPAN_PLAIN
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .find(|m| guia_match.is_none_or(|g| g.start() != m.start()))
        .map(|m| m.as_str());
    let enviado = SPAN_BOLD.captures(markup).map(|caps| caps[1].to_string());

    let (recebido_por, recebido_fallback) = split_person(recebido, "Recebido por ");
    let (enviado_por, enviado_fallback) = split_person(enviado.as_deref(), "Enviado por ");

    let data_recebido = SPAN_SUCCESS
        .captures(markup)
        .and_then(|caps| clean_date(&caps[1], "Recebido em "))
        .or(recebido_fallback);
    let data_enviado = SPAN_INFO
        .captures(markup)
        .and_then(|caps| clean_date(&caps[1], "Enviado em "))
        .or(enviado_fallback);

    Deslocamento {
        index_num,
        guia,
        recebido_por,
        data_recebido,
        enviado_por,
        data_enviado,
    }
}

fn clean_guia(raw: &str) -> Option<String> {
    let guia = normalize_spaces(raw)
        .replace("Guia: ", "")
        .replace("Guia ", "")
        .replace("Nº ", "");
    none_if_blank(&guia)
}

fn clean_date(raw: &str, prefix: &str) -> Option<String> {
    let date = normalize_spaces(raw).replace(prefix, "").replace(" em ", "");
    none_if_blank(&date)
}

/// Split "Recebido por X em DD/MM/YYYY" into the person and the trailing date.
fn split_person(raw: Option<&str>, prefix: &str) -> (Option<String>, Option<String>) {
    let Some(raw) = raw else {
        return (None, None);
    };
    let text = normalize_spaces(raw);
    let text = text.strip_prefix(prefix).unwrap_or(&text);

    match TRAILING_DATE.captures(text) {
        Some(caps) => {
            let person = &text[..caps.get(0).map_or(text.len(), |m| m.start())];
            (none_if_blank(person), Some(caps[1].to_string()))
        }
        None => (none_if_blank(text), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixture::{case_page, fragment};
    use pretty_assertions::assert_eq;

    const ITEM: &str = r#"
        <div class="col-md-9">
            <span class="processo-detalhes-bold">Enviado por TRIBUNAL DE JUSTIÇA DO ESTADO DE SÃO PAULO em 10/03/2020</span>
            <span class="processo-detalhes">Recebido por SECRETARIA JUDICIÁRIA em 15/03/2020</span>
        </div>
        <div class="col-md-3 text-right">
            <span class="processo-detalhes">Guia: 4567/2020</span>
            <span class="processo-detalhes bg-font-info">Enviado em 10/03/2020</span>
            <span class="processo-detalhes bg-font-success">Recebido em 15/03/2020</span>
        </div>"#;

    #[test]
    fn test_full_item() {
        assert_eq!(
            parse_item(ITEM, 1),
            Deslocamento {
                index_num: 1,
                guia: Some("4567/2020".to_string()),
                recebido_por: Some("SECRETARIA JUDICIÁRIA".to_string()),
                data_recebido: Some("15/03/2020".to_string()),
                enviado_por: Some("TRIBUNAL DE JUSTIÇA DO ESTADO DE SÃO PAULO".to_string()),
                data_enviado: Some("10/03/2020".to_string()),
            }
        );
    }

    #[test]
    fn test_dates_fall_back_to_person_suffix() {
        let markup = r#"
            <span class="processo-detalhes-bold">Enviado por GABINETE em 01/02/2021</span>
            <span class="processo-detalhes">Recebido por COORDENADORIA em 03/02/2021</span>"#;
        let item = parse_item(markup, 2);
        assert_eq!(item.guia, None);
        assert_eq!(item.enviado_por.as_deref(), Some("GABINETE"));
        assert_eq!(item.data_enviado.as_deref(), Some("01/02/2021"));
        assert_eq!(item.recebido_por.as_deref(), Some("COORDENADORIA"));
        assert_eq!(item.data_recebido.as_deref(), Some("03/02/2021"));
    }

    #[test]
    fn test_guia_only_is_not_recebido() {
        let markup = r#"<div class="text-right"><span class="processo-detalhes">Guia Nº 77/2019</span></div>"#;
        let item = parse_item(markup, 1);
        assert_eq!(item.guia.as_deref(), Some("77/2019"));
        assert_eq!(item.recebido_por, None);
        assert_eq!(item.data_recebido, None);
    }

    #[test]
    fn test_index_contiguity() {
        let page = fragment(&format!(
            r#"<div id="deslocamentos">
                 <div class="lista-dados">{ITEM}</div>
                 <div class="lista-dados">{ITEM}</div>
               </div>"#
        ));
        let indices: Vec<u32> = extract_deslocamentos(&page).unwrap().iter().map(|d| d.index_num).collect();
        assert_eq!(indices, vec![2, 1]);
    }

    #[test]
    fn test_fixture_deslocamentos() {
        let items = extract_deslocamentos(&case_page()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].index_num, 2);
        assert_eq!(items[0].guia.as_deref(), Some("8899/2020"));
        assert_eq!(items[0].recebido_por.as_deref(), Some("GABINETE MIN. ROBERTO BARROSO"));
        assert_eq!(items[1].enviado_por.as_deref(), Some("TRIBUNAL DE JUSTIÇA DO ESTADO DE SÃO PAULO"));
        assert_eq!(items[1].data_recebido.as_deref(), Some("15/03/2020"));
    }

    #[test]
    fn test_absent_section() {
        assert!(extract_deslocamentos(&fragment("<p></p>")).unwrap().is_empty());
    }
}
