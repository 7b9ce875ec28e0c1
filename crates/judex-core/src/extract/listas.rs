//! Petitions, appeals and agenda entries. All three are `.lista-dados`
//! items rendered newest first.

use scraper::Selector;

use super::patterns::{PAUTAS, PETICOES, RECEBIDO_EM, RECURSOS, SPAN_BOLD, SPAN_INFO, SPAN_PLAIN};
use super::{descending_index, none_if_blank, CasePage, Result};
use crate::models::{Pauta, Peticao, Recurso};

/// Inner markup of each item with its descending index.
fn items(page: &CasePage, selector: &Selector) -> Vec<(u32, String)> {
    let items = page.select_all(selector);
    let total = items.len();
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| (descending_index(total, i), item.inner_html()))
        .collect()
}

fn capture(pattern: &regex::Regex, markup: &str) -> Option<String> {
    pattern.captures(markup).and_then(|caps| none_if_blank(&caps[1]))
}

pub fn extract_peticoes(page: &CasePage) -> Result<Vec<Peticao>> {
    Ok(items(page, &PETICOES)
        .into_iter()
        .map(|(index, markup)| {
            let data = capture(&SPAN_INFO, &markup)
                .or_else(|| capture(&SPAN_PLAIN, &markup))
                .and_then(|d| none_if_blank(d.trim_start_matches("Peticionado em")));

            let (recebido_data, recebido_por) = match capture(&RECEBIDO_EM, &markup) {
                Some(recebido) => match recebido.split_once(" por ") {
                    Some((data, por)) => (none_if_blank(data), none_if_blank(por)),
                    None => (Some(recebido), None),
                },
                None => (None, None),
            };

            Peticao {
                index,
                id: capture(&SPAN_BOLD, &markup),
                data,
                recebido_data,
                recebido_por,
            }
        })
        .collect())
}

pub fn extract_recursos(page: &CasePage) -> Result<Vec<Recurso>> {
    Ok(items(page, &RECURSOS)
        .into_iter()
        .map(|(index, markup)| Recurso {
            index,
            data: capture(&SPAN_BOLD, &markup),
        })
        .collect())
}

pub fn extract_pautas(page: &CasePage) -> Result<Vec<Pauta>> {
    Ok(items(page, &PAUTAS)
        .into_iter()
        .map(|(index, markup)| Pauta {
            index,
            data: capture(&SPAN_BOLD, &markup),
            descricao: capture(&SPAN_PLAIN, &markup),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixture::{case_page, fragment};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_peticao_fields() {
        let page = fragment(
            r#"<div id="peticoes">
                 <div class="lista-dados">
                   <span class="processo-detalhes-bold">12345/2020</span>
                   <span class="processo-detalhes">Peticionado em 05/04/2020</span>
                   <span class="processo-detalhes bg-font-success">Recebido em 06/04/2020 10:21:33 por SECRETARIA JUDICIÁRIA</span>
                 </div>
               </div>"#,
        );
        assert_eq!(
            extract_peticoes(&page).unwrap(),
            vec![Peticao {
                index: 1,
                id: Some("12345/2020".to_string()),
                data: Some("05/04/2020".to_string()),
                recebido_data: Some("06/04/2020 10:21:33".to_string()),
                recebido_por: Some("SECRETARIA JUDICIÁRIA".to_string()),
            }]
        );
    }

    #[test]
    fn test_recebido_without_por() {
        let page = fragment(
            r#"<div id="peticoes"><div class="lista-dados">
                 <span class="processo-detalhes-bold">1/2021</span>
                 <span class="processo-detalhes bg-font-success">Recebido em 02/01/2021</span>
               </div></div>"#,
        );
        let peticoes = extract_peticoes(&page).unwrap();
        assert_eq!(peticoes[0].recebido_data.as_deref(), Some("02/01/2021"));
        assert_eq!(peticoes[0].recebido_por, None);
        assert_eq!(peticoes[0].data, None);
    }

    #[test]
    fn test_fixture_lists() {
        let page = case_page();

        let peticoes = extract_peticoes(&page).unwrap();
        let indices: Vec<u32> = peticoes.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![2, 1]);
        assert_eq!(peticoes[1].id.as_deref(), Some("23456/2020"));

        let recursos = extract_recursos(&page).unwrap();
        assert_eq!(
            recursos,
            vec![Recurso {
                index: 1,
                data: Some("AG.REG. NO RECURSO EXTRAORDINÁRIO".to_string()),
            }]
        );

        let pautas = extract_pautas(&page).unwrap();
        assert_eq!(
            pautas,
            vec![Pauta {
                index: 1,
                data: Some("04/12/2020".to_string()),
                descricao: Some("Sessão Virtual de 04/12/2020 a 14/12/2020".to_string()),
            }]
        );
    }

    #[test]
    fn test_absent_sections() {
        let page = fragment("<p></p>");
        assert!(extract_peticoes(&page).unwrap().is_empty());
        assert!(extract_recursos(&page).unwrap().is_empty());
        assert!(extract_pautas(&page).unwrap().is_empty());
    }
}
