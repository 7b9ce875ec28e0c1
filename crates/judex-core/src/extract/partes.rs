//! Parties, listed as alternating role / name nodes.

use super::patterns::PARTES;
use super::{element_text, CasePage, Result};
use crate::models::Party;

/// Role prefixes of the plaintiff side.
const AUTHOR_ROLES: [&str; 5] = ["RECTE", "REQTE", "AUTOR", "IMPTE", "PACTE"];

/// Parties in page order. A trailing role without a name is dropped and
/// pairs with a blank role or name are skipped; `index` counts only kept
/// parties.
pub fn extract_partes(page: &CasePage) -> Result<Vec<Party>> {
    let nodes: Vec<String> = page.select_all(&PARTES).into_iter().map(element_text).collect();

    let mut partes: Vec<Party> = Vec::new();
    for pair in nodes.chunks_exact(2) {
        let (tipo, nome) = (&pair[0], &pair[1]);
        if tipo.is_empty() || nome.is_empty() {
            continue;
        }
        partes.push(Party {
            index: partes.len() as u32 + 1,
            tipo: tipo.clone(),
            nome: nome.clone(),
        });
    }
    Ok(partes)
}

/// Name of the first plaintiff-side party, falling back to the first party.
pub fn extract_primeiro_autor(page: &CasePage) -> Result<Option<String>> {
    let partes = extract_partes(page)?;
    let autor = partes
        .iter()
        .find(|p| {
            let tipo = p.tipo.to_uppercase();
            !p.nome.is_empty() && AUTHOR_ROLES.iter().any(|role| tipo.starts_with(role))
        })
        .or_else(|| partes.iter().find(|p| !p.nome.is_empty()));

    Ok(autor.map(|p| p.nome.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixture::{case_page, fragment};
    use pretty_assertions::assert_eq;

    fn party(index: u32, tipo: &str, nome: &str) -> Party {
        Party {
            index,
            tipo: tipo.to_string(),
            nome: nome.to_string(),
        }
    }

    #[test]
    fn test_pairs_in_order() {
        let page = fragment(
            r#"<div id="resumo-partes">
                 <div class="processo-partes lista-dados">RECTE.(S)</div>
                 <div class="processo-partes lista-dados">João</div>
                 <div class="processo-partes lista-dados">RECDO.(A/S)</div>
                 <div class="processo-partes lista-dados">Maria</div>
               </div>"#,
        );
        assert_eq!(
            extract_partes(&page).unwrap(),
            vec![party(1, "RECTE.(S)", "João"), party(2, "RECDO.(A/S)", "Maria")]
        );
        assert_eq!(extract_primeiro_autor(&page).unwrap().as_deref(), Some("João"));
    }

    #[test]
    fn test_odd_trailing_node_dropped() {
        let page = fragment(
            r#"<div id="resumo-partes">
                 <div class="processo-partes">REQTE.(S)</div>
                 <div class="processo-partes">ESTADO DE MINAS GERAIS</div>
                 <div class="processo-partes">  </div>
                 <div class="processo-partes"> </div>
                 <div class="processo-partes">ADV.(A/S)</div>
               </div>"#,
        );
        assert_eq!(
            extract_partes(&page).unwrap(),
            vec![party(1, "REQTE.(S)", "ESTADO DE MINAS GERAIS")]
        );
    }

    #[test]
    fn test_primeiro_autor_prefers_plaintiff_role() {
        let page = fragment(
            r#"<div id="resumo-partes">
                 <div class="processo-partes">AGDO.(A/S)</div>
                 <div class="processo-partes">UNIÃO</div>
                 <div class="processo-partes">IMPTE.(S)</div>
                 <div class="processo-partes">EMPRESA X LTDA</div>
               </div>"#,
        );
        assert_eq!(extract_primeiro_autor(&page).unwrap().as_deref(), Some("EMPRESA X LTDA"));

        let page = fragment(
            r#"<div id="resumo-partes">
                 <div class="processo-partes">INTDO.(A/S)</div>
                 <div class="processo-partes">SENADO FEDERAL</div>
               </div>"#,
        );
        assert_eq!(extract_primeiro_autor(&page).unwrap().as_deref(), Some("SENADO FEDERAL"));
    }

    #[test]
    fn test_half_blank_pairs_skipped() {
        let page = fragment(
            r#"<div id="resumo-partes">
                 <div class="processo-partes">RECTE.(S)</div>
                 <div class="processo-partes">  </div>
                 <div class="processo-partes"> </div>
                 <div class="processo-partes">UNIÃO</div>
                 <div class="processo-partes">RECTE.(S)</div>
                 <div class="processo-partes">ANA</div>
               </div>"#,
        );
        assert_eq!(extract_partes(&page).unwrap(), vec![party(1, "RECTE.(S)", "ANA")]);
        assert_eq!(extract_primeiro_autor(&page).unwrap().as_deref(), Some("ANA"));
    }

    #[test]
    fn test_fixture_partes() {
        let page = case_page();
        let partes = extract_partes(&page).unwrap();
        assert_eq!(partes.len(), 4);
        assert_eq!(partes[0], party(1, "RECTE.(S)", "ESTADO DE SÃO PAULO"));
        assert_eq!(partes[3], party(4, "ADV.(A/S)", "FULANO DE TAL (12345/SP)"));
        assert_eq!(extract_primeiro_autor(&page).unwrap().as_deref(), Some("ESTADO DE SÃO PAULO"));
    }

    #[test]
    fn test_no_parties() {
        let page = fragment("<div id=\"resumo-partes\"></div>");
        assert!(extract_partes(&page).unwrap().is_empty());
        assert_eq!(extract_primeiro_autor(&page).unwrap(), None);
    }
}
