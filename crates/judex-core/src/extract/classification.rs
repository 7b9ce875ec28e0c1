//! Badge-derived classification: medium, publicity, priority flags.

use super::patterns::BADGE;
use super::{element_text, CasePage, Result};
use crate::models::{Meio, Publicidade};

/// Priority flags kept from the badge row.
const BADGE_VOCABULARY: [&str; 4] = ["MAIOR DE 60 ANOS", "DOENÇA GRAVE", "DOENCA GRAVE", "RÉU PRESO"];

fn badge_texts(page: &CasePage) -> Vec<String> {
    page.select_all(&BADGE)
        .into_iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

pub fn extract_meio(page: &CasePage) -> Result<Option<Meio>> {
    for badge in badge_texts(page) {
        let upper = badge.to_uppercase();
        if upper.contains("FÍSICO") || upper.contains("FISICO") {
            return Ok(Some(Meio::Physical));
        }
        if upper.contains("ELETRÔNICO") || upper.contains("ELETRONICO") {
            return Ok(Some(Meio::Electronic));
        }
    }
    Ok(None)
}

/// A sealed badge wins over a public one.
pub fn extract_publicidade(page: &CasePage) -> Result<Option<Publicidade>> {
    let badges: Vec<String> = badge_texts(page).iter().map(|b| b.to_uppercase()).collect();
    if badges.iter().any(|b| b.contains("SIGILOSO")) {
        return Ok(Some(Publicidade::Sealed));
    }
    if badges.iter().any(|b| b.contains("PÚBLICO") || b.contains("PUBLICO")) {
        return Ok(Some(Publicidade::Public));
    }
    Ok(None)
}

/// Priority badges in page order, without duplicates.
pub fn extract_badges(page: &CasePage) -> Result<Vec<String>> {
    let mut labels: Vec<String> = Vec::new();
    for badge in badge_texts(page) {
        let upper = badge.to_uppercase();
        if BADGE_VOCABULARY.iter().any(|known| upper.contains(known)) && !labels.contains(&badge) {
            labels.push(badge);
        }
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixture::{case_page, fragment};

    #[test]
    fn test_fixture_classification() {
        let page = case_page();
        assert_eq!(extract_meio(&page).unwrap(), Some(Meio::Electronic));
        assert_eq!(extract_publicidade(&page).unwrap(), Some(Publicidade::Public));
        assert_eq!(extract_badges(&page).unwrap(), vec!["Maior de 60 anos ou portador de doença grave"]);
    }

    #[test]
    fn test_sealed_overrides_public() {
        let page = fragment(
            r#"<span class="badge">Processo Físico</span>
               <span class="badge">Público</span>
               <span class="badge">Sigiloso</span>"#,
        );
        assert_eq!(extract_meio(&page).unwrap(), Some(Meio::Physical));
        assert_eq!(extract_publicidade(&page).unwrap(), Some(Publicidade::Sealed));
    }

    #[test]
    fn test_badges_dedup_and_filter() {
        let page = fragment(
            r#"<span class="badge">Réu Preso</span>
               <span class="badge">Eletrônico</span>
               <span class="badge">Réu Preso</span>
               <span class="badge">Doenca grave</span>"#,
        );
        assert_eq!(extract_badges(&page).unwrap(), vec!["Réu Preso", "Doenca grave"]);
    }

    #[test]
    fn test_no_badges() {
        let page = fragment("<p>nada</p>");
        assert_eq!(extract_meio(&page).unwrap(), None);
        assert_eq!(extract_publicidade(&page).unwrap(), None);
        assert!(extract_badges(&page).unwrap().is_empty());
    }
}
