//! Builds a [`CaseRecord`] from a loaded page.

use std::time::Instant;

use chrono::Local;
use tracing::{debug, warn};

use crate::documents::{DocumentFetcher, HttpDocumentFetcher};
use crate::error::DocumentError;
use crate::extract::{self, run_extractor, CasePage};
use crate::loader::RawDocument;
use crate::models::config::JudexConfig;
use crate::models::{CaseClass, CaseRecord, SessaoVirtual, STATUS_OK};

/// Runs every field extractor over a page and, optionally, downloads the
/// virtual-session documents.
pub struct RecordAssembler {
    base_url: String,
    documents: Option<Box<dyn DocumentFetcher>>,
}

impl RecordAssembler {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            documents: None,
        }
    }

    /// Assembler for `config`, with an HTTP document fetcher when
    /// `extraction.fetch_documents` is set.
    pub fn from_config(config: &JudexConfig) -> Result<Self, DocumentError> {
        let assembler = Self::new(&config.portal.base_url);
        if !config.extraction.fetch_documents {
            return Ok(assembler);
        }
        let fetcher = HttpDocumentFetcher::new(
            &config.portal.user_agent,
            config.retry.documents,
            config.browser.render_timeout(),
        )?;
        Ok(assembler.with_documents(Box::new(fetcher)))
    }

    pub fn with_documents(mut self, fetcher: Box<dyn DocumentFetcher>) -> Self {
        self.documents = Some(fetcher);
        self
    }

    /// Build the record, filling document contents when a fetcher is configured.
    pub async fn assemble(&self, raw: &RawDocument, classe: &CaseClass, id: u64) -> CaseRecord {
        let mut record = self.extract(raw, classe, id);
        if let Some(fetcher) = &self.documents {
            for sessao in &mut record.sessao_virtual {
                fill_documents(fetcher.as_ref(), sessao).await;
            }
        }
        record
    }

    /// Field extraction only. Every extractor goes through [`run_extractor`].
    pub fn extract(&self, raw: &RawDocument, classe: &CaseClass, id: u64) -> CaseRecord {
        let started = Instant::now();
        let page = CasePage::parse(&raw.page_source, &self.base_url);

        let record = CaseRecord {
            incidente: run_extractor(&page, "incidente", extract::extract_incidente),
            classe: classe.clone(),
            processo_id: id,
            numero_unico: run_extractor(&page, "numero_unico", extract::extract_numero_unico),
            meio: run_extractor(&page, "meio", extract::extract_meio),
            publicidade: run_extractor(&page, "publicidade", extract::extract_publicidade),
            badges: run_extractor(&page, "badges", extract::extract_badges),
            assuntos: run_extractor(&page, "assuntos", extract::extract_assuntos),
            data_protocolo: run_extractor(&page, "data_protocolo", extract::extract_data_protocolo),
            orgao_origem: run_extractor(&page, "orgao_origem", extract::extract_orgao_origem),
            origem: run_extractor(&page, "origem", extract::extract_origem),
            numero_origem: run_extractor(&page, "numero_origem", extract::extract_numero_origem),
            volumes: run_extractor(&page, "volumes", extract::extract_volumes),
            folhas: run_extractor(&page, "folhas", extract::extract_folhas),
            apensos: run_extractor(&page, "apensos", extract::extract_apensos),
            relator: run_extractor(&page, "relator", extract::extract_relator),
            primeiro_autor: run_extractor(&page, "primeiro_autor", extract::extract_primeiro_autor),
            partes: run_extractor(&page, "partes", extract::extract_partes),
            andamentos: run_extractor(&page, "andamentos", extract::extract_andamentos),
            sessao_virtual: run_extractor(&page, "sessao_virtual", extract::extract_sessao_virtual),
            deslocamentos: run_extractor(&page, "deslocamentos", extract::extract_deslocamentos),
            peticoes: run_extractor(&page, "peticoes", extract::extract_peticoes),
            recursos: run_extractor(&page, "recursos", extract::extract_recursos),
            pautas: run_extractor(&page, "pautas", extract::extract_pautas),
            status: STATUS_OK,
            extraido: Local::now().naive_local(),
            html: extract::normalize_spaces(&raw.page_source),
        };

        debug!(
            classe = %classe,
            id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Assembled record"
        );
        record
    }
}

async fn fill_documents(fetcher: &dyn DocumentFetcher, sessao: &mut SessaoVirtual) {
    if let Some(url) = &sessao.url_relatorio {
        sessao.conteudo_relatorio = fetch_or_none(fetcher, url).await;
    }
    if let Some(url) = &sessao.url_voto {
        sessao.conteudo_voto = fetch_or_none(fetcher, url).await;
    }
}

async fn fetch_or_none(fetcher: &dyn DocumentFetcher, url: &str) -> Option<String> {
    match fetcher.fetch_text(url).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(url, error = %e, "Could not fetch document text");
            None
        }
    }
}
