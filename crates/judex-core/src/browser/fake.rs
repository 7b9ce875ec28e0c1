//! Scripted in-memory portal for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{PageSession, Result, SessionFactory};
use crate::error::SessionError;

/// Page served for a case that the portal does not know.
pub fn not_found_page() -> String {
    r#"<html><body><div id="conteudo"><div class="message-404">Processo não encontrado</div></div></body></html>"#
        .to_string()
}

pub fn captcha_page() -> String {
    "<html><body><h1>CAPTCHA</h1><p>Confirme que você não é um robô</p></body></html>".to_string()
}

pub fn loading_page() -> String {
    "<html><body><div class=\"carregando\">Carregando...</div></body></html>".to_string()
}

/// Minimal case page with the anchors the loader checks.
pub fn case_page(id: u64) -> String {
    format!(
        r#"<html><body><div id="conteudo">
<input type="hidden" id="incidente" value="{incidente}">
<div class="processo-titulo">RE {id}</div>
<div id="descricao-procedencia">SP - SÃO PAULO</div>
<div id="resumo-partes">
<div class="processo-partes lista-dados">RECTE.(S)</div>
<div class="processo-partes lista-dados">AUTOR {id}</div>
</div>
</div></body></html>"#,
        incidente = 5_000_000 + id
    )
}

#[derive(Default)]
struct PortalState {
    pages: HashMap<u64, VecDeque<String>>,
    navigations: Vec<String>,
    opened: usize,
    closed: usize,
}

/// Serves scripted page sources keyed by `numeroProcesso`. When a case has
/// several pages queued each render consumes one, and the last one repeats.
/// Unknown cases get [`not_found_page`].
#[derive(Clone, Default)]
pub struct FakePortal {
    state: Arc<Mutex<PortalState>>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, id: u64, pages: Vec<String>) {
        self.state.lock().unwrap().pages.insert(id, pages.into());
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }

    pub fn session(&self) -> FakeSession {
        FakeSession {
            portal: self.clone(),
            current: None,
        }
    }

    fn render(&self, id: u64) -> String {
        let mut state = self.state.lock().unwrap();
        match state.pages.get_mut(&id) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_found_page),
            None => not_found_page(),
        }
    }
}

#[async_trait]
impl SessionFactory for FakePortal {
    async fn open(&self) -> Result<Box<dyn PageSession>> {
        self.state.lock().unwrap().opened += 1;
        Ok(Box::new(self.session()))
    }
}

pub struct FakeSession {
    portal: FakePortal,
    current: Option<u64>,
}

#[async_trait]
impl PageSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url).map_err(|e| SessionError::Render(e.to_string()))?;
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "numeroProcesso")
            .and_then(|(_, value)| value.parse().ok());
        self.portal.state.lock().unwrap().navigations.push(url.to_string());
        self.current = id;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        let id = self.current.ok_or(SessionError::NoPage)?;
        Ok(self.portal.render(id))
    }

    async fn close(&mut self) -> Result<()> {
        self.portal.state.lock().unwrap().closed += 1;
        Ok(())
    }
}
