//! Selectors and regex patterns for the case page.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

lazy_static! {
    // Header
    pub static ref INCIDENTE: Selector = sel("input#incidente");
    pub static ref ROTULO: Selector = sel(".processo-rotulo");
    pub static ref DADOS: Selector = sel(".processo-dados");
    pub static ref ORIGEM: Selector = sel("#descricao-procedencia");
    pub static ref BADGE: Selector = sel(".badge");

    // Informações block
    pub static ref ASSUNTOS: Selector =
        sel("#informacoes-completas > div:nth-of-type(1) > div:nth-of-type(2) li");
    pub static ref DATA_PROTOCOLO: Selector = sel(
        "#informacoes-completas > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2)"
    );
    pub static ref ORGAO_ORIGEM: Selector = sel(
        "#informacoes-completas > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(4)"
    );
    pub static ref PROCEDENCIA: Selector = sel(
        "#informacoes-completas > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2)"
    );
    pub static ref QUADRO: Selector = sel("#informacoes .processo-quadro");
    pub static ref ROTULO_QUADRO: Selector = sel(".rotulo");
    pub static ref NUMERO_QUADRO: Selector = sel(".numero");

    // Parties
    pub static ref PARTES: Selector = sel("#resumo-partes div[class*='processo-partes']");

    // Andamentos
    pub static ref ANDAMENTO_ITEM: Selector = sel(".processo-andamentos .andamento-item");
    pub static ref ANDAMENTO_DATA: Selector = sel(".andamento-data");
    pub static ref ANDAMENTO_NOME: Selector = sel(".andamento-nome");
    pub static ref ANDAMENTO_COMPLEMENTO: Selector = sel(".col-md-9");
    pub static ref ANDAMENTO_JULGADOR: Selector = sel(".andamento-julgador");
    pub static ref LINK: Selector = sel("a");

    // Lists rendered as .lista-dados items
    pub static ref DESLOCAMENTOS: Selector = sel("#deslocamentos .lista-dados");
    pub static ref PETICOES: Selector = sel("#peticoes .lista-dados");
    pub static ref RECURSOS: Selector = sel("#recursos .lista-dados");
    pub static ref PAUTAS: Selector = sel("#pautas .lista-dados");

    // Virtual sessions
    pub static ref JULGAMENTO_ITEM: Selector = sel("#sessao-virtual .julgamento-item");
    pub static ref LISTA_JULGAMENTO: Selector = sel("[id^='listasJulgamento']");
    pub static ref TABLE_ROW: Selector = sel("table tr");
    pub static ref TABLE_CELL: Selector = sel("td");
    pub static ref CELL_LABEL: Selector = sel(".processo-detalhes-bold");
    pub static ref CELL_VALUE: Selector = sel(".desc-lista");
    pub static ref TITULO_LISTA: Selector = sel(".titulo-lista");
    pub static ref MANIFESTACAO: Selector = sel(".manifestacao-julgador");
    pub static ref TEXTO_LINK: Selector = sel("a[href*='texto=']");
    pub static ref ACOMPANHA: Selector = sel("#acompanha .manifestacao-julgador");

    // Text patterns
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    pub static ref GUIA_SUFFIX: Regex = Regex::new(r"(?i),\s*GUIA\s*N[ºOo0]?[^,]*$").unwrap();
    pub static ref NUMERO_ORIGEM: Regex = Regex::new(r"Número de Origem:\s*([0-9./\-, ]+)").unwrap();
    pub static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();

    // Inner markup of .lista-dados items
    pub static ref SPAN_BOLD: Regex = Regex::new(r#"processo-detalhes-bold">([^<]+)"#).unwrap();
    pub static ref SPAN_PLAIN: Regex = Regex::new(r#""processo-detalhes">([^<]+)"#).unwrap();
    pub static ref SPAN_INFO: Regex = Regex::new(r#"processo-detalhes bg-font-info">([^<]+)"#).unwrap();
    pub static ref SPAN_SUCCESS: Regex = Regex::new(r#"processo-detalhes bg-font-success">([^<]+)"#).unwrap();
    pub static ref SPAN_GUIA: Regex =
        Regex::new(r#"text-right">\s*<span class="processo-detalhes">([^<]+)"#).unwrap();
    pub static ref RECEBIDO_EM: Regex = Regex::new(r"Recebido em ([^<]+)").unwrap();
    pub static ref TRAILING_DATE: Regex = Regex::new(r" em (\d{2}/\d{2}/\d{4})$").unwrap();
}
