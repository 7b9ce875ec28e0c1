//! Case record models for the STF case portal.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::classe::CaseClass;

/// HTTP-like status stored on every assembled record.
pub const STATUS_OK: u16 = 200;

/// A complete case record, one per case ID.
///
/// Built once per successful page load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Internal tracking token of the case.
    pub incidente: Option<u64>,

    /// Case class code.
    pub classe: CaseClass,

    /// Case number inside the class; identity key of the record.
    pub processo_id: u64,

    /// Canonical CNJ case number.
    pub numero_unico: Option<String>,

    /// Physical or electronic case file.
    pub meio: Option<Meio>,

    /// Public or sealed case.
    pub publicidade: Option<Publicidade>,

    /// Priority flags shown as badges.
    pub badges: Vec<String>,

    /// Subjects, in page order.
    pub assuntos: Vec<String>,

    /// Filing date as displayed.
    pub data_protocolo: Option<String>,

    /// Court of origin.
    pub orgao_origem: Option<String>,

    /// Origin description (state / court branch).
    pub origem: Option<String>,

    /// Case numbers at the court of origin.
    pub numero_origem: Vec<String>,

    pub volumes: Option<u32>,
    pub folhas: Option<u32>,
    pub apensos: Option<u32>,

    /// Reporting judge, without the "MIN." prefix.
    pub relator: Option<String>,

    /// First plaintiff / appellant.
    pub primeiro_autor: Option<String>,

    pub partes: Vec<Party>,
    pub andamentos: Vec<Andamento>,
    pub sessao_virtual: Vec<SessaoVirtual>,
    pub deslocamentos: Vec<Deslocamento>,
    pub peticoes: Vec<Peticao>,
    pub recursos: Vec<Recurso>,
    pub pautas: Vec<Pauta>,

    /// Outcome code of the fetch.
    pub status: u16,

    /// Local time of extraction.
    pub extraido: NaiveDateTime,

    /// Whitespace-normalized page source.
    pub html: String,
}

/// Medium of the case file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meio {
    #[serde(rename = "FISICO")]
    Physical,
    #[serde(rename = "ELETRONICO")]
    Electronic,
}

impl Meio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Meio::Physical => "FISICO",
            Meio::Electronic => "ELETRONICO",
        }
    }
}

/// Publicity of the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Publicidade {
    #[serde(rename = "PUBLICO")]
    Public,
    #[serde(rename = "SIGILOSO")]
    Sealed,
}

impl Publicidade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Publicidade::Public => "PUBLICO",
            Publicidade::Sealed => "SIGILOSO",
        }
    }
}

/// A party to the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// 1-based position on the page; position 1 is the first-listed party.
    pub index: u32,

    /// Role code (e.g. "RECTE.(S)").
    pub tipo: String,

    /// Party name.
    pub nome: String,
}

/// A procedural step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Andamento {
    /// The earliest step is 1.
    pub index_num: u32,

    /// Date as displayed.
    pub data: String,

    /// Upper-cased step name.
    pub nome: String,

    pub complemento: Option<String>,

    /// Judge of a decisory step.
    pub julgador: Option<String>,

    /// Absolute URL of the attached document.
    pub link: Option<String>,

    pub link_descricao: Option<String>,
}

impl Andamento {
    /// A step carrying a judge is a decision.
    pub fn is_decisory(&self) -> bool {
        self.julgador.is_some()
    }
}

/// A transfer of the case file between offices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deslocamento {
    /// The earliest transfer is 1.
    pub index_num: u32,

    /// Routing slip number.
    pub guia: Option<String>,

    pub recebido_por: Option<String>,
    pub data_recebido: Option<String>,
    pub enviado_por: Option<String>,
    pub data_enviado: Option<String>,
}

/// A petition filed in the case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peticao {
    pub index: u32,

    /// Petition number (e.g. "12345/2020").
    pub id: Option<String>,

    /// Filing date.
    pub data: Option<String>,

    pub recebido_data: Option<String>,
    pub recebido_por: Option<String>,
}

/// An appeal lodged in the case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurso {
    pub index: u32,
    pub data: Option<String>,
}

/// A judgment-agenda entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pauta {
    pub index: u32,
    pub data: Option<String>,
    pub descricao: Option<String>,
}

/// A virtual judgment session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessaoVirtual {
    pub lista: Option<String>,
    pub relator: Option<String>,
    pub orgao_julgador: Option<String>,
    pub voto_texto: Option<String>,
    pub data_inicio: Option<String>,
    pub data_fim_prevista: Option<String>,

    /// Judges who followed the reporting judge.
    pub acompanham_relator: Vec<String>,

    pub url_relatorio: Option<String>,
    pub conteudo_relatorio: Option<String>,
    pub url_voto: Option<String>,
    pub conteudo_voto: Option<String>,
}
