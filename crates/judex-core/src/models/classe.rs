//! Case class taxonomy of the STF portal.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::JudexError;

/// Known case class codes, in canonical spelling.
pub const CASE_CLASSES: [(&str, &str); 45] = [
    ("AC", "Ação Cível"),
    ("ACO", "Ação Cível Originária"),
    ("ADC", "Ação Declaratória de Constitucionalidade"),
    ("ADI", "Ação Direta de Inconstitucionalidade"),
    ("ADO", "Ação Direta de Inconstitucionalidade por Omissão"),
    ("ADPF", "Arguição de Descumprimento de Preceito Fundamental"),
    ("AI", "Agravo de Instrumento"),
    ("AImp", "Arguição de Impedimento"),
    ("AO", "Ação Originária"),
    ("AOE", "Ação Originária Especial"),
    ("AP", "Ação Penal"),
    ("AR", "Ação Rescisória"),
    ("ARE", "Recurso Extraordinário com Agravo"),
    ("AS", "Arguição de Suspeição"),
    ("CC", "Conflito de Competência"),
    ("Cm", "Comunicação"),
    ("EI", "Exceção de Incompetência"),
    ("EL", "Exceção de Litispendência"),
    ("EP", "Execução Penal"),
    ("Ext", "Extradição"),
    ("HC", "Habeas Corpus"),
    ("HD", "Habeas Data"),
    ("IF", "Intervenção Federal"),
    ("Inq", "Inquérito"),
    ("MI", "Mandado de Injunção"),
    ("MS", "Mandado de Segurança"),
    ("PADM", "Processo Administrativo"),
    ("Pet", "Petição"),
    ("PPE", "Prisão Preventiva para Extradição"),
    ("PSV", "Proposta de Súmula Vinculante"),
    ("RC", "Recurso Crime"),
    ("Rcl", "Reclamação"),
    ("RE", "Recurso Extraordinário"),
    ("RHC", "Recurso Ordinário em Habeas Corpus"),
    ("RHD", "Recurso Ordinário em Habeas Data"),
    ("RMI", "Recurso Ordinário em Mandado de Injunção"),
    ("RMS", "Recurso Ordinário em Mandado de Segurança"),
    ("RvC", "Revisão Criminal"),
    ("SE", "Sentença Estrangeira"),
    ("SIRDR", "Suspensão Nacional do Incidente de Resolução de Demandas Repetitivas"),
    ("SL", "Suspensão de Liminar"),
    ("SS", "Suspensão de Segurança"),
    ("STA", "Suspensão de Tutela Antecipada"),
    ("STP", "Suspensão de Tutela Provisória"),
    ("TPA", "Tutela Provisória Antecedente"),
];

/// A validated case class code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct CaseClass(&'static str);

impl CaseClass {
    /// Parse a class code; matching is case-insensitive and yields the canonical spelling.
    pub fn parse(code: &str) -> Result<Self, JudexError> {
        let code = code.trim();
        CASE_CLASSES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(known, _)| CaseClass(known))
            .ok_or_else(|| JudexError::InvalidClass(code.to_string()))
    }

    /// Canonical code.
    pub fn code(&self) -> &'static str {
        self.0
    }

    /// Long Portuguese name of the class.
    pub fn description(&self) -> &'static str {
        CASE_CLASSES
            .iter()
            .find(|(known, _)| *known == self.0)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }
}

impl fmt::Display for CaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<String> for CaseClass {
    type Error = JudexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CaseClass::parse(&value)
    }
}

impl<'de> Deserialize<'de> for CaseClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        CaseClass::try_from(code).map_err(serde::de::Error::custom)
    }
}

impl From<CaseClass> for String {
    fn from(value: CaseClass) -> Self {
        value.0.to_string()
    }
}
