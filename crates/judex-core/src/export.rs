//! Record output: CSV, JSON Lines and JSON array files.

use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ExportError, JudexError};
use crate::models::{CaseClass, CaseRecord};

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// CSV columns: the record fields in order, then the sizes of the main lists.
pub const CSV_COLUMNS: [&str; 30] = [
    "incidente",
    "classe",
    "processo_id",
    "numero_unico",
    "meio",
    "publicidade",
    "badges",
    "assuntos",
    "data_protocolo",
    "orgao_origem",
    "origem",
    "numero_origem",
    "volumes",
    "folhas",
    "apensos",
    "relator",
    "primeiro_autor",
    "partes",
    "andamentos",
    "sessao_virtual",
    "deslocamentos",
    "peticoes",
    "recursos",
    "pautas",
    "status",
    "extraido",
    "html",
    "len_partes",
    "len_andamentos",
    "len_deslocamentos",
];

const ID_FIELD: &str = "processo_id";

/// Where records go, and which case IDs are already there.
pub trait RecordSink {
    fn write(&mut self, record: &CaseRecord) -> Result<()>;

    /// Identity keys of every record persisted so far.
    fn persisted_ids(&self) -> Result<BTreeSet<u64>>;
}

/// Enabled output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormats {
    pub csv: bool,
    pub jsonl: bool,
    pub json: bool,
}

impl OutputFormats {
    pub const ALL: OutputFormats = OutputFormats {
        csv: true,
        jsonl: true,
        json: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.csv || self.jsonl || self.json)
    }

    /// Enabled extensions, in persisted-ID read priority.
    pub fn extensions(&self) -> Vec<&'static str> {
        [(self.csv, "csv"), (self.jsonl, "jsonl"), (self.json, "json")]
            .into_iter()
            .filter_map(|(enabled, ext)| enabled.then_some(ext))
            .collect()
    }
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self {
            csv: true,
            jsonl: false,
            json: false,
        }
    }
}

impl FromStr for OutputFormats {
    type Err = JudexError;

    /// `csv`, `jsonl`, `json` or `all`; several may be joined with commas.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut formats = OutputFormats {
            csv: false,
            jsonl: false,
            json: false,
        };
        for part in s.split(',').map(|p| p.trim().to_ascii_lowercase()) {
            match part.as_str() {
                "csv" => formats.csv = true,
                "jsonl" => formats.jsonl = true,
                "json" => formats.json = true,
                "all" => formats = OutputFormats::ALL,
                other => return Err(JudexError::Config(format!("unknown output format: {other}"))),
            }
        }
        if formats.is_empty() {
            return Err(JudexError::Config("no output format given".to_string()));
        }
        Ok(formats)
    }
}

/// Writes records to `{dir}/judex_{classe}_{start}-{end}.{ext}`.
#[derive(Debug, Clone)]
pub struct FileExporter {
    stem: PathBuf,
    formats: OutputFormats,
}

impl FileExporter {
    pub fn new(dir: &Path, classe: &CaseClass, start: u64, end: u64, formats: OutputFormats) -> Self {
        Self {
            stem: dir.join(format!("judex_{}_{}-{}", classe, start, end)),
            formats,
        }
    }

    pub fn path(&self, extension: &str) -> PathBuf {
        self.stem.with_extension(extension)
    }

    /// Paths of all enabled outputs.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.formats.extensions().into_iter().map(|ext| self.path(ext)).collect()
    }

    /// Create the output directory; in overwrite mode remove existing outputs.
    /// Call once per run.
    pub fn prepare(&self, overwrite: bool) -> Result<()> {
        if self.formats.is_empty() {
            return Err(ExportError::NoFormat);
        }
        if let Some(dir) = self.stem.parent() {
            fs::create_dir_all(dir)?;
        }
        if overwrite {
            for path in self.paths() {
                if path.exists() {
                    fs::remove_file(&path)?;
                    info!("Removed previous output {}", path.display());
                }
            }
        }
        Ok(())
    }

    fn append_csv(&self, record: &CaseRecord) -> Result<()> {
        let path = self.path("csv");
        let is_new = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .has_headers(false)
            .from_writer(file);
        if is_new {
            wtr.write_record(CSV_COLUMNS)?;
        }
        wtr.write_record(csv_row(record)?)?;
        wtr.flush()?;
        Ok(())
    }

    fn append_jsonl(&self, record: &CaseRecord) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(self.path("jsonl"))?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn append_json(&self, record: &CaseRecord) -> Result<()> {
        let path = self.path("json");
        let mut records = read_json_array(&path)?;
        records.push(serde_json::to_value(record)?);

        // Rewrite through a rename in the same directory
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &records)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl RecordSink for FileExporter {
    fn write(&mut self, record: &CaseRecord) -> Result<()> {
        if self.formats.csv {
            self.append_csv(record)?;
        }
        if self.formats.jsonl {
            self.append_jsonl(record)?;
        }
        if self.formats.json {
            self.append_json(record)?;
        }
        debug!(id = record.processo_id, "Record written");
        Ok(())
    }

    /// Read from the first enabled output that exists, in CSV, JSONL, JSON order.
    fn persisted_ids(&self) -> Result<BTreeSet<u64>> {
        for ext in self.formats.extensions() {
            let path = self.path(ext);
            if !path.exists() {
                continue;
            }
            return match ext {
                "csv" => csv_ids(&path),
                "jsonl" => jsonl_ids(&path),
                _ => Ok(read_json_array(&path)?.iter().filter_map(value_id).collect()),
            };
        }
        Ok(BTreeSet::new())
    }
}

fn json_cell<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn opt_cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// One CSV row; list and struct fields are JSON-encoded in their cell.
fn csv_row(record: &CaseRecord) -> Result<Vec<String>> {
    Ok(vec![
        opt_cell(&record.incidente),
        record.classe.to_string(),
        record.processo_id.to_string(),
        opt_cell(&record.numero_unico),
        record.meio.map(|m| m.as_str().to_string()).unwrap_or_default(),
        record.publicidade.map(|p| p.as_str().to_string()).unwrap_or_default(),
        json_cell(&record.badges)?,
        json_cell(&record.assuntos)?,
        opt_cell(&record.data_protocolo),
        opt_cell(&record.orgao_origem),
        opt_cell(&record.origem),
        json_cell(&record.numero_origem)?,
        opt_cell(&record.volumes),
        opt_cell(&record.folhas),
        opt_cell(&record.apensos),
        opt_cell(&record.relator),
        opt_cell(&record.primeiro_autor),
        json_cell(&record.partes)?,
        json_cell(&record.andamentos)?,
        json_cell(&record.sessao_virtual)?,
        json_cell(&record.deslocamentos)?,
        json_cell(&record.peticoes)?,
        json_cell(&record.recursos)?,
        json_cell(&record.pautas)?,
        record.status.to_string(),
        record.extraido.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        record.html.clone(),
        record.partes.len().to_string(),
        record.andamentos.len().to_string(),
        record.deslocamentos.len().to_string(),
    ])
}

fn csv_ids(path: &Path) -> Result<BTreeSet<u64>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h == ID_FIELD)
        .ok_or_else(|| ExportError::MissingIdColumn(path.display().to_string()))?;

    let mut ids = BTreeSet::new();
    for row in rdr.records() {
        let row = row?;
        if let Some(id) = row.get(column).and_then(|v| v.trim().parse().ok()) {
            ids.insert(id);
        }
    }
    Ok(ids)
}

fn jsonl_ids(path: &Path) -> Result<BTreeSet<u64>> {
    let reader = BufReader::new(File::open(path)?);
    let mut ids = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line)?;
        if let Some(id) = value_id(&value) {
            ids.insert(id);
        }
    }
    Ok(ids)
}

fn read_json_array(path: &Path) -> Result<Vec<serde_json::Value>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

fn value_id(value: &serde_json::Value) -> Option<u64> {
    value.get(ID_FIELD).and_then(serde_json::Value::as_u64)
}
