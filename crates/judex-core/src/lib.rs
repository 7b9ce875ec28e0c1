//! Core library for scraping case records from the STF case portal.
//!
//! This crate provides:
//! - Browser sessions (headless Chrome or Browserless) that render case pages
//! - A page loader that retries transient failures and recognizes absent cases
//! - Per-field extractors and the record assembler
//! - CSV / JSONL / JSON export with persisted-ID read-back
//! - A sequential batch runner with gap repair and timing summaries

pub mod assemble;
pub mod browser;
pub mod documents;
pub mod error;
pub mod export;
pub mod extract;
pub mod loader;
pub mod models;
pub mod orchestrator;
pub mod retry;
pub mod timer;

pub use assemble::RecordAssembler;
pub use browser::{factory_from_config, PageSession, SessionFactory};
pub use documents::{DocumentFetcher, HttpDocumentFetcher};
pub use error::{JudexError, Result};
pub use export::{FileExporter, OutputFormats, RecordSink};
pub use loader::{CaseLoader, LoadOutcome, NotFoundReason, RawDocument};
pub use models::{CaseClass, CaseRecord, JudexConfig, CASE_CLASSES};
pub use orchestrator::{BatchObserver, BatchRunner, CaseOutcome, NullObserver, RunSummary};
pub use timer::{ProcessTimer, TimingSummary};
