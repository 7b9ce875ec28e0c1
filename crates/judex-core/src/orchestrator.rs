//! Sequential batch runs over a case-ID range, with gap repair.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::assemble::RecordAssembler;
use crate::browser::{factory_from_config, PageSession, SessionFactory};
use crate::error::{JudexError, Result};
use crate::export::RecordSink;
use crate::loader::{CaseLoader, LoadOutcome, NotFoundReason};
use crate::models::config::{BatchConfig, JudexConfig};
use crate::models::CaseClass;
use crate::timer::{ProcessTimer, TimingSummary};

/// Terminal state of one case.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Exported,
    NotFound(NotFoundReason),
    LoadFailed(String),
    ExportFailed(String),
}

impl CaseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CaseOutcome::Exported)
    }
}

/// Receives progress events. All methods default to no-ops.
pub trait BatchObserver {
    /// A sweep over `total` cases starts; round 0 is the main sweep.
    fn sweep_started(&mut self, _round: u32, _total: usize) {}

    fn case_finished(&mut self, _id: u64, _outcome: &CaseOutcome) {}

    fn sweep_finished(&mut self, _round: u32) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl BatchObserver for NullObserver {}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub classe: CaseClass,
    pub start: u64,
    pub end: u64,

    /// Gap-repair rounds performed after the main sweep.
    pub rounds: u32,

    /// Cases exported across all sweeps.
    pub exported: usize,

    /// Cases the portal reported as absent.
    pub not_found: BTreeSet<u64>,

    /// Expected cases still not persisted when the run ended.
    pub missing: BTreeSet<u64>,

    /// Last ID of the main sweep when the not-found streak stopped it.
    pub stopped_at: Option<u64>,

    pub timing: TimingSummary,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

struct SweepState<'a> {
    sink: &'a mut dyn RecordSink,
    observer: &'a mut dyn BatchObserver,
    timer: ProcessTimer,
    exported: usize,
    written: BTreeSet<u64>,
    not_found: BTreeSet<u64>,
}

/// Runs the load → assemble → export pipeline case by case.
pub struct BatchRunner {
    factory: Box<dyn SessionFactory>,
    loader: CaseLoader,
    assembler: RecordAssembler,
    batch: BatchConfig,
}

impl BatchRunner {
    pub fn new(
        factory: Box<dyn SessionFactory>,
        loader: CaseLoader,
        assembler: RecordAssembler,
        batch: BatchConfig,
    ) -> Self {
        Self {
            factory,
            loader,
            assembler,
            batch,
        }
    }

    pub fn from_config(config: &JudexConfig) -> Result<Self> {
        Ok(Self::new(
            factory_from_config(&config.browser, &config.portal)?,
            CaseLoader::new(config),
            RecordAssembler::from_config(config)?,
            config.batch.clone(),
        ))
    }

    /// Process every ID in `range`, then re-run the IDs missing from the
    /// sink until none are left or the gap-repair rounds run out. IDs the
    /// portal reported as absent are not re-run. When the sink cannot read
    /// its output back, gap repair is skipped and the summary still returned.
    pub async fn run(
        &self,
        classe: &CaseClass,
        range: RangeInclusive<u64>,
        sink: &mut dyn RecordSink,
        observer: &mut dyn BatchObserver,
    ) -> Result<RunSummary> {
        let (start, end) = (*range.start(), *range.end());
        if start > end {
            return Err(JudexError::Config(format!("invalid range: {start} > {end}")));
        }

        info!(classe = %classe, start, end, "Starting run");
        let mut state = SweepState {
            sink,
            observer,
            timer: ProcessTimer::new(),
            exported: 0,
            written: BTreeSet::new(),
            not_found: BTreeSet::new(),
        };

        let targets: Vec<u64> = range.collect();
        let stopped_at = self
            .sweep(classe, &targets, 0, self.batch.max_consecutive_not_found, &mut state)
            .await;
        let last_expected = stopped_at.unwrap_or(end);

        let mut rounds = 0;
        let missing = loop {
            let persisted = match state.sink.persisted_ids() {
                Ok(ids) => ids,
                Err(e) => {
                    error!(classe = %classe, error = %e, "Cannot read persisted IDs, skipping gap repair");
                    break (start..=last_expected)
                        .filter(|id| !state.written.contains(id) && !state.not_found.contains(id))
                        .collect();
                }
            };
            let gap: Vec<u64> = (start..=last_expected)
                .filter(|id| !persisted.contains(id) && !state.not_found.contains(id))
                .collect();

            if gap.is_empty() {
                break BTreeSet::new();
            }
            if rounds >= self.batch.max_gap_rounds {
                warn!(
                    classe = %classe,
                    missing = gap.len(),
                    rounds,
                    "Gap repair rounds exhausted"
                );
                break gap.into_iter().collect();
            }

            rounds += 1;
            info!(classe = %classe, round = rounds, cases = gap.len(), "Gap repair sweep");
            self.sweep(classe, &gap, rounds, None, &mut state).await;
        };

        state.timer.log_summary();
        Ok(RunSummary {
            classe: classe.clone(),
            start,
            end,
            rounds,
            exported: state.exported,
            not_found: state.not_found,
            missing,
            stopped_at,
            timing: state.timer.summary(),
        })
    }

    /// One pass over `ids`. Returns the ID at which the not-found streak
    /// stopped the pass, if it did.
    async fn sweep(
        &self,
        classe: &CaseClass,
        ids: &[u64],
        round: u32,
        max_not_found_streak: Option<u32>,
        state: &mut SweepState<'_>,
    ) -> Option<u64> {
        state.observer.sweep_started(round, ids.len());
        let mut streak = 0u32;
        let mut stopped_at = None;

        for &id in ids {
            let started = Instant::now();
            let outcome = self.process_case(classe, id, &mut *state.sink).await;
            let elapsed = started.elapsed();

            match &outcome {
                CaseOutcome::Exported => {
                    info!(classe = %classe, id, elapsed_ms = elapsed.as_millis() as u64, "Case exported");
                    state.exported += 1;
                    state.written.insert(id);
                    state.not_found.remove(&id);
                }
                CaseOutcome::NotFound(_) => {
                    info!(classe = %classe, id, "Case skipped: not found");
                    state.not_found.insert(id);
                }
                CaseOutcome::LoadFailed(e) => {
                    warn!(classe = %classe, id, error = %e, "Case skipped: load failed");
                }
                CaseOutcome::ExportFailed(e) => {
                    warn!(classe = %classe, id, error = %e, "Case skipped: export failed");
                }
            }

            state.timer.record(format!("{classe} {id}"), elapsed, outcome.is_success());
            state.observer.case_finished(id, &outcome);

            streak = match outcome {
                CaseOutcome::NotFound(_) => streak + 1,
                _ => 0,
            };
            if max_not_found_streak.is_some_and(|max| max > 0 && streak >= max) {
                info!(classe = %classe, id, streak, "Stopping sweep after consecutive not-found cases");
                stopped_at = Some(id);
                break;
            }
        }

        state.observer.sweep_finished(round);
        stopped_at
    }

    /// Load, assemble and export one case on a fresh session. The session
    /// is closed on every path.
    pub async fn process_case(&self, classe: &CaseClass, id: u64, sink: &mut dyn RecordSink) -> CaseOutcome {
        let mut session = match self.factory.open().await {
            Ok(session) => session,
            Err(e) => {
                error!(classe = %classe, id, error = %e, "Could not open browser session");
                return CaseOutcome::LoadFailed(e.to_string());
            }
        };

        let outcome = self.load_and_export(session.as_mut(), classe, id, sink).await;

        if let Err(e) = session.close().await {
            warn!(classe = %classe, id, error = %e, "Failed to close browser session");
        }
        outcome
    }

    async fn load_and_export(
        &self,
        session: &mut dyn PageSession,
        classe: &CaseClass,
        id: u64,
        sink: &mut dyn RecordSink,
    ) -> CaseOutcome {
        match self.loader.load(session, classe, id).await {
            Ok(LoadOutcome::Found(raw)) => {
                let record = self.assembler.assemble(&raw, classe, id).await;
                match sink.write(&record) {
                    Ok(()) => CaseOutcome::Exported,
                    Err(e) => {
                        error!(classe = %classe, id, error = %e, "Could not write record");
                        CaseOutcome::ExportFailed(e.to_string())
                    }
                }
            }
            Ok(LoadOutcome::NotFound(reason)) => CaseOutcome::NotFound(reason),
            Err(e) => CaseOutcome::LoadFailed(e.to_string()),
        }
    }
}
