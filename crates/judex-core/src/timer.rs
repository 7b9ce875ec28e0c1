//! Per-case timing and the end-of-run summary.

use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone)]
struct CaseTiming {
    label: String,
    duration: Duration,
    success: bool,
}

/// Collects how long each case took.
#[derive(Debug)]
pub struct ProcessTimer {
    started: Instant,
    cases: Vec<CaseTiming>,
}

/// Aggregate figures of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub wall_time: Duration,

    /// Mean over successful cases.
    pub average: Option<Duration>,
    pub fastest: Option<(String, Duration)>,
    pub slowest: Option<(String, Duration)>,
}

impl ProcessTimer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            cases: Vec::new(),
        }
    }

    pub fn record(&mut self, label: impl Into<String>, duration: Duration, success: bool) {
        self.cases.push(CaseTiming {
            label: label.into(),
            duration,
            success,
        });
    }

    pub fn summary(&self) -> TimingSummary {
        let successes: Vec<&CaseTiming> = self.cases.iter().filter(|c| c.success).collect();
        let successful = successes.len();

        let average = (successful > 0)
            .then(|| successes.iter().map(|c| c.duration).sum::<Duration>() / successful as u32);
        let fastest = successes
            .iter()
            .min_by_key(|c| c.duration)
            .map(|c| (c.label.clone(), c.duration));
        let slowest = successes
            .iter()
            .max_by_key(|c| c.duration)
            .map(|c| (c.label.clone(), c.duration));

        TimingSummary {
            total: self.cases.len(),
            successful,
            failed: self.cases.len() - successful,
            wall_time: self.started.elapsed(),
            average,
            fastest,
            slowest,
        }
    }

    pub fn log_summary(&self) {
        let summary = self.summary();
        info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            "Run finished in {:.1}s",
            summary.wall_time.as_secs_f64()
        );
        if let Some(average) = summary.average {
            info!("Average per successful case: {:.2}s", average.as_secs_f64());
        }
        if let Some((label, duration)) = &summary.fastest {
            info!("Fastest: {} ({:.2}s)", label, duration.as_secs_f64());
        }
        if let Some((label, duration)) = &summary.slowest {
            info!("Slowest: {} ({:.2}s)", label, duration.as_secs_f64());
        }
    }
}

impl Default for ProcessTimer {
    fn default() -> Self {
        Self::new()
    }
}
