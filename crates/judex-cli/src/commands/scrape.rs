//! Scrape command - collect a range of cases of one class.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use judex_core::models::config::BrowserBackend;
use judex_core::{BatchObserver, BatchRunner, CaseClass, CaseOutcome, FileExporter, OutputFormats, RunSummary};

use super::{config_path, load_config};

/// Arguments for the scrape command.
#[derive(Args)]
pub struct ScrapeArgs {
    /// Case class code (e.g. RE, ADI, HC)
    #[arg(short, long)]
    classe: String,

    /// First case number
    #[arg(short = 'i', long)]
    inicio: u64,

    /// Last case number (inclusive)
    #[arg(short = 'f', long)]
    fim: u64,

    /// Output format: csv, jsonl, json or all (comma-separated)
    #[arg(short = 'o', long, default_value = "csv")]
    output_format: String,

    /// Output directory
    #[arg(short = 'd', long, default_value = ".")]
    output_dir: PathBuf,

    /// Remove existing output files before starting
    #[arg(long)]
    overwrite: bool,

    /// Browser backend, overriding the configuration
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Download and extract the session vote documents
    #[arg(long)]
    fetch_documents: bool,

    /// Stop after this many consecutive not-found cases
    #[arg(long)]
    max_not_found: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Chrome,
    Browserless,
}

impl From<Backend> for BrowserBackend {
    fn from(value: Backend) -> Self {
        match value {
            Backend::Chrome => BrowserBackend::Chrome,
            Backend::Browserless => BrowserBackend::Browserless,
        }
    }
}

pub async fn run(args: ScrapeArgs, config: Option<&str>) -> anyhow::Result<()> {
    let classe = CaseClass::parse(&args.classe)?;
    if args.inicio > args.fim {
        anyhow::bail!("Invalid range: start {} is after end {}", args.inicio, args.fim);
    }
    let formats: OutputFormats = args.output_format.parse()?;

    let mut config = load_config(&config_path(config))?;
    if let Some(backend) = args.backend {
        config.browser.backend = backend.into();
    }
    if args.fetch_documents {
        config.extraction.fetch_documents = true;
    }
    if args.max_not_found.is_some() {
        config.batch.max_consecutive_not_found = args.max_not_found;
    }

    let mut exporter = FileExporter::new(&args.output_dir, &classe, args.inicio, args.fim, formats);
    exporter.prepare(args.overwrite)?;

    println!(
        "{} Scraping {} {}..={} ({})",
        style("ℹ").blue(),
        classe,
        args.inicio,
        args.fim,
        classe.description()
    );

    let runner = BatchRunner::from_config(&config)?;
    let mut observer = ProgressObserver::new();
    let summary = runner.run(&classe, args.inicio..=args.fim, &mut exporter, &mut observer).await?;
    observer.clear();

    print_summary(&summary);
    for path in exporter.paths() {
        if path.exists() {
            println!("  Output: {}", path.display());
        }
    }

    Ok(())
}

/// Renders sweep progress with indicatif.
struct ProgressObserver {
    bar: Option<ProgressBar>,
    exported: usize,
    not_found: usize,
    failed: usize,
}

impl ProgressObserver {
    fn new() -> Self {
        Self {
            bar: None,
            exported: 0,
            not_found: 0,
            failed: 0,
        }
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl BatchObserver for ProgressObserver {
    fn sweep_started(&mut self, round: u32, total: usize) {
        self.clear();
        let pb = ProgressBar::new(total as u64);
        let label = if round == 0 {
            "cases".to_string()
        } else {
            format!("gap round {round}")
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {prefix} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_prefix(label);
        pb.enable_steady_tick(Duration::from_millis(120));
        self.bar = Some(pb);
    }

    fn case_finished(&mut self, id: u64, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Exported => self.exported += 1,
            CaseOutcome::NotFound(_) => self.not_found += 1,
            CaseOutcome::LoadFailed(_) | CaseOutcome::ExportFailed(_) => self.failed += 1,
        }
        if let Some(pb) = &self.bar {
            pb.set_message(format!(
                "#{id} ({} ok, {} absent, {} failed)",
                self.exported, self.not_found, self.failed
            ));
            pb.inc(1);
        }
    }

    fn sweep_finished(&mut self, round: u32) {
        info!(round, "Sweep finished");
    }
}

fn print_summary(summary: &RunSummary) {
    let timing = &summary.timing;
    let mark = if summary.is_complete() {
        style("✓").green()
    } else {
        style("!").yellow()
    };

    println!();
    println!(
        "{} {} {}..={}: {} exported, {} not found, {} missing",
        mark,
        summary.classe,
        summary.start,
        summary.end,
        summary.exported,
        summary.not_found.len(),
        summary.missing.len()
    );
    println!(
        "  {} cases in {:.1}s, {} gap-repair round(s)",
        timing.total,
        timing.wall_time.as_secs_f64(),
        summary.rounds
    );
    if let Some(average) = timing.average {
        println!("  Average per case: {:.2}s", average.as_secs_f64());
    }
    if let Some((label, duration)) = &timing.fastest {
        println!("  Fastest: {} ({:.2}s)", label, duration.as_secs_f64());
    }
    if let Some((label, duration)) = &timing.slowest {
        println!("  Slowest: {} ({:.2}s)", label, duration.as_secs_f64());
    }
    if let Some(id) = summary.stopped_at {
        println!("  Stopped early at #{} after consecutive not-found cases", id);
    }
    if !summary.missing.is_empty() {
        let ids: Vec<String> = summary.missing.iter().map(u64::to_string).collect();
        println!("  {} Still missing: {}", style("✗").red(), ids.join(", "));
    }
}
