//! `taureco` CLI: batch tau reconstruction over generated or replayed events.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sim::eventlog::{load_event_log, save_event_log, EventLog};
use sim::generator::{EventGenerator, GeneratedEvent};
use sim::scenarios::{Scenario, ScenarioKind};
use std::path::{Path, PathBuf};
use tau_core::config::ClustererConfig;
use tau_core::metrics::{ReconstructionMetrics, DEFAULT_MATCH_RADIUS};
use tau_core::pipeline::{Pipeline, PipelineConfig};
use tau_core::types::Event;
use tracing::info;

#[derive(Parser)]
#[command(name = "taureco", about = "Hadronic tau reconstruction CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a named scenario, reconstruct it and report metrics.
    RunScenario {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of events (defaults to the scenario's own count)
        #[arg(long)]
        events: Option<usize>,
        /// Clusterer thresholds as JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output summary to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also save the generated events
        #[arg(long)]
        save_events: Option<PathBuf>,
    },
    /// Reconstruct a previously saved event log.
    Replay {
        /// Path to event log JSON file
        input: PathBuf,
        /// Clusterer thresholds as JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output summary to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::RunScenario {
            scenario,
            seed,
            events,
            config,
            output,
            save_events,
        } => {
            let clusterer = load_config(config.as_deref())?;
            run_scenario(
                scenario,
                seed,
                events,
                clusterer,
                output.as_deref(),
                save_events.as_deref(),
            )?;
        }
        Commands::Replay {
            input,
            config,
            output,
        } => {
            let clusterer = load_config(config.as_deref())?;
            run_replay(&input, clusterer, output.as_deref())?;
        }
    }

    Ok(())
}

/// Read clusterer thresholds from JSON (or take the defaults) and validate
/// them before they reach the pipeline.
fn load_config(path: Option<&Path>) -> Result<ClustererConfig> {
    let config: ClustererConfig = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", p.display()))?
        }
        None => ClustererConfig::default(),
    };
    config.validate()?;
    info!(?config, "clusterer configuration");
    Ok(config)
}

/// Reconstruct every event and score it against generator truth.
fn reconstruct(
    events: &[GeneratedEvent],
    clusterer: ClustererConfig,
) -> (ReconstructionMetrics, f64) {
    let pipeline = Pipeline::new(PipelineConfig {
        clusterer,
        collect_debug: false,
        parallel: true,
    });
    let inputs: Vec<Event> = events.iter().map(|g| g.event.clone()).collect();

    let start = std::time::Instant::now();
    let outputs = pipeline.process_events(&inputs);
    let elapsed = start.elapsed().as_secs_f64();

    let mut metrics = ReconstructionMetrics::default();
    for (out, generated) in outputs.iter().zip(events) {
        metrics.accumulate(out, &generated.truth, DEFAULT_MATCH_RADIUS);
    }
    (metrics, elapsed)
}

fn print_summary(metrics: &ReconstructionMetrics, elapsed: f64) {
    println!(
        "Done: {} events, {} seeds, {} taus, {} vetoed, {} over prong limit, elapsed={:.3}s",
        metrics.n_events,
        metrics.n_seeds,
        metrics.n_candidates,
        metrics.n_vetoed,
        metrics.n_too_many_prongs,
        elapsed,
    );
    println!("Prongs 1..5: {:?}", &metrics.prong_histogram[1..]);
    println!(
        "Efficiency {:.3} ({} / {} truth taus), fake rate {:.3}, mean isolation {:.2} GeV",
        metrics.efficiency(),
        metrics.n_matched,
        metrics.n_truth,
        metrics.fake_rate(),
        metrics.mean_isolation(),
    );
}

fn write_summary(
    path: &Path,
    scenario: &str,
    seed: u64,
    metrics: &ReconstructionMetrics,
    elapsed: f64,
) -> Result<()> {
    let json = serde_json::json!({
        "scenario": scenario,
        "seed": seed,
        "elapsed_s": elapsed,
        "efficiency": metrics.efficiency(),
        "fake_rate": metrics.fake_rate(),
        "mean_isolation": metrics.mean_isolation(),
        "metrics": metrics,
    });
    std::fs::write(path, serde_json::to_string_pretty(&json)?)?;
    println!("Summary saved to {}", path.display());
    Ok(())
}

fn run_scenario(
    kind: ScenarioKind,
    seed: u64,
    n_events: Option<usize>,
    clusterer: ClustererConfig,
    output_path: Option<&Path>,
    events_path: Option<&Path>,
) -> Result<()> {
    let scenario = Scenario::build(kind, seed);
    let n = n_events.unwrap_or(scenario.default_events);
    let name = scenario.name.clone();

    println!("Running scenario '{}' (seed={}, events={})...", name, seed, n);

    let mut generator = EventGenerator::new(scenario);
    let events = generator.generate(n);
    let (metrics, elapsed) = reconstruct(&events, clusterer);
    print_summary(&metrics, elapsed);

    if let Some(epath) = events_path {
        let log = EventLog {
            scenario_name: name.clone(),
            seed,
            events,
        };
        save_event_log(&log, epath)?;
        println!("Events saved to {}", epath.display());
    }

    if let Some(opath) = output_path {
        write_summary(opath, &name, seed, &metrics, elapsed)?;
    }

    Ok(())
}

fn run_replay(input: &Path, clusterer: ClustererConfig, output_path: Option<&Path>) -> Result<()> {
    let log = load_event_log(input)?;
    println!(
        "Replaying '{}' ({} events)...",
        log.scenario_name,
        log.events.len()
    );

    let (metrics, elapsed) = reconstruct(&log.events, clusterer);
    print_summary(&metrics, elapsed);

    if let Some(opath) = output_path {
        write_summary(opath, &log.scenario_name, log.seed, &metrics, elapsed)?;
    }

    Ok(())
}
