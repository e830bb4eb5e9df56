use anyhow::Context;
use clap::{Parser, Subcommand};
use neurotrade::config::{AppConfig, ConfigManager};
use neurotrade::data::{store::read_snapshot, CandidateStore, CsvConnector};
use neurotrade::engines::evaluation::TradingSimulator;
use neurotrade::engines::generation::{EvolutionEngine, LogProgressCallback};
use neurotrade::engines::metrics::MetricsEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a population of trading networks over a universe
    Evolve {
        /// TOML configuration; defaults and environment overrides apply without it
        #[arg(long)]
        config: Option<PathBuf>,
        /// CSV file with one row per day
        #[arg(long)]
        universe: PathBuf,
        /// Directory the population, best candidate and reports are written to
        #[arg(long, default_value = "population")]
        output: PathBuf,
        /// Overrides `evolution.seed`
        #[arg(long)]
        seed: Option<u64>,
        /// Start from the candidates already stored in the output directory
        #[arg(long)]
        resume: bool,
    },
    /// Replay a stored candidate and print its metrics
    Replay {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        universe: PathBuf,
        /// Candidate JSON file
        #[arg(long)]
        candidate: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match CommandArgs::parse().mode {
        Mode::Evolve {
            config,
            universe,
            output,
            seed,
            resume,
        } => evolve(config.as_deref(), &universe, &output, seed, resume),
        Mode::Replay {
            config,
            universe,
            candidate,
        } => replay(config.as_deref(), &universe, &candidate),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ConfigManager> {
    let manager = ConfigManager::new();
    match path {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => manager.load_from_env()?,
    }
    Ok(manager)
}

fn evolve(
    config_path: Option<&Path>,
    universe_path: &Path,
    output: &Path,
    seed: Option<u64>,
    resume: bool,
) -> anyhow::Result<()> {
    let manager = load_config(config_path)?;
    if seed.is_some() {
        manager.update(|config| config.evolution.seed = seed)?;
    }
    let config = manager.get()?;

    let universe = Arc::new(CsvConnector::load_universe(universe_path)?);
    let store = CandidateStore::new(output)?;
    let mut engine = EvolutionEngine::new(&config, universe)?;

    let population = if resume {
        let snapshots = store.load_population(config.evolution.population_size)?;
        engine.seed_population(snapshots)
    } else {
        engine.random_population()
    };

    let outcome = engine.run(population, LogProgressCallback)?;

    store.save_population(&outcome.population)?;
    store.save_best(&outcome.best)?;
    store.save_report(
        "best_metrics",
        &MetricsEngine::calculate_all(&outcome.best, &outcome.best_report),
    )?;
    store.save_report("history", &outcome.history)?;
    store.save_report("hall_of_fame", &outcome.hall_of_fame)?;

    log::info!(
        "Best candidate: fitness {:.2}, profit {:.2}, withdrawn {:.2}, traded {} days",
        outcome.best.fitness(),
        outcome.best.profit,
        outcome.best.withdrawal,
        outcome.best.trade_duration
    );
    Ok(())
}

fn replay(
    config_path: Option<&Path>,
    universe_path: &Path,
    candidate_path: &Path,
) -> anyhow::Result<()> {
    let config: AppConfig = load_config(config_path)?.get()?;
    let universe = Arc::new(CsvConnector::load_universe(universe_path)?);

    let topology = config.topology(universe.width())?;
    let simulator = TradingSimulator::new(universe, &config.trading)?;
    simulator.check_topology(&topology)?;

    let snapshot = read_snapshot(candidate_path)
        .with_context(|| format!("reading {}", candidate_path.display()))?;
    let mut candidate = snapshot.into_candidate(config.trading.initial_capital);
    candidate.reset();

    let report = simulator.run(&mut candidate, &topology)?;
    let metrics = MetricsEngine::calculate_all(&candidate, &report);
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}
