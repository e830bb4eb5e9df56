use neurotrade::config::AppConfig;
use neurotrade::data::{CandidateStore, CsvConnector, Universe};
use neurotrade::engines::evaluation::Candidate;
use neurotrade::engines::generation::{
    bucket_reseat, EvolutionEngine, GenerationSummary, Genome, ProgressCallback,
};
use neurotrade::NeurotradeError;
use std::io::Write;
use std::sync::Arc;

/// Simple progress callback for testing
#[derive(Default)]
struct TestProgressCallback {
    started: usize,
    completed: Vec<usize>,
    evaluated: Vec<(usize, usize)>,
}

impl ProgressCallback for TestProgressCallback {
    fn on_generation_start(&mut self, _generation: usize, _total: usize) {
        self.started += 1;
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        self.completed.push(summary.generation);
        println!(
            "Generation {}: best {:.2}, mean {:.2}",
            summary.generation + 1,
            summary.best_fitness,
            summary.mean_fitness
        );
    }

    fn on_candidate_evaluated(&mut self, evaluated: usize, total: usize) {
        self.evaluated.push((evaluated, total));
    }
}

/// Forty days cycling through the week, month rolling every twenty days
fn synthetic_universe() -> Arc<Universe> {
    let columns = ["Day", "Month", "SPY_ClosePrice", "SPY_StandardDeviation"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let days = (0..40)
        .map(|i| {
            let day = (i % 5 + 1) as f64;
            let month = (i / 20) as f64;
            let close = ((i * 7) % 11) as f64 - 5.0;
            vec![day, month, close, 3.0]
        })
        .collect();
    Arc::new(Universe::new(columns, days).unwrap())
}

fn test_config(seed: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.evolution.generations = 4;
    config.evolution.seed = Some(seed);
    config.trading.lookback = 3;
    config.network.hidden_layers = vec![4];
    config
}

fn ranked(fitness_by_duration: &[usize]) -> Vec<Candidate> {
    fitness_by_duration
        .iter()
        .enumerate()
        .map(|(id, &duration)| {
            let mut candidate = Candidate::new(id, Genome::default(), 1000.0);
            candidate.profit = 1.0;
            candidate.trade_duration = duration;
            candidate
        })
        .collect()
}

#[test]
fn test_bucket_reseat_18_by_3() {
    let durations: Vec<usize> = (0..18).rev().collect();
    let mut population = ranked(&durations);
    bucket_reseat(&mut population, 3);

    let seated: Vec<usize> = population[..3].iter().map(|c| c.id).collect();
    assert_eq!(seated, vec![0, 6, 12]);
    assert_eq!(population.len(), 18);
}

#[test]
fn test_bucket_reseat_picks_bucket_maximum() {
    // Bucket [6, 12) peaks at slot 9, bucket [12, 18) at slot 17
    let durations = vec![100, 90, 80, 70, 60, 50, 5, 6, 7, 40, 8, 9, 1, 2, 3, 4, 5, 30];
    let mut population = ranked(&durations);
    bucket_reseat(&mut population, 3);

    let seated: Vec<usize> = population[..3].iter().map(|c| c.id).collect();
    assert_eq!(seated, vec![0, 9, 17]);

    // Every candidate is still present exactly once
    let mut ids: Vec<usize> = population.iter().map(|c| c.id).collect();
    ids.sort();
    assert_eq!(ids, (0..18).collect::<Vec<_>>());
}

#[test]
fn test_evolution_keeps_population_shape() {
    let config = test_config(42);
    let mut engine = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
    let population = engine.random_population();
    assert_eq!(population.len(), 18);

    let mut callback = TestProgressCallback::default();
    let outcome = engine.run(population, &mut callback).unwrap();

    assert_eq!(callback.started, 4);
    assert_eq!(callback.completed, vec![0, 1, 2, 3]);
    assert_eq!(outcome.history.len(), 4);
    assert_eq!(outcome.population.len(), 18);
    for (slot, candidate) in outcome.population.iter().enumerate() {
        assert!(engine.topology().accepts(candidate.genome()), "slot {}", slot);
    }
    assert!(!outcome.hall_of_fame.is_empty());
    assert!(outcome.hall_of_fame.len() <= config.evolution.hall_of_fame_size);

    let best = outcome.history.last().unwrap().best_fitness;
    assert_eq!(outcome.best.fitness(), best);
    for summary in &outcome.history {
        assert!(summary.best_fitness >= summary.mean_fitness);
        assert_eq!(summary.elite_ids.len(), 3);
    }
}

#[test]
fn test_elites_survive_at_the_back() {
    let mut config = test_config(7);
    config.evolution.generations = 1;
    let mut engine = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
    let population = engine.random_population();
    let outcome = engine.run(population, TestProgressCallback::default()).unwrap();

    // The top-ranked candidate is bucket 0's winner and ends in the first elite slot
    let elite = &outcome.population[18 - 3];
    assert_eq!(elite.genome(), outcome.best.genome());
    assert_eq!(elite.generation, 0);

    // Offspring and fresh slots belong to the next generation
    assert!(outcome.population[..15].iter().all(|c| c.generation == 1));
    for (slot, candidate) in outcome.population.iter().enumerate() {
        assert_eq!(candidate.id, slot);
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |parallel: bool| {
        let mut config = test_config(1234);
        config.evolution.parallel = parallel;
        let mut engine = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
        let population = engine.random_population();
        engine.run(population, TestProgressCallback::default()).unwrap()
    };

    let sequential = run(false);
    let parallel = run(true);
    assert_eq!(sequential.population, parallel.population);
    assert_eq!(sequential.best, parallel.best);
}

#[test]
fn test_sequential_run_reports_each_candidate() {
    let mut config = test_config(3);
    config.evolution.generations = 2;
    config.evolution.parallel = false;
    let mut engine = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
    let population = engine.random_population();

    let mut callback = TestProgressCallback::default();
    engine.run(population, &mut callback).unwrap();

    let per_generation: Vec<(usize, usize)> = (1..=18).map(|i| (i, 18)).collect();
    assert_eq!(callback.evaluated.len(), 36);
    assert_eq!(callback.evaluated[..18], per_generation[..]);
    assert_eq!(callback.evaluated[18..], per_generation[..]);
}

#[test]
fn test_parallel_run_reports_whole_generation() {
    let mut config = test_config(3);
    config.evolution.generations = 2;
    config.evolution.parallel = true;
    let mut engine = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
    let population = engine.random_population();

    let mut callback = TestProgressCallback::default();
    engine.run(population, &mut callback).unwrap();
    assert_eq!(callback.evaluated, vec![(18, 18), (18, 18)]);
}

#[test]
fn test_rejects_universe_shorter_than_lookback() {
    let mut config = test_config(1);
    config.trading.lookback = 40;
    let result = EvolutionEngine::new(&config, synthetic_universe());
    assert!(matches!(
        result,
        Err(NeurotradeError::InsufficientUniverse { days: 40, lookback: 40 })
    ));
}

#[test]
fn test_rejects_wrong_population_size() {
    let config = test_config(1);
    let mut engine = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
    let mut population = engine.random_population();
    population.pop();
    assert!(engine.run(population, TestProgressCallback::default()).is_err());
}

#[test]
fn test_resume_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = CandidateStore::new(dir.path()).unwrap();
    let config = test_config(99);

    let mut engine = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
    let population = engine.random_population();
    let outcome = engine.run(population, TestProgressCallback::default()).unwrap();
    store.save_population(&outcome.population).unwrap();

    // A foreign genome in slot 4 is replaced, the rest are restored as saved
    let mut foreign = outcome.population[4].clone();
    foreign.replace_genome(Genome::from_nodes(vec![vec![0.0; 3]]));
    store.save(&foreign).unwrap();

    let snapshots = store.load_population(18).unwrap();
    let mut resumed = EvolutionEngine::new(&config, synthetic_universe()).unwrap();
    let restored = resumed.seed_population(snapshots);

    assert_eq!(restored.len(), 18);
    assert_eq!(restored[0].genome(), outcome.population[0].genome());
    assert_ne!(restored[4].genome(), foreign.genome());
    assert!(restored.iter().all(|c| resumed.topology().accepts(c.genome())));
    assert!(restored.iter().all(|c| c.capital == 1000.0 && c.trade_duration == 0));
}

#[test]
fn test_evolve_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("universe.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Day,Month,SPY_ClosePrice,SPY_StandardDeviation").unwrap();
    for i in 0..30 {
        writeln!(file, "{},{},{},2.5", i % 5 + 1, i / 15, (i % 7) as f64 - 3.0).unwrap();
    }
    drop(file);

    let universe = Arc::new(CsvConnector::load_universe(&path).unwrap());
    assert_eq!(universe.len(), 30);

    let mut config = test_config(5);
    config.evolution.generations = 2;
    let mut engine = EvolutionEngine::new(&config, universe).unwrap();
    let population = engine.random_population();
    let outcome = engine.run(population, TestProgressCallback::default()).unwrap();
    assert_eq!(outcome.history.len(), 2);
}
