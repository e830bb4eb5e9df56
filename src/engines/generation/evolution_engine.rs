use crate::config::{AppConfig, EvolutionConfig};
use crate::data::Universe;
use crate::engines::evaluation::{
    candidate::{Candidate, CandidateSnapshot},
    simulator::TradingSimulator,
};
use crate::engines::generation::{
    genome::Topology,
    hall_of_fame::{EliteCandidate, HallOfFame},
    operators::{crossover, mutate, random_genome},
};
use crate::engines::metrics::MetricsEngine;
use crate::error::{NeurotradeError, Result};
use crate::types::SimulationReport;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize, total: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
    fn on_candidate_evaluated(&mut self, evaluated: usize, total: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize, total: usize) {
        (**self).on_generation_start(generation, total);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        (**self).on_generation_complete(summary);
    }

    fn on_candidate_evaluated(&mut self, evaluated: usize, total: usize) {
        (**self).on_candidate_evaluated(evaluated, total);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub ruined_count: usize,
    /// Slots the elites held while they were simulated
    pub elite_ids: Vec<usize>,
}

pub struct EvolutionOutcome {
    /// Population after the last generation's breeding step
    pub population: Vec<Candidate>,
    /// Top-ranked candidate of the last generation, with its simulated state
    pub best: Candidate,
    pub best_report: SimulationReport,
    pub history: Vec<GenerationSummary>,
    pub hall_of_fame: Vec<EliteCandidate>,
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    initial_capital: f64,
    topology: Topology,
    simulator: TradingSimulator,
    hall_of_fame: HallOfFame,
    rng: StdRng,
}

impl EvolutionEngine {
    /// Validate the configuration against the universe and build the engine.
    ///
    /// Fails before any simulation when the universe is shorter than the
    /// lookback window or lacks a required feature.
    pub fn new(config: &AppConfig, universe: Arc<Universe>) -> Result<Self> {
        config.validate()?;

        let topology = config.topology(universe.width())?;
        let simulator = TradingSimulator::new(universe, &config.trading)?;
        simulator.check_topology(&topology)?;

        let rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "Evolution engine ready: {} candidates, {} elites, {} generations, topology {} -> {:?}",
            config.evolution.population_size,
            config.evolution.best_candidates_count,
            config.evolution.generations,
            topology.inputs,
            topology.layers
        );

        Ok(Self {
            hall_of_fame: HallOfFame::new(config.evolution.hall_of_fame_size),
            config: config.evolution.clone(),
            initial_capital: config.trading.initial_capital,
            topology,
            simulator,
            rng,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn random_population(&mut self) -> Vec<Candidate> {
        (0..self.config.population_size)
            .map(|id| self.random_candidate(id))
            .collect()
    }

    /// Build a population from stored snapshots.
    ///
    /// Missing slots, empty genomes and genomes of another topology are
    /// replaced with random ones.
    pub fn seed_population(&mut self, snapshots: Vec<CandidateSnapshot>) -> Vec<Candidate> {
        let mut snapshots = snapshots.into_iter();
        (0..self.config.population_size)
            .map(|id| match snapshots.next() {
                Some(snapshot) if self.topology.accepts(&snapshot.genome) => {
                    let mut candidate = snapshot.into_candidate(self.initial_capital);
                    candidate.id = id;
                    candidate.reset();
                    candidate
                }
                Some(snapshot) => {
                    if !snapshot.genome.is_empty() {
                        log::warn!(
                            "Stored candidate {} does not fit topology {:?}, re-randomizing",
                            snapshot.id,
                            self.topology.layers
                        );
                    }
                    self.random_candidate(id)
                }
                None => self.random_candidate(id),
            })
            .collect()
    }

    fn random_candidate(&mut self, id: usize) -> Candidate {
        Candidate::new(id, random_genome(&self.topology, &mut self.rng), self.initial_capital)
    }

    /// Run every generation over the population.
    pub fn run<C: ProgressCallback>(
        &mut self,
        mut population: Vec<Candidate>,
        mut callback: C,
    ) -> Result<EvolutionOutcome> {
        if population.len() != self.config.population_size {
            return Err(NeurotradeError::Configuration(format!(
                "population has {} candidates, configuration expects {}",
                population.len(),
                self.config.population_size
            )));
        }
        for candidate in &population {
            self.topology.check(candidate.genome())?;
        }

        let mut history = Vec::with_capacity(self.config.generations);
        let mut best = None;

        for generation in 0..self.config.generations {
            callback.on_generation_start(generation, self.config.generations);

            let reports = self.simulate_population(&mut population, &mut callback)?;

            let mut ranked = rank(population, reports);

            let (champion, champion_report) = ranked[0].clone();
            let metrics = MetricsEngine::calculate_all(&champion, &champion_report);
            self.hall_of_fame
                .try_add(EliteCandidate::new(&champion, generation, metrics));

            let fitness: Vec<f64> = ranked.iter().map(|(c, _)| c.fitness()).collect();
            let ruined_count = ranked.iter().filter(|(_, r)| r.ruined).count();
            population = ranked.drain(..).map(|(candidate, _)| candidate).collect();

            bucket_reseat(&mut population, self.config.best_candidates_count);
            let elite_ids = population[..self.config.best_candidates_count]
                .iter()
                .map(|c| c.id)
                .collect();

            let summary = GenerationSummary {
                generation,
                best_fitness: fitness[0],
                mean_fitness: fitness.iter().sum::<f64>() / fitness.len() as f64,
                ruined_count,
                elite_ids,
            };
            callback.on_generation_complete(&summary);
            history.push(summary);
            best = Some((champion, champion_report));

            self.breed(&mut population, generation + 1)?;
        }

        let (best, best_report) = best.ok_or_else(|| {
            NeurotradeError::Configuration("no generation was run".to_string())
        })?;

        Ok(EvolutionOutcome {
            population,
            best,
            best_report,
            history,
            hall_of_fame: self.hall_of_fame.get_all().to_vec(),
        })
    }

    /// Reset and simulate every candidate over the whole universe.
    ///
    /// The sequential path reports after each candidate; the parallel path
    /// reports once the whole generation is scored.
    fn simulate_population<C: ProgressCallback>(
        &self,
        population: &mut [Candidate],
        callback: &mut C,
    ) -> Result<Vec<SimulationReport>> {
        let simulator = &self.simulator;
        let topology = &self.topology;
        let run = |candidate: &mut Candidate| {
            candidate.reset();
            simulator.run(candidate, topology)
        };
        let total = population.len();

        if self.config.parallel {
            let reports = population
                .par_iter_mut()
                .map(run)
                .collect::<Result<Vec<_>>>()?;
            callback.on_candidate_evaluated(total, total);
            return Ok(reports);
        }

        let mut reports = Vec::with_capacity(total);
        for (index, candidate) in population.iter_mut().enumerate() {
            reports.push(run(candidate)?);
            callback.on_candidate_evaluated(index + 1, total);
        }
        Ok(reports)
    }

    /// Crossover, repopulate and mutate after the elites are seated.
    ///
    /// On return the offspring occupy the front slots, fresh random genomes
    /// follow, and the elites sit at the back. Ids are renumbered to slots.
    fn breed(&mut self, population: &mut [Candidate], next_generation: usize) -> Result<()> {
        let elites = self.config.best_candidates_count;
        let mut slot = elites;

        for first in 0..elites {
            for second in 0..elites {
                if first == second {
                    continue;
                }
                let first_genome = population[first].genome().clone();
                let second_genome = population[second].genome().clone();
                population[slot].replace_genome(first_genome);
                population[slot + 1].replace_genome(second_genome);

                let (left, right) = population.split_at_mut(slot + 1);
                crossover(
                    left[slot].genome_mut(),
                    right[0].genome_mut(),
                    &self.topology,
                    &mut self.rng,
                )?;

                for candidate in &mut population[slot..slot + 2] {
                    candidate.generation = next_generation;
                    candidate.reset();
                }
                slot += 2;
            }
        }

        population.rotate_left(elites);
        let offspring = slot - elites;

        let fresh_end = population.len() - elites;
        for candidate in &mut population[offspring..fresh_end] {
            candidate.replace_genome(random_genome(&self.topology, &mut self.rng));
            candidate.generation = next_generation;
            candidate.reset();
        }
        for (slot, candidate) in population.iter_mut().enumerate() {
            candidate.id = slot;
        }

        if offspring == 0 {
            log::warn!("No offspring slots to mutate with {} elite(s)", elites);
            return Ok(());
        }
        let target = self.rng.gen_range(0..offspring);
        let (node, weight) = mutate(population[target].genome_mut(), &self.topology, &mut self.rng)?;
        log::debug!("Mutated slot {} at node {} weight {}", target, node, weight);

        Ok(())
    }
}

/// Stable sort by descending fitness, keeping each report with its candidate.
pub fn rank(
    population: Vec<Candidate>,
    reports: Vec<SimulationReport>,
) -> Vec<(Candidate, SimulationReport)> {
    let mut ranked: Vec<(Candidate, SimulationReport)> = population.into_iter().zip(reports).collect();
    ranked.sort_by(|(a, _), (b, _)| b.fitness().total_cmp(&a.fitness()));
    ranked
}

/// Seat the best of each equal-width bucket of a ranked population in the
/// low slots.
///
/// Slot `b` receives the best candidate of ranked range
/// `[b * width, (b + 1) * width)`; the candidate it held moves into the
/// winner's old slot. Needs `buckets * buckets <= population.len()`.
pub fn bucket_reseat(population: &mut [Candidate], buckets: usize) {
    if buckets == 0 || population.is_empty() {
        return;
    }
    let width = population.len() / buckets;

    for bucket in 1..buckets {
        let range = bucket * width..(bucket + 1) * width;
        let winner = range
            .clone()
            .fold(range.start, |best, index| {
                if population[index].fitness() > population[best].fitness() {
                    index
                } else {
                    best
                }
            });
        population.swap(bucket, winner);
    }
}
