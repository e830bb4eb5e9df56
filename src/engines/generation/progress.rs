use super::evolution_engine::{GenerationSummary, ProgressCallback};

/// Reports progress through the `log` facade
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize, total: usize) {
        log::info!("Generation {}/{} starting...", generation + 1, total);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        log::info!(
            "Generation {} complete. Best fitness: {:.2}, mean: {:.2}, ruined: {}, elites: {:?}",
            summary.generation + 1,
            summary.best_fitness,
            summary.mean_fitness,
            summary.ruined_count,
            summary.elite_ids
        );
    }

    fn on_candidate_evaluated(&mut self, evaluated: usize, total: usize) {
        if evaluated % 10 == 0 || evaluated == total {
            log::debug!("  Evaluated {}/{} candidates", evaluated, total);
        }
    }
}
