use super::traits::{invalid, ConfigSection};
use crate::error::NeurotradeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Number of elites, which is also the number of selection buckets
    pub best_candidates_count: usize,
    pub generations: usize,
    pub seed: Option<u64>,
    /// Simulate candidates of a generation on the rayon pool
    pub parallel: bool,
    pub hall_of_fame_size: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 18,
            best_candidates_count: 3,
            generations: 100,
            seed: None,
            parallel: true,
            hall_of_fame_size: 5,
        }
    }
}

impl EvolutionConfig {
    /// Slots filled by crossover: two per ordered pair of elites
    pub fn offspring_count(&self) -> usize {
        let k = self.best_candidates_count;
        2 * k * k.saturating_sub(1)
    }

    pub fn bucket_width(&self) -> usize {
        self.population_size / self.best_candidates_count.max(1)
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), NeurotradeError> {
        let section = Self::section_name();
        if self.population_size == 0 {
            return Err(invalid(section, "population_size must be at least 1"));
        }
        if self.best_candidates_count == 0 {
            return Err(invalid(section, "best_candidates_count must be at least 1"));
        }
        if self.population_size % self.best_candidates_count != 0 {
            return Err(invalid(
                section,
                format!(
                    "population_size {} is not divisible into {} buckets",
                    self.population_size, self.best_candidates_count
                ),
            ));
        }
        let needed = self.best_candidates_count + self.offspring_count();
        if needed > self.population_size {
            return Err(invalid(
                section,
                format!(
                    "{} elites need {} slots for themselves and their offspring, population has {}",
                    self.best_candidates_count, needed, self.population_size
                ),
            ));
        }
        if self.generations == 0 {
            return Err(invalid(section, "generations must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.offspring_count(), 12);
        assert_eq!(config.bucket_width(), 6);
    }

    #[test]
    fn test_rejects_uneven_buckets() {
        let config = EvolutionConfig {
            population_size: 20,
            best_candidates_count: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_too_many_elites() {
        let config = EvolutionConfig {
            population_size: 16,
            best_candidates_count: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
