use crate::engines::evaluation::candidate::{Candidate, CandidateSnapshot};
use crate::engines::generation::genome::Genome;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EliteCandidate {
    pub snapshot: CandidateSnapshot,
    pub fitness: f64,
    /// Generation in which this genome was ranked first
    pub found_in_generation: usize,
    pub metrics: HashMap<String, f64>,
    #[serde(skip)]
    pub canonical_string: String,
}

impl EliteCandidate {
    pub fn new(candidate: &Candidate, generation: usize, metrics: HashMap<String, f64>) -> Self {
        Self {
            snapshot: candidate.snapshot(),
            fitness: candidate.fitness(),
            found_in_generation: generation,
            metrics,
            canonical_string: get_canonical_genome_string(candidate.genome()),
        }
    }
}

/// Best distinct genomes seen over a whole run, highest fitness first.
pub struct HallOfFame {
    entries: Vec<EliteCandidate>,
    max_size: usize,
    seen_signatures: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            seen_signatures: HashSet::new(),
        }
    }

    /// Attempt to add an elite; genomes already present are rejected
    pub fn try_add(&mut self, elite: EliteCandidate) -> bool {
        if self.max_size == 0 || self.seen_signatures.contains(&elite.canonical_string) {
            return false;
        }

        self.seen_signatures.insert(elite.canonical_string.clone());
        self.entries.push(elite);

        self.entries
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        while self.entries.len() > self.max_size {
            if let Some(removed) = self.entries.pop() {
                self.seen_signatures.remove(&removed.canonical_string);
            }
        }

        true
    }

    pub fn get_all(&self) -> &[EliteCandidate] {
        &self.entries
    }

    pub fn best(&self) -> Option<&EliteCandidate> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generate canonical string for deduplication
pub fn get_canonical_genome_string(genome: &Genome) -> String {
    serde_json::to_string(genome).unwrap_or_else(|_| String::new())
}
