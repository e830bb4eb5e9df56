use crate::engines::evaluation::candidate::{Candidate, CandidateSnapshot};
use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON files on disk, one per population slot plus the best candidate.
pub struct CandidateStore {
    dir: PathBuf,
}

impl CandidateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    pub fn candidate_path(&self, id: usize) -> PathBuf {
        self.dir.join(format!("candidate_{}.json", id))
    }

    pub fn best_path(&self) -> PathBuf {
        self.dir.join("best.json")
    }

    pub fn report_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Load one slot; a missing file yields an empty default snapshot.
    pub fn load(&self, id: usize) -> Result<CandidateSnapshot> {
        let path = self.candidate_path(id);
        if !path.exists() {
            log::debug!("No stored candidate at {}, using default", path.display());
            return Ok(CandidateSnapshot {
                id,
                ..Default::default()
            });
        }
        read_snapshot(&path)
    }

    pub fn load_population(&self, size: usize) -> Result<Vec<CandidateSnapshot>> {
        (0..size).map(|id| self.load(id)).collect()
    }

    pub fn load_best(&self) -> Result<CandidateSnapshot> {
        let path = self.best_path();
        if !path.exists() {
            return Ok(CandidateSnapshot::default());
        }
        read_snapshot(&path)
    }

    pub fn save(&self, candidate: &Candidate) -> Result<()> {
        write_json(&self.candidate_path(candidate.id), &candidate.snapshot())
    }

    pub fn save_population(&self, population: &[Candidate]) -> Result<()> {
        for candidate in population {
            self.save(candidate)?;
        }
        log::info!(
            "Saved {} candidates to {}",
            population.len(),
            self.dir.display()
        );
        Ok(())
    }

    pub fn save_best(&self, candidate: &Candidate) -> Result<()> {
        write_json(&self.best_path(), &candidate.snapshot())
    }

    pub fn save_report<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        write_json(&self.report_path(name), value)
    }
}

pub fn read_snapshot(path: &Path) -> Result<CandidateSnapshot> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
