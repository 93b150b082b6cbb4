//! Accumulated result state and deterministic persistence
//!
//! Both result files are full rewrites sorted by index. Nothing is written
//! until the coordinator's final persist step, so an interrupted run leaves
//! the previous files untouched.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::records::{EvaluationOutcome, FullRecord, ScoreRecord};
use crate::sequences::compare_indices;

/// Error type for result store IO.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },
}

/// Process-wide accumulation of all known records, keyed by sequence index.
///
/// Seeded from prior output files, mutated only by the run coordinator as
/// worker results arrive, written back in full at the end of a run.
#[derive(Debug, Default)]
pub struct ResultStore {
    full: HashMap<String, FullRecord>,
    scores: HashMap<String, ScoreRecord>,
}

impl ResultStore {
    /// Load prior results. Absent or empty files mean an empty accumulation,
    /// not an error; unreadable content in an existing file is an error so a
    /// bad run never silently clobbers good output.
    pub fn load(full_path: &Path, scores_path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            full: load_full(full_path)?,
            scores: load_scores(scores_path)?,
        })
    }

    /// Indices considered done. The score store is the source of truth.
    pub fn completed_indices(&self) -> HashSet<String> {
        self.scores.keys().cloned().collect()
    }

    /// Insert or overwrite both records for one sequence.
    pub fn insert(&mut self, outcome: EvaluationOutcome) {
        let index = outcome.score.index.clone();
        self.full.insert(index.clone(), outcome.full);
        self.scores.insert(index, outcome.score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score records sorted ascending by index.
    pub fn sorted_scores(&self) -> Vec<&ScoreRecord> {
        let mut records: Vec<&ScoreRecord> = self.scores.values().collect();
        records.sort_by(|a, b| compare_indices(&a.index, &b.index));
        records
    }

    /// Write both stores as complete rewrites sorted by index.
    pub fn persist(&self, full_path: &Path, scores_path: &Path) -> Result<(), StoreError> {
        let mut full: Vec<&FullRecord> = self.full.values().collect();
        full.sort_by(|a, b| compare_indices(&a.index, &b.index));
        let json = serde_json::to_string_pretty(&full).map_err(|e| StoreError::Parse {
            file: full_path.display().to_string(),
            message: e.to_string(),
        })?;
        write_file(full_path, &json)?;
        tracing::info!("Saved {} ({} records)", full_path.display(), full.len());

        let scores = self.sorted_scores();
        let mut lines = String::new();
        for record in &scores {
            let line = serde_json::to_string(record).map_err(|e| StoreError::Parse {
                file: scores_path.display().to_string(),
                message: e.to_string(),
            })?;
            lines.push_str(&line);
            lines.push('\n');
        }
        write_file(scores_path, &lines)?;
        tracing::info!("Saved {} ({} records)", scores_path.display(), scores.len());

        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn load_full(path: &Path) -> Result<HashMap<String, FullRecord>, StoreError> {
    let Some(content) = read_if_present(path)? else {
        return Ok(HashMap::new());
    };

    let records: Vec<FullRecord> =
        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(records.into_iter().map(|r| (r.index.clone(), r)).collect())
}

fn load_scores(path: &Path) -> Result<HashMap<String, ScoreRecord>, StoreError> {
    let Some(content) = read_if_present(path)? else {
        return Ok(HashMap::new());
    };

    let mut records = HashMap::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: ScoreRecord = serde_json::from_str(line).map_err(|e| StoreError::Parse {
            file: path.display().to_string(),
            message: format!("line {}: {}", line_no + 1, e),
        })?;
        records.insert(record.index.clone(), record);
    }
    Ok(records)
}

fn read_if_present(path: &Path) -> Result<Option<String>, StoreError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::StepRecord;
    use crate::scoring::{CompositeScorer, RawScoreSet};

    fn make_outcome(index: &str, overall: f64) -> EvaluationOutcome {
        let composite = CompositeScorer::new().score(&RawScoreSet::new());
        let score = ScoreRecord {
            index: index.to_string(),
            category: "physics".to_string(),
            process_type: "melting".to_string(),
            scores: RawScoreSet::new(),
            consistency_score: 0.0,
            aesthetic_score: 0.0,
            physicality_score: 0.0,
            overall_score: overall,
            overall_grade: composite.overall_grade.clone(),
            pass_rate_3: 0.0,
            pass_rate_4: 0.0,
        };
        let full = FullRecord {
            index: index.to_string(),
            category: "physics".to_string(),
            process_type: "melting".to_string(),
            steps: vec![StepRecord {
                step: 1,
                prompt: "p".to_string(),
                explanation: "e".to_string(),
                image_path: "img.png".to_string(),
            }],
            evaluation: "raw text".to_string(),
            individual_scores: RawScoreSet::new(),
            comprehensive_scores: composite,
        };
        EvaluationOutcome { full, score }
    }

    #[test]
    fn test_absent_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::load(
            &dir.path().join("full.json"),
            &dir.path().join("scores.jsonl"),
        )
        .unwrap();
        assert!(store.is_empty());
        assert!(store.completed_indices().is_empty());
    }

    #[test]
    fn test_persist_and_reload_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let full_path = dir.path().join("full.json");
        let scores_path = dir.path().join("scores.jsonl");

        let mut store = ResultStore::default();
        store.insert(make_outcome("10", 1.0));
        store.insert(make_outcome("2", 2.0));
        store.persist(&full_path, &scores_path).unwrap();

        let reloaded = ResultStore::load(&full_path, &scores_path).unwrap();
        assert_eq!(reloaded.len(), 2);
        let sorted: Vec<&str> = reloaded
            .sorted_scores()
            .iter()
            .map(|r| r.index.as_str())
            .collect();
        assert_eq!(sorted, vec!["2", "10"]);
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let full_path = dir.path().join("full.json");
        let scores_path = dir.path().join("scores.jsonl");

        let mut store = ResultStore::default();
        store.insert(make_outcome("1", 1.0));
        store.insert(make_outcome("2", 2.0));
        store.persist(&full_path, &scores_path).unwrap();
        let first_full = std::fs::read(&full_path).unwrap();
        let first_scores = std::fs::read(&scores_path).unwrap();

        let reloaded = ResultStore::load(&full_path, &scores_path).unwrap();
        reloaded.persist(&full_path, &scores_path).unwrap();
        assert_eq!(std::fs::read(&full_path).unwrap(), first_full);
        assert_eq!(std::fs::read(&scores_path).unwrap(), first_scores);
    }

    #[test]
    fn test_insert_overwrites_existing_index() {
        let mut store = ResultStore::default();
        store.insert(make_outcome("1", 1.0));
        store.insert(make_outcome("1", 4.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.sorted_scores()[0].overall_score, 4.0);
    }

    #[test]
    fn test_corrupt_scores_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let scores_path = dir.path().join("scores.jsonl");
        std::fs::write(&scores_path, "{broken\n").unwrap();

        let err = ResultStore::load(&dir.path().join("full.json"), &scores_path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
