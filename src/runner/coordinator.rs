//! Resumable batch run coordinator
//!
//! Plans the pending work from the prior score store, dispatches sequence
//! evaluations with bounded concurrency, merges results as they land, and
//! persists both stores once at the end of the run. The stores are owned by
//! this task alone; workers only ever return their outcome over the JoinSet.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::evaluator::SequenceEvaluator;
use crate::runner::store::{ResultStore, StoreError};
use crate::sequences::{compare_indices, Sequence};

/// Outcome counts for one coordinator run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Sequences already present in the score store and skipped.
    pub skipped_complete: usize,
    /// Sequences skipped before dispatch because their images are missing.
    pub skipped_incomplete: usize,
    /// Sequences evaluated and merged this run.
    pub evaluated: usize,
    /// Sequences dispatched whose evaluation failed.
    pub failed: usize,
}

pub struct RunCoordinator {
    evaluator: Arc<SequenceEvaluator>,
    full_path: PathBuf,
    scores_path: PathBuf,
    max_workers: usize,
}

impl RunCoordinator {
    pub fn new(
        evaluator: SequenceEvaluator,
        full_path: PathBuf,
        scores_path: PathBuf,
        max_workers: usize,
    ) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            full_path,
            scores_path,
            max_workers: max_workers.max(1),
        }
    }

    /// Run the batch: resume from prior stores, evaluate what is pending,
    /// persist the merged result. A worker failure is logged and counted but
    /// never cancels its siblings; the failed sequence stays pending for the
    /// next run.
    pub async fn run(
        &self,
        sequences: &HashMap<String, Sequence>,
    ) -> Result<(ResultStore, RunStats), StoreError> {
        let mut store = ResultStore::load(&self.full_path, &self.scores_path)?;
        let completed = store.completed_indices();
        let mut stats = RunStats::default();

        let mut pending: Vec<&Sequence> = Vec::new();
        for sequence in sequences.values() {
            if completed.contains(&sequence.index) {
                stats.skipped_complete += 1;
                continue;
            }
            if !self.evaluator.has_all_images(sequence) {
                tracing::warn!(
                    index = %sequence.index,
                    "Skipping sequence with missing images"
                );
                stats.skipped_incomplete += 1;
                continue;
            }
            pending.push(sequence);
        }
        pending.sort_by(|a, b| compare_indices(&a.index, &b.index));

        tracing::info!(
            total = sequences.len(),
            already_done = stats.skipped_complete,
            pending = pending.len(),
            workers = self.max_workers,
            "Starting evaluation run"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        for sequence in pending {
            let evaluator = Arc::clone(&self.evaluator);
            let semaphore = Arc::clone(&semaphore);
            let sequence = sequence.clone();
            tasks.spawn(async move {
                // Closed only when the JoinSet is dropped, which cannot
                // happen while this task runs.
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                let index = sequence.index.clone();
                (index, evaluator.evaluate(&sequence).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(outcome))) => {
                    tracing::info!(
                        index = %index,
                        overall = outcome.score.overall_score,
                        grade = %outcome.score.overall_grade,
                        "Sequence evaluated"
                    );
                    store.insert(outcome);
                    stats.evaluated += 1;
                }
                Ok((index, Err(e))) => {
                    tracing::error!(index = %index, "Evaluation failed: {e}");
                    stats.failed += 1;
                }
                Err(e) => {
                    tracing::error!("Evaluation task panicked: {e}");
                    stats.failed += 1;
                }
            }
        }

        store.persist(&self.full_path, &self.scores_path)?;
        tracing::info!(
            evaluated = stats.evaluated,
            failed = stats.failed,
            skipped = stats.skipped_complete + stats.skipped_incomplete,
            "Run finished"
        );

        Ok((store, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::images::ImageLocator;
    use crate::scorer::{ScorerRequest, ScorerResult, ScorerService};
    use crate::sequences::StepPrompt;

    struct CountingScorer {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ScorerService for CountingScorer {
        fn model(&self) -> &str {
            "counting-mock"
        }

        async fn score(&self, _request: &ScorerRequest) -> ScorerResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let lines: Vec<String> = crate::scoring::ALL_DIMENSIONS
                .iter()
                .map(|d| format!("{}: 4", d.label()))
                .collect();
            Ok(lines.join("\n"))
        }
    }

    fn make_sequence(index: &str) -> Sequence {
        Sequence {
            index: index.to_string(),
            category: "physics".to_string(),
            process_type: "melting".to_string(),
            prompts: (1..=4)
                .map(|step| StepPrompt {
                    step,
                    prompt: format!("step {step}"),
                    explanation: String::new(),
                })
                .collect(),
        }
    }

    fn write_images(root: &std::path::Path, index: &str) {
        let dir = root.join(format!("index_{index:0>4}"));
        std::fs::create_dir_all(&dir).unwrap();
        for step in 1..=4 {
            std::fs::write(
                dir.join(format!("index_{index:0>4}_step_{step}.png")),
                b"png",
            )
            .unwrap();
        }
    }

    fn make_coordinator(
        image_root: PathBuf,
        output: &std::path::Path,
        calls: Arc<AtomicUsize>,
    ) -> RunCoordinator {
        let evaluator = SequenceEvaluator::new(
            ImageLocator::new(image_root),
            Arc::new(CountingScorer { calls }),
        );
        RunCoordinator::new(
            evaluator,
            output.join("full.json"),
            output.join("scores.jsonl"),
            2,
        )
    }

    #[tokio::test]
    async fn test_second_run_skips_completed_sequences() {
        let images = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_images(images.path(), "1");
        write_images(images.path(), "2");

        let mut sequences = HashMap::new();
        sequences.insert("1".to_string(), make_sequence("1"));
        sequences.insert("2".to_string(), make_sequence("2"));

        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = make_coordinator(
            images.path().to_path_buf(),
            output.path(),
            Arc::clone(&calls),
        );
        let (store, stats) = coordinator.run(&sequences).await.unwrap();
        assert_eq!(stats.evaluated, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let first_full = std::fs::read(output.path().join("full.json")).unwrap();
        let first_scores = std::fs::read(output.path().join("scores.jsonl")).unwrap();

        // Everything is already in the score store, so the second run must
        // not touch the scorer and must rewrite identical files.
        let (_, stats) = coordinator.run(&sequences).await.unwrap();
        assert_eq!(stats.evaluated, 0);
        assert_eq!(stats.skipped_complete, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            std::fs::read(output.path().join("full.json")).unwrap(),
            first_full
        );
        assert_eq!(
            std::fs::read(output.path().join("scores.jsonl")).unwrap(),
            first_scores
        );
    }

    #[tokio::test]
    async fn test_sequences_without_images_are_skipped() {
        let images = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_images(images.path(), "1");

        let mut sequences = HashMap::new();
        sequences.insert("1".to_string(), make_sequence("1"));
        sequences.insert("7".to_string(), make_sequence("7"));

        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = make_coordinator(
            images.path().to_path_buf(),
            output.path(),
            Arc::clone(&calls),
        );
        let (store, stats) = coordinator.run(&sequences).await.unwrap();
        assert_eq!(stats.evaluated, 1);
        assert_eq!(stats.skipped_incomplete, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
