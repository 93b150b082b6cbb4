//! End-to-end evaluation of a single sequence

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::images::{encode_image, ImageError, ImageLocator};
use crate::records::{EvaluationOutcome, FullRecord, ScoreRecord, StepRecord};
use crate::scorer::{ScorerError, ScorerRequest, ScorerService};
use crate::scoring::{
    build_evaluation_prompt, CompositeScorer, ScoreExtractor, SYSTEM_INSTRUCTION,
};
use crate::sequences::Sequence;

/// Step count the evaluation protocol is written for.
pub const EXPECTED_STEP_COUNT: usize = 4;

/// Per-sequence evaluation failure. Never aborts the batch; the sequence is
/// skipped and stays eligible for a future run.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Sequence {index} has {found}/{expected} images")]
    MissingImages {
        index: String,
        found: usize,
        expected: usize,
    },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Scorer failure: {0}")]
    Scorer(#[from] ScorerError),
}

/// Evaluates one sequence: locate images, query the scorer, parse and combine
/// scores, and assemble both record shapes as a unit.
pub struct SequenceEvaluator {
    locator: ImageLocator,
    scorer: Arc<dyn ScorerService>,
    extractor: ScoreExtractor,
    composite: CompositeScorer,
}

impl SequenceEvaluator {
    pub fn new(locator: ImageLocator, scorer: Arc<dyn ScorerService>) -> Self {
        Self {
            locator,
            scorer,
            extractor: ScoreExtractor::new(),
            composite: CompositeScorer::new(),
        }
    }

    pub fn with_composite_scorer(mut self, composite: CompositeScorer) -> Self {
        self.composite = composite;
        self
    }

    /// Probe whether every step image resolves, without reading any of them.
    pub fn has_all_images(&self, sequence: &Sequence) -> bool {
        let steps = sequence.steps();
        self.locator.locate_all(&sequence.index, &steps).len() == steps.len()
    }

    pub async fn evaluate(&self, sequence: &Sequence) -> Result<EvaluationOutcome, EvalError> {
        let index = &sequence.index;
        tracing::info!("Evaluating sequence {} ...", index);

        let steps = sequence.steps();
        if steps.len() != EXPECTED_STEP_COUNT {
            tracing::warn!(
                "Sequence {} has {} steps, expected {}",
                index,
                steps.len(),
                EXPECTED_STEP_COUNT
            );
        }

        let located = self.locator.locate_all(index, &steps);
        if located.len() != steps.len() {
            return Err(EvalError::MissingImages {
                index: index.clone(),
                found: located.len(),
                expected: steps.len(),
            });
        }
        let image_paths: HashMap<u32, PathBuf> = located.into_iter().collect();

        // Encode in ascending step order; the reply is interpreted positionally.
        let mut ordered_steps: Vec<u32> = steps.clone();
        ordered_steps.sort_unstable();
        let mut images = Vec::with_capacity(ordered_steps.len());
        for step in &ordered_steps {
            images.push(encode_image(&image_paths[step])?);
        }

        let prompt = build_evaluation_prompt(sequence);
        let request = ScorerRequest::new(SYSTEM_INSTRUCTION, prompt, images);
        let evaluation = self.scorer.score(&request).await?;

        let raw_scores = self.extractor.extract(&evaluation);
        let composite = self.composite.score(&raw_scores);
        tracing::debug!(
            "Sequence {}: {}/9 scores recovered, overall {}",
            index,
            raw_scores.len(),
            composite.overall_score
        );

        let step_records: Vec<StepRecord> = sequence
            .prompts
            .iter()
            .map(|p| StepRecord {
                step: p.step,
                prompt: p.prompt.clone(),
                explanation: p.explanation.clone(),
                image_path: image_paths
                    .get(&p.step)
                    .map(|path| path.display().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        let score = ScoreRecord {
            index: index.clone(),
            category: sequence.category.clone(),
            process_type: sequence.process_type.clone(),
            scores: raw_scores.clone(),
            consistency_score: composite.consistency_score,
            aesthetic_score: composite.aesthetic_score,
            physicality_score: composite.physicality_score,
            overall_score: composite.overall_score,
            overall_grade: composite.overall_grade.clone(),
            pass_rate_3: composite.pass_rate_3,
            pass_rate_4: composite.pass_rate_4,
        };

        let full = FullRecord {
            index: index.clone(),
            category: sequence.category.clone(),
            process_type: sequence.process_type.clone(),
            steps: step_records,
            evaluation,
            individual_scores: raw_scores,
            comprehensive_scores: composite,
        };

        Ok(EvaluationOutcome { full, score })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ALL_DIMENSIONS;
    use crate::sequences::StepPrompt;
    use async_trait::async_trait;

    struct FixedScorer {
        reply: String,
    }

    #[async_trait]
    impl ScorerService for FixedScorer {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn score(&self, _request: &ScorerRequest) -> crate::scorer::ScorerResult<String> {
            Ok(self.reply.clone())
        }
    }

    fn make_sequence() -> Sequence {
        Sequence {
            index: "1".to_string(),
            category: "physics".to_string(),
            process_type: "melting".to_string(),
            prompts: (1..=4)
                .map(|step| StepPrompt {
                    step,
                    prompt: format!("prompt {step}"),
                    explanation: format!("explanation {step}"),
                })
                .collect(),
        }
    }

    fn write_images(root: &std::path::Path, index: &str, steps: &[u32]) {
        let dir = root.join(format!("index_{index:0>4}"));
        std::fs::create_dir_all(&dir).unwrap();
        for step in steps {
            std::fs::write(dir.join(format!("step_{step}.png")), b"png").unwrap();
        }
    }

    #[tokio::test]
    async fn test_all_threes_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path(), "1", &[1, 2, 3, 4]);

        let reply = ALL_DIMENSIONS
            .iter()
            .map(|d| format!("{}: 3", d.label()))
            .collect::<Vec<_>>()
            .join("\n");
        let evaluator = SequenceEvaluator::new(
            ImageLocator::new(dir.path()),
            Arc::new(FixedScorer { reply }),
        );

        let outcome = evaluator.evaluate(&make_sequence()).await.unwrap();
        assert_eq!(outcome.score.overall_score, 3.0);
        assert_eq!(outcome.score.overall_grade, "Fair");
        assert_eq!(outcome.score.pass_rate_3, 1.0);
        assert_eq!(outcome.score.pass_rate_4, 0.0);
        assert_eq!(outcome.full.individual_scores.len(), 9);
        assert_eq!(outcome.full.steps.len(), 4);
        assert!(outcome.full.steps.iter().all(|s| !s.image_path.is_empty()));
    }

    #[tokio::test]
    async fn test_missing_images_abort_the_sequence() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path(), "1", &[1, 2]);

        let evaluator = SequenceEvaluator::new(
            ImageLocator::new(dir.path()),
            Arc::new(FixedScorer {
                reply: String::new(),
            }),
        );

        let err = evaluator.evaluate(&make_sequence()).await.unwrap_err();
        assert!(matches!(
            err,
            EvalError::MissingImages {
                found: 2,
                expected: 4,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unparseable_reply_still_produces_records() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path(), "1", &[1, 2, 3, 4]);

        let evaluator = SequenceEvaluator::new(
            ImageLocator::new(dir.path()),
            Arc::new(FixedScorer {
                reply: "I refuse to grade this.".to_string(),
            }),
        );

        let outcome = evaluator.evaluate(&make_sequence()).await.unwrap();
        assert!(outcome.full.individual_scores.is_empty());
        assert_eq!(outcome.score.overall_score, 0.0);
        assert_eq!(outcome.score.overall_grade, "Very Poor");
    }
}
