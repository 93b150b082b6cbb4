//! Persisted evaluation records

use serde::{Deserialize, Serialize};

use crate::scoring::{CompositeScore, RawScoreSet};

/// One evaluated step with its resolved image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u32,
    pub prompt: String,
    pub explanation: String,
    pub image_path: String,
}

/// Complete output for one sequence, persisted in the full-result JSON array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullRecord {
    pub index: String,
    pub category: String,
    pub process_type: String,
    pub steps: Vec<StepRecord>,
    /// Raw evaluator reply text.
    pub evaluation: String,
    pub individual_scores: RawScoreSet,
    pub comprehensive_scores: CompositeScore,
}

/// Flattened subset of [`FullRecord`] persisted one-per-line for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub index: String,
    pub category: String,
    pub process_type: String,
    #[serde(flatten)]
    pub scores: RawScoreSet,
    pub consistency_score: f64,
    pub aesthetic_score: f64,
    pub physicality_score: f64,
    pub overall_score: f64,
    pub overall_grade: String,
    pub pass_rate_3: f64,
    pub pass_rate_4: f64,
}

/// Both record shapes for one sequence. They are produced and persisted
/// together; neither exists without the other for a given index.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub full: FullRecord,
    pub score: ScoreRecord,
}
