//! Post-run aggregate analysis over the score records

use serde::{Deserialize, Serialize};

use crate::records::ScoreRecord;
use crate::scoring::round2;

/// Descriptive statistics for one composite axis across the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub std: f64,
}

/// One ranked entry, index plus its overall score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub index: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking {
    pub top_5: Vec<RankedEntry>,
    pub bottom_5: Vec<RankedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_sequences: usize,
    pub weight_ratio: String,
    pub average_overall_score: f64,
    /// overall >= 4.5
    pub excellent_sequences: usize,
    /// 3.5 <= overall < 4.5
    pub good_sequences: usize,
    /// 3.0 <= overall < 3.5
    pub fair_sequences: usize,
    /// overall < 3.0
    pub poor_sequences: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionPerformance {
    pub consistency: DimensionStats,
    pub aesthetic: DimensionStats,
    pub physicality: DimensionStats,
    pub overall: DimensionStats,
}

/// Complete analysis over one batch, serialized into the analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub dimension_performance: DimensionPerformance,
    pub ranking: Ranking,
    pub summary: RunSummary,
}

/// Computes [`BatchAnalysis`] from score records. Expects its input sorted the
/// way the result store persists it; rank ties keep that order.
pub struct BatchAnalyzer;

impl BatchAnalyzer {
    /// Analyze a non-empty batch. An empty batch has no analysis.
    pub fn analyze(records: &[&ScoreRecord]) -> Option<BatchAnalysis> {
        if records.is_empty() {
            return None;
        }

        let axis = |f: fn(&ScoreRecord) -> f64| -> Vec<f64> { records.iter().map(|r| f(r)).collect() };
        let overall = axis(|r| r.overall_score);

        let dimension_performance = DimensionPerformance {
            consistency: stats(&axis(|r| r.consistency_score)),
            aesthetic: stats(&axis(|r| r.aesthetic_score)),
            physicality: stats(&axis(|r| r.physicality_score)),
            overall: stats(&overall),
        };

        let mut by_overall: Vec<&ScoreRecord> = records.to_vec();
        by_overall.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let entry = |r: &&ScoreRecord| RankedEntry {
            index: r.index.clone(),
            score: r.overall_score,
        };
        let ranking = Ranking {
            top_5: by_overall.iter().take(5).map(entry).collect(),
            // Last five of the descending order, still best-to-worst.
            bottom_5: by_overall
                .iter()
                .skip(by_overall.len().saturating_sub(5))
                .map(entry)
                .collect(),
        };

        let summary = RunSummary {
            total_sequences: records.len(),
            weight_ratio: "Consistency:Physicality:Aesthetic = 4:4:2".to_string(),
            average_overall_score: round2(overall.iter().sum::<f64>() / overall.len() as f64),
            excellent_sequences: overall.iter().filter(|&&s| s >= 4.5).count(),
            good_sequences: overall.iter().filter(|&&s| (3.5..4.5).contains(&s)).count(),
            fair_sequences: overall.iter().filter(|&&s| (3.0..3.5).contains(&s)).count(),
            poor_sequences: overall.iter().filter(|&&s| s < 3.0).count(),
        };

        Some(BatchAnalysis {
            dimension_performance,
            ranking,
            summary,
        })
    }
}

fn stats(scores: &[f64]) -> DimensionStats {
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    DimensionStats {
        mean: round2(mean),
        max: round2(max),
        min: round2(min),
        std: round2(std_dev(scores, mean)),
    }
}

/// Sample standard deviation, 0 for fewer than two samples.
fn std_dev(scores: &[f64], mean: f64) -> f64 {
    if scores.len() <= 1 {
        return 0.0;
    }
    let variance =
        scores.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (scores.len() - 1) as f64;
    variance.sqrt()
}
