//! Weighted composite scoring over raw rubric dimensions

use serde::{Deserialize, Serialize};

use super::dimensions::DimensionGroup;
use super::extract::RawScoreSet;

/// Weighting scheme for composite score calculation.
///
/// Passed into [`CompositeScorer`] rather than read from globals so tests can
/// substitute alternate schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Inter-group weights; must sum to 1.0.
    pub consistency: f64,
    pub physicality: f64,
    pub aesthetic: f64,
    /// Positional weights for the three dimensions inside each group; the last
    /// entry absorbs rounding so the three sum to exactly 1.0.
    pub intra_group: [f64; 3],
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            consistency: 0.4,
            physicality: 0.4,
            aesthetic: 0.2,
            intra_group: [0.33, 0.33, 0.34],
        }
    }
}

impl ScoreWeights {
    pub fn group_weight(&self, group: DimensionGroup) -> f64 {
        match group {
            DimensionGroup::Consistency => self.consistency,
            DimensionGroup::Physicality => self.physicality,
            DimensionGroup::Aesthetic => self.aesthetic,
        }
    }
}

/// Summary of the weighting scheme embedded in persisted records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightInfo {
    pub consistency_weight: f64,
    pub physicality_weight: f64,
    pub aesthetic_weight: f64,
    pub total_weight: f64,
}

/// Derived, read-only view over one [`RawScoreSet`].
///
/// Computed fresh every time; never mutated independently. All numeric fields
/// are rounded to two decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeScore {
    pub consistency_score: f64,
    pub aesthetic_score: f64,
    pub physicality_score: f64,
    pub overall_score: f64,
    pub weight_info: WeightInfo,
    pub consistency_avg_simple: f64,
    pub aesthetic_avg_simple: f64,
    pub physicality_avg_simple: f64,
    pub overall_avg_simple: f64,
    /// Fraction of present raw scores at or above 3.
    pub pass_rate_3: f64,
    /// Fraction of present raw scores at or above 4.
    pub pass_rate_4: f64,
    pub overall_grade: String,
    pub consistency_grade: String,
    pub aesthetic_grade: String,
    pub physicality_grade: String,
}

/// Combines raw per-dimension scores under a fixed weighting scheme.
pub struct CompositeScorer {
    weights: ScoreWeights,
}

impl CompositeScorer {
    pub fn new() -> Self {
        Self {
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Compute the composite view for one score set.
    ///
    /// Missing dimensions contribute 0 to the weighted and simple group
    /// averages. An entirely empty set yields zero simple averages and pass
    /// rates rather than dividing by zero.
    pub fn score(&self, raw: &RawScoreSet) -> CompositeScore {
        let weighted = |group: DimensionGroup| -> f64 {
            group
                .dimensions()
                .iter()
                .zip(self.weights.intra_group.iter())
                .map(|(dim, w)| raw.get(dim).copied().unwrap_or(0.0) * w)
                .sum()
        };

        let simple = |group: DimensionGroup| -> f64 {
            let dims = group.dimensions();
            dims.iter()
                .map(|dim| raw.get(dim).copied().unwrap_or(0.0))
                .sum::<f64>()
                / dims.len() as f64
        };

        let consistency = weighted(DimensionGroup::Consistency);
        let aesthetic = weighted(DimensionGroup::Aesthetic);
        let physicality = weighted(DimensionGroup::Physicality);

        let overall = consistency * self.weights.consistency
            + physicality * self.weights.physicality
            + aesthetic * self.weights.aesthetic;

        let present = raw.len();
        let (overall_simple, pass_rate_3, pass_rate_4) = if present == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = raw.values().sum();
            let at_least_3 = raw.values().filter(|&&v| v >= 3.0).count();
            let at_least_4 = raw.values().filter(|&&v| v >= 4.0).count();
            (
                sum / present as f64,
                at_least_3 as f64 / present as f64,
                at_least_4 as f64 / present as f64,
            )
        };

        CompositeScore {
            consistency_score: round2(consistency),
            aesthetic_score: round2(aesthetic),
            physicality_score: round2(physicality),
            overall_score: round2(overall),
            weight_info: WeightInfo {
                consistency_weight: self.weights.consistency,
                physicality_weight: self.weights.physicality,
                aesthetic_weight: self.weights.aesthetic,
                total_weight: self.weights.consistency
                    + self.weights.physicality
                    + self.weights.aesthetic,
            },
            consistency_avg_simple: round2(simple(DimensionGroup::Consistency)),
            aesthetic_avg_simple: round2(simple(DimensionGroup::Aesthetic)),
            physicality_avg_simple: round2(simple(DimensionGroup::Physicality)),
            overall_avg_simple: round2(overall_simple),
            pass_rate_3: round2(pass_rate_3),
            pass_rate_4: round2(pass_rate_4),
            overall_grade: grade(overall).to_string(),
            consistency_grade: grade(consistency).to_string(),
            aesthetic_grade: grade(aesthetic).to_string(),
            physicality_grade: grade(physicality).to_string(),
        }
    }
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Qualitative grade label for a 0-5 score.
pub fn grade(score: f64) -> &'static str {
    if score >= 4.5 {
        "Excellent"
    } else if score >= 4.0 {
        "Very Good"
    } else if score >= 3.5 {
        "Good"
    } else if score >= 3.0 {
        "Fair"
    } else if score >= 2.0 {
        "Poor"
    } else {
        "Very Poor"
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
