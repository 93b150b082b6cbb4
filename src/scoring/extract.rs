//! Best-effort extraction of rubric scores from free-form evaluator text

use std::collections::BTreeMap;

use regex::Regex;

use super::dimensions::{Dimension, ALL_DIMENSIONS};

/// Per-dimension raw scores recovered from one evaluator reply.
///
/// May be missing any subset of the nine dimensions when the reply did not
/// contain a recognizable pattern for them.
pub type RawScoreSet = BTreeMap<Dimension, f64>;

/// Extracts per-dimension scores from unstructured evaluator text.
///
/// Nine strict per-label patterns are applied first, then one flexible
/// case-insensitive fallback over all labels. Later matches overwrite earlier
/// ones for the same dimension, so the fallback fills gaps or takes the last
/// occurrence. Values outside [0, 5] are discarded.
pub struct ScoreExtractor {
    strict: Vec<(Dimension, Regex)>,
    flexible: Regex,
}

impl ScoreExtractor {
    pub fn new() -> Self {
        let strict = ALL_DIMENSIONS
            .iter()
            .map(|&dim| {
                let pattern = format!(
                    r"(?i)\*{{0,2}}{}\*{{0,2}}\s*[:：]?\s*(\d)",
                    regex::escape(dim.label())
                );
                (dim, Regex::new(&pattern).unwrap())
            })
            .collect();

        let labels = ALL_DIMENSIONS
            .iter()
            .map(|d| regex::escape(d.label()))
            .collect::<Vec<_>>()
            .join("|");
        let flexible = Regex::new(&format!(r"(?i)({labels})\s*[:：]?\s*(\d)")).unwrap();

        Self { strict, flexible }
    }

    /// Parse an evaluator reply into a (possibly partial) score set.
    pub fn extract(&self, text: &str) -> RawScoreSet {
        let mut out = RawScoreSet::new();

        for (dim, pattern) in &self.strict {
            for caps in pattern.captures_iter(text) {
                if let Some(score) = parse_score(&caps[1]) {
                    out.insert(*dim, score);
                }
            }
        }

        for caps in self.flexible.captures_iter(text) {
            let key = caps[1].to_lowercase().replace([' ', '-'], "_");
            // The conjunction in "Dynamics and Interactivity" keeps its derived
            // key non-canonical, so only the strict pattern covers that axis.
            let Some(dim) = Dimension::from_key(&key) else {
                continue;
            };
            if let Some(score) = parse_score(&caps[2]) {
                out.insert(dim, score);
            }
        }

        out
    }
}

impl Default for ScoreExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Accept only scores inside the closed rubric range [0, 5].
fn parse_score(digit: &str) -> Option<f64> {
    let score: f64 = digit.parse().ok()?;
    if (0.0..=5.0).contains(&score) {
        Some(score)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_lines() {
        let extractor = ScoreExtractor::new();
        let scores = extractor.extract("Semantic Consistency: 5\nFactual Consistency: 0\n");

        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get(&Dimension::SemanticConsistency), Some(&5.0));
        assert_eq!(scores.get(&Dimension::FactualConsistency), Some(&0.0));
    }

    #[test]
    fn test_discards_out_of_range() {
        let extractor = ScoreExtractor::new();
        let scores = extractor.extract("Authenticity: 9");
        assert!(!scores.contains_key(&Dimension::Authenticity));
        assert!(scores.is_empty());
    }

    #[test]
    fn test_emphasis_and_colon_variants() {
        let extractor = ScoreExtractor::new();
        let scores = extractor.extract(
            "**Artistic Quality**: 4\nexpressiveness 3\nBasic Properties：2\n",
        );

        assert_eq!(scores.get(&Dimension::ArtisticQuality), Some(&4.0));
        assert_eq!(scores.get(&Dimension::Expressiveness), Some(&3.0));
        assert_eq!(scores.get(&Dimension::BasicProperties), Some(&2.0));
    }

    #[test]
    fn test_later_match_overwrites() {
        let extractor = ScoreExtractor::new();
        let scores = extractor.extract("Physical Reliability: 2\nPhysical Reliability: 4\n");
        assert_eq!(scores.get(&Dimension::PhysicalReliability), Some(&4.0));
    }

    #[test]
    fn test_all_nine_lines() {
        let extractor = ScoreExtractor::new();
        let reply = ALL_DIMENSIONS
            .iter()
            .map(|d| format!("{}: 3", d.label()))
            .collect::<Vec<_>>()
            .join("\n");

        let scores = extractor.extract(&reply);
        assert_eq!(scores.len(), 9);
        assert!(scores.values().all(|&v| v == 3.0));
    }

    #[test]
    fn test_unrelated_text_yields_nothing() {
        let extractor = ScoreExtractor::new();
        assert!(extractor.extract("no scores here, sorry").is_empty());
    }
}
