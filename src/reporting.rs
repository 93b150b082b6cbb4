//! Analysis report export and console summary

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::BatchAnalysis;

/// Envelope written to `analysis_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: BatchAnalysis,
    pub timestamp: String,
    pub total_sequences: usize,
}

impl AnalysisReport {
    pub fn new(analysis: BatchAnalysis) -> Self {
        let total_sequences = analysis.summary.total_sequences;
        Self {
            analysis,
            timestamp: chrono::Local::now().to_rfc3339(),
            total_sequences,
        }
    }

    /// Write the report into `output_dir/analysis_report.json`.
    pub fn write(&self, output_dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join("analysis_report.json");
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

/// Print the end-of-run summary to stdout.
pub fn print_console_report(analysis: &BatchAnalysis) {
    let summary = &analysis.summary;
    println!("\n=== EVALUATION SUMMARY ===");
    println!("Total sequences evaluated: {}", summary.total_sequences);
    println!("Overall average score: {}", summary.average_overall_score);
    println!("Weight ratio: {}", summary.weight_ratio);
    println!(
        "Excellent sequences (>=4.5): {}",
        summary.excellent_sequences
    );
    println!("Good sequences (3.5-4.5): {}", summary.good_sequences);
    println!("Fair sequences (3.0-3.5): {}", summary.fair_sequences);
    println!("Poor sequences (<3.0): {}", summary.poor_sequences);

    println!("\nDimension performance (mean / min / max / std):");
    println!("{:-<50}", "");
    for (name, stats) in [
        ("consistency", &analysis.dimension_performance.consistency),
        ("aesthetic", &analysis.dimension_performance.aesthetic),
        ("physicality", &analysis.dimension_performance.physicality),
        ("overall", &analysis.dimension_performance.overall),
    ] {
        println!(
            "  {:<12} {:.2} / {:.2} / {:.2} / {:.2}",
            name, stats.mean, stats.min, stats.max, stats.std
        );
    }

    println!("\nTop sequences:");
    for entry in &analysis.ranking.top_5 {
        println!("  {}: {:.2}", entry.index, entry.score);
    }
    println!("Bottom sequences:");
    for entry in &analysis.ranking.bottom_5 {
        println!("  {}: {:.2}", entry.index, entry.score);
    }
    println!("{:=<50}", "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BatchAnalyzer;
    use crate::records::ScoreRecord;
    use crate::scoring::RawScoreSet;

    #[test]
    fn test_report_written_to_output_dir() {
        let record = ScoreRecord {
            index: "1".to_string(),
            category: "physics".to_string(),
            process_type: "melting".to_string(),
            scores: RawScoreSet::new(),
            consistency_score: 3.0,
            aesthetic_score: 3.0,
            physicality_score: 3.0,
            overall_score: 3.0,
            overall_grade: "Fair".to_string(),
            pass_rate_3: 1.0,
            pass_rate_4: 0.0,
        };
        let analysis = BatchAnalyzer::analyze(&[&record]).unwrap();
        let report = AnalysisReport::new(analysis);

        let dir = tempfile::tempdir().unwrap();
        let path = report.write(&dir.path().join("out")).unwrap();
        assert!(path.ends_with("analysis_report.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let back: AnalysisReport = serde_json::from_str(&content).unwrap();
        assert_eq!(back.total_sequences, 1);
        assert_eq!(back.analysis.summary.average_overall_score, 3.0);
    }
}
