//! Run configuration

use std::path::PathBuf;

/// Everything one evaluation run needs, assembled from the CLI.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Sequence definition JSON file.
    pub sequences_path: PathBuf,
    /// Root directory holding the per-index image folders.
    pub image_dir: PathBuf,
    /// Directory all result files are written into.
    pub output_dir: PathBuf,
    pub api_key: String,
    /// Override for the OpenAI-compatible endpoint base URL.
    pub api_base: Option<String>,
    pub model: String,
    /// Full-result JSON file name, relative to `output_dir`.
    pub result_full: String,
    /// Score JSONL file name, relative to `output_dir`.
    pub result_scores: String,
    pub max_workers: usize,
}

impl EvalConfig {
    pub fn full_result_path(&self) -> PathBuf {
        self.output_dir.join(&self.result_full)
    }

    pub fn scores_result_path(&self) -> PathBuf {
        self.output_dir.join(&self.result_scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_paths_join_output_dir() {
        let config = EvalConfig {
            sequences_path: PathBuf::from("seq.json"),
            image_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("/tmp/out"),
            api_key: "k".to_string(),
            api_base: None,
            model: "gpt-4o".to_string(),
            result_full: "full.json".to_string(),
            result_scores: "scores.jsonl".to_string(),
            max_workers: 5,
        };
        assert_eq!(config.full_result_path(), PathBuf::from("/tmp/out/full.json"));
        assert_eq!(
            config.scores_result_path(),
            PathBuf::from("/tmp/out/scores.jsonl")
        );
    }
}
