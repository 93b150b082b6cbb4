//! Sequential image quality assessment CLI

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use seqeval::{
    analysis::BatchAnalyzer,
    config::EvalConfig,
    evaluator::SequenceEvaluator,
    images::ImageLocator,
    reporting::{print_console_report, AnalysisReport},
    runner::RunCoordinator,
    scorer::OpenAiScorer,
    sequences::load_sequences,
};

#[derive(Parser)]
#[command(name = "seqeval")]
#[command(about = "Sequential image quality assessment via a multimodal scoring model")]
#[command(version)]
struct Cli {
    /// Path to the JSON file containing prompts and sequences
    #[arg(long)]
    sequences: PathBuf,

    /// Root directory containing index folders with step images
    #[arg(long)]
    image_dir: PathBuf,

    /// Directory to save evaluation results
    #[arg(long)]
    output_dir: PathBuf,

    /// API key for the scoring endpoint
    #[arg(long)]
    api_key: String,

    /// Model name for evaluation
    #[arg(long)]
    model: String,

    /// Output JSON file for full results, relative to the output directory
    #[arg(long)]
    result_full: String,

    /// Output JSONL file for scores, relative to the output directory
    #[arg(long)]
    result_scores: String,

    /// OpenAI-compatible API base URL (optional)
    #[arg(long)]
    api_base: Option<String>,

    /// Maximum number of concurrent workers
    #[arg(long, default_value = "5")]
    max_workers: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> EvalConfig {
        EvalConfig {
            sequences_path: self.sequences,
            image_dir: self.image_dir,
            output_dir: self.output_dir,
            api_key: self.api_key,
            api_base: self.api_base,
            model: self.model,
            result_full: self.result_full,
            result_scores: self.result_scores,
            max_workers: self.max_workers,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("seqeval=debug,info")
    } else {
        EnvFilter::new("seqeval=info,warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.into_config();
    std::fs::create_dir_all(&config.output_dir)?;
    tracing::info!("Output directory: {}", config.output_dir.display());

    let sequences = load_sequences(&config.sequences_path)?;
    if sequences.is_empty() {
        tracing::warn!("No sequences loaded. Exiting.");
        return Ok(());
    }
    tracing::info!("Loaded {} sequences", sequences.len());

    let mut scorer = OpenAiScorer::new(&config.api_key, &config.model);
    if let Some(base) = &config.api_base {
        scorer = scorer.with_base_url(base);
    }

    let evaluator = SequenceEvaluator::new(
        ImageLocator::new(&config.image_dir),
        Arc::new(scorer),
    );
    let coordinator = RunCoordinator::new(
        evaluator,
        config.full_result_path(),
        config.scores_result_path(),
        config.max_workers,
    );

    let (store, _stats) = coordinator.run(&sequences).await?;

    let sorted = store.sorted_scores();
    if let Some(analysis) = BatchAnalyzer::analyze(&sorted) {
        let report = AnalysisReport::new(analysis);
        let path = report.write(&config.output_dir)?;
        println!("Analysis report saved to: {}", path.display());
        print_console_report(&report.analysis);
    }

    println!("Evaluation completed. Total sequences: {}", store.len());
    Ok(())
}
