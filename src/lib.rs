//! Batch evaluator for multi-step generated image sequences
//!
//! Each sequence is a 4-step visual narrative (for example, ice melting over
//! four frames). A multimodal model grades all of its frames in one call
//! against a fixed 9-dimension rubric; the reply is parsed into per-dimension
//! scores and combined into weighted composites. Runs are resumable: finished
//! sequences are skipped on restart and result files are rewritten whole,
//! sorted by index.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use seqeval::images::ImageLocator;
//! use seqeval::scorer::OpenAiScorer;
//! use seqeval::evaluator::SequenceEvaluator;
//! use seqeval::runner::RunCoordinator;
//! use seqeval::sequences::load_sequences;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sequences = load_sequences("sequences.json")?;
//!     let scorer = OpenAiScorer::new("sk-...", "gpt-4o");
//!     let evaluator =
//!         SequenceEvaluator::new(ImageLocator::new("images"), Arc::new(scorer));
//!     let coordinator = RunCoordinator::new(
//!         evaluator,
//!         "out/full.json".into(),
//!         "out/scores.jsonl".into(),
//!         5,
//!     );
//!     let (store, stats) = coordinator.run(&sequences).await?;
//!     println!("evaluated {} of {}", stats.evaluated, store.len());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod evaluator;
pub mod images;
pub mod records;
pub mod reporting;
pub mod runner;
pub mod scorer;
pub mod scoring;
pub mod sequences;
