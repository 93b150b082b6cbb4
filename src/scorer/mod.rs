//! Scorer service implementations

pub mod openai;
pub mod traits;

pub use openai::OpenAiScorer;
pub use traits::{ScorerError, ScorerRequest, ScorerResult, ScorerService};
