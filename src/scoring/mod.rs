//! Score extraction and weighted composite scoring

pub mod composite;
pub mod dimensions;
pub mod extract;
pub mod rubric;

pub use composite::{grade, round2, CompositeScore, CompositeScorer, ScoreWeights, WeightInfo};
pub use dimensions::{Dimension, DimensionGroup, ALL_DIMENSIONS};
pub use extract::{RawScoreSet, ScoreExtractor};
pub use rubric::{build_evaluation_prompt, SYSTEM_INSTRUCTION};
