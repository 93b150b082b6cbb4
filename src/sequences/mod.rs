//! Input sequence definitions and loading

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

/// Error type for sequence loading. Always fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Duplicate sequence index: {0}")]
    DuplicateIndex(String),
}

/// One multi-step generated-image scenario to be scored as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(deserialize_with = "index_from_value")]
    pub index: String,
    pub category: String,
    pub process_type: String,
    pub prompts: Vec<StepPrompt>,
}

/// One declared step of a sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepPrompt {
    pub step: u32,
    pub prompt: String,
    pub explanation: String,
}

impl Sequence {
    /// Declared step numbers, in file order.
    pub fn steps(&self) -> Vec<u32> {
        self.prompts.iter().map(|p| p.step).collect()
    }
}

/// Accept either a JSON string or an integer as the sequence index.
fn index_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Index {
        Text(String),
        Number(i64),
    }

    Ok(match Index::deserialize(deserializer)? {
        Index::Text(s) => s,
        Index::Number(n) => n.to_string(),
    })
}

/// Load sequences from a JSON array file, keyed by index.
///
/// Any read or parse failure is returned to the caller and aborts the run
/// before output is produced.
pub fn load_sequences(path: impl AsRef<Path>) -> Result<HashMap<String, Sequence>, LoadError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    load_sequences_from_str(&content)
}

/// Parse sequences from a JSON string.
pub fn load_sequences_from_str(content: &str) -> Result<HashMap<String, Sequence>, LoadError> {
    let parsed: Vec<Sequence> =
        serde_json::from_str(content).map_err(|e| LoadError::Parse(e.to_string()))?;

    let mut sequences = HashMap::with_capacity(parsed.len());
    for seq in parsed {
        let index = seq.index.clone();
        if sequences.insert(index.clone(), seq).is_some() {
            return Err(LoadError::DuplicateIndex(index));
        }
    }
    Ok(sequences)
}

/// Order indices numerically when both parse as unsigned integers, otherwise
/// lexicographically. Keeps persisted output deterministic for both key styles.
pub fn compare_indices(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_string_and_integer_indices() {
        let json = r#"[
            {"index": "0001", "category": "physics", "process_type": "melting",
             "prompts": [{"step": 1, "prompt": "p", "explanation": "e"}]},
            {"index": 7, "category": "cooking", "process_type": "baking",
             "prompts": []}
        ]"#;

        let sequences = load_sequences_from_str(json).unwrap();
        assert_eq!(sequences.len(), 2);
        assert!(sequences.contains_key("0001"));
        assert_eq!(sequences["7"].category, "cooking");
        assert_eq!(sequences["0001"].steps(), vec![1]);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(matches!(
            load_sequences_from_str("{not json"),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let json = r#"[
            {"index": "a", "category": "c", "process_type": "p", "prompts": []},
            {"index": "a", "category": "c", "process_type": "p", "prompts": []}
        ]"#;
        assert!(matches!(
            load_sequences_from_str(json),
            Err(LoadError::DuplicateIndex(_))
        ));
    }

    #[test]
    fn test_index_ordering() {
        use std::cmp::Ordering;
        assert_eq!(compare_indices("2", "10"), Ordering::Less);
        assert_eq!(compare_indices("0002", "10"), Ordering::Less);
        assert_eq!(compare_indices("abc", "abd"), Ordering::Less);
        assert_eq!(compare_indices("10", "abc"), Ordering::Less);
    }
}
