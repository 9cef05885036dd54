use async_trait::async_trait;

use crate::message::{Flow, Value};
use crate::traits::Transformer;

/// Token Counter function - reports character, word, and line counts of
/// a text payload as a JSON document
#[derive(Default)]
pub struct TokenCounter;

impl TokenCounter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transformer for TokenCounter {
    async fn transform(&self, input: Option<Flow>) -> Option<Flow> {
        match input {
            Some(Flow::Value(Value::Text(text))) => {
                let stats = serde_json::json!({
                    "char_count": text.chars().count(),
                    "word_count": text.split_whitespace().count(),
                    "line_count": text.lines().count(),
                });
                Some(Flow::Value(Value::Json(stats)))
            }
            other => other,
        }
    }
}
