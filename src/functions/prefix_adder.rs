use async_trait::async_trait;

use crate::message::{Flow, Value};
use crate::traits::Transformer;

/// Prefix Adder function - prepends a configured prefix to text payloads
pub struct PrefixAdder {
    prefix: String,
}

impl PrefixAdder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl Transformer for PrefixAdder {
    async fn transform(&self, input: Option<Flow>) -> Option<Flow> {
        match input {
            Some(Flow::Value(Value::Text(text))) => {
                Some(Flow::Value(Value::Text(format!("{}{}", self.prefix, text))))
            }
            other => other,
        }
    }
}
