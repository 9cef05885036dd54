use async_trait::async_trait;

use crate::message::{Flow, Value};
use crate::traits::Transformer;

/// Reverse Text function - reverses the characters of a text payload
#[derive(Default)]
pub struct ReverseText;

impl ReverseText {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transformer for ReverseText {
    async fn transform(&self, input: Option<Flow>) -> Option<Flow> {
        match input {
            Some(Flow::Value(Value::Text(text))) => {
                Some(Flow::Value(Value::Text(text.chars().rev().collect())))
            }
            other => other,
        }
    }
}
