use async_trait::async_trait;

use crate::message::{Flow, Value};
use crate::traits::Transformer;

/// Change Text Case function - converts text to different cases
pub struct ChangeTextCase {
    case_type: CaseType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseType {
    Upper,
    Lower,
    Proper,
}

impl ChangeTextCase {
    pub fn new(case_type: CaseType) -> Self {
        Self { case_type }
    }

    pub fn upper() -> Self {
        Self::new(CaseType::Upper)
    }

    pub fn lower() -> Self {
        Self::new(CaseType::Lower)
    }

    pub fn proper() -> Self {
        Self::new(CaseType::Proper)
    }

    fn apply(&self, input: &str) -> String {
        match self.case_type {
            CaseType::Upper => input.to_uppercase(),
            CaseType::Lower => input.to_lowercase(),
            CaseType::Proper => input
                .split_whitespace()
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        None => String::new(),
                        Some(first) => {
                            first.to_uppercase().collect::<String>()
                                + &chars.as_str().to_lowercase()
                        }
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[async_trait]
impl Transformer for ChangeTextCase {
    async fn transform(&self, input: Option<Flow>) -> Option<Flow> {
        match input {
            Some(Flow::Value(Value::Text(text))) => {
                Some(Flow::Value(Value::Text(self.apply(&text))))
            }
            other => other,
        }
    }
}
