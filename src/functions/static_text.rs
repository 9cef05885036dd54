use async_trait::async_trait;

use crate::message::{Flow, Value};
use crate::traits::Producer;

/// Static Text function - produces a configured text payload on every call
pub struct StaticText {
    text: String,
}

impl StaticText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Producer for StaticText {
    async fn produce(&self) -> Option<Flow> {
        Some(Flow::Value(Value::Text(self.text.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn produces_configured_text() {
        let function = StaticText::new("tick");
        let result = function.produce().await.and_then(Flow::into_value);
        assert_eq!(result, Some(Value::Text("tick".into())));
    }
}
