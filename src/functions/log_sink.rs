use async_trait::async_trait;

use crate::message::{Flow, Value};
use crate::traits::Consumer;

/// Log Sink function - consumes values by logging them
#[derive(Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Consumer for LogSink {
    async fn consume(&self, input: Option<Flow>) {
        match input {
            Some(Flow::Value(Value::Text(text))) => tracing::info!("sink received: {text}"),
            Some(Flow::Value(other)) => tracing::info!("sink received: {other:?}"),
            Some(Flow::Stream(_)) => tracing::info!("sink received a stream"),
            None => {}
        }
    }
}
