use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

use crate::errors::InvocationError;
use crate::message::{Flow, Value};

/// A callable unit with no input: every call produces a fresh result.
#[async_trait]
pub trait Producer: Send + Sync {
    async fn produce(&self) -> Option<Flow>;
}

/// A callable unit taking one input and producing one output.
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, input: Option<Flow>) -> Option<Flow>;
}

/// A callable unit that only consumes its input.
#[async_trait]
pub trait Consumer: Send + Sync {
    async fn consume(&self, input: Option<Flow>);
}

/// Target of a composed pipeline: an opaque closure chaining the dispatch
/// stages of two prior wrappers.
pub type ComposedTarget =
    Arc<dyn Fn(Option<Flow>) -> BoxFuture<'static, Result<Option<Flow>, InvocationError>> + Send + Sync>;

/// The registered callable behind a function name, tagged by call shape.
/// The variant is chosen at registration (or composition) time and
/// dispatch matches on it; call sites never downcast.
#[derive(Clone)]
pub enum FunctionTarget {
    Producer(Arc<dyn Producer>),
    Consumer(Arc<dyn Consumer>),
    Transformer(Arc<dyn Transformer>),
    /// An externally supplied router that performs its own dispatch; the
    /// catalog passes its input through unconverted.
    Router(Arc<dyn Transformer>),
    Composed(ComposedTarget),
}

impl FunctionTarget {
    pub fn is_router(&self) -> bool {
        matches!(self, FunctionTarget::Router(_))
    }

    pub fn is_composed(&self) -> bool {
        matches!(self, FunctionTarget::Composed(_))
    }

    /// Identity of the underlying callable instance, used to deduplicate
    /// registrations of the very same target.
    pub(crate) fn instance_id(&self) -> usize {
        match self {
            FunctionTarget::Producer(target) => Arc::as_ptr(target) as *const () as usize,
            FunctionTarget::Consumer(target) => Arc::as_ptr(target) as *const () as usize,
            FunctionTarget::Transformer(target) | FunctionTarget::Router(target) => {
                Arc::as_ptr(target) as *const () as usize
            }
            FunctionTarget::Composed(target) => Arc::as_ptr(target) as *const () as usize,
        }
    }
}

impl fmt::Debug for FunctionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            FunctionTarget::Producer(_) => "Producer",
            FunctionTarget::Consumer(_) => "Consumer",
            FunctionTarget::Transformer(_) => "Transformer",
            FunctionTarget::Router(_) => "Router",
            FunctionTarget::Composed(_) => "Composed",
        };
        f.debug_tuple(variant).finish()
    }
}

/// Adapter turning a plain closure into a [`Producer`].
pub struct FnProducer<F>(F);

impl<F> FnProducer<F>
where
    F: Fn() -> Value + Send + Sync,
{
    pub fn new(produce: F) -> Self {
        Self(produce)
    }
}

#[async_trait]
impl<F> Producer for FnProducer<F>
where
    F: Fn() -> Value + Send + Sync,
{
    async fn produce(&self) -> Option<Flow> {
        Some(Flow::Value((self.0)()))
    }
}

/// Adapter turning a plain value-to-value closure into a [`Transformer`].
pub struct FnTransformer<F>(F);

impl<F> FnTransformer<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    pub fn new(transform: F) -> Self {
        Self(transform)
    }
}

#[async_trait]
impl<F> Transformer for FnTransformer<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    async fn transform(&self, input: Option<Flow>) -> Option<Flow> {
        match input {
            Some(Flow::Value(value)) => Some(Flow::Value((self.0)(value))),
            _ => None,
        }
    }
}

/// Adapter turning a plain value closure into a [`Consumer`].
pub struct FnConsumer<F>(F);

impl<F> FnConsumer<F>
where
    F: Fn(Value) + Send + Sync,
{
    pub fn new(consume: F) -> Self {
        Self(consume)
    }
}

#[async_trait]
impl<F> Consumer for FnConsumer<F>
where
    F: Fn(Value) + Send + Sync,
{
    async fn consume(&self, input: Option<Flow>) {
        if let Some(Flow::Value(value)) = input {
            (self.0)(value);
        }
    }
}
