pub mod callable;

pub use callable::{
    ComposedTarget, Consumer, FnConsumer, FnProducer, FnTransformer, FunctionTarget, Producer,
    Transformer,
};
