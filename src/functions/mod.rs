//! Built-in callables registered through the function factory. These are
//! the in-process counterparts of externally discovered functions; tests
//! and the demo binary lean on them.

mod change_text_case;
mod factory;
mod log_sink;
mod prefix_adder;
mod reverse_text;
mod static_text;
mod token_counter;

pub use change_text_case::{CaseType, ChangeTextCase};
pub use factory::FunctionFactory;
pub use log_sink::LogSink;
pub use prefix_adder::PrefixAdder;
pub use reverse_text::ReverseText;
pub use static_text::StaticText;
pub use token_counter::TokenCounter;
