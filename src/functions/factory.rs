use std::sync::Arc;

use crate::catalog::FunctionRegistration;
use crate::config::FunctionConfig;
use crate::functions::{
    ChangeTextCase, LogSink, PrefixAdder, ReverseText, StaticText, TokenCounter,
};
use crate::traits::FunctionTarget;
use crate::types::{FunctionShape, RawType, TypeShape};

/// Factory for creating built-in function registrations
pub struct FunctionFactory;

impl FunctionFactory {
    /// Create a registration from configuration
    ///
    /// The `impl` field determines which function to create:
    /// - "change_text_case_upper" -> ChangeTextCase (uppercase)
    /// - "change_text_case_lower" -> ChangeTextCase (lowercase)
    /// - "change_text_case_proper" -> ChangeTextCase (proper case)
    /// - "reverse_text" -> ReverseText
    /// - "token_counter" -> TokenCounter
    /// - "prefix_adder" -> PrefixAdder (reads the "prefix" option)
    /// - "static_text" -> StaticText producer (reads the "text" option)
    /// - "log_sink" -> LogSink consumer
    pub fn create(config: &FunctionConfig) -> Result<FunctionRegistration, String> {
        let text_transformer = FunctionShape::transformer(
            TypeShape::Value(RawType::Text),
            TypeShape::Value(RawType::Text),
        );

        let (target, shape) = match config.implementation.as_str() {
            "change_text_case_upper" => (
                FunctionTarget::Transformer(Arc::new(ChangeTextCase::upper())),
                text_transformer,
            ),
            "change_text_case_lower" => (
                FunctionTarget::Transformer(Arc::new(ChangeTextCase::lower())),
                text_transformer,
            ),
            "change_text_case_proper" => (
                FunctionTarget::Transformer(Arc::new(ChangeTextCase::proper())),
                text_transformer,
            ),
            "reverse_text" => (
                FunctionTarget::Transformer(Arc::new(ReverseText::new())),
                text_transformer,
            ),
            "token_counter" => (
                FunctionTarget::Transformer(Arc::new(TokenCounter::new())),
                FunctionShape::transformer(
                    TypeShape::Value(RawType::Text),
                    TypeShape::Value(RawType::Json),
                ),
            ),
            "prefix_adder" => {
                let prefix = config
                    .options
                    .get("prefix")
                    .and_then(|value| value.as_str())
                    .ok_or_else(|| {
                        format!("function '{}' requires a 'prefix' option", config.name)
                    })?;
                (
                    FunctionTarget::Transformer(Arc::new(PrefixAdder::new(prefix))),
                    text_transformer,
                )
            }
            "static_text" => {
                let text = config
                    .options
                    .get("text")
                    .and_then(|value| value.as_str())
                    .ok_or_else(|| {
                        format!("function '{}' requires a 'text' option", config.name)
                    })?;
                (
                    FunctionTarget::Producer(Arc::new(StaticText::new(text))),
                    FunctionShape::producer(TypeShape::Value(RawType::Text)),
                )
            }
            "log_sink" => (
                FunctionTarget::Consumer(Arc::new(LogSink::new())),
                FunctionShape::consumer(TypeShape::Value(RawType::Text)),
            ),
            other => {
                return Err(format!("Unknown function implementation: '{other}'"));
            }
        };

        let mut registration = FunctionRegistration::new(config.name.clone(), target, shape);
        for alias in &config.aliases {
            registration = registration.with_alias(alias.clone());
        }
        Ok(registration)
    }

    /// List all available implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec![
            "change_text_case_upper",
            "change_text_case_lower",
            "change_text_case_proper",
            "reverse_text",
            "token_counter",
            "prefix_adder",
            "static_text",
            "log_sink",
        ]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(impl_name: &str) -> bool {
        Self::list_available_implementations().contains(&impl_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FunctionCatalog;
    use crate::message::{Flow, Value};
    use std::collections::HashMap;

    fn config(name: &str, implementation: &str) -> FunctionConfig {
        FunctionConfig {
            name: name.to_string(),
            implementation: implementation.to_string(),
            aliases: vec![],
            options: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn every_listed_implementation_creates() {
        for implementation in FunctionFactory::list_available_implementations() {
            let mut cfg = config("test", implementation);
            cfg.options.insert(
                "prefix".to_string(),
                serde_yaml::Value::String(">> ".to_string()),
            );
            cfg.options.insert(
                "text".to_string(),
                serde_yaml::Value::String("tick".to_string()),
            );
            let result = FunctionFactory::create(&cfg);
            assert!(result.is_ok(), "failed to create '{implementation}'");
        }
    }

    #[tokio::test]
    async fn created_functions_invoke_through_the_catalog() {
        let test_cases = vec![
            ("change_text_case_upper", "hello", "HELLO"),
            ("change_text_case_lower", "HELLO", "hello"),
            ("change_text_case_proper", "hello world", "Hello World"),
            ("reverse_text", "hello", "olleh"),
        ];

        for (implementation, input, expected) in test_cases {
            let catalog = FunctionCatalog::new();
            catalog.register(FunctionFactory::create(&config("fn", implementation)).unwrap());

            let wrapper = catalog.lookup("fn", &[]).unwrap().unwrap();
            let result = wrapper
                .invoke(Some(Flow::Value(Value::Text(input.into()))))
                .await
                .unwrap()
                .and_then(Flow::into_value);
            assert_eq!(
                result,
                Some(Value::Text(expected.into())),
                "failed for implementation: {implementation}"
            );
        }
    }

    #[test]
    fn unknown_implementation_is_rejected() {
        let result = FunctionFactory::create(&config("test", "nonexistent"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown function implementation"));
    }

    #[test]
    fn prefix_adder_requires_its_option() {
        let result = FunctionFactory::create(&config("test", "prefix_adder"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("'prefix' option"));
    }

    #[test]
    fn aliases_carry_into_the_registration() {
        let mut cfg = config("shout", "change_text_case_upper");
        cfg.aliases = vec!["upper".to_string()];
        let registration = FunctionFactory::create(&cfg).unwrap();
        assert_eq!(registration.names(), ["shout", "upper"]);
    }

    #[test]
    fn availability_listing_matches_factory() {
        assert!(FunctionFactory::is_implementation_available(
            "change_text_case_upper"
        ));
        assert!(!FunctionFactory::is_implementation_available("nonexistent"));
    }
}
