// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end tests exercising registration, lookup, composition, and
//! invocation together.

use std::sync::{Arc, Mutex};

use crate::catalog::{FunctionCatalog, FunctionRegistration};
use crate::config::consts::{HEADER_CONTENT_TYPE, HEADER_PROPAGATE};
use crate::config::CatalogSettings;
use crate::errors::CompositionError;
use crate::message::{Envelope, Flow, Headers, Value, ValueStream};
use crate::traits::{FnConsumer, FnProducer, FnTransformer, FunctionTarget};
use crate::types::{Cardinality, FunctionShape, RawType, TypeShape};

fn uppercase(name: &str) -> FunctionRegistration {
    FunctionRegistration::new(
        name,
        FunctionTarget::Transformer(Arc::new(FnTransformer::new(|value| match value {
            Value::Text(text) => Value::Text(text.to_uppercase()),
            other => other,
        }))),
        FunctionShape::transformer(
            TypeShape::Value(RawType::Text),
            TypeShape::Value(RawType::Text),
        ),
    )
}

fn greeter(name: &str) -> FunctionRegistration {
    FunctionRegistration::new(
        name,
        FunctionTarget::Producer(Arc::new(FnProducer::new(|| Value::Text("hello".into())))),
        FunctionShape::producer(TypeShape::Value(RawType::Text)),
    )
}

fn enveloping_uppercase(name: &str) -> FunctionRegistration {
    FunctionRegistration::new(
        name,
        FunctionTarget::Transformer(Arc::new(FnTransformer::new(|value| match value {
            Value::Text(text) => Value::envelope(Envelope::new(Value::Text(text.to_uppercase()))),
            other => other,
        }))),
        FunctionShape::transformer(
            TypeShape::Value(RawType::Text),
            TypeShape::Envelope(RawType::Text),
        ),
    )
}

fn tuple_joiner(name: &str) -> FunctionRegistration {
    FunctionRegistration::new(
        name,
        FunctionTarget::Transformer(Arc::new(FnTransformer::new(|value| match value {
            Value::Tuple(parts) => {
                let joined = parts
                    .iter()
                    .filter_map(Value::as_text)
                    .collect::<Vec<_>>()
                    .join(" ");
                Value::Text(joined)
            }
            other => other,
        }))),
        FunctionShape::transformer(
            TypeShape::Tuple(vec![
                TypeShape::Value(RawType::Text),
                TypeShape::Value(RawType::Text),
            ]),
            TypeShape::Value(RawType::Text),
        ),
    )
}

#[tokio::test]
async fn registered_transformer_round_trips_through_lookup() {
    let catalog = FunctionCatalog::new();
    catalog.register(uppercase("f"));

    let wrapper = catalog.lookup("f", &[]).unwrap().unwrap();
    assert!(wrapper.is_transformer());

    let result = wrapper
        .invoke(Some(Flow::Value(Value::Text("abc".into()))))
        .await
        .unwrap();
    assert_eq!(
        result.and_then(Flow::into_value),
        Some(Value::Text("ABC".into()))
    );
}

#[tokio::test]
async fn composed_pipeline_is_a_producer_applying_both_stages() {
    let catalog = FunctionCatalog::new();
    catalog.register(greeter("s"));
    catalog.register(uppercase("f"));

    let wrapper = catalog.lookup("s|f", &[]).unwrap().unwrap();
    assert!(wrapper.is_producer());
    assert!(wrapper.composed());

    // Production equals f(s()).
    let result = wrapper.invoke(None).await.unwrap();
    assert_eq!(
        result.and_then(Flow::into_value),
        Some(Value::Text("HELLO".into()))
    );
}

#[tokio::test]
async fn producer_with_null_input_returns_untouched_production() {
    let catalog = FunctionCatalog::new();
    catalog.register(greeter("s"));

    let wrapper = catalog.lookup("s", &[]).unwrap().unwrap();
    let result = wrapper.invoke(None).await.unwrap();
    assert_eq!(
        result.and_then(Flow::into_value),
        Some(Value::Text("hello".into()))
    );
}

#[test]
fn sole_registration_answers_any_name() {
    let catalog = FunctionCatalog::new();
    catalog.register(uppercase("onlyFn"));

    let blank = catalog.lookup("", &[]).unwrap().unwrap();
    assert_eq!(blank.definition(), "onlyFn");

    let unmatched = catalog.lookup("unmatched", &[]).unwrap().unwrap();
    assert_eq!(unmatched.definition(), "onlyFn");
}

#[tokio::test]
async fn content_negotiation_falls_through_to_the_json_codec() {
    let catalog = FunctionCatalog::new();
    catalog.register(enveloping_uppercase("shout"));

    let wrapper = catalog
        .lookup("shout", &["application/xml", "application/json"])
        .unwrap()
        .unwrap();
    let result = wrapper
        .invoke(Some(Flow::Value(Value::Text("hi".into()))))
        .await
        .unwrap()
        .and_then(Flow::into_value)
        .unwrap();

    let Value::Envelope(envelope) = result else {
        panic!("expected an envelope result, got {result:?}");
    };
    assert_eq!(
        envelope.headers().get(HEADER_CONTENT_TYPE),
        Some("application/json")
    );
    assert_eq!(envelope.payload(), &Value::Text("\"HI\"".into()));
}

#[tokio::test]
async fn repeated_invocations_are_deterministic() {
    let catalog = FunctionCatalog::new();
    catalog.register(uppercase("f"));

    let wrapper = catalog.lookup("f", &[]).unwrap().unwrap();
    let first = wrapper
        .invoke(Some(Flow::Value(Value::Text("stable".into()))))
        .await
        .unwrap()
        .and_then(Flow::into_value);
    let second = wrapper
        .invoke(Some(Flow::Value(Value::Text("stable".into()))))
        .await
        .unwrap()
        .and_then(Flow::into_value);
    assert_eq!(first, second);
}

#[test]
fn tuple_typed_sides_never_compose() {
    let catalog = FunctionCatalog::new();
    catalog.register(tuple_joiner("join"));
    catalog.register(uppercase("f"));

    let result = catalog.lookup("join|f", &[]);
    assert!(matches!(
        result,
        Err(CompositionError::TupleFunction { .. })
    ));
    // The failed composition never entered the cache.
    assert!(matches!(
        catalog.lookup("join|f", &[]),
        Err(CompositionError::TupleFunction { .. })
    ));
}

#[tokio::test]
async fn propagation_marker_copies_trigger_headers_onto_plain_results() {
    let catalog = FunctionCatalog::new();
    catalog.register(uppercase("f"));

    let wrapper = catalog.lookup("f", &[]).unwrap().unwrap();

    let mut headers = Headers::new();
    headers.insert(HEADER_PROPAGATE, "yes");
    headers.insert("tenant", "acme");
    headers.insert("trace-id", "t-77");
    let trigger = Envelope::with_headers(Value::Text("payload".into()), headers);

    let result = wrapper
        .invoke(Some(Flow::Value(Value::envelope(trigger))))
        .await
        .unwrap()
        .and_then(Flow::into_value)
        .unwrap();

    let Value::Envelope(envelope) = result else {
        panic!("expected an envelope result, got {result:?}");
    };
    assert_eq!(envelope.payload(), &Value::Text("PAYLOAD".into()));
    for (key, value) in [
        (HEADER_PROPAGATE, "yes"),
        ("tenant", "acme"),
        ("trace-id", "t-77"),
    ] {
        assert_eq!(envelope.headers().get(key), Some(value));
    }
}

#[tokio::test]
async fn default_definition_from_settings_resolves_blank_lookups() {
    let settings = CatalogSettings {
        definition: Some("s|f".to_string()),
        functions: vec![],
    };
    let catalog = FunctionCatalog::with_settings(settings);
    catalog.register(greeter("s"));
    catalog.register(uppercase("f"));

    let wrapper = catalog.lookup("", &[]).unwrap().unwrap();
    assert_eq!(wrapper.definition(), "s|f");

    let result = wrapper.invoke(None).await.unwrap();
    assert_eq!(
        result.and_then(Flow::into_value),
        Some(Value::Text("HELLO".into()))
    );
}

#[tokio::test]
async fn pipeline_ending_in_consumer_composes_and_drains() {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let catalog = FunctionCatalog::new();
    catalog.register(uppercase("f"));
    catalog.register(FunctionRegistration::new(
        "log",
        FunctionTarget::Consumer(Arc::new(FnConsumer::new(move |value| {
            sink.lock().unwrap().push(value)
        }))),
        FunctionShape::consumer(TypeShape::Value(RawType::Text)),
    ));

    let wrapper = catalog.lookup("f|log", &[]).unwrap().unwrap();
    assert!(wrapper.is_consumer());

    let result = wrapper
        .invoke(Some(Flow::Value(Value::Text("in".into()))))
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(seen.lock().unwrap().as_slice(), &[Value::Text("IN".into())]);
}

#[tokio::test]
async fn stream_input_to_plain_pipeline_maps_lazily() {
    let catalog = FunctionCatalog::new();
    catalog.register(uppercase("f"));

    let wrapper = catalog.lookup("f", &[]).unwrap().unwrap();
    let stream = ValueStream::from_values(
        Cardinality::Multi,
        vec![Value::Text("a".into()), Value::Text("b".into())],
    );
    let result = wrapper
        .invoke(Some(Flow::Stream(stream)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        result.into_values().await.unwrap(),
        vec![Value::Text("A".into()), Value::Text("B".into())]
    );
}

#[tokio::test]
async fn router_receives_its_input_unconverted() {
    use crate::config::consts::ROUTER_FUNCTION_NAME;

    // A router picks a branch off a header and must see the original
    // envelope, not a decoded payload.
    let catalog = FunctionCatalog::new();
    catalog.register(FunctionRegistration::new(
        ROUTER_FUNCTION_NAME,
        FunctionTarget::Router(Arc::new(FnTransformer::new(|value| match value {
            Value::Envelope(envelope) => {
                let routed = envelope.headers().get("route").unwrap_or("none").to_string();
                Value::Text(routed)
            }
            other => other,
        }))),
        FunctionShape::transformer(
            TypeShape::Envelope(RawType::Any),
            TypeShape::Value(RawType::Text),
        ),
    ));

    let wrapper = catalog.lookup(ROUTER_FUNCTION_NAME, &[]).unwrap().unwrap();
    assert!(wrapper.is_input_envelope());

    let mut headers = Headers::new();
    headers.insert("route", "upstream");
    let envelope = Envelope::with_headers(Value::Text("{\"raw\":true}".into()), headers);

    let result = wrapper
        .invoke(Some(Flow::Value(Value::envelope(envelope))))
        .await
        .unwrap()
        .and_then(Flow::into_value);
    assert_eq!(result, Some(Value::Text("upstream".into())));
}

#[tokio::test]
async fn tuple_function_converts_arguments_positionally() {
    let catalog = FunctionCatalog::new();
    catalog.register(tuple_joiner("join"));

    let wrapper = catalog.lookup("join", &[]).unwrap().unwrap();
    let result = wrapper
        .invoke(Some(Flow::Value(Value::Tuple(vec![
            Value::Text("left".into()),
            Value::Integer(2),
        ]))))
        .await
        .unwrap()
        .and_then(Flow::into_value);
    assert_eq!(result, Some(Value::Text("left 2".into())));
}
