// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use conveyor::catalog::FunctionCatalog;
use conveyor::config::load_settings;
use conveyor::functions::FunctionFactory;
use conveyor::message::{Flow, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <settings.yaml> <input_text> [definition]", args[0]);
        eprintln!("Example: {} configs/pipeline-demo.yaml \"hello world\"", args[0]);
        eprintln!("Example: {} configs/pipeline-demo.yaml \"hello world\" \"greet|shout\"", args[0]);
        std::process::exit(1);
    }

    let settings_file = &args[1];
    let input_text = &args[2];
    let definition = args.get(3).map(String::as_str).unwrap_or("");

    let settings = load_settings(settings_file)
        .with_context(|| format!("loading settings from {settings_file}"))?;

    let catalog = FunctionCatalog::with_settings(settings.clone());
    for function in &settings.functions {
        let registration = FunctionFactory::create(function)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("creating function '{}'", function.name))?;
        catalog.register(registration);
    }

    println!("🚀 Conveyor Function Catalog Demo");
    println!("═════════════════════════════════");
    println!("Settings: {settings_file}");
    println!("Registered functions: {:?}", catalog.names());
    println!("Input: \"{input_text}\"");

    let wrapper = match catalog.lookup(definition, &[])? {
        Some(wrapper) => wrapper,
        None => bail!("no function resolves '{definition}'"),
    };
    println!("Resolved definition: {}", wrapper.definition());

    let input = if wrapper.is_producer() {
        None
    } else {
        Some(Flow::Value(Value::Text(input_text.clone())))
    };
    let result = wrapper.invoke(input).await?;

    match result {
        None => println!("Result: (consumed)"),
        Some(flow) => {
            let values = flow.into_values().await?;
            for (index, value) in values.iter().enumerate() {
                match value {
                    Value::Text(text) => println!("Result[{index}]: \"{text}\""),
                    other => println!("Result[{index}]: {other:?}"),
                }
            }
        }
    }

    Ok(())
}
