// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::consts::DEFAULT_DEFINITION_ENV;
use crate::errors::ConfigError;

/// Catalog settings, typically loaded from a YAML file.
///
/// # Fields
/// * `definition` - Default pipeline definition used when a lookup passes
///   a blank definition (optional; the `CONVEYOR_FUNCTION_DEFINITION`
///   environment variable takes precedence when set)
/// * `functions` - Built-in functions the demo binary registers before
///   resolving the definition (optional)
///
/// # Example
/// ```yaml
/// definition: "greet|shout"
/// functions:
///   - name: greet
///     impl: prefix_adder
///     options:
///       prefix: "hello, "
///   - name: shout
///     impl: change_text_case_upper
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogSettings {
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub functions: Vec<FunctionConfig>,
}

/// Configuration for a single registered function.
///
/// # Fields
/// * `name` - Primary name the function registers under
/// * `impl` - Built-in implementation to instantiate (see the function
///   factory for the accepted names)
/// * `aliases` - Additional names resolving to the same function
/// * `options` - Implementation-specific options
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionConfig {
    pub name: String,
    #[serde(rename = "impl")]
    pub implementation: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

impl CatalogSettings {
    /// Resolve the process-wide default definition. The environment
    /// variable wins over the settings file; blank values count as unset.
    pub fn default_definition(&self) -> Option<String> {
        std::env::var(DEFAULT_DEFINITION_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| {
                self.definition
                    .clone()
                    .filter(|value| !value.trim().is_empty())
            })
    }
}

/// Load settings from a YAML file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<CatalogSettings, ConfigError> {
    let path_display = path.as_ref().display().to_string();
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path_display.clone(),
        source,
    })?;
    let settings: CatalogSettings =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Reject settings whose default definition could never resolve.
fn validate_settings(settings: &CatalogSettings) -> Result<(), ConfigError> {
    if let Some(definition) = &settings.definition {
        let normalized = definition.replace(',', "|");
        if normalized
            .split('|')
            .any(|segment| segment.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                reason: format!("default definition '{definition}' contains an empty segment"),
            });
        }
    }
    for function in &settings.functions {
        if function.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "a configured function has a blank name".to_string(),
            });
        }
    }
    Ok(())
}
