//! Endpoint table loading from disk.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::registry::EndpointRegistry;
use crate::config::schema::{EndpointConfig, Environment};
use crate::config::validation::{validate_endpoints, ValidationError};

/// Error type for registry loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// On-disk registry file shape.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    endpoints: Vec<EndpointConfig>,
}

/// Load and validate an endpoint registry from a TOML file.
///
/// The file fully replaces the built-in table for the given
/// environment; use this for self-hosted deployments pointing at
/// non-standard upstream hosts.
pub fn load_registry(path: &Path, environment: Environment) -> Result<EndpointRegistry, ConfigError> {
    let content = fs::read_to_string(path)?;
    let file: RegistryFile = toml::from_str(&content)?;

    validate_endpoints(&file.endpoints).map_err(ConfigError::Validation)?;

    Ok(EndpointRegistry::from_endpoints(environment, file.endpoints))
}
