//! Semantic validation of endpoint definitions.
//!
//! Serde handles the syntactic layer; this pass catches values that
//! parse fine but cannot work at runtime.

use thiserror::Error;
use url::Url;

use crate::config::schema::EndpointConfig;

/// A single semantic problem with an endpoint definition.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("endpoint has an empty id")]
    EmptyId,

    #[error("duplicate endpoint id '{0}'")]
    DuplicateId(String),

    #[error("endpoint '{id}' has invalid base_url: {reason}")]
    InvalidBaseUrl { id: String, reason: String },

    #[error("endpoint '{0}' has a zero rate limit cap")]
    ZeroRateCap(String),

    #[error("endpoint '{0}' has a zero-length rate limit window")]
    ZeroWindow(String),

    #[error("endpoint '{0}' has a zero timeout")]
    ZeroTimeout(String),
}

/// Validate a full endpoint list, collecting every problem found.
pub fn validate_endpoints(endpoints: &[EndpointConfig]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for ep in endpoints {
        if ep.id.is_empty() {
            errors.push(ValidationError::EmptyId);
            continue;
        }
        if !seen.insert(ep.id.as_str()) {
            errors.push(ValidationError::DuplicateId(ep.id.clone()));
        }
        if let Err(e) = Url::parse(&ep.base_url) {
            errors.push(ValidationError::InvalidBaseUrl {
                id: ep.id.clone(),
                reason: e.to_string(),
            });
        }
        if ep.rate_limit.max_requests == 0 {
            errors.push(ValidationError::ZeroRateCap(ep.id.clone()));
        }
        if ep.rate_limit.window_secs == 0 {
            errors.push(ValidationError::ZeroWindow(ep.id.clone()));
        }
        if ep.timeout_ms == 0 {
            errors.push(ValidationError::ZeroTimeout(ep.id.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
