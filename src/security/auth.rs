//! Auth header construction per endpoint scheme.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};

use crate::config::{AuthScheme, EndpointConfig};
use crate::security::credentials::CredentialProvider;

/// Resolve the auth header for an endpoint.
///
/// Returns `None` when no credential is configured (the request goes
/// out unauthenticated) or when the configured value cannot form a
/// valid header, which is logged and treated the same way.
pub fn auth_header(
    endpoint: &EndpointConfig,
    provider: &dyn CredentialProvider,
) -> Option<(HeaderName, HeaderValue)> {
    let secret = provider.credential(&endpoint.id, endpoint.auth)?;

    let (name, value) = match endpoint.auth {
        AuthScheme::ApiKey => (
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(&secret),
        ),
        AuthScheme::Bearer | AuthScheme::Oauth2 => (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {secret}")),
        ),
        AuthScheme::Basic => (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", BASE64.encode(secret.as_bytes()))),
        ),
    };

    match value {
        Ok(mut v) => {
            v.set_sensitive(true);
            Some((name, v))
        }
        Err(_) => {
            tracing::warn!(
                endpoint = %endpoint.id,
                "Configured credential is not a valid header value, sending unauthenticated"
            );
            None
        }
    }
}
