use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed view of an OpenID Connect discovery document.
/// Keys not modelled here are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default)]
    pub userinfo_endpoint: Option<String>,
    #[serde(default)]
    pub jwks_uri: Option<String>,
    #[serde(default)]
    pub end_session_endpoint: Option<String>,
    #[serde(default)]
    pub scopes_supported: Option<Vec<String>>,
    #[serde(default)]
    pub response_types_supported: Vec<String>,
    #[serde(default)]
    pub code_challenge_methods_supported: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OpenIdConfiguration {
    pub fn from_value(doc: Value) -> Result<Self> {
        serde_json::from_value(doc).context("discovery document is missing required issuer metadata")
    }

    /// Issuers that omit `code_challenge_methods_supported` are assumed to accept S256.
    pub fn supports_s256(&self) -> bool {
        match &self.code_challenge_methods_supported {
            None => true,
            Some(methods) => methods.iter().any(|m| m == "S256"),
        }
    }
}
