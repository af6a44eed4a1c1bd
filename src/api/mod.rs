pub mod authorize;
pub mod discovery;
pub mod mock;
pub mod pkce;

use anyhow::Result;
use serde_json::Value;

/// Source of an issuer's OpenID discovery document.
/// Implementations: discovery::HttpDiscovery and mock::StaticDiscovery.
#[async_trait::async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Fetch the raw discovery document. Nothing is cached between calls.
    async fn fetch(&self) -> Result<Value>;

    /// Return a short name for logging
    fn name(&self) -> &str;
}
