use super::DiscoverySource;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// A fixed discovery document used in tests and offline runs.
/// Every fetch returns a clone of the same document.
pub struct StaticDiscovery {
    doc: Value,
}

impl StaticDiscovery {
    pub fn new(doc: Value) -> Self {
        Self { doc }
    }

    /// Minimal Auth0-shaped document rooted at `https://<domain>/`.
    pub fn for_domain(domain: &str) -> Self {
        let base = format!("https://{}", domain);
        Self::new(json!({
            "issuer": format!("{}/", base),
            "authorization_endpoint": format!("{}/authorize", base),
            "token_endpoint": format!("{}/oauth/token", base),
            "userinfo_endpoint": format!("{}/userinfo", base),
            "jwks_uri": format!("{}/.well-known/jwks.json", base),
            "response_types_supported": ["code"],
            "code_challenge_methods_supported": ["S256", "plain"],
        }))
    }
}

#[async_trait]
impl DiscoverySource for StaticDiscovery {
    async fn fetch(&self) -> Result<Value> {
        debug!("StaticDiscovery: returning fixed document");
        Ok(self.doc.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
