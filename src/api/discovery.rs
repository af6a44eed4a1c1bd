use super::DiscoverySource;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::env;
use log::debug;

pub const WELL_KNOWN_PATH: &str = "/.well-known/openid-configuration";

/// Discovery document fetched over HTTPS from `https://<domain>/.well-known/openid-configuration`.
/// The base may be overridden by the OIDC_ISSUER_BASE env var (useful for tests and local issuers).
pub struct HttpDiscovery {
    client: Client,
    url: String,
}

impl HttpDiscovery {
    /// The domain is interpolated verbatim; only the env override is normalized.
    pub fn new(domain: &str) -> Self {
        match env::var("OIDC_ISSUER_BASE") {
            Ok(base) => Self::with_base(&base),
            Err(_) => Self::with_url(format!("https://{}{}", domain, WELL_KNOWN_PATH)),
        }
    }

    /// Use an explicit base URL such as `http://127.0.0.1:1234`.
    pub fn with_base(base: &str) -> Self {
        Self::with_url(discovery_url(base))
    }

    fn with_url(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }
}

/// Discovery URL under `base`.
pub fn discovery_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), WELL_KNOWN_PATH)
}

#[async_trait]
impl DiscoverySource for HttpDiscovery {
    async fn fetch(&self) -> Result<Value> {
        let url = self.url();
        debug!("fetching openid configuration from {}", url);
        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("openid configuration fetch failed: {} => {}", status, txt));
        }
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body from {} failed", url))?;
        let doc: Value = serde_json::from_str(&body)
            .context("openid configuration is not valid JSON")?;
        Ok(doc)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Fetch the discovery document for the configured issuer domain.
pub async fn get_config(cfg: &Config) -> Result<Value> {
    HttpDiscovery::new(&cfg.domain).fetch().await
}
