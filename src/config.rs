use crate::api::pkce::{MAX_VERIFIER_LEN, MIN_VERIFIER_LEN};
use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Issuer domain, e.g. `tenant.eu.auth0.com`. Interpolated as-is into the discovery URL.
    pub domain: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default = "default_verifier_length")]
    pub verifier_length: usize,

    // stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_redirect_uri() -> String { "http://127.0.0.1:8888/callback".into() }
fn default_scope() -> String { "openid profile email".into() }
fn default_verifier_length() -> usize { 64 }

impl Config {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// Config built from a bare domain with every other key defaulted.
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            client_id: String::new(),
            redirect_uri: default_redirect_uri(),
            scope: default_scope(),
            audience: None,
            verifier_length: default_verifier_length(),
            log_dir: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            bail!("domain must not be empty");
        }
        if !(MIN_VERIFIER_LEN..=MAX_VERIFIER_LEN).contains(&self.verifier_length) {
            bail!(
                "verifier_length {} outside {}..={}",
                self.verifier_length,
                MIN_VERIFIER_LEN,
                MAX_VERIFIER_LEN
            );
        }
        Ok(())
    }
}
