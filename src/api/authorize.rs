use super::pkce::PkcePair;
use crate::config::Config;
use crate::models::OpenIdConfiguration;
use anyhow::{anyhow, bail, Result};
use url::Url;

/// Build the authorization request URL for a PKCE code flow.
///
/// The URL points at the issuer's `authorization_endpoint` and carries
/// `response_type=code`, the client/redirect/scope from `cfg`, the caller's
/// `state`, and the S256 challenge from `pkce`. `audience` is added when configured.
pub fn build_authorize_url(
    doc: &OpenIdConfiguration,
    cfg: &Config,
    state: &str,
    pkce: &PkcePair,
) -> Result<Url> {
    if !doc.supports_s256() {
        bail!("issuer {} does not support S256 code challenges", doc.issuer);
    }
    let mut url = Url::parse(&doc.authorization_endpoint)
        .map_err(|e| anyhow!("invalid authorization_endpoint {}: {}", doc.authorization_endpoint, e))?;
    {
        let mut q = url.query_pairs_mut();
        q.append_pair("response_type", "code")
            .append_pair("client_id", &cfg.client_id)
            .append_pair("redirect_uri", &cfg.redirect_uri)
            .append_pair("scope", &cfg.scope)
            .append_pair("state", state)
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", pkce.method());
        if let Some(audience) = &cfg.audience {
            q.append_pair("audience", audience);
        }
    }
    Ok(url)
}
