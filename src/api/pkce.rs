// PKCE helpers: random verifiers, base64url and S256 challenges
use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Characters a random string is drawn from, indexed by `byte % 62`.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// RFC 7636 bounds for a code verifier.
pub const MIN_VERIFIER_LEN: usize = 43;
pub const MAX_VERIFIER_LEN: usize = 128;

/// Generate a random alphanumeric string of exactly `length` characters.
///
/// Bytes come from the OS CSPRNG and are reduced modulo 62, so the first
/// eight symbols of [`ALPHABET`] are very slightly more likely than the rest.
/// The output is url-safe as-is.
pub fn random_string(length: usize) -> Result<String> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("secure random source unavailable")?;
    Ok(bytes
        .iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect())
}

/// Turn a standard base64 string into its url-safe form:
/// `+` -> `-`, `/` -> `_`, and every `=` dropped.
pub fn url_encode_b64(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Encode raw bytes as unpadded base64url.
pub fn buffer_to_base64_url_encoded(input: &[u8]) -> String {
    url_encode_b64(&general_purpose::STANDARD.encode(input))
}

/// SHA-256 of the UTF-8 bytes of `message`, computed inline.
pub fn sha256_digest(message: &str) -> [u8; 32] {
    let hash = Sha256::digest(message.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// SHA-256 of `message`, computed on the blocking pool.
///
/// Resolves to an error when no tokio runtime is running or the blocking
/// task cannot deliver a digest. Use [`sha256_digest`] off-runtime.
pub async fn sha256(message: &str) -> Result<[u8; 32]> {
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|_| anyhow!("sha256 digest unavailable: no async runtime"))?;
    let message = message.to_string();
    let digest = handle
        .spawn_blocking(move || sha256_digest(&message))
        .await
        .map_err(|e| anyhow!("sha256 digest unavailable: {}", e))?;
    debug!("computed sha256 digest ({} bytes)", digest.len());
    Ok(digest)
}

/// S256 challenge for `verifier`: base64url(sha256(verifier)).
pub fn code_challenge_s256(verifier: &str) -> String {
    buffer_to_base64_url_encoded(&sha256_digest(verifier))
}

/// A code verifier and the S256 challenge derived from it.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub async fn generate(length: usize) -> Result<Self> {
        if !(MIN_VERIFIER_LEN..=MAX_VERIFIER_LEN).contains(&length) {
            bail!(
                "code verifier length {} outside {}..={}",
                length,
                MIN_VERIFIER_LEN,
                MAX_VERIFIER_LEN
            );
        }
        let verifier = random_string(length)?;
        let digest = sha256(&verifier).await?;
        let challenge = buffer_to_base64_url_encoded(&digest);
        Ok(Self { verifier, challenge })
    }

    pub fn method(&self) -> &'static str {
        "S256"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encode_replaces_and_strips() {
        assert_eq!(url_encode_b64("a+b/c=="), "a-b_c");
        assert_eq!(url_encode_b64(""), "");
        assert_eq!(url_encode_b64("héllo+"), "héllo-");
    }

    #[test]
    fn rfc7636_challenge_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            code_challenge_s256(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }
}
