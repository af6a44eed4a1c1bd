//! PKCE helpers and OpenID discovery for pkce-discovery-helpers
pub mod config;
pub mod models;
pub mod api;

pub use api::discovery::get_config;
pub use api::pkce::{buffer_to_base64_url_encoded, random_string, sha256, url_encode_b64};
