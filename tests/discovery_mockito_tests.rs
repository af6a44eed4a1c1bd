use mockito::Server;
use serde_json::json;
use std::env;
use pkce_discovery_helpers::api::discovery::HttpDiscovery;
use pkce_discovery_helpers::api::DiscoverySource;
use pkce_discovery_helpers::config::Config;
use pkce_discovery_helpers::models::OpenIdConfiguration;

fn discovery_doc(base: &str) -> serde_json::Value {
    json!({
        "issuer": format!("{}/", base),
        "authorization_endpoint": format!("{}/authorize", base),
        "token_endpoint": format!("{}/oauth/token", base),
        "jwks_uri": format!("{}/.well-known/jwks.json", base),
        "response_types_supported": ["code", "token id_token"],
        "code_challenge_methods_supported": ["S256", "plain"],
        "request_uri_parameter_supported": false
    })
}

#[test]
fn fetch_returns_parsed_document() {
    // Create mock server outside any tokio runtime
    let mut server = Server::new();
    let base = server.url();
    let doc = discovery_doc(&base);
    let m = server.mock("GET", "/.well-known/openid-configuration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(doc.to_string())
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let fetched = rt.block_on(async {
        HttpDiscovery::with_base(&base).fetch().await
    }).expect("fetch discovery");

    m.assert();
    assert_eq!(fetched, doc);

    let typed = OpenIdConfiguration::from_value(fetched).unwrap();
    assert_eq!(typed.token_endpoint, format!("{}/oauth/token", base));
    assert!(typed.supports_s256());
    assert_eq!(typed.extra["request_uri_parameter_supported"], json!(false));
}

#[test]
fn fetch_rejects_not_found() {
    let mut server = Server::new();
    let base = server.url();
    let _m = server.mock("GET", "/.well-known/openid-configuration")
        .with_status(404)
        .with_body("Not Found")
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let res = rt.block_on(async { HttpDiscovery::with_base(&base).fetch().await });

    assert!(res.is_err());
    assert!(format!("{}", res.err().unwrap()).contains("404"));
}

#[test]
fn fetch_rejects_malformed_json() {
    let mut server = Server::new();
    let base = server.url();
    let _m = server.mock("GET", "/.well-known/openid-configuration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"issuer\": ")
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let res = rt.block_on(async { HttpDiscovery::with_base(&base).fetch().await });

    let err = res.expect_err("malformed body should reject");
    assert!(format!("{:#}", err).contains("not valid JSON"));
}

#[test]
fn fetch_rejects_unreachable_issuer() {
    // Port 9 on loopback: nothing listens there
    let rt = tokio::runtime::Runtime::new().unwrap();
    let res = rt.block_on(async { HttpDiscovery::with_base("http://127.0.0.1:9").fetch().await });
    assert!(res.is_err());
}

#[test]
fn get_config_uses_configured_domain() {
    let mut server = Server::new();
    let base = server.url();
    // Only this test touches OIDC_ISSUER_BASE
    env::set_var("OIDC_ISSUER_BASE", &base);
    let doc = discovery_doc(&base);
    let _m = server.mock("GET", "/.well-known/openid-configuration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(doc.to_string())
        .create();

    let cfg = Config::for_domain("ignored.example.com");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let res = rt.block_on(async move { pkce_discovery_helpers::get_config(&cfg).await });
    env::remove_var("OIDC_ISSUER_BASE");

    assert_eq!(res.unwrap()["issuer"], json!(format!("{}/", base)));
}
