use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use tracing_subscriber::prelude::*;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing::subscriber as tracing_subscriber_global;
use anyhow::{anyhow, Result, Context};
use pkce_discovery_helpers as lib;
use lib::api::DiscoverySource;
use lib::api::discovery::HttpDiscovery;
use lib::api::mock::StaticDiscovery;
use lib::api::pkce::{self, PkcePair};
use lib::config::Config;
use lib::models::OpenIdConfiguration;

#[derive(Parser)]
#[command(name = "pkce-helpers", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a random alphanumeric string
    Random {
        #[arg(long, default_value_t = 32)]
        length: usize,
    },
    /// Convert a standard base64 string to base64url
    Encode {
        input: String,
    },
    /// Print the SHA-256 of a message as hex and base64url
    Digest {
        message: String,
    },
    /// Generate a code verifier and its S256 challenge
    Pkce {
        /// Verifier length (defaults to verifier_length from config, else 64)
        #[arg(long)]
        length: Option<usize>,
    },
    /// Fetch and print the issuer's OpenID configuration
    Discover,
    /// Print an authorization URL for a fresh PKCE pair
    AuthorizeUrl {
        /// Use a built-in document instead of fetching discovery
        #[arg(long)]
        offline: bool,
    },
    /// Validate config file and exit
    ConfigValidate,
}

fn init_logging(cfg: Option<&Config>) -> Option<WorkerGuard> {
    let _ = LogTracer::init();

    let (file_writer, guard) = match cfg.and_then(|c| c.log_dir.as_ref()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "pkce-helpers.log");
            let (nb, guard) = tracing_appender::non_blocking(appender);
            (Some(nb), Some(guard))
        }
        None => (None, None),
    };

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer);

    if let Err(e) = tracing_subscriber_global::set_global_default(subscriber) {
        eprintln!("failed to set global tracing subscriber: {}", e);
    }
    guard
}

fn require_config(cfg: Option<Config>, path: &Path) -> Result<Config> {
    let cfg = cfg.ok_or_else(|| anyhow!("no config found at {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(cfg)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Explicit --config wins; otherwise the system-wide file, then the repo example.
    let resolved_config_path: PathBuf = match &cli.config {
        Some(p) => p.clone(),
        None => {
            let etc_path = Path::new("/etc/pkce-helpers/config.toml");
            if etc_path.exists() {
                etc_path.to_path_buf()
            } else {
                PathBuf::from("config/example-config.toml")
            }
        }
    };

    // Offline helpers run without a config file.
    let cfg = if resolved_config_path.exists() {
        Some(
            Config::from_path(&resolved_config_path)
                .with_context(|| format!("loading config from {}", resolved_config_path.display()))?,
        )
    } else {
        None
    };

    let _guard = init_logging(cfg.as_ref());

    match cli.command {
        Commands::Random { length } => {
            println!("{}", pkce::random_string(length)?);
        }
        Commands::Encode { input } => {
            println!("{}", pkce::url_encode_b64(&input));
        }
        Commands::Digest { message } => {
            let digest = pkce::sha256(&message).await?;
            println!("hex:       {}", hex(&digest));
            println!("base64url: {}", pkce::buffer_to_base64_url_encoded(&digest));
        }
        Commands::Pkce { length } => {
            let length = length
                .or_else(|| cfg.as_ref().map(|c| c.verifier_length))
                .unwrap_or(64);
            let pair = PkcePair::generate(length).await?;
            println!("code_verifier:         {}", pair.verifier);
            println!("code_challenge:        {}", pair.challenge);
            println!("code_challenge_method: {}", pair.method());
        }
        Commands::Discover => {
            let cfg = require_config(cfg, &resolved_config_path)?;
            let doc = lib::get_config(&cfg)
                .await
                .with_context(|| format!("fetching openid configuration for {}", cfg.domain))?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Commands::AuthorizeUrl { offline } => {
            let cfg = require_config(cfg, &resolved_config_path)?;
            let source: Box<dyn DiscoverySource> = if offline {
                Box::new(StaticDiscovery::for_domain(&cfg.domain))
            } else {
                Box::new(HttpDiscovery::new(&cfg.domain))
            };
            tracing::info!("resolving issuer metadata via {} source", source.name());
            let doc = OpenIdConfiguration::from_value(source.fetch().await?)?;
            let pair = PkcePair::generate(cfg.verifier_length).await?;
            let state = pkce::random_string(32)?;
            let url = lib::api::authorize::build_authorize_url(&doc, &cfg, &state, &pair)?;
            println!("{}", url);
            println!();
            println!("state:         {}", state);
            println!("code_verifier: {}", pair.verifier);
        }
        Commands::ConfigValidate => {
            let res = Config::from_path(resolved_config_path.as_path()).and_then(|c| c.validate());
            match res {
                Ok(()) => println!("OK"),
                Err(e) => {
                    eprintln!("Config validation failed: {}", e);
                    std::process::exit(2);
                }
            }
        }
    }

    Ok(())
}
