//! Tidedav CLI - serves a TorrServer instance as read-only WebDAV.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use tidedav_core::{BridgeConfig, Credentials, HttpBackendClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tidedav")]
#[command(about = "A read-only WebDAV bridge for TorrServer")]
struct Cli {
    /// Base URL of the TorrServer backend
    #[arg(long, env = "TORRSERVER_URL", default_value = "http://localhost:8090")]
    backend_url: String,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Basic-auth username; auth is disabled unless both username and
    /// password are set
    #[arg(long, env = "WEBDAV_USERNAME")]
    username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "WEBDAV_PASSWORD")]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let credentials = match (cli.username, cli.password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            Some(Credentials { username, password })
        }
        _ => None,
    };

    let config = BridgeConfig {
        backend_url: cli.backend_url,
        bind_addr: SocketAddr::new(cli.bind, cli.port),
        credentials,
        ..BridgeConfig::default()
    };

    info!(
        "Starting Tidedav: WebDAV on {}, backend {}, auth {}",
        config.bind_addr,
        config.backend_url,
        if config.auth_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );

    let backend = Arc::new(HttpBackendClient::new(&config)?);
    tidedav_web::run_server(config, backend).await
}
