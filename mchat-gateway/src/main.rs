//! Mchat Session Gateway
//!
//! Serves the cookie-backed session API in front of the Mchat backend.

use clap::Parser;
use mchat_core::{init_logging, GatewayConfig};
use mchat_gateway::server::GatewayServerBuilder;
use std::path::PathBuf;

/// Mchat Session Gateway - keeps the chat session in cookies and forwards to the backend
#[derive(Parser)]
#[command(name = "mchat-gateway")]
#[command(about = "Session gateway for the Mchat web front end")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Base URL of the Mchat backend
    #[arg(long)]
    backend_url: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Defaults, then the TOML file, then the environment, then flags
    fn resolve_config(&self) -> mchat_core::GatewayResult<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)?,
            None => GatewayConfig::default(),
        }
        .apply_env();

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging = config.logging.with_level(level.clone());
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let server = match GatewayServerBuilder::new().config(config).build() {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        eprintln!("Server failed to start: {}", e);
        std::process::exit(1);
    }
}
