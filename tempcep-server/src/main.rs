//! HTTP server answering `GET /weather/{cep}` with the current temperature in three scales.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tempcep_server::{
    app,
    config::ServerConfig,
    logging::{self, LogFormat},
    routes,
};
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "tempcep", version, about = "Current temperature for a Brazilian postal code")]
struct Cli {
    /// TOML config file; skipped when it does not exist.
    #[arg(long, short, default_value = "tempcep.toml")]
    config: PathBuf,

    /// Dotenv file with `KEY=value` overrides; exported variables still win.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Listen port, overriding `WEB_SERVER_PORT` and the config file.
    #[arg(long, short)]
    port: Option<u16>,

    /// Log debug output.
    #[arg(long, short)]
    verbose: bool,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    let mut config = ServerConfig::load(&cli.config, &cli.env_file)
        .with_context(|| format!("could not load config from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.web_server_port = port;
    }

    if !config.has_weather_api_key() {
        tracing::warn!("WEATHER_API_KEY is not set; weather lookups will fail");
    }

    let service = app::build_service(&config).context("could not build HTTP client")?;
    let router = routes::router(service);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.web_server_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not listen on {addr}"))?;

    tracing::info!(%addr, "starting server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
