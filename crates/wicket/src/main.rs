use std::env;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use wicket::http;
use wicket::jira::JiraClient;
use wicket::service::IssueService;
use wicket_core::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "wicket",
    version,
    about = "Thin HTTP facade over a Jira-compatible issue tracker"
)]
struct Cli {
    /// Overrides SERVER_PORT from the environment.
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    #[arg(long, env = "WICKET_LOG", value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // A .env file may supply the variables below; the real environment wins.
    let dotenv_found = dotenvy::dotenv().is_ok();

    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    if !dotenv_found {
        tracing::debug!("no .env file, using the process environment only");
    }

    let mut config = Config::from_env().context("load configuration")?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        jira = %config.jira_base_url,
        "wicket starting"
    );

    serve(config).await
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let client = JiraClient::new(&config).context("build jira client")?;
    let service = Arc::new(IssueService::new(Arc::new(client)));
    let app = http::router(service);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    let local = listener
        .local_addr()
        .with_context(|| format!("local addr {addr}"))?;

    tracing::info!(addr = %local, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn init_logging(log_level: Option<&str>) -> anyhow::Result<()> {
    let level = log_level
        .map(str::to_owned)
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());

    let filter = EnvFilter::try_new(level).context("parse log level")?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    Ok(())
}
