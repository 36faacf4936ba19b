mod bootstrap;
mod di;

use clap::Parser;
use di::Core;
use meshsentry_domain::CliOverrides;
use std::net::SocketAddr;
use tracing::info;

#[derive(Parser)]
#[command(name = "meshsentry")]
#[command(version)]
#[command(about = "Security data plane control loop for a self-hosted VPN")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Overrides `server.admin_port`.
    #[arg(short = 'p', long)]
    admin_port: Option<u16>,

    /// Overrides `server.bind_address`.
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Overrides `database.path`.
    #[arg(long)]
    database_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        admin_port: cli.admin_port,
        bind_address: cli.bind,
        database_path: cli.database_path,
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    info!("MeshSentry starting");

    let core = Core::build(config).await?;
    let bind_address = core.config.server.bind_address.clone();
    let admin_port = core.config.server.admin_port;

    let app_state = core.app_state();
    let job_runner = core.job_runner();
    job_runner.start().await;

    let app = meshsentry_api::create_api_routes(app_state);
    let addr: SocketAddr = format!("{bind_address}:{admin_port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    core.shutdown().await;
    info!("MeshSentry stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
