use anyhow::Context;
use clap::Parser;
use database_layer::DatabasePool;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use identity_server::{create_app, AppState, ServerConfig};

/// Identity Engine HTTP server
#[derive(Parser, Debug)]
#[command(name = "identity-server")]
#[command(about = "Authentication and user management API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing();

    let config = ServerConfig::from_env()?;

    let pool = DatabasePool::new(&config.database_url)
        .await
        .context("database connection failed")?;
    pool.run_migrations()
        .await
        .context("schema migration failed")?;

    // Token signing configuration is fixed from here on; nothing reads
    // mutable global state at call time.
    let state = AppState::new(pool, &config.identity());
    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("identity-server listening on http://{addr}");
    info!("authentication endpoints at http://{addr}/api/auth");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
