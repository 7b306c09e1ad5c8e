use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use reclass_storage::MemoryStore;

mod handlers;
mod routes;
mod rulegen;
mod state;

use crate::rulegen::RuleGenerator;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = MemoryStore::new();
    if std::env::args().any(|arg| arg == "--seed") {
        reclass_storage::seed_demo_data(&store);
        tracing::info!("seeded demo transactions and rules");
    }

    let state = AppState::new(store, RuleGenerator::from_env());
    let app = routes::router(state);

    let addr: SocketAddr = std::env::var("RECLASS_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
