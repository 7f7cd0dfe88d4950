use std::sync::Arc;
use std::{env, io, process};

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eventd::cli;
use eventd::server;
use eventd::store::{Config, Store};

const EVENTD_DB_URI: &str = "EVENTD_DB_URI";

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    let Ok(uri) = env::var(EVENTD_DB_URI) else {
        eprintln!("`{EVENTD_DB_URI}` environment variable is not set");
        process::exit(1);
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("eventd=info,tower_http=info")),
        )
        .init();

    let store = Arc::new(Store::new(Config {
        uri,
        database: args.database,
    }));

    if let Err(err) = store.warm_up().await {
        tracing::warn!(error = %err, "document store not reachable yet, retrying on demand");
    }

    let router = server::router(store);

    let listener = TcpListener::bind(args.address).await?;
    tracing::info!(address = %args.address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown())
        .await
}

async fn shutdown() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install the shutdown handler");
    }
}
