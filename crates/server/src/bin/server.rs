use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use clap::Parser;
use server::{cli::Cli, configure_tracing, db, load_dotenv, routes, AppState};
use tokio::{net::TcpListener, signal};
use tracing::{debug, info, warn};

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            // Keep serving rather than exiting straight away
            warn!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let dotenv_path = load_dotenv()?;
    configure_tracing()?;
    debug!(?dotenv_path);

    let args = Cli::parse();
    debug!(?args);

    if args.debug_delete_database {
        warn!("Deleting database {}", args.sqlite_connection_string);
        db::delete_database(&args.sqlite_connection_string)?;
    }

    // Run the migrations synchronously before creating the pool or launching the server
    let ran = db::run_migrations(&args.sqlite_connection_string)?;
    info!("Ran {ran} db migrations");

    // Create a database pool to add into the app state
    let pool = db::create_pool(&args.sqlite_connection_string)?;
    let app = routes::app(AppState::new(pool), &args)?;

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);

    let listener = TcpListener::bind(socket).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
