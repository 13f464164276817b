/**
 * NoteHub Server Entry Point
 *
 * Reads configuration from the environment (and `.env` if present), opens the
 * note store and serves the health route and the realtime socket until
 * Ctrl-C or SIGTERM.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use notehub::backend::server::{shutdown_signal, NoteServer};
    use notehub::shared::ServerConfig;
    use tracing_subscriber::EnvFilter;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Starting server on {}", config.bind_addr());

    let server = NoteServer::bind(config).await?;
    server.serve_with_shutdown(shutdown_signal()).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin notehub-server --features ssr");
    std::process::exit(1);
}
