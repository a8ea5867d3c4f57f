//! Main entry point for the Knox token CLI
//!
//! Usage: `knox-token [CONFIG_PATH]`. Prints the access token on stdout.

use knox_jwt::{config::Settings, TokenFetcher};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };

    settings.validate()?;

    // Initialize logging on stderr so stdout only carries the token
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if settings.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let gateways = settings.gateway_config()?;
    info!(
        candidates = gateways.len(),
        ha = gateways.is_ha(),
        "Loaded Knox gateway configuration"
    );

    let fetcher = TokenFetcher::from_settings(&settings)?;

    match fetcher.fetch_jwt().await {
        Ok(token) => {
            println!("{}", token);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch Knox token");
            if e.is_user_facing() {
                anyhow::bail!(e.user_message());
            }
            Err(e.into())
        }
    }
}
