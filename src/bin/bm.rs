use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookmanager::cli::{self, Cli};
use bookmanager::client::CatalogClient;
use bookmanager::config::ClientConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    let client = CatalogClient::new(config.base_url);

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = cli::execute(args.command, &client, &mut stdout).await {
        tracing::error!("Failed to write output: {}", e);
        std::process::exit(1);
    }
}
