use std::sync::Arc;

use anyhow::Context;
use catalog_db::MemoryStore;
use catalog_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalog", version, about = "Library catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API until interrupted
    Serve,
    /// Print the merged OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let settings =
                Settings::load().with_context(|| "failed to load catalog settings")?;
            catalog_telemetry::init(&settings.telemetry);

            tracing::info!(
                env = ?settings.environment,
                database = %settings.database.database,
                "catalog CLI serving"
            );
            catalog_app::run(settings).await
        }
        Command::Openapi => {
            // Route and schema definitions do not depend on stored data.
            let registry = catalog_app::build_registry(Arc::new(MemoryStore::new()));
            let document = catalog_http::router::openapi_document(&registry);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
    }
}
