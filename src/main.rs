//! Nutrilog
//!
//! An MCP server for calorie and macro tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrilog::build_info;
use nutrilog::config::Config;
use nutrilog::db;
use nutrilog::lookup::{FoodResolver, LocalFoodTable, OpenFoodFactsClient, RemoteFoodSource};
use nutrilog::mcp::NutrilogService;
use nutrilog::tools::UserContext;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());
    eprintln!("User: {}", config.user_id);

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    eprintln!("Initializing database...");
    let database = db::Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    // Remote lookup is optional; without it only the built-in table answers
    let remote: Option<Arc<dyn RemoteFoodSource>> =
        match OpenFoodFactsClient::new(config.lookup_url.clone(), config.lookup_timeout) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!(error = %e, "Remote food lookup disabled");
                None
            }
        };
    let resolver = FoodResolver::new(LocalFoodTable::builtin(), remote);

    // Create the Nutrilog service
    let service = NutrilogService::new(
        config.database_path.clone(),
        database,
        resolver,
        UserContext::from(&config),
    );

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
