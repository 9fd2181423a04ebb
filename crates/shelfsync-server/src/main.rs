//! shelfsync — book catalog connector for the integration host.

use std::path::PathBuf;
use std::sync::Arc;

use shelfsync_connectors::schema::{model_definitions, options_schema};
use shelfsync_connectors::{CsvIngestor, NodeStore};
use shelfsync_core::ShelfsyncConfig;
use shelfsync_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("SHELFSYNC_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_usage() {
    println!("shelfsync — book catalog connector");
    println!();
    println!("Usage: shelfsync [command]");
    println!();
    println!("Commands:");
    println!("  (none)              Start the server");
    println!("  ingest <file.csv>   Ingest a local CSV into the node store");
    println!("  schema              Print the options schema and models as JSON");
    println!("  help                Show this help message");
}

/// Run the ingestor over a local file, writing into the data dir's node store.
fn ingest_file(config: &ShelfsyncConfig, path: &str) -> anyhow::Result<usize> {
    let payload = std::fs::read_to_string(path)?;
    let models = model_definitions(&config.type_prefix);
    let store = NodeStore::open(&config.data_paths.nodes_file, &models);
    let created = CsvIngestor::new(&store).ingest(&payload)?;
    Ok(created)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = resolve_data_dir();
    let config = ShelfsyncConfig::from_env(&data_dir)?;

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "ingest" => {
                let Some(path) = args.get(2) else {
                    eprintln!("Usage: shelfsync ingest <file.csv>");
                    std::process::exit(1);
                };
                let created = ingest_file(&config, path)?;
                println!(
                    "Created {} nodes in {}",
                    created,
                    config.data_paths.nodes_file.display()
                );
                return Ok(());
            }
            "schema" => {
                let schema = serde_json::json!({
                    "options": options_schema(),
                    "models": model_definitions(&config.type_prefix),
                });
                println!("{}", serde_json::to_string_pretty(&schema)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'shelfsync help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    info!("Data directory: {}", data_dir.display());

    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("shelfsync listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
