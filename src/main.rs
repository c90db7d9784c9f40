use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use thought_graph::{
    config::{Config, StoreBackend},
    generator::ChainGenerator,
    llm::{CompletionClient, OpenAiClient},
    service::ReasoningService,
    store::{GraphStore, Neo4jGraphStore, SqliteGraphStore},
};

/// Reasoning-chain capture service
#[derive(Parser, Debug)]
#[command(name = "thought-graph", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process a prompt into a persisted reasoning chain
    Process {
        /// The prompt to reason about (1-2000 characters)
        prompt: String,
    },

    /// Report service liveness and LLM credential status
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Thought Graph starting..."
    );

    // Initialize the graph store
    let store: Arc<dyn GraphStore> = match config.store.backend {
        StoreBackend::Sqlite => match SqliteGraphStore::new(&config.store.sqlite).await {
            Ok(s) => {
                info!(path = %config.store.sqlite.path.display(), "SQLite graph store initialized");
                Arc::new(s)
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize SQLite graph store");
                return Err(e.into());
            }
        },
        StoreBackend::Neo4j => match Neo4jGraphStore::connect(&config.store.neo4j).await {
            Ok(s) => {
                s.ping().await?;
                info!(uri = %config.store.neo4j.uri, "Neo4j graph store connected");
                Arc::new(s)
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to Neo4j");
                return Err(e.into());
            }
        },
    };

    // Initialize the LLM client and service
    let llm = match OpenAiClient::new(&config.llm, config.request.clone()) {
        Ok(c) => {
            info!(
                base_url = %config.llm.base_url,
                model = %config.llm.model,
                configured = c.is_configured(),
                "LLM client initialized"
            );
            Arc::new(c)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize LLM client");
            return Err(e.into());
        }
    };

    let generator = ChainGenerator::new(llm, config.llm.temperature);
    let service = ReasoningService::new(generator, store);

    match cli.command {
        Commands::Process { prompt } => {
            let chain = service.process_prompt(&prompt).await?;
            println!("{}", serde_json::to_string_pretty(&chain)?);
        }
        Commands::Health => {
            let health = service.health();
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        thought_graph::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        thought_graph::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
