//! # Thought Graph
//!
//! A reasoning-chain capture service: it takes a natural-language prompt,
//! asks an LLM to externalize its reasoning as a small directed graph of
//! thought steps, validates that output against a strict schema, and
//! persists it into a property-graph store as nodes and typed relationships.
//!
//! ## Architecture
//!
//! ```text
//! prompt → ChainGenerator → (nodes, edges) → ReasoningService
//!              ↓ (on any failure)                  ↓
//!         fallback chain                 GraphStore (Neo4j / SQLite)
//! ```
//!
//! Generation never fails: malformed or unreachable LLM output degrades to a
//! deterministic fallback chain. Persistence maps generator-local node ids to
//! store-assigned ids before creating relationships; edges whose endpoints do
//! not resolve are skipped, never fatal.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use thought_graph::{ChainGenerator, Config, ReasoningService};
//! use thought_graph::llm::OpenAiClient;
//! use thought_graph::store::SqliteGraphStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(SqliteGraphStore::new(&config.store.sqlite).await?);
//!     let llm = Arc::new(OpenAiClient::new(&config.llm, config.request.clone())?);
//!     let generator = ChainGenerator::new(llm, config.llm.temperature);
//!     let service = ReasoningService::new(generator, store);
//!
//!     let chain = service.process_prompt("Why is the sky blue?").await?;
//!     println!("{}", serde_json::to_string_pretty(&chain)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management.
pub mod config;
/// Error types and result aliases for each layer.
pub mod error;
/// Chain generation from LLM output, with deterministic fallback.
pub mod generator;
/// LLM completion capability and the OpenAI client.
pub mod llm;
/// Thought graph value types.
pub mod model;
/// System prompts sent to the LLM.
pub mod prompts;
/// Session orchestration over generator and store.
pub mod service;
/// Property-graph store capability and backends.
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use generator::ChainGenerator;
pub use model::{ChainStatus, ReasoningChain, ReasoningEdge, ThoughtNode, ThoughtType};
pub use service::{Health, NodeIdMap, ReasoningService};
