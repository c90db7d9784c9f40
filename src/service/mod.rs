//! Session orchestration.
//!
//! [`ReasoningService`] coordinates one prompt-processing request: generate a
//! chain, persist it node-by-node through the graph store, and hand the
//! caller back the logical chain. Store ids stay internal; the externally
//! visible chain only carries session-scoped node ids.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::generator::ChainGenerator;
use crate::model::{validate_prompt, ChainStatus, ReasoningChain};
use crate::store::{GraphStore, Properties};

/// Node label for session nodes.
pub const SESSION_LABEL: &str = "Session";
/// Node label for thought nodes.
pub const THOUGHT_LABEL: &str = "ThoughtNode";
/// Relationship from a session to each of its thoughts.
pub const HAS_THOUGHT: &str = "HAS_THOUGHT";
/// Relationship between connected thoughts.
pub const LEADS_TO: &str = "LEADS_TO";

/// Mapping from generator-local node ids to store ids, scoped to one
/// persist operation. Lookups of unmapped ids are an expected, non-fatal
/// case: the referencing edge is skipped.
#[derive(Debug, Default)]
pub struct NodeIdMap {
    entries: HashMap<String, String>,
}

impl NodeIdMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a local id to store id pair.
    pub fn record(&mut self, local_id: impl Into<String>, store_id: impl Into<String>) {
        self.entries.insert(local_id.into(), store_id.into());
    }

    /// Resolve a local id to its store id, if mapped.
    pub fn resolve(&self, local_id: &str) -> Option<&str> {
        self.entries.get(local_id).map(|s| s.as_str())
    }

    /// Number of mapped nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Health probe result.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    /// Liveness indicator, always `"healthy"` when the probe answers.
    pub status: &'static str,
    /// Whether an LLM credential is configured.
    pub llm_configured: bool,
}

/// Reasoning-chain capture service.
///
/// Owns a [`ChainGenerator`] and an injected [`GraphStore`] handle; one
/// instance serves many concurrent requests, each as its own task.
pub struct ReasoningService {
    generator: ChainGenerator,
    store: Arc<dyn GraphStore>,
}

impl ReasoningService {
    /// Create a service over a generator and a graph store.
    pub fn new(generator: ChainGenerator, store: Arc<dyn GraphStore>) -> Self {
        Self { generator, store }
    }

    /// Process a prompt end-to-end: generate a reasoning chain, persist it,
    /// and return the chain. Generation failures degrade to the fallback
    /// chain; store failures surface as errors with no rollback of nodes
    /// already written.
    pub async fn process_prompt(&self, prompt: &str) -> AppResult<ReasoningChain> {
        validate_prompt(prompt)?;

        let session_id = Uuid::new_v4().to_string();

        info!(session_id = %session_id, "Processing prompt");

        let (nodes, edges) = self.generator.generate(prompt, &session_id).await;

        // Session node first, so thoughts have something to hang off
        let session_store_id = self
            .store
            .create_node(
                SESSION_LABEL,
                props([
                    ("session_id", Value::String(session_id.clone())),
                    ("prompt", Value::String(prompt.to_string())),
                    ("status", Value::String(ChainStatus::Completed.to_string())),
                ]),
            )
            .await?;

        let mut id_map = NodeIdMap::new();

        for node in &nodes {
            let store_id = self
                .store
                .create_node(
                    THOUGHT_LABEL,
                    props([
                        ("node_id", Value::String(node.id.clone())),
                        ("type", Value::String(node.thought_type.to_string())),
                        ("content", Value::String(node.content.clone())),
                        ("confidence", json_number(node.confidence)),
                        ("session_id", Value::String(node.session_id.clone())),
                    ]),
                )
                .await?;

            self.store
                .create_relationship(&session_store_id, &store_id, HAS_THOUGHT, Properties::new())
                .await?;

            id_map.record(&node.id, store_id);
        }

        let mut persisted_edges = 0;
        for edge in &edges {
            let (from, to) = match (id_map.resolve(&edge.source_id), id_map.resolve(&edge.target_id))
            {
                (Some(from), Some(to)) => (from.to_string(), to.to_string()),
                _ => {
                    warn!(
                        session_id = %session_id,
                        source_id = %edge.source_id,
                        target_id = %edge.target_id,
                        "Skipping edge with unresolved endpoint"
                    );
                    continue;
                }
            };

            self.store
                .create_relationship(
                    &from,
                    &to,
                    LEADS_TO,
                    props([
                        ("label", Value::String(edge.label.clone())),
                        ("confidence", json_number(edge.confidence)),
                    ]),
                )
                .await?;
            persisted_edges += 1;
        }

        debug!(
            session_id = %session_id,
            nodes = id_map.len(),
            edges = persisted_edges,
            "Persisted reasoning graph"
        );

        let chain = ReasoningChain::new(
            session_id.clone(),
            prompt,
            nodes,
            edges,
            ChainStatus::Completed,
        )?;

        info!(session_id = %session_id, "Prompt processed");

        Ok(chain)
    }

    /// Retrieve a previously processed chain. Retrieval is not yet
    /// implemented; every session id reports not-found.
    pub async fn get_session(&self, session_id: &str) -> AppResult<ReasoningChain> {
        Err(AppError::SessionNotFound {
            session_id: session_id.to_string(),
        })
    }

    /// Update a thought node and re-derive downstream reasoning. Inputs are
    /// validated, but the operation itself is not implemented.
    pub async fn update_node(
        &self,
        _session_id: &str,
        _node_id: &str,
        content: &str,
        confidence: f64,
    ) -> AppResult<()> {
        if content.is_empty() {
            return Err(crate::error::ValidationError::EmptyField { field: "content" }.into());
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(
                crate::error::ValidationError::ConfidenceOutOfRange { value: confidence }.into(),
            );
        }

        Err(AppError::NotImplemented {
            operation: "update_node".to_string(),
        })
    }

    /// Liveness probe.
    pub fn health(&self) -> Health {
        Health {
            status: "healthy",
            llm_configured: self.generator.is_configured(),
        }
    }
}

fn props<const N: usize>(entries: [(&str, Value); N]) -> Properties {
    let mut map = Map::with_capacity(N);
    for (key, value) in entries {
        map.insert(key.to_string(), value);
    }
    map
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
