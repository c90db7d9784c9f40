//! Chain generation: LLM output to validated thought graph.
//!
//! [`ChainGenerator::generate`] never fails. The primary path asks the LLM
//! for a `thoughts`/`edges` JSON graph and strictly validates every field;
//! any transport error, schema violation, or out-of-range value discards the
//! whole response and substitutes the deterministic fallback chain. Partial
//! graphs are never produced.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{AppResult, GenerationError};
use crate::llm::CompletionClient;
use crate::model::{scoped_node_id, ReasoningEdge, ThoughtNode, ThoughtType};
use crate::prompts::REASONING_CHAIN_PROMPT;

/// Raw LLM reply schema; field names match the prompt's data contract.
#[derive(Debug, Deserialize)]
struct RawReasoning {
    thoughts: Vec<RawThought>,
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawThought {
    id: String,
    #[serde(rename = "type")]
    thought_type: String,
    content: String,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    from: String,
    to: String,
    label: String,
    confidence: Option<f64>,
}

/// Turns a prompt into a validated set of thought nodes and edges.
pub struct ChainGenerator {
    llm: Arc<dyn CompletionClient>,
    temperature: f64,
}

impl ChainGenerator {
    /// Create a generator over an LLM completion capability.
    pub fn new(llm: Arc<dyn CompletionClient>, temperature: f64) -> Self {
        Self { llm, temperature }
    }

    /// Whether the underlying LLM has a credential configured.
    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Generate a reasoning graph for the prompt. Never fails: any error in
    /// the primary path degrades to the fallback chain.
    pub async fn generate(
        &self,
        prompt: &str,
        session_id: &str,
    ) -> (Vec<ThoughtNode>, Vec<ReasoningEdge>) {
        match self.try_generate(prompt, session_id).await {
            Ok((nodes, edges)) => {
                info!(
                    session_id = %session_id,
                    nodes = nodes.len(),
                    edges = edges.len(),
                    "Generated reasoning chain"
                );
                (nodes, edges)
            }
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    error = %e,
                    "Chain generation failed, using fallback chain"
                );
                fallback_chain(prompt, session_id)
            }
        }
    }

    /// Primary path: call the LLM and validate its reply in full.
    async fn try_generate(
        &self,
        prompt: &str,
        session_id: &str,
    ) -> AppResult<(Vec<ThoughtNode>, Vec<ReasoningEdge>)> {
        let completion = self
            .llm
            .complete(REASONING_CHAIN_PROMPT, prompt, self.temperature)
            .await?;

        debug!(
            session_id = %session_id,
            completion_bytes = completion.len(),
            "Parsing reasoning completion"
        );

        let raw: RawReasoning = serde_json::from_str(&completion).map_err(|e| {
            GenerationError::InvalidResponse {
                message: format!("Completion is not a valid reasoning graph: {}", e),
            }
        })?;

        let mut nodes = Vec::with_capacity(raw.thoughts.len());
        for thought in &raw.thoughts {
            let thought_type: ThoughtType = thought.thought_type.parse()?;
            let node = ThoughtNode::new(
                scoped_node_id(session_id, &thought.id),
                thought_type,
                &thought.content,
                thought.confidence,
                session_id,
            )?
            .with_metadata("original_id", serde_json::Value::String(thought.id.clone()));
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(raw.edges.len());
        for edge in &raw.edges {
            edges.push(ReasoningEdge::new(
                scoped_node_id(session_id, &edge.from),
                scoped_node_id(session_id, &edge.to),
                &edge.label,
                edge.confidence.unwrap_or(1.0),
            )?);
        }

        Ok((nodes, edges))
    }
}

/// Fixed 3-node chain substituted when generation fails.
///
/// Side-effect free and infallible: the contents are constant and already
/// satisfy every model invariant, so construction cannot error.
pub fn fallback_chain(prompt: &str, session_id: &str) -> (Vec<ThoughtNode>, Vec<ReasoningEdge>) {
    let steps = [
        (
            "1",
            ThoughtType::Question,
            format!("Understanding the question: {}", prompt),
            0.7,
        ),
        (
            "2",
            ThoughtType::Reasoning,
            "Processing the request...".to_string(),
            0.5,
        ),
        (
            "3",
            ThoughtType::Conclusion,
            "Unable to generate detailed reasoning at this time.".to_string(),
            0.6,
        ),
    ];

    let nodes = steps
        .into_iter()
        .filter_map(|(local_id, thought_type, content, confidence)| {
            ThoughtNode::new(
                scoped_node_id(session_id, local_id),
                thought_type,
                content,
                confidence,
                session_id,
            )
            .ok()
        })
        .collect();

    let edges = [("1", "2", "analyzing"), ("2", "3", "concludes")]
        .into_iter()
        .filter_map(|(from, to, label)| {
            ReasoningEdge::new(
                scoped_node_id(session_id, from),
                scoped_node_id(session_id, to),
                label,
                1.0,
            )
            .ok()
        })
        .collect();

    (nodes, edges)
}
